use super::error::{Error, Result};

/// Describes the shape of a normalized number: how many mantissa bits are
/// kept, and how many fractional digits the doubling expansion may produce
/// before it gives up on reaching an exact zero remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Semantics {
    /// The number of bits in the mantissa (excluding the leading one).
    pub mantissa_len: usize,
    /// The maximum number of fractional digits generated by the expansion.
    pub fraction_cap: usize,
}

/// A 64-bit mantissa with up to 70 fractional digits.
pub const REFERENCE: Semantics = Semantics::new(64, 70);
/// A 52-bit mantissa with up to 56 fractional digits, matching the digit
/// budget of a double.
pub const COMPACT: Semantics = Semantics::new(52, 56);

impl Default for Semantics {
    fn default() -> Self {
        REFERENCE
    }
}

impl Semantics {
    pub const fn new(mantissa_len: usize, fraction_cap: usize) -> Self {
        Semantics {
            mantissa_len,
            fraction_cap,
        }
    }

    /// Returns the length of the mantissa in bits.
    pub fn get_mantissa_len(&self) -> usize {
        self.mantissa_len
    }

    /// Returns the maximum number of fractional digits.
    pub fn get_fraction_cap(&self) -> usize {
        self.fraction_cap
    }

    /// Create new semantics with a different mantissa length.
    pub fn with_mantissa_len(&self, mantissa_len: usize) -> Semantics {
        Semantics::new(mantissa_len, self.fraction_cap)
    }

    /// Create new semantics with a different fractional digit cap.
    pub fn with_fraction_cap(&self, fraction_cap: usize) -> Semantics {
        Semantics::new(self.mantissa_len, fraction_cap)
    }

    /// Look up a preset by name ("reference" or "compact").
    pub fn from_name(name: &str) -> Option<Semantics> {
        match name.to_ascii_lowercase().as_str() {
            "reference" => Some(REFERENCE),
            "compact" => Some(COMPACT),
            _ => None,
        }
    }

    /// Checks that both limits are non-zero.
    pub fn validate(&self) -> Result<()> {
        if self.mantissa_len == 0 || self.fraction_cap == 0 {
            return Err(Error::InvalidSemantics {
                mantissa_len: self.mantissa_len,
                fraction_cap: self.fraction_cap,
            });
        }
        Ok(())
    }
}

#[test]
fn test_presets() {
    assert_eq!(REFERENCE.get_mantissa_len(), 64);
    assert_eq!(REFERENCE.get_fraction_cap(), 70);
    assert_eq!(COMPACT.get_mantissa_len(), 52);
    assert_eq!(COMPACT.get_fraction_cap(), 56);
    assert_eq!(Semantics::default(), REFERENCE);
    assert_eq!(Semantics::from_name("Compact"), Some(COMPACT));
    assert_eq!(Semantics::from_name("fp64"), None);
}

#[test]
fn test_validate() {
    assert!(REFERENCE.validate().is_ok());
    assert!(REFERENCE.with_fraction_cap(1).validate().is_ok());
    assert_eq!(
        REFERENCE.with_mantissa_len(0).validate(),
        Err(Error::InvalidSemantics {
            mantissa_len: 0,
            fraction_cap: 70
        })
    );
    assert!(COMPACT.with_fraction_cap(0).validate().is_err());
}
