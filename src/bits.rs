//! This module contains the ordered bit sequence that we use for mantissas
//! and digit expansions.

use core::fmt::Display;
use core::str::FromStr;

/// An ordered sequence of binary digits, most significant first. This is the
/// representation of both the normalized mantissa and the raw digit
/// expansions. Bits renders as (and parses from) a string of '0' and '1'.
///
/// # Examples
///
/// ```
///    use floatlab::Bits;
///
///    let x: Bits = "1011".parse().unwrap();
///    assert_eq!(x.len(), 4);
///    assert_eq!(x.to_string(), "1011");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Bits {
    bits: Vec<bool>,
}

impl Bits {
    /// Create a new empty sequence.
    pub fn new() -> Self {
        Bits { bits: Vec::new() }
    }

    /// Create a sequence of `len` zero bits.
    pub fn zeros(len: usize) -> Self {
        Bits {
            bits: vec![false; len],
        }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    pub fn extend_from(&mut self, other: &Bits) {
        self.bits.extend_from_slice(&other.bits);
    }

    /// Returns the bit at index `idx`, counting from the most significant.
    pub fn get(&self, idx: usize) -> Option<bool> {
        self.bits.get(idx).copied()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    /// Returns the index of the first set bit.
    pub fn first_one(&self) -> Option<usize> {
        self.bits.iter().position(|b| *b)
    }

    /// Returns the number of set bits.
    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    /// Returns true if all of the bits are zero (or the sequence is empty).
    pub fn is_zero(&self) -> bool {
        self.first_one().is_none()
    }

    /// Returns a new sequence with the bits in the range [from, len).
    pub fn tail(&self, from: usize) -> Bits {
        let from = from.min(self.len());
        Bits {
            bits: self.bits[from..].to_vec(),
        }
    }

    /// Pad the sequence on the right with zeros, or truncate it, so that it
    /// holds exactly `len` bits. Returns true if a set bit was dropped.
    pub fn resize(&mut self, len: usize) -> bool {
        let lost = self.bits.iter().skip(len).any(|b| *b);
        self.bits.resize(len, false);
        lost
    }

    /// Interpret the first `n` bits as an unsigned integer (n <= 64).
    pub fn prefix_as_u64(&self, n: usize) -> u64 {
        debug_assert!(n <= 64);
        let mut res: u64 = 0;
        for i in 0..n {
            res <<= 1;
            res |= self.get(i).unwrap_or(false) as u64;
        }
        res
    }

    /// Interpret the sequence as the binary fraction 0.b0b1b2...
    pub fn as_fraction(&self) -> f64 {
        let mut res = 0.0;
        let mut weight = 0.5;
        for bit in self.iter() {
            if bit {
                res += weight;
            }
            weight /= 2.0;
        }
        res
    }
}

impl From<Vec<bool>> for Bits {
    fn from(bits: Vec<bool>) -> Self {
        Bits { bits }
    }
}

impl FromIterator<bool> for Bits {
    fn from_iter<T: IntoIterator<Item = bool>>(iter: T) -> Self {
        Bits {
            bits: iter.into_iter().collect(),
        }
    }
}

impl Display for Bits {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for bit in self.iter() {
            write!(f, "{}", if bit { '1' } else { '0' })?;
        }
        Ok(())
    }
}

/// Reported when a string contains a character other than '0' or '1'.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseBitsError(pub char);

impl Display for ParseBitsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "invalid binary digit {:?}", self.0)
    }
}

impl std::error::Error for ParseBitsError {}

impl FromStr for Bits {
    type Err = ParseBitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(ParseBitsError(other)),
            })
            .collect()
    }
}

impl serde::Serialize for Bits {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[test]
fn test_parse_and_print() {
    let x: Bits = "0010110".parse().unwrap();
    assert_eq!(x.len(), 7);
    assert_eq!(x.first_one(), Some(2));
    assert_eq!(x.count_ones(), 3);
    assert_eq!(x.to_string(), "0010110");
    assert_eq!("01x".parse::<Bits>(), Err(ParseBitsError('x')));
    assert_eq!(Bits::new().to_string(), "");
}

#[test]
fn test_resize() {
    let mut x: Bits = "101".parse().unwrap();
    assert!(!x.resize(6));
    assert_eq!(x.to_string(), "101000");

    let mut y: Bits = "110001".parse().unwrap();
    assert!(y.resize(3));
    assert_eq!(y.to_string(), "110");

    let mut z: Bits = "110000".parse().unwrap();
    assert!(!z.resize(2));
    assert_eq!(z.to_string(), "11");
}

#[test]
fn test_values() {
    let x: Bits = "0101".parse().unwrap();
    assert_eq!(x.prefix_as_u64(4), 5);
    assert_eq!(x.prefix_as_u64(2), 1);
    // Bits past the end read as zero.
    assert_eq!(x.prefix_as_u64(6), 20);
    assert_eq!(x.as_fraction(), 0.3125);
    assert_eq!(x.tail(2).to_string(), "01");
    assert!(x.tail(9).is_empty());
    assert!(Bits::zeros(12).is_zero());
}
