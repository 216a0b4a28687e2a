//! This file contains simple helper functions and test helpers.

/// Returns `x * 2^e`, computed in steps that keep the intermediate results in
/// the normal range so that a representable result is produced exactly.
pub fn ldexp(mut x: f64, mut e: i64) -> f64 {
    while e > 1023 {
        x *= pow2(1023);
        e -= 1023;
        if x.is_infinite() {
            return x;
        }
    }
    while e < -1022 {
        x *= pow2(-1022);
        e += 1022;
        if x == 0.0 {
            return x;
        }
    }
    x * pow2(e)
}

/// Returns 2^e for e in the normal exponent range [-1022, 1023].
fn pow2(e: i64) -> f64 {
    debug_assert!((-1022..=1023).contains(&e));
    f64::from_bits(((e + 1023) as u64) << 52)
}

#[test]
fn test_ldexp() {
    assert_eq!(ldexp(1.0, 0), 1.0);
    assert_eq!(ldexp(1.5, 3), 12.0);
    assert_eq!(ldexp(1.0, -1), 0.5);
    assert_eq!(ldexp(1.0, -1074), f64::from_bits(1));
    assert_eq!(ldexp(1.0, 1024), f64::INFINITY);
    assert_eq!(ldexp(1.0, -1200), 0.0);
    assert_eq!(ldexp(2.0 - f64::EPSILON, 1023), f64::MAX);
    assert_eq!(ldexp(1.0, -1022), f64::MIN_POSITIVE);
}

#[allow(dead_code)]
/// Returns list of interesting non-negative values that various tests use to
/// catch edge cases.
pub fn get_special_test_values() -> [f64; 18] {
    [
        f64::EPSILON,
        f64::MIN_POSITIVE,
        f64::from_bits(1),
        f64::MAX,
        std::f64::consts::PI,
        std::f64::consts::LN_2,
        std::f64::consts::SQRT_2,
        std::f64::consts::E,
        0.5,
        0.25,
        0.1,
        1.0,
        2.5,
        8.2,
        10.,
        0.00001,
        355. / 113.,
        4503599627370497.0,
    ]
}

#[allow(dead_code)]
/// Returns values that can't be normalized.
pub fn get_invalid_test_values() -> [f64; 6] {
    [
        -f64::NAN,
        f64::NAN,
        f64::INFINITY,
        f64::NEG_INFINITY,
        -f64::EPSILON,
        -10.,
    ]
}
