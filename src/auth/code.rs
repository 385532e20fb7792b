//! Verification-code generation.

use rand::{rngs::OsRng, Rng};

/// Verification codes are exactly six decimal digits.
pub const CODE_LENGTH: usize = 6;

const CODE_MIN: u32 = 100_000;
const CODE_MAX: u32 = 999_999;

/// Draw a 6-digit code from the OS CSPRNG, uniform over 100000..=999999.
///
/// `gen_range` rejects out-of-range draws internally, so no value in the
/// range is favored. The code is stored, never re-derived from a seed.
#[must_use]
pub fn generate_code() -> String {
    OsRng.gen_range(CODE_MIN..=CODE_MAX).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_six_decimal_digits() {
        for _ in 0..200 {
            let code = generate_code();
            assert_eq!(code.len(), CODE_LENGTH);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn codes_stay_in_range() {
        for _ in 0..200 {
            let value: u32 = generate_code().parse().expect("numeric code");
            assert!((CODE_MIN..=CODE_MAX).contains(&value));
        }
    }

    #[test]
    fn codes_vary() {
        let first = generate_code();
        // 200 draws over 900k values collide with negligible probability.
        assert!((0..200).any(|_| generate_code() != first));
    }
}
