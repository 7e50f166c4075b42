use rand::RngExt;

/// Generate a random numeric one-time passcode of `length` digits.
///
/// Each digit is drawn independently and uniformly from 0-9, so leading
/// zeros are possible and the result must stay a string.
pub fn generate_otp(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length).map(|_| char::from(b'0' + rng.random_range(0..10u8))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_length_is_six_digits() {
        let otp = generate_otp(6);
        assert_eq!(otp.len(), 6);
        assert!(otp.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn zero_length_yields_empty_string() {
        assert_eq!(generate_otp(0), "");
    }

    proptest! {
        #[test]
        fn otp_has_exact_length_and_only_digits(length in 1usize..=12) {
            let otp = generate_otp(length);
            prop_assert_eq!(otp.len(), length);
            prop_assert!(otp.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
