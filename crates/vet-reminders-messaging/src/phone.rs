//! Phone number normalization for the messaging provider.
//!
//! The provider expects international numbers as bare digits (no `+`,
//! spaces or punctuation).

/// Country code prefixed to bare 10-digit national numbers by default.
pub const DEFAULT_COUNTRY_CODE: &str = "52";

/// Normalize a phone number into the provider's recipient format.
///
/// - Non-digit characters are stripped.
/// - Input starting with `+` is already international: the digits are kept as-is.
/// - Otherwise, exactly 10 digits get `country_code` prefixed.
/// - Anything else passes through as digits.
///
/// Returns `None` when the input contains no digits at all.
pub fn normalize_phone(phone: &str, country_code: &str) -> Option<String> {
    let trimmed = phone.trim();
    let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.is_empty() {
        return None;
    }

    if trimmed.starts_with('+') {
        return Some(digits);
    }

    if digits.len() == 10 {
        return Some(format!("{}{}", country_code, digits));
    }

    Some(digits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_national_number_gets_country_code() {
        assert_eq!(
            normalize_phone("55 1234 5678", DEFAULT_COUNTRY_CODE),
            Some("525512345678".to_string())
        );
        assert_eq!(
            normalize_phone("(555) 123-4567", "1"),
            Some("15551234567".to_string())
        );
    }

    #[test]
    fn test_plus_prefix_is_dropped() {
        assert_eq!(
            normalize_phone("+52 1 55 1234 5678", DEFAULT_COUNTRY_CODE),
            Some("5215512345678".to_string())
        );
        // Already international, even with 10 digits
        assert_eq!(
            normalize_phone("+4420123456", DEFAULT_COUNTRY_CODE),
            Some("4420123456".to_string())
        );
    }

    #[test]
    fn test_other_lengths_pass_through() {
        assert_eq!(
            normalize_phone("5215512345678", DEFAULT_COUNTRY_CODE),
            Some("5215512345678".to_string())
        );
        assert_eq!(normalize_phone("12345", DEFAULT_COUNTRY_CODE), Some("12345".to_string()));
    }

    #[test]
    fn test_no_digits() {
        assert_eq!(normalize_phone("", DEFAULT_COUNTRY_CODE), None);
        assert_eq!(normalize_phone("+ () -", DEFAULT_COUNTRY_CODE), None);
    }

    proptest! {
        #[test]
        fn prop_output_is_digits_only(input in ".{0,24}") {
            if let Some(out) = normalize_phone(&input, DEFAULT_COUNTRY_CODE) {
                prop_assert!(!out.is_empty());
                prop_assert!(out.chars().all(|c| c.is_ascii_digit()));
            }
        }

        #[test]
        fn prop_ten_digit_national_numbers_are_prefixed(digits in "[0-9]{10}") {
            let out = normalize_phone(&digits, DEFAULT_COUNTRY_CODE).unwrap();
            prop_assert_eq!(out, format!("52{}", digits));
        }

        #[test]
        fn prop_plus_numbers_keep_their_digits(digits in "[0-9]{8,15}") {
            let out = normalize_phone(&format!("+{}", digits), DEFAULT_COUNTRY_CODE).unwrap();
            prop_assert_eq!(out, digits);
        }
    }
}
