use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating reporter phone numbers.
    /// Accepts local and international formats with optional separators.
    /// - Valid: "0812345678", "+66812345678", "081-234-5678"
    /// - Invalid: "abc", "12", "++66"
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9]{1,3}?[-. ]?[0-9]{2,4}([-. ]?[0-9]{2,4}){1,3}$").unwrap();

    /// Regex for validating province codes: two-letter prefix plus digits.
    /// - Valid: "TH-50", "TH-10"
    /// - Invalid: "th-50", "50", "TH50"
    pub static ref PROVINCE_CODE_REGEX: Regex = Regex::new(r"^[A-Z]{2}-[0-9]{1,3}$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_regex_valid() {
        assert!(PHONE_REGEX.is_match("0812345678"));
        assert!(PHONE_REGEX.is_match("+66812345678"));
        assert!(PHONE_REGEX.is_match("081-234-5678"));
        assert!(PHONE_REGEX.is_match("02 123 4567"));
    }

    #[test]
    fn test_phone_regex_invalid() {
        assert!(!PHONE_REGEX.is_match("abc"));
        assert!(!PHONE_REGEX.is_match("12"));
        assert!(!PHONE_REGEX.is_match("++66812345678"));
        assert!(!PHONE_REGEX.is_match(""));
    }

    #[test]
    fn test_province_code_regex() {
        assert!(PROVINCE_CODE_REGEX.is_match("TH-50"));
        assert!(PROVINCE_CODE_REGEX.is_match("TH-1"));
        assert!(!PROVINCE_CODE_REGEX.is_match("th-50"));
        assert!(!PROVINCE_CODE_REGEX.is_match("TH50"));
        assert!(!PROVINCE_CODE_REGEX.is_match("50"));
    }
}
