//! Input validation shared by services and request DTOs

use chrono::{Datelike, NaiveDate};

const PHONE_ERROR: &str =
    "Phone number must be in format: '+254712345678' or '0712345678' or '0112345678'";

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Accepts `+2547XXXXXXXX`, `+2541XXXXXXXX`, `07XXXXXXXX` and `01XXXXXXXX`.
pub fn is_kenyan_phone(phone: &str) -> bool {
    if let Some(rest) = phone.strip_prefix("+254") {
        return rest.len() == 9 && matches!(rest.as_bytes()[0], b'1' | b'7') && all_digits(rest);
    }
    (phone.starts_with("07") || phone.starts_with("01")) && phone.len() == 10 && all_digits(phone)
}

/// Validate a Kenyan phone number and rewrite local `0…` forms to `+254…`.
pub fn normalize_kenyan_phone(phone: &str) -> Result<String, String> {
    let phone = phone.trim();
    if !is_kenyan_phone(phone) {
        return Err(PHONE_ERROR.to_string());
    }
    match phone.strip_prefix('0') {
        Some(local) => Ok(format!("+254{}", local)),
        None => Ok(phone.to_string()),
    }
}

/// `validator` hook for optional phone fields on request DTOs.
pub fn validate_kenyan_phone(phone: &str) -> Result<(), validator::ValidationError> {
    if phone.is_empty() || is_kenyan_phone(phone.trim()) {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("phone");
        err.message = Some(PHONE_ERROR.into());
        Err(err)
    }
}

/// MPesa wallets are addressed as `2547XXXXXXXX` (12 digits, no plus).
pub fn validate_mpesa_phone(phone: &str) -> Result<String, String> {
    let phone = phone.trim();
    if !all_digits(phone) {
        return Err("Phone number should contain only digits".into());
    }
    if !phone.starts_with("254") || phone.len() != 12 {
        return Err("Phone number should start with 254 and be 12 digits long".into());
    }
    Ok(phone.to_string())
}

/// Strip spaces and check a card number; returns the last four digits.
pub fn card_last4(card_number: &str) -> Result<String, String> {
    let digits: String = card_number.chars().filter(|c| *c != ' ').collect();
    if !all_digits(&digits) {
        return Err("Card number should contain only digits".into());
    }
    if !(13..=19).contains(&digits.len()) {
        return Err("Invalid card number length".into());
    }
    Ok(digits[digits.len() - 4..].to_string())
}

/// A card expiring in month `month` of `year` is valid through the end of
/// that month.
pub fn validate_card_expiry(month: u32, year: i32, today: NaiveDate) -> Result<(), String> {
    if !(1..=12).contains(&month) {
        return Err("Expiry month must be between 1 and 12".into());
    }
    if (year, month) < (today.year(), today.month()) {
        return Err("Card has expired".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_kenyan_formats() {
        for ok in ["+254712345678", "+254112345678", "0712345678", "0112345678"] {
            assert!(is_kenyan_phone(ok), "{ok}");
        }
        for bad in ["+254812345678", "071234567", "07123456789", "+25471234567a", "", "254712345678"] {
            assert!(!is_kenyan_phone(bad), "{bad}");
        }
    }

    #[test]
    fn local_numbers_are_normalized() {
        assert_eq!(normalize_kenyan_phone("0712345678").unwrap(), "+254712345678");
        assert_eq!(normalize_kenyan_phone(" 0112345678 ").unwrap(), "+254112345678");
        assert_eq!(normalize_kenyan_phone("+254712345678").unwrap(), "+254712345678");
        assert!(normalize_kenyan_phone("12345").is_err());
    }

    #[test]
    fn mpesa_phone_rules() {
        assert_eq!(validate_mpesa_phone("254712345678").unwrap(), "254712345678");
        assert!(validate_mpesa_phone("0712345678").is_err());
        assert!(validate_mpesa_phone("+254712345678").is_err());
        assert!(validate_mpesa_phone("25471234567").is_err());
    }

    #[test]
    fn card_number_keeps_last_four() {
        assert_eq!(card_last4("4111 1111 1111 1111").unwrap(), "1111");
        assert_eq!(card_last4("5500000000000004").unwrap(), "0004");
        assert!(card_last4("4111-1111-1111-1111").is_err());
        assert!(card_last4("411111111111").is_err());
        assert!(card_last4("41111111111111111111").is_err());
    }

    #[test]
    fn card_expiry_allows_current_month() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        assert!(validate_card_expiry(6, 2025, today).is_ok());
        assert!(validate_card_expiry(1, 2026, today).is_ok());
        assert!(validate_card_expiry(5, 2025, today).is_err());
        assert!(validate_card_expiry(12, 2024, today).is_err());
        assert!(validate_card_expiry(13, 2030, today).is_err());
    }
}
