//! Field constraints shared by the client and case use cases.

use crate::error::AppError;
use regex::Regex;
use rust_decimal::Decimal;
use std::sync::OnceLock;

pub const NAME_MAX: usize = 255;
pub const EMAIL_MAX: usize = 255;
pub const PHONE_MAX: usize = 20;
pub const COMPANY_MAX: usize = 255;
pub const INVOICE_NUMBER_MAX: usize = 100;

pub const SKIP_DEFAULT: i64 = 0;
pub const LIMIT_DEFAULT: i64 = 10;
pub const LIMIT_MAX: i64 = 10_000;

/// NUMERIC(15, 2): 13 integer digits.
const AMOUNT_SCALE: u32 = 2;
const AMOUNT_INTEGER_DIGITS: u32 = 13;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
            .unwrap_or_else(|e| panic!("email regex: {e}"))
    })
}

/// Required text, 1..=max characters. Whitespace counts as content.
pub fn required_text(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    max_len(field, value, max)
}

pub fn max_len(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

pub fn optional_text(field: &str, value: Option<&str>, max: usize) -> Result<(), AppError> {
    match value {
        Some(v) => max_len(field, v, max),
        None => Ok(()),
    }
}

/// Validate an optional address and return it with the domain lowercased.
pub fn email(value: Option<&str>) -> Result<Option<String>, AppError> {
    let Some(v) = value else {
        return Ok(None);
    };
    max_len("email", v, EMAIL_MAX)?;
    if !email_regex().is_match(v) {
        return Err(AppError::Validation(format!(
            "email {v:?} is not a valid email address"
        )));
    }
    Ok(Some(match v.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_ascii_lowercase()),
        None => v.to_string(),
    }))
}

/// Positive, at most two fractional digits, fits NUMERIC(15, 2).
/// Returns the amount rescaled to exactly two fractional digits.
pub fn amount(value: Decimal) -> Result<Decimal, AppError> {
    if value <= Decimal::ZERO {
        return Err(AppError::Validation("amount must be greater than 0".into()));
    }
    let normalized = value.normalize();
    if normalized.scale() > AMOUNT_SCALE {
        return Err(AppError::Validation(
            "amount must have at most 2 decimal places".into(),
        ));
    }
    if normalized.trunc() >= Decimal::from(10_i64.pow(AMOUNT_INTEGER_DIGITS)) {
        return Err(AppError::Validation(
            "amount must have at most 13 digits before the decimal point".into(),
        ));
    }
    let mut out = normalized;
    out.rescale(AMOUNT_SCALE);
    Ok(out)
}

/// skip >= 0, 1 <= limit <= 10000.
pub fn page(skip: Option<i64>, limit: Option<i64>) -> Result<(i64, i64), AppError> {
    let skip = skip.unwrap_or(SKIP_DEFAULT);
    let limit = limit.unwrap_or(LIMIT_DEFAULT);
    if skip < 0 {
        return Err(AppError::Validation(
            "skip must be greater than or equal to 0".into(),
        ));
    }
    if !(1..=LIMIT_MAX).contains(&limit) {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {LIMIT_MAX}"
        )));
    }
    Ok((skip, limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn accepts_common_emails() {
        assert!(email(Some("a@acme.com")).is_ok());
        assert!(email(Some("first.last+tag@mail.example.co.in")).is_ok());
        assert_eq!(email(None).unwrap(), None);
    }

    #[test]
    fn email_domain_is_lowercased() {
        assert_eq!(
            email(Some("John.Doe@Example.COM")).unwrap().as_deref(),
            Some("John.Doe@example.com")
        );
    }

    #[test]
    fn rejects_bad_emails() {
        for bad in ["", "plain", "a@", "@acme.com", "a@acme", "a b@acme.com", "a@@acme.com"] {
            assert!(email(Some(bad)).is_err(), "{bad:?} accepted");
        }
    }

    #[test]
    fn required_text_rules() {
        assert!(required_text("name", "Acme", NAME_MAX).is_ok());
        assert!(required_text("name", "", NAME_MAX).is_err());
        assert!(required_text("name", "   ", NAME_MAX).is_ok());
        assert!(required_text("name", &"x".repeat(255), NAME_MAX).is_ok());
        assert!(required_text("name", &"x".repeat(256), NAME_MAX).is_err());
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let phone = "é".repeat(20);
        assert!(max_len("phone", &phone, PHONE_MAX).is_ok());
    }

    #[test]
    fn amount_rules() {
        let d = |s: &str| Decimal::from_str(s).unwrap();
        assert_eq!(amount(d("100")).unwrap().to_string(), "100.00");
        assert_eq!(amount(d("99.5")).unwrap().to_string(), "99.50");
        assert_eq!(amount(d("0.01")).unwrap().to_string(), "0.01");
        assert_eq!(amount(d("12.300")).unwrap().to_string(), "12.30");
        assert!(amount(d("0")).is_err());
        assert!(amount(d("-5.00")).is_err());
        assert!(amount(d("1.234")).is_err());
        assert!(amount(d("9999999999999.99")).is_ok());
        assert!(amount(d("10000000000000")).is_err());
    }

    #[test]
    fn page_bounds() {
        assert_eq!(page(None, None).unwrap(), (0, 10));
        assert_eq!(page(Some(5), Some(10_000)).unwrap(), (5, 10_000));
        assert!(page(Some(-1), None).is_err());
        assert!(page(None, Some(0)).is_err());
        assert!(page(None, Some(10_001)).is_err());
    }
}
