use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::Date;

use crate::error::ApiError;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Collects field-level errors so a response can report every failing field
/// at once instead of stopping at the first one.
#[derive(Debug, Default)]
pub struct Validator {
    field_errors: BTreeMap<String, String>,
}

impl Validator {
    /// Record an error for `field` when the check failed. The first error
    /// recorded for a field wins.
    pub fn check_field(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.add_field_error(field, message);
        }
    }

    pub fn add_field_error(&mut self, field: &str, message: &str) {
        self.field_errors
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }

    pub fn is_valid(&self) -> bool {
        self.field_errors.is_empty()
    }

    pub fn into_error(self) -> ApiError {
        ApiError::Validation(self.field_errors)
    }
}

pub fn not_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

pub fn max_chars(value: &str, n: usize) -> bool {
    value.chars().count() <= n
}

pub fn min_chars(value: &str, n: usize) -> bool {
    value.chars().count() >= n
}

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Parse a week date in the literal `YYYY-MM-DD` wire format.
pub fn parse_date(value: &str) -> Option<Date> {
    Date::parse(value, DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    #[test]
    fn not_blank_rejects_whitespace_only() {
        assert!(not_blank("hola"));
        assert!(!not_blank(""));
        assert!(!not_blank("   "));
    }

    #[test]
    fn char_counts_are_per_character_not_per_byte() {
        // "ñ" is two bytes but one character.
        let titulo = "ñ".repeat(100);
        assert!(max_chars(&titulo, 100));
        assert!(!max_chars(&format!("{titulo}x"), 100));
        assert!(min_chars("señal6", 6));
        assert!(!min_chars("corto", 6));
    }

    #[test]
    fn email_regex_accepts_plain_addresses() {
        assert!(is_valid_email("ana@example.com"));
        assert!(!is_valid_email("ana@example"));
        assert!(!is_valid_email("no-arroba.com"));
        assert!(!is_valid_email("dos @espacios.com"));
    }

    #[test]
    fn parse_date_accepts_iso_week_dates() {
        let d = parse_date("2024-01-07").expect("valid date");
        assert_eq!(d.year(), 2024);
        assert_eq!(d.month(), Month::January);
        assert_eq!(d.day(), 7);
    }

    #[test]
    fn parse_date_rejects_out_of_range_and_unpadded() {
        assert!(parse_date("2024-13-40").is_none());
        assert!(parse_date("2024-02-30").is_none());
        assert!(parse_date("2024-1-1").is_none());
        assert!(parse_date("no es fecha").is_none());
    }

    #[test]
    fn validator_accumulates_all_fields() {
        let mut v = Validator::default();
        v.check_field(not_blank(""), "titulo", "Este campo no puede estar en blanco");
        v.check_field(not_blank(""), "descripcion", "Este campo no puede estar en blanco");
        v.check_field(true, "fin_semana", "no debe aparecer");
        assert!(!v.is_valid());
        match v.into_error() {
            ApiError::Validation(fields) => {
                assert_eq!(fields.len(), 2);
                assert!(fields.contains_key("titulo"));
                assert!(fields.contains_key("descripcion"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn first_error_per_field_wins() {
        let mut v = Validator::default();
        v.add_field_error("email", "Este campo no puede estar en blanco");
        v.add_field_error("email", "Email inválido");
        match v.into_error() {
            ApiError::Validation(fields) => {
                assert_eq!(fields["email"], "Este campo no puede estar en blanco");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
