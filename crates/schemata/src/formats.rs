// Built-in string formats

use once_cell::sync::Lazy;
use regex::Regex;

/// Local part, `@`, then dot-separated domain labels ending in an
/// alphabetic TLD. Leading and doubled dots are rejected in `is_email`.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$",
    )
    .expect("email pattern is valid")
});

pub(crate) fn is_email(text: &str) -> bool {
    !text.starts_with('.') && !text.contains("..") && EMAIL_REGEX.is_match(text)
}

/// Absolute URL with a scheme
pub(crate) fn is_url(text: &str) -> bool {
    url::Url::parse(text).is_ok()
}

/// Hyphenated UUID (`8-4-4-4-12` hex digits)
pub(crate) fn is_uuid(text: &str) -> bool {
    text.len() == 36 && uuid::Uuid::try_parse(text).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(is_email("gilang@example.com"));
        assert!(is_email("first.last+tag@mail.example.co.id"));
        assert!(!is_email("tehe"));
        assert!(!is_email("@example.com"));
        assert!(!is_email(".gilang@example.com"));
        assert!(!is_email("gil..ang@example.com"));
        assert!(!is_email("gilang@example"));
        assert!(!is_email("gilang@-example.com"));
    }

    #[test]
    fn test_url() {
        assert!(is_url("https://example.com/path?q=1"));
        assert!(is_url("mailto:gilang@example.com"));
        assert!(!is_url("example.com"));
        assert!(!is_url(""));
    }

    #[test]
    fn test_uuid() {
        assert!(is_uuid("67e55044-10b1-426f-9247-bb680e5fe0c8"));
        assert!(is_uuid("00000000-0000-0000-0000-000000000000"));
        assert!(!is_uuid("67e5504410b1426f9247bb680e5fe0c8"));
        assert!(!is_uuid("{67e55044-10b1-426f-9247-bb680e5fe0c8}"));
        assert!(!is_uuid("not-a-uuid"));
    }
}
