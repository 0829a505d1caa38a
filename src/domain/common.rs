//! Common types for domain models

use uuid::Uuid;

/// Open-ended JSON object used for parameter and credential bags.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// Generate a fresh random identifier in canonical hyphenated form.
pub fn new_guid() -> String {
    Uuid::new_v4().to_string()
}

/// Reject strings containing anything other than printable ASCII.
pub(crate) fn validate_printable(value: &str) -> Result<(), validator::ValidationError> {
    if value.chars().all(|c| c.is_ascii_graphic() || c == ' ') {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("printascii");
        err.message = Some("must contain only printable ASCII characters".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_guid_is_uuid() {
        let guid = new_guid();
        assert!(Uuid::parse_str(&guid).is_ok());
        assert_ne!(guid, new_guid());
    }

    #[test]
    fn test_validate_printable() {
        assert!(validate_printable("hello world-1").is_ok());
        assert!(validate_printable("tab\there").is_err());
        assert!(validate_printable("caf\u{e9}").is_err());
    }
}
