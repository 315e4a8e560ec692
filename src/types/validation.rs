use thiserror::Error;

/// A client-side validation failure, raised before anything is dispatched
/// to the data service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Require a non-blank value.
pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    Ok(())
}

/// Check an email address has the `local@domain.tld` shape.
///
/// This is the same permissive check the dashboard forms use; it is not an
/// RFC 5322 parser.
pub fn validate_email(field: &'static str, value: &str) -> Result<(), ValidationError> {
    require(field, value)?;

    let value = value.trim();
    let valid = !value.chars().any(char::is_whitespace)
        && value.split_once('@').is_some_and(|(local, domain)| {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .rsplit_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        });

    if !valid {
        return Err(ValidationError::new(field, "is not a valid email address"));
    }
    Ok(())
}

/// Organization slugs are lowercase ASCII letters, digits and hyphens.
pub fn validate_slug(field: &'static str, value: &str) -> Result<(), ValidationError> {
    require(field, value)?;

    let valid = value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !value.starts_with('-')
        && !value.ends_with('-');

    if !valid {
        return Err(ValidationError::new(
            field,
            "may only contain lowercase letters, digits and inner hyphens",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require() {
        assert!(require("name", "Acme").is_ok());
        assert!(require("name", "").is_err());
        assert!(require("name", "   ").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("email", "bob@co.com").is_ok());
        assert!(validate_email("email", " eleanor@expenseflow.com ").is_ok());

        assert!(validate_email("email", "").is_err());
        assert!(validate_email("email", "bob").is_err());
        assert!(validate_email("email", "bob@co").is_err());
        assert!(validate_email("email", "@co.com").is_err());
        assert!(validate_email("email", "bob@.com").is_err());
        assert!(validate_email("email", "bo b@co.com").is_err());
        assert!(validate_email("email", "bob@co@co.com").is_err());
    }

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("slug", "acme").is_ok());
        assert!(validate_slug("slug", "blueberry-labs-2").is_ok());

        assert!(validate_slug("slug", "").is_err());
        assert!(validate_slug("slug", "Acme").is_err());
        assert!(validate_slug("slug", "acme corp").is_err());
        assert!(validate_slug("slug", "-acme").is_err());
    }

    #[test]
    fn test_error_display() {
        let err = ValidationError::new("merchant", "is required");
        assert_eq!(err.to_string(), "merchant: is required");
    }
}
