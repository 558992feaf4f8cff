/// Input validators for account data

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ValidationError;

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321
const MIN_EMAIL_LENGTH: usize = 3;
const MAX_PASSWORD_LENGTH: usize = 72; // bcrypt ignores anything past 72 bytes

lazy_static! {
    // RFC 5322 simplified email regex (practical validation)
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).unwrap();
}

/// Validates an email address and returns it trimmed
pub fn is_valid_email(email: &str) -> Result<String, ValidationError> {
    let trimmed = email.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("email".to_string()));
    }
    if trimmed.len() < MIN_EMAIL_LENGTH {
        return Err(ValidationError::TooShort("email".to_string(), MIN_EMAIL_LENGTH));
    }
    if trimmed.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong("email".to_string(), MAX_EMAIL_LENGTH));
    }
    if !EMAIL_REGEX.is_match(trimmed) {
        return Err(ValidationError::InvalidFormat("email".to_string()));
    }

    Ok(trimmed.to_string())
}

/// Checks a new password before it is hashed
pub fn is_valid_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::EmptyField("password".to_string()));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::TooLong("password".to_string(), MAX_PASSWORD_LENGTH));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        for email in ["a@x.com", "user.name+tag@example.co.uk", "  walt@breakingbad.com "] {
            assert!(is_valid_email(email).is_ok(), "rejected {}", email);
        }
        assert_eq!(is_valid_email(" a@x.com ").unwrap(), "a@x.com");
    }

    #[test]
    fn test_invalid_emails() {
        let cases = vec![
            ("", "empty"),
            ("notanemail", "no at sign"),
            ("user@", "no domain"),
            ("@example.com", "no local part"),
            ("user@@example.com", "double at"),
        ];
        for (email, reason) in cases {
            assert!(is_valid_email(email).is_err(), "accepted email with {}", reason);
        }
    }

    #[test]
    fn test_email_too_long() {
        let email = format!("{}@example.com", "a".repeat(250));
        assert_eq!(
            is_valid_email(&email),
            Err(ValidationError::TooLong("email".to_string(), MAX_EMAIL_LENGTH))
        );
    }

    #[test]
    fn test_password_rules() {
        assert!(is_valid_password("secret1").is_ok());
        assert_eq!(
            is_valid_password(""),
            Err(ValidationError::EmptyField("password".to_string()))
        );
        assert!(is_valid_password(&"p".repeat(MAX_PASSWORD_LENGTH + 1)).is_err());
    }
}
