use crate::domain::errors::{DomainError, DomainResult};

/// Checks an email before it is forwarded to the backend's user endpoints.
pub fn validate_and_normalize_email(email: &str) -> DomainResult<String> {
    let trimmed = email.trim();

    if !email_address::EmailAddress::is_valid(trimmed) {
        return Err(DomainError::ValidationError(
            "Invalid email format. Must be in format user@domain.tld".to_string(),
        ));
    }

    // email_address accepts dotless domains; the backend does not
    if let Some(at_pos) = trimmed.find('@') {
        let domain_part = &trimmed[at_pos + 1..];
        if !domain_part.contains('.') {
            return Err(DomainError::ValidationError(
                "Invalid email format. Domain must include a TLD (e.g., .cl, .com)".to_string(),
            ));
        }
    }

    Ok(trimmed.to_lowercase())
}
