//! clap value parsers for CLI input validation.

use crate::domain;

/// Validate a ticket title argument
pub fn validate_title(title: &str) -> Result<String, String> {
    domain::validate_title(title)?;
    Ok(title.to_string())
}

/// Validate a ticket description argument
pub fn validate_description(description: &str) -> Result<String, String> {
    domain::validate_description(description)?;
    Ok(description.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MAX_TITLE_LENGTH;

    #[test]
    fn title_bounds() {
        assert!(validate_title("VPN down").is_ok());
        assert!(validate_title("").is_err());
        assert!(validate_title(&"x".repeat(MAX_TITLE_LENGTH + 1)).is_err());
    }
}
