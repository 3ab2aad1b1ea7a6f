use url::Url;

use crate::ValidationError;

/// Checks that `raw` is an http(s) URL and returns it trimmed, otherwise as typed.
pub fn validate_link(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingInput);
    }
    let parsed = Url::parse(trimmed).map_err(|err| ValidationError::InvalidUrl {
        url: trimmed.to_string(),
        reason: err.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => Err(ValidationError::InvalidUrl {
            url: trimmed.to_string(),
            reason: format!("unsupported scheme `{other}`"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::validate_link;
    use crate::ValidationError;

    #[test]
    fn accepts_http_and_https_links() {
        assert_eq!(
            validate_link(" https://arxiv.org/abs/1706.03762 ").unwrap(),
            "https://arxiv.org/abs/1706.03762"
        );
        assert!(validate_link("http://example.com/paper.pdf").is_ok());
    }

    #[test]
    fn keeps_link_as_typed() {
        assert_eq!(validate_link("https://arxiv.org").unwrap(), "https://arxiv.org");
        assert_eq!(
            validate_link("https://ArXiv.org/abs/1706.03762?q=a b").unwrap(),
            "https://ArXiv.org/abs/1706.03762?q=a b"
        );
    }

    #[test]
    fn rejects_blank_input() {
        assert_eq!(validate_link("   "), Err(ValidationError::MissingInput));
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        assert!(matches!(
            validate_link("ftp://example.com/file"),
            Err(ValidationError::InvalidUrl { .. })
        ));
        assert!(matches!(
            validate_link("not a url"),
            Err(ValidationError::InvalidUrl { .. })
        ));
    }
}
