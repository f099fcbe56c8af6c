/// Maximum length for upstream response bodies kept in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Shown in reports for fields the upstream left empty
const PLACEHOLDER: &str = "-";

/// Truncate a response body to avoid carrying excessive data in errors
pub fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
}

/// Return the trimmed value, or a placeholder when it is blank
pub fn or_placeholder(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        PLACEHOLDER
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_body() {
        assert_eq!(truncate_body("short"), "short");
        let long = "é".repeat(400); // 800 bytes, multi-byte chars
        let truncated = truncate_body(&long);
        assert!(truncated.ends_with("(truncated, 800 total bytes)"));
    }

    #[test]
    fn test_or_placeholder() {
        assert_eq!(or_placeholder("  Ann "), "Ann");
        assert_eq!(or_placeholder("   "), "-");
    }
}
