//! URL utilities for consistent endpoint handling
//!
//! The inference server base URL comes from user configuration, so it may
//! carry trailing slashes or be empty. These helpers normalize it before any
//! endpoint is constructed.

/// Fallback endpoint used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Normalize a base URL by trimming whitespace and trailing slashes.
///
/// Empty input falls back to [`DEFAULT_BASE_URL`].
///
/// # Examples
///
/// ```
/// use penpal::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://192.168.1.10:11434/"), "http://192.168.1.10:11434");
/// assert_eq!(normalize_base_url("  "), "http://localhost:11434");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    let trimmed = base_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_BASE_URL.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Construct a complete API endpoint URL from a base URL and endpoint path,
/// ensuring there are no double slashes in the result.
///
/// # Examples
///
/// ```
/// use penpal::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://localhost:11434/", "api/chat"),
///     "http://localhost:11434/api/chat"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalized_base, endpoint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("http://localhost:11434"),
            "http://localhost:11434"
        );
        assert_eq!(
            normalize_base_url("http://localhost:11434///"),
            "http://localhost:11434"
        );
        assert_eq!(normalize_base_url(""), DEFAULT_BASE_URL);
        assert_eq!(normalize_base_url("   "), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_construct_api_url() {
        assert_eq!(
            construct_api_url("http://localhost:11434", "api/tags"),
            "http://localhost:11434/api/tags"
        );
        assert_eq!(
            construct_api_url("http://localhost:11434/", "/api/tags"),
            "http://localhost:11434/api/tags"
        );
    }
}
