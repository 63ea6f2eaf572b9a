//! URL utilities for consistent endpoint construction.
//!
//! The server URL is user-supplied and may carry trailing slashes; these
//! helpers keep endpoint construction free of doubled separators.

/// Normalize a base URL by removing trailing slashes.
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Construct a complete endpoint URL from a base URL and endpoint path.
///
/// # Examples
///
/// ```
/// use edris::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://localhost:8000", "query"),
///     "http://localhost:8000/query"
/// );
/// assert_eq!(
///     construct_api_url("http://localhost:8000/", "/knowledge/upload"),
///     "http://localhost:8000/knowledge/upload"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalized_base, endpoint)
}
