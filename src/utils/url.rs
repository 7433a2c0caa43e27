//! URL helpers for building backend endpoints.
//!
//! Backends are configured by base URL (`http://localhost:5000`), and every
//! endpoint path is joined onto it here so trailing and leading slashes never
//! produce `//` in a request.

/// Normalize a base URL by removing trailing slashes
///
/// # Examples
///
/// ```
/// use policy_navigator::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://localhost:5000"), "http://localhost:5000");
/// assert_eq!(normalize_base_url("http://localhost:5000///"), "http://localhost:5000");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Join an endpoint path onto a base URL.
///
/// # Examples
///
/// ```
/// use policy_navigator::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://localhost:5000/", "/api/sessions"),
///     "http://localhost:5000/api/sessions"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{normalized_base}/{endpoint}")
}
