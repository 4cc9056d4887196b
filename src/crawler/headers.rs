use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER,
    USER_AGENT,
};

/// Build the browser identity headers sent with every request
///
/// `Accept-Encoding` is left to reqwest, which advertises only the codecs it
/// can decode.
///
/// # Arguments
///
/// * `user_agent` - User agent string (a modern desktop browser)
/// * `accept_language` - Accept-Language value
/// * `referer` - Optional Referer, e.g. the site's home page
///
/// # Errors
///
/// Returns an error when one of the values is not a valid header value
///
/// # Examples
///
/// ```
/// use cekfakta::crawler::headers::build_browser_headers;
///
/// let headers = build_browser_headers(
///     "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
///     "id-ID,id;q=0.9",
///     Some("https://www.kompas.com/"),
/// )
/// .unwrap();
/// assert!(headers.contains_key("referer"));
/// ```
pub fn build_browser_headers(
    user_agent: &str,
    accept_language: &str,
    referer: Option<&str>,
) -> Result<HeaderMap, InvalidHeaderValue> {
    let mut headers = HeaderMap::new();

    headers.insert(USER_AGENT, HeaderValue::from_str(user_agent)?);
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_str(accept_language)?);
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );

    if let Some(referer) = referer {
        headers.insert(REFERER, HeaderValue::from_str(referer)?);
    }

    headers.insert(
        HeaderName::from_static("upgrade-insecure-requests"),
        HeaderValue::from_static("1"),
    );

    Ok(headers)
}

/// Referer for a site: its origin with a trailing slash
///
/// # Examples
///
/// ```
/// use cekfakta::crawler::headers::site_referer;
///
/// assert_eq!(
///     site_referer("https://www.kompas.com/cekfakta/data-dan-fakta").as_deref(),
///     Some("https://www.kompas.com/")
/// );
/// ```
pub fn site_referer(base_url: &str) -> Option<String> {
    crate::utils::origin_of(base_url).map(|origin| format!("{origin}/"))
}
