//! Mobile-device heuristic.

use http::HeaderMap;
use http::header::USER_AGENT;

const MOBILE_UA_MARKERS: &[&str] = &["Mobi", "Android", "iPhone", "iPad", "iPod"];

/// Returns `true` when the request looks like it comes from a phone or tablet.
///
/// Checks the `Sec-CH-UA-Mobile: ?1` client hint first, then falls back to
/// user-agent markers.
pub fn is_mobile(headers: &HeaderMap) -> bool {
    let hint = headers
        .get("sec-ch-ua-mobile")
        .and_then(|v| v.to_str().ok())
        .map(str::trim);
    if hint == Some("?1") {
        return true;
    }
    headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(is_mobile_user_agent)
}

pub fn is_mobile_user_agent(user_agent: &str) -> bool {
    MOBILE_UA_MARKERS.iter().any(|m| user_agent.contains(m))
}
