//! Cookie header parsing at connect time.

use std::collections::HashMap;

/// Extracts the cookie jar from a raw header map.
///
/// Header name lookup is case-insensitive. Returns `None` when no cookie
/// header is present or it contains no parseable pairs; connects without
/// cookies are rejected.
pub fn parse_cookie_header(headers: &HashMap<String, String>) -> Option<HashMap<String, String>> {
    let raw = headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("cookie"))
        .map(|(_, value)| value.as_str())?;

    let cookies = parse_cookie_value(raw);
    if cookies.is_empty() { None } else { Some(cookies) }
}

fn parse_cookie_value(raw: &str) -> HashMap<String, String> {
    raw.split(';')
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.trim().to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(name: &str, value: &str) -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert(name.to_string(), value.to_string());
        map
    }

    #[test]
    fn parses_multiple_pairs() {
        let jar =
            parse_cookie_header(&headers("cookie", "access_token=a1; vote_token=v1")).unwrap();
        assert_eq!(jar.get("access_token").map(String::as_str), Some("a1"));
        assert_eq!(jar.get("vote_token").map(String::as_str), Some("v1"));
    }

    #[test]
    fn header_name_is_case_insensitive() {
        let jar = parse_cookie_header(&headers("Cookie", "vote_token=v1")).unwrap();
        assert_eq!(jar.get("vote_token").map(String::as_str), Some("v1"));
    }

    #[test]
    fn missing_or_empty_header_is_none() {
        assert!(parse_cookie_header(&HashMap::new()).is_none());
        assert!(parse_cookie_header(&headers("cookie", "")).is_none());
        assert!(parse_cookie_header(&headers("cookie", "garbage")).is_none());
    }

    #[test]
    fn values_keep_embedded_equals() {
        let jar = parse_cookie_header(&headers("cookie", "vote_token=a=b=c")).unwrap();
        assert_eq!(jar.get("vote_token").map(String::as_str), Some("a=b=c"));
    }
}
