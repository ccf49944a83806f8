//! `Link` header parsing for cursor pagination.

use reqwest::header::{HeaderMap, LINK};

/// Return the `rel="next"` target from all `Link` headers, if any.
///
/// Okta sends one header per relation, e.g.
/// `<https://acme.okta.com/api/v1/apps?after=0oa2&limit=200>; rel="next"`.
pub fn next_link(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(LINK)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .find_map(parse_next)
}

fn parse_next(entry: &str) -> Option<String> {
    let mut parts = entry.split(';');
    let target = parts.next()?.trim();
    let target = target.strip_prefix('<')?.strip_suffix('>')?;

    let is_next = parts.any(|param| {
        let param = param.trim();
        match param.split_once('=') {
            Some((key, value)) => {
                key.trim().eq_ignore_ascii_case("rel")
                    && value
                        .trim()
                        .trim_matches('"')
                        .split_whitespace()
                        .any(|rel| rel.eq_ignore_ascii_case("next"))
            }
            None => false,
        }
    });

    is_next.then(|| target.to_string())
}
