//! Link header parsing (RFC 8288)
//!
//! Format: `Link: <https://api.mendeley.com/folders?page=2>; rel="next", ...`

use reqwest::header::{HeaderMap, LINK};

/// Parse one Link header value into `(rel, url)` pairs
///
/// A link carrying several space-separated relations (`rel="next last"`)
/// yields one pair per relation. Entries without a URL or a rel are skipped.
pub fn parse_link_header(header: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();

    for part in split_links(header) {
        let Some((url, params)) = split_target(part) else {
            continue;
        };

        let rels = params.split(';').find_map(|param| {
            let (key, value) = param.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("rel")
                .then(|| value.trim().trim_matches('"').trim_matches('\''))
        });

        if let Some(r) = rels {
            for rel in r.split_whitespace() {
                pairs.push((rel.to_ascii_lowercase(), url.to_string()));
            }
        }
    }

    pairs
}

/// Parse every Link header in a response
pub fn parse_link_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .get_all(LINK)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(parse_link_header)
        .collect()
}

/// Split one link into its `<...>` target and the parameter tail
///
/// The target is taken first so `;` inside the URL is not mistaken for a
/// parameter separator.
fn split_target(link: &str) -> Option<(&str, &str)> {
    let rest = link.trim().strip_prefix('<')?;
    let end = rest.find('>')?;
    Some((&rest[..end], &rest[end + 1..]))
}

/// Split a header on commas that are not inside `<...>`
fn split_links(header: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in header.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(header[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(header[start..].trim());

    parts.into_iter().filter(|p| !p.is_empty()).collect()
}
