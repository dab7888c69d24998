use std::collections::HashMap;
use url::{ParseError, Url};

pub type QueryParams = HashMap<String, String>;

/// Extracts the query parameters of `url`, keeping the first value of repeated keys.
///
/// Values are cleaned before decoding: leading `=`/`+` markers are stripped from the raw
/// text, surrounding whitespace is trimmed, then the result is form-decoded (`+` as space).
/// Pairs without `=` or with an empty value are ignored. A URL without a query, or with a
/// malformed IPv6 host, yields an empty map.
pub fn extract(url: &str) -> QueryParams {
    let mut params = QueryParams::new();
    let query = match raw_query(url.trim()) {
        Some(q) => q,
        None => return params,
    };
    for piece in query.split('&') {
        let Some((raw_key, raw_value)) = piece.split_once('=') else { continue };
        if raw_value.is_empty() {
            continue;
        }
        let key = form_decode(raw_key);
        if key.is_empty() {
            continue;
        }
        params.entry(key).or_insert_with(|| clean_value(raw_value));
    }
    params
}

/// Query text exactly as written in `url`: after the first `?`, before the first `#`.
///
/// `Url` re-serializes its query (spaces become `%20`), which would defeat value trimming, so
/// it is only consulted to reject hosts it cannot make sense of. Scheme-less references and
/// otherwise well-formed URLs it refuses (an out-of-range port, say) keep their query.
fn raw_query(url: &str) -> Option<&str> {
    if url.is_empty() {
        return None;
    }
    if let Err(ParseError::InvalidIpv6Address) = Url::parse(url) {
        return None;
    }
    let without_fragment = url.split('#').next().unwrap_or_default();
    without_fragment.split_once('?').map(|(_, q)| q)
}

fn clean_value(raw: &str) -> String {
    form_decode(raw.trim_start_matches(|c: char| c == '=' || c == '+').trim())
}

fn form_decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned()
}
