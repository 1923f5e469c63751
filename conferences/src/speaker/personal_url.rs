use std::borrow::Cow;

use lazy_regex::{Lazy, Regex, lazy_regex};
use url::Url;

static SCHEME: Lazy<Regex> = lazy_regex!(r"^[[:alpha:]][[:alnum:]+\-.]*://");

/// Turns a bare host-like value into an `http://` URL.
///
/// Blank values normalize to nothing. Values that already name a scheme are
/// left alone so that a wrong scheme is still reported by [`is_valid`].
pub fn normalize(value: &str) -> Option<Cow<'_, str>> {
    if value.trim().is_empty() {
        return None;
    }

    match SCHEME.is_match(value) {
        true => Some(Cow::Borrowed(value)),
        false => Some(Cow::Owned(format!("http://{value}"))),
    }
}

/// Format check only: an http(s) URL with a host. The host is never resolved.
pub fn is_valid(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host().is_some(),
        Err(_) => false,
    }
}
