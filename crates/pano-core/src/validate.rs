//! Presence and URL shape checks for submitted form fields.

use std::borrow::Cow;

use url::{Host, Url};

/// Minimum number of characters in a post title (after trimming).
pub const TITLE_MIN_CHARS: usize = 2;

/// Minimum number of characters in post content or a URL (after trimming).
pub const FIELD_MIN_CHARS: usize = 1;

/// Scheme assumed when the user pastes a bare domain such as `example.com`.
pub const DEFAULT_SCHEME: &str = "http";

/// Returns true when the field is present and has at least `min` characters
/// once surrounding whitespace is removed.
pub fn has_min_chars(value: Option<&str>, min: usize) -> bool {
    value.is_some_and(|v| v.trim().chars().count() >= min)
}

/// Check whether the input looks like a web address a user meant to share.
///
/// Accepts scheme-less input (`example.com/page`), which is read as `http://`.
/// The host must be an IP literal, `localhost`, or a dotted domain whose
/// last label is alphabetic.
pub fn is_valid_url(input: &str) -> bool {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
        return false;
    }

    let Some(prefixed) = with_default_scheme(trimmed, DEFAULT_SCHEME) else {
        return false;
    };
    let Ok(parsed) = Url::parse(&prefixed) else {
        return false;
    };

    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }

    match parsed.host() {
        Some(Host::Ipv4(_) | Host::Ipv6(_)) => true,
        Some(Host::Domain(domain)) => domain == "localhost" || is_public_domain(domain),
        None => false,
    }
}

/// Prefix `scheme://` to input that has no scheme of its own.
///
/// Protocol-relative input (`//example.com`) gets `scheme:`. Returns `None`
/// for opaque URIs such as `mailto:` or `javascript:`, which would otherwise
/// be misread as `user:password@host`.
pub(crate) fn with_default_scheme<'a>(input: &'a str, scheme: &str) -> Option<Cow<'a, str>> {
    if input.contains("://") {
        return Some(Cow::Borrowed(input));
    }
    if let Some(rest) = input.strip_prefix("//") {
        return Some(Cow::Owned(format!("{scheme}://{rest}")));
    }
    if has_opaque_scheme(input) {
        return None;
    }
    Some(Cow::Owned(format!("{scheme}://{input}")))
}

/// `name:rest` where `rest` is not a port number.
fn has_opaque_scheme(input: &str) -> bool {
    let Some((head, tail)) = input.split_once(':') else {
        return false;
    };
    let looks_like_scheme = head.starts_with(|c: char| c.is_ascii_alphabetic())
        && head
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    looks_like_scheme && !tail.starts_with(|c: char| c.is_ascii_digit())
}

fn is_public_domain(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });

    // Internationalized TLDs arrive punycoded from the url crate.
    let tld = labels[labels.len() - 1];
    let tld_ok = tld.starts_with("xn--")
        || (tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()));

    labels_ok && tld_ok
}
