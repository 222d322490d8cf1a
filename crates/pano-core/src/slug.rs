//! URL slugs derived from post titles.

/// Maximum slug length in bytes (slugs are ASCII).
pub const MAX_SLUG_LEN: usize = 60;

/// Slug used when a title has no usable characters.
pub const FALLBACK_SLUG: &str = "post";

/// Turn a title into a lowercase kebab-case slug.
///
/// Turkish letters are transliterated (`ç` → `c`, `ğ` → `g`, `ı`/`İ` → `i`,
/// `ö` → `o`, `ş` → `s`, `ü` → `u`); any other run of non-alphanumeric
/// characters becomes a single `-`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len().min(MAX_SLUG_LEN));
    let mut pending_dash = false;

    for c in title.chars() {
        let Some(mapped) = transliterate(c) else {
            pending_dash = true;
            continue;
        };

        if pending_dash && !slug.is_empty() {
            if slug.len() + 1 >= MAX_SLUG_LEN {
                break;
            }
            slug.push('-');
        }
        pending_dash = false;

        if slug.len() >= MAX_SLUG_LEN {
            break;
        }
        slug.push(mapped);
    }

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Map a character to its slug form, or `None` if it acts as a separator.
fn transliterate(c: char) -> Option<char> {
    let mapped = match c {
        'ç' | 'Ç' => 'c',
        'ğ' | 'Ğ' => 'g',
        'ı' | 'İ' | 'î' | 'Î' => 'i',
        'ö' | 'Ö' => 'o',
        'ş' | 'Ş' => 's',
        'ü' | 'Ü' | 'û' | 'Û' => 'u',
        'â' | 'Â' => 'a',
        c if c.is_ascii_alphanumeric() => c.to_ascii_lowercase(),
        _ => return None,
    };
    Some(mapped)
}

/// Check that a string is a well-formed slug.
#[cfg(test)]
fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= MAX_SLUG_LEN
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
