//! URL slug generation
//!
//! Categories and products are addressed by slug in the public API.

/// Generate a URL-safe slug from a display name.
///
/// Lowercases, maps whitespace runs to a single hyphen and drops everything
/// that is not ASCII alphanumeric. Leading/trailing hyphens are trimmed.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut prev_hyphen = true; // suppress leading hyphen

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            prev_hyphen = false;
        } else if (c.is_whitespace() || c == '-' || c == '_') && !prev_hyphen {
            slug.push('-');
            prev_hyphen = true;
        }
    }

    // Trim a trailing hyphen left by non-alphanumeric tail characters
    if slug.ends_with('-') {
        slug.pop();
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Wireless Mouse"), "wireless-mouse");
        assert_eq!(slugify("USB-C Cable"), "usb-c-cable");
    }

    #[test]
    fn test_slugify_strips_punctuation() {
        assert_eq!(slugify("Coffee & Tea!"), "coffee-tea");
        assert_eq!(slugify("  spaced   out  "), "spaced-out");
    }

    #[test]
    fn test_slugify_empty_and_symbol_only() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }
}
