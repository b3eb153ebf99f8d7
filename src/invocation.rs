//! Invocation context: turning a tag link or CLI argument into an [`Identifier`].
//!
//! Each NFC tag can carry its own link, e.g.
//!
//! ```text
//! https://yourdomain.example/?id=TAG123
//! https://yourdomain.example/?id=NTAG-215-<serial>
//! ```
//!
//! A link without `id` (or with a blank one) means "random every tap". The
//! identifier format is a convention only; any non-empty string is accepted.

use percent_encoding::percent_decode_str;
use std::fmt;

/// Query parameter carrying the identifier.
pub const ID_PARAM: &str = "id";

/// A trimmed, non-empty identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    /// Trim surrounding whitespace the way a browser's `String.prototype.trim`
    /// does; an empty result counts as absent.
    ///
    /// ```
    /// use fortunecookie::invocation::Identifier;
    ///
    /// assert_eq!(Identifier::parse(Some("  TAG123 ")).unwrap().as_str(), "TAG123");
    /// assert!(Identifier::parse(Some("   ")).is_none());
    /// assert!(Identifier::parse(None).is_none());
    /// ```
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let trimmed = trim_js(raw?);
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// ECMAScript WhiteSpace and LineTerminator. Unlike `char::is_whitespace`
/// this includes U+FEFF and excludes U+0085, so ids hash the same as in a browser.
fn is_js_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\u{B}' | '\u{C}' | ' ' | '\u{A0}' | '\u{FEFF}'
            | '\n' | '\r' | '\u{2028}' | '\u{2029}'
            // Space_Separator (Zs)
            | '\u{1680}' | '\u{2000}'..='\u{200A}' | '\u{202F}' | '\u{205F}' | '\u{3000}'
    )
}

fn trim_js(s: &str) -> &str {
    s.trim_matches(is_js_whitespace)
}

/// Read the first `id` parameter from a full URL or a bare query string.
///
/// Follows form-urlencoded rules: `+` is a space, `%XX` sequences are decoded
/// (invalid UTF-8 is replaced), and anything after `#` is ignored.
pub fn identifier_from_url(url_or_query: &str) -> Option<Identifier> {
    let without_fragment = url_or_query.split('#').next().unwrap_or_default();
    let query = match without_fragment.split_once('?') {
        Some((_, q)) => q,
        // A bare "id=..." string is treated as a query; anything else has none.
        None if without_fragment.contains('=') && !without_fragment.contains("://") => {
            without_fragment
        }
        None => return None,
    };
    let raw = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(key, _)| form_decode(key) == ID_PARAM)
        .map(|(_, value)| form_decode(value))?;
    Identifier::parse(Some(&raw))
}

fn form_decode(s: &str) -> String {
    let spaced = s.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Build the link to program onto a tag for `id`.
///
/// ```
/// use fortunecookie::invocation::tag_url;
///
/// assert_eq!(tag_url("https://yourdomain.example/", "TAG123"), "https://yourdomain.example/?id=TAG123");
/// ```
pub fn tag_url(base: &str, id: &str) -> String {
    let base = base.split('#').next().unwrap_or_default();
    let sep = match base.find('?') {
        Some(pos) if pos + 1 == base.len() || base.ends_with('&') => "",
        Some(_) => "&",
        None => "?",
    };
    format!("{}{}{}={}", base, sep, ID_PARAM, urlencoding::encode(trim_js(id)))
}
