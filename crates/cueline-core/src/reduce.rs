//! Region-name reduction: the string transforms that condense raw export
//! names into report names, plus the similarity rule behind automatic
//! combining.

/// Media extension tokens recognized by the extension strip, matched
/// case-insensitively against the last occurrence in the name.
pub const MEDIA_EXTENSIONS: &[&str] = &[".wav", ".aif", ".aiff", ".mp3", ".sd2", ".m4a"];

/// Marker Pro Tools appends to duplicated regions ("Theme.new.01").
pub const NEW_MARKER: &str = ".new";

const FADE_PREFIX: &str = "fade";

/// Minimum common-prefix length before two names are merge candidates.
const SIMILAR_MIN_PREFIX: usize = 4;

/// Classification of a raw region name, computed once per region during
/// generation instead of re-matching marker strings ad hoc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameToken {
    Fade,
    Extension,
    New,
    Plain,
}

#[must_use]
pub fn classify(name: &str) -> NameToken {
    let lower = name.to_lowercase();
    if lower.starts_with(FADE_PREFIX) {
        NameToken::Fade
    } else if lower.contains(NEW_MARKER) {
        NameToken::New
    } else if MEDIA_EXTENSIONS.iter().any(|ext| lower.contains(ext)) {
        NameToken::Extension
    } else {
        NameToken::Plain
    }
}

/// Cut the name at the last recognized media extension, dropping the
/// extension and anything after it. Identity when no extension occurs.
#[must_use]
pub fn strip_after_extension(name: &str) -> String {
    let cut = MEDIA_EXTENSIONS
        .iter()
        .filter_map(|ext| rfind_ascii_ci(name, ext))
        .max();
    match cut {
        Some(index) => trim_separators(&name[..index]),
        None => name.to_string(),
    }
}

/// Cut the name at the last ".new" duplicate marker, dropping the marker
/// and any trailing digits/punctuation with it.
#[must_use]
pub fn strip_after_new_marker(name: &str) -> String {
    match rfind_ascii_ci(name, NEW_MARKER) {
        Some(index) => trim_separators(&name[..index]),
        None => name.to_string(),
    }
}

/// Last case-insensitive occurrence of an ASCII needle, searched over the
/// original bytes. Lowercasing the haystack first would shift byte
/// offsets for characters whose lowercase form changes length; a matched
/// window starts with an ASCII byte, so the returned index is always a
/// char boundary of `haystack`.
fn rfind_ascii_ci(haystack: &str, needle: &str) -> Option<usize> {
    let haystack = haystack.as_bytes();
    let needle = needle.as_bytes();
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    (0..=haystack.len() - needle.len())
        .rev()
        .find(|&index| haystack[index..index + needle.len()].eq_ignore_ascii_case(needle))
}

/// Longest literal common prefix of two names, char by char,
/// case-sensitive. Empty when the names diverge immediately.
#[must_use]
pub fn greatest_common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let mut end = 0;
    for ((index, ca), cb) in a.char_indices().zip(b.chars()) {
        if ca != cb {
            break;
        }
        end = index + ca.len_utf8();
    }
    &a[..end]
}

/// Similarity rule for automatic combining: the common prefix must reach
/// `SIMILAR_MIN_PREFIX` chars and cover at least three quarters of the
/// shorter name.
#[must_use]
pub fn similar(a: &str, b: &str) -> bool {
    let prefix = greatest_common_prefix(a, b).chars().count();
    let shorter = a.chars().count().min(b.chars().count());
    prefix >= SIMILAR_MIN_PREFIX && prefix * 4 >= shorter * 3
}

/// Apply the enabled strips to a raw region name.
#[must_use]
pub fn reduce_name(name: &str, strip_extension: bool, strip_new: bool) -> String {
    let mut reduced = name.to_string();
    if strip_new {
        reduced = strip_after_new_marker(&reduced);
    }
    if strip_extension {
        reduced = strip_after_extension(&reduced);
    }
    reduced
}

fn trim_separators(name: &str) -> String {
    name.trim_end_matches([' ', '.', '-', '_']).to_string()
}
