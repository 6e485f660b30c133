use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Character groups in primary order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Group {
    Space,
    Punctuation,
    Digit,
    Letter,
}

impl Group {
    fn of(c: char) -> Self {
        if c.is_whitespace() {
            Group::Space
        } else if c.is_numeric() {
            Group::Digit
        } else if c.is_alphabetic() {
            Group::Letter
        } else {
            Group::Punctuation
        }
    }
}

/// Collation elements of one string, one slot per base character.
#[derive(Debug, Default, PartialEq, Eq)]
struct CollationKey {
    /// Group and lowercase base letter; case and accents ignored
    primary: Vec<(Group, char)>,
    /// Combining marks attached to each base character
    secondary: Vec<Vec<char>>,
    /// Whether each base character is uppercase
    tertiary: Vec<bool>,
}

impl CollationKey {
    fn new(s: &str) -> Self {
        let mut key = Self::default();
        for c in s.nfd() {
            if is_combining_mark(c) {
                if let Some(marks) = key.secondary.last_mut() {
                    marks.push(c);
                }
                continue;
            }
            let group = Group::of(c);
            key.primary.extend(c.to_lowercase().map(|lower| (group, lower)));
            key.secondary.push(Vec::new());
            key.tertiary.push(c.is_uppercase());
        }
        key
    }
}

/// Locale-style string comparison for display ordering, modelled on the
/// root-locale collation.
///
/// - primary: base letters without case or accents; whitespace sorts before
///   punctuation and symbols, which sort before digits, then letters
/// - secondary: unaccented before accented
/// - tertiary: lowercase before uppercase
///
/// Byte order breaks the remaining ties, so the result is a total order.
#[must_use]
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    let (ka, kb) = (CollationKey::new(a), CollationKey::new(b));
    ka.primary
        .cmp(&kb.primary)
        .then_with(|| ka.secondary.cmp(&kb.secondary))
        .then_with(|| ka.tertiary.cmp(&kb.tertiary))
        .then_with(|| a.cmp(b))
}
