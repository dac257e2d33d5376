//! Purpose: Classify identifier naming conventions and convert between them.
//! Exports: `CaseName`, `is`, `is_complex`, `split_words`, `transform_to`, `transform_to_hybrid`, `normalize`.
//! Role: Casing engine behind flexible key matching and key dirtification.
//! Invariants: Classification is total; every input lands in zero or more cases without error.
//! Invariants: `normalize` is idempotent and erases separators and case.

use crate::core::coin::Coin;

/// A target naming convention.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CaseName {
    /// e.g. "hello_world"
    Snake,
    /// e.g. "helloWorld"
    Camel,
    /// e.g. "HelloWorld"
    Pascal,
    /// e.g. "hello-world"
    Kebab,
    /// e.g. "Hello-World"
    Header,
    /// e.g. "Hello_World"
    TitleSnake,
    /// e.g. "Hello_beautiful-WorldHere"
    Hybrid,
}

/// Separators recognized when splitting words. `'\0'` is the empty-separator
/// sentinel used for hybrid joining.
const SEPARATORS: [char; 4] = ['-', '_', ' ', '\0'];

/// Returns true if `s` is in the target case.
pub fn is(s: &str, target: CaseName) -> bool {
    match target {
        CaseName::Snake => is_snake(s),
        CaseName::Camel => is_camel(s),
        CaseName::Pascal => is_pascal(s),
        CaseName::Kebab => is_kebab(s),
        CaseName::Header => is_header(s),
        CaseName::TitleSnake => is_title_snake(s),
        CaseName::Hybrid => is_hybrid(s),
    }
}

// snake_case means lower letters, digits and underscores only, with at least
// one underscore present.
fn is_snake(s: &str) -> bool {
    if s.is_empty() || !s.contains('_') {
        return false;
    }
    s.chars()
        .all(|c| c == '_' || !c.is_alphabetic() || c.is_lowercase())
}

fn is_kebab(s: &str) -> bool {
    if s.is_empty() || !s.contains('-') {
        return false;
    }
    s.chars()
        .all(|c| c == '-' || !c.is_alphabetic() || c.is_lowercase())
}

// camelCase starts with a lowercase letter, contains no separators, and has
// at least one uppercase letter beyond the first character.
fn is_camel(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_lowercase() {
        return false;
    }
    if s.contains('_') || s.contains('-') {
        return false;
    }
    chars.any(char::is_uppercase)
}

// PascalCase starts uppercase, is not all-uppercase, and lowercasing the
// first letter yields valid camelCase.
fn is_pascal(s: &str) -> bool {
    let chars: Vec<char> = s.chars().collect();
    let Some(&first) = chars.first() else {
        return false;
    };
    if !first.is_uppercase() {
        return false;
    }

    let leading_upper = chars.iter().take_while(|c| c.is_uppercase()).count();
    if leading_upper == chars.len() {
        return false;
    }

    let mut lowered = String::new();
    lowered.extend(first.to_lowercase());
    lowered.extend(chars[1..].iter());
    is_camel(&lowered)
}

// Header-Case: split by hyphen into two or more parts, each starting with an
// uppercase letter (if a letter) and otherwise only lowercase letters.
fn is_header(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    let parts: Vec<&str> = s.split('-').collect();
    if parts.len() <= 1 {
        return false;
    }
    parts.iter().all(|part| {
        let mut chars = part.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        if first.is_alphabetic() && !first.is_uppercase() {
            return false;
        }
        chars.all(|c| !c.is_alphabetic() || c.is_lowercase())
    })
}

// Title_Snake_Case: split by underscore into two or more non-empty parts,
// each uppercase-led and then lowercase-only.
fn is_title_snake(s: &str) -> bool {
    if s.is_empty() || !s.contains('_') {
        return false;
    }
    s.split('_').all(|part| {
        let mut chars = part.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        if !first.is_uppercase() {
            return false;
        }
        chars.all(|c| !c.is_alphabetic() || c.is_lowercase())
    })
}

/// Returns true if `s` is in one of the recognized naming conventions:
/// anything with separators, or camelCase/PascalCase.
pub fn is_complex(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    if s.contains('-') || s.contains('_') {
        return true;
    }
    // Separator checks above leave only camelCase and PascalCase uncovered.
    is_camel(s) || is_pascal(s)
}

/// Returns true if the string mixes separators (both "-" and "_"), or uses a
/// single separator with inconsistent leading case across parts.
pub fn is_hybrid(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    let has_hyphen = s.contains('-');
    let has_underscore = s.contains('_');
    if !has_hyphen && !has_underscore {
        return false;
    }
    if has_hyphen && has_underscore {
        return true;
    }

    let sep = if has_hyphen { '-' } else { '_' };
    let mut has_upper = false;
    let mut has_lower = false;
    for part in s.split(sep) {
        let Some(first) = part.chars().next() else {
            continue;
        };
        if first.is_uppercase() {
            has_upper = true;
        }
        if first.is_lowercase() {
            has_lower = true;
        }
    }
    has_upper && has_lower
}

/// Transforms `s` into the target case. Supports determined cases only; for
/// `Hybrid` use [`transform_to_hybrid`] (hybrid needs a randomness source),
/// and `Hybrid` here returns the input unchanged.
pub fn transform_to(s: &str, target: CaseName) -> String {
    let words = split_words(s);
    match target {
        CaseName::Snake => join_lowered(&words, "_"),
        CaseName::Kebab => join_lowered(&words, "-"),
        CaseName::Camel => {
            let Some((head, rest)) = words.split_first() else {
                return String::new();
            };
            let mut out = head.to_lowercase();
            for word in rest {
                out.push_str(&capitalize(word));
            }
            out
        }
        CaseName::Pascal => words.iter().map(|w| capitalize(w)).collect(),
        CaseName::Header => join_capitalized(&words, "-"),
        CaseName::TitleSnake => join_capitalized(&words, "_"),
        CaseName::Hybrid => s.to_string(),
    }
}

/// Transforms `s` into a hybrid-case string, choosing a separator from
/// `{'-', '_', ' ', ∅}` per word gap. When the empty separator would merge
/// two lowercase boundaries indistinguishably, it is overridden with a
/// random non-empty separator.
pub fn transform_to_hybrid(s: &str, coin: &mut Coin) -> String {
    let words = split_words(s);
    let Some((head, rest)) = words.split_first() else {
        return s.to_string();
    };

    let mut result = head.clone();
    for word in rest {
        let mut sep = coin.pick(&SEPARATORS).copied().unwrap_or('\0');
        if sep == '\0' {
            let merges = result.chars().next_back().is_some_and(char::is_lowercase)
                && word.chars().next().is_some_and(char::is_lowercase);
            if merges {
                sep = if coin.flip() { '-' } else { '_' };
            }
        }
        if sep != '\0' {
            result.push(sep);
        }
        result.push_str(word);
    }
    result
}

/// Splits an input string into words. Handles underscore, hyphen, and space
/// delimited strings as well as camel/Pascal style, including hybrids.
pub fn split_words(s: &str) -> Vec<String> {
    if s.is_empty() {
        return Vec::new();
    }

    if s.contains(SEPARATORS) {
        let mut words = Vec::new();
        for part in s.split(SEPARATORS) {
            if part.is_empty() {
                continue;
            }
            if has_mixed_case(part) {
                words.extend(split_camel(part));
            } else {
                words.push(part.to_string());
            }
        }
        return words;
    }

    split_camel(s)
}

fn has_mixed_case(s: &str) -> bool {
    s.chars().any(char::is_uppercase) && s.chars().any(char::is_lowercase)
}

// Word boundary: an uppercase letter preceded by a lowercase letter or digit.
fn split_camel(s: &str) -> Vec<String> {
    let runes: Vec<char> = s.chars().collect();
    let mut words = Vec::new();
    let mut last = 0;
    for i in 1..runes.len() {
        if runes[i].is_uppercase() && (runes[i - 1].is_lowercase() || runes[i - 1].is_ascii_digit())
        {
            words.push(runes[last..i].iter().collect());
            last = i;
        }
    }
    words.push(runes[last..].iter().collect());
    words
}

/// Lowercases and strips `-`, `_`, and spaces. The erasure behind
/// chameleon-case key matching.
pub fn normalize(key: &str) -> String {
    key.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

fn join_lowered(words: &[String], sep: &str) -> String {
    words
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(sep)
}

fn join_capitalized(words: &[String], sep: &str) -> String {
    words
        .iter()
        .map(|w| capitalize(w))
        .collect::<Vec<_>>()
        .join(sep)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut out: String = first.to_uppercase().collect();
    out.extend(chars.flat_map(char::to_lowercase));
    out
}
