//! Name folding and formatting.
//!
//! `fold` produces the comparison key used for duplicate detection; it is
//! never stored or displayed. `title_case` produces the storage form of a
//! professor name.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Fold a name for duplicate comparison: trim, NFD-decompose, strip
/// combining marks, lowercase. "José Pérez " folds to "jose perez".
pub fn fold(name: &str) -> String {
  name
    .trim()
    .nfd()
    .filter(|c| !is_combining_mark(*c))
    .flat_map(char::to_lowercase)
    .collect()
}

/// Title-case each whitespace-delimited token independently: first char
/// uppercased, the rest lowercased. No special-casing of particles or
/// hyphens.
pub fn title_case(name: &str) -> String {
  name
    .trim()
    .split_whitespace()
    .map(|word| {
      let mut chars = word.chars();
      match chars.next() {
        Some(first) => {
          let mut out: String = first.to_uppercase().collect();
          out.extend(chars.flat_map(char::to_lowercase));
          out
        }
        None => String::new(),
      }
    })
    .collect::<Vec<_>>()
    .join(" ")
}
