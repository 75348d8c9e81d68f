//! Alphabetical string ordering for product names.
//!
//! Plain `str` ordering compares code points, which puts several Macedonian
//! letters (ѓ, ѕ, ј, љ, њ, ќ, џ) after я and uppercase before lowercase.
//! This module orders by alphabet position first, ignoring case, and only
//! falls back to case and code point to break ties.

use std::cmp::Ordering;

/// Cyrillic letters in alphabetical order. Macedonian letters sit in their
/// Macedonian positions; Russian/Serbian extras are interleaved where those
/// alphabets place them.
const CYRILLIC: &str = "абвгдђѓеёжзѕиіїйјклљмнњопрстћќуўфхцчџшщъыьэюя";

/// Primary weight classes, lowest first.
const CLASS_SPACE: u32 = 0;
const CLASS_PUNCT: u32 = 1;
const CLASS_DIGIT: u32 = 2;
const CLASS_LATIN: u32 = 3;
const CLASS_CYRILLIC: u32 = 4;
const CLASS_OTHER: u32 = 5;

fn primary_weight(c: char) -> (u32, u32) {
  let lower = c.to_lowercase().next().unwrap_or(c);
  if lower.is_whitespace() {
    (CLASS_SPACE, 0)
  } else if lower.is_ascii_digit() {
    (CLASS_DIGIT, lower as u32)
  } else if lower.is_ascii_lowercase() {
    (CLASS_LATIN, lower as u32)
  } else if let Some(pos) = CYRILLIC.chars().position(|l| l == lower) {
    (CLASS_CYRILLIC, pos as u32)
  } else if lower.is_ascii_punctuation() {
    (CLASS_PUNCT, lower as u32)
  } else {
    (CLASS_OTHER, lower as u32)
  }
}

/// Compare two strings alphabetically.
///
/// Letters compare by alphabet position regardless of case. Equal strings
/// under that rule are ordered lowercase-first, then by code point.
pub fn compare(a: &str, b: &str) -> Ordering {
  let primary = a
    .chars()
    .map(primary_weight)
    .cmp(b.chars().map(primary_weight));
  if primary != Ordering::Equal {
    return primary;
  }

  let case_rank = |c: char| u8::from(c.is_uppercase());
  a.chars()
    .map(case_rank)
    .cmp(b.chars().map(case_rank))
    .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sorted(mut words: Vec<&str>) -> Vec<&str> {
    words.sort_by(|a, b| compare(a, b));
    words
  }

  #[test]
  fn test_cyrillic_alphabet_order() {
    assert_eq!(sorted(vec!["Б", "А", "В"]), vec!["А", "Б", "В"]);
  }

  #[test]
  fn test_macedonian_letters_in_place() {
    // Code point order would put ѓ and ќ after ш.
    assert_eq!(
      sorted(vec!["ќор", "ешка", "ѓубре", "дом", "тоа", "шише"]),
      vec!["дом", "ѓубре", "ешка", "тоа", "ќор", "шише"]
    );
  }

  #[test]
  fn test_case_insensitive_primary() {
    assert_eq!(
      sorted(vec!["banana", "Apple", "cherry"]),
      vec!["Apple", "banana", "cherry"]
    );
    assert_eq!(compare("мед", "Мед"), Ordering::Less);
    assert_eq!(compare("Мед", "Мед"), Ordering::Equal);
  }

  #[test]
  fn test_prefix_sorts_first() {
    assert_eq!(compare("Мед", "Медена"), Ordering::Less);
    assert_eq!(compare("Мед од багрем", "Медовина"), Ordering::Less);
  }

  #[test]
  fn test_digits_before_letters() {
    assert_eq!(sorted(vec!["мед", "500g", "Acacia"]), vec!["500g", "Acacia", "мед"]);
  }
}
