//! Digit-sum reduction used by the lost-item finder.
//!
//! Every function here is total: unmapped characters and non-digits are
//! dropped, so the worst an input can do is sum to zero.

use crate::letters::LetterMap;

/// Folds `n` to a single digit by repeated digit summing.
///
/// Positive multiples of 9 fold to 9; every other positive number folds to
/// `n mod 9`. Zero stays zero, which callers must treat as "no signal".
pub fn reduce_digit_sum(n: u64) -> u32 {
    if n == 0 {
        return 0;
    }
    match n % 9 {
        0 => 9,
        rest => rest as u32,
    }
}

/// Sum of mapped letter values after lowercasing; characters outside the map are skipped.
pub fn letter_sum(text: &str, map: &LetterMap) -> u64 {
    text.chars()
        .flat_map(char::to_lowercase)
        .filter_map(|letter| map.value(letter))
        .map(u64::from)
        .sum()
}

/// Sum of every ASCII digit in `text`.
pub fn digit_sum(text: &str) -> u64 {
    text.chars()
        .filter_map(|ch| ch.to_digit(10))
        .map(u64::from)
        .sum()
}

pub fn string_to_reduced_number(text: &str, map: &LetterMap) -> u32 {
    reduce_digit_sum(letter_sum(text, map))
}

/// Reduces a `YYYY-MM-DD` date. Separators and any other non-digits are ignored,
/// so a malformed date reduces to 0.
pub fn date_to_reduced_number(date_text: &str) -> u32 {
    reduce_digit_sum(digit_sum(date_text))
}
