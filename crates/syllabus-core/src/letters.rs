//! Letter-to-digit tables for the two supported schemes.

use contracts::Scheme;

/// Mapping from lowercase ASCII letter to a digit. Zero marks an unmapped letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LetterMap {
    name: &'static str,
    digits: [u8; 26],
}

impl LetterMap {
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Digit for `letter`, or `None` when the letter is not a key of this map.
    /// Only lowercase ASCII letters are keys.
    pub fn value(&self, letter: char) -> Option<u32> {
        if !letter.is_ascii_lowercase() {
            return None;
        }
        let digit = self.digits[usize::from(letter as u8 - b'a')];
        (digit != 0).then_some(u32::from(digit))
    }

    pub fn max_digit(&self) -> u32 {
        self.digits.iter().copied().map(u32::from).max().unwrap_or(0)
    }
}

//                              a  b  c  d  e  f  g  h  i  j  k  l  m  n  o  p  q  r  s  t  u  v  w  x  y  z
pub const PYTHAGOREAN: LetterMap = LetterMap {
    name: "pythagorean",
    digits: [1, 2, 3, 4, 5, 6, 7, 8, 9, 1, 2, 3, 4, 5, 6, 7, 8, 9, 1, 2, 3, 4, 5, 6, 7, 8],
};

/// No letter carries 9 in the Chaldean table.
pub const CHALDEAN: LetterMap = LetterMap {
    name: "chaldean",
    digits: [1, 2, 3, 4, 5, 8, 3, 5, 1, 1, 2, 3, 4, 5, 7, 8, 1, 2, 3, 4, 6, 6, 6, 5, 1, 7],
};

pub fn letter_map(scheme: Scheme) -> &'static LetterMap {
    match scheme {
        Scheme::Pythagorean => &PYTHAGOREAN,
        Scheme::Chaldean => &CHALDEAN,
    }
}
