//! Life-path style numerology profile.
//!
//! Unlike the lost-item reducer, this one keeps the master numbers 11, 22 and 33.

use contracts::{NumerologyProfile, Scheme};

use crate::letters::{letter_map, LetterMap};
use crate::reduction::digit_sum;

const MASTER_NUMBERS: [u64; 3] = [11, 22, 33];
const VOWELS: [char; 5] = ['a', 'e', 'i', 'o', 'u'];

pub fn is_master_number(n: u64) -> bool {
    MASTER_NUMBERS.contains(&n)
}

/// Sums decimal digits until a single digit or a master number remains.
pub fn reduce_preserving_masters(n: u64) -> u32 {
    let mut current = n;
    while current >= 10 && !is_master_number(current) {
        current = decimal_digit_sum(current);
    }
    current as u32
}

fn decimal_digit_sum(mut n: u64) -> u64 {
    let mut sum = 0;
    while n > 0 {
        sum += n % 10;
        n /= 10;
    }
    sum
}

/// Destiny (all letters) and soul-urge (vowels only) raw sums.
fn name_sums(name: &str, map: &LetterMap) -> (u64, u64) {
    name.chars()
        .flat_map(char::to_lowercase)
        .filter_map(|letter| map.value(letter).map(|value| (letter, u64::from(value))))
        .fold((0, 0), |(destiny, soul), (letter, value)| {
            let soul_part = if VOWELS.contains(&letter) { value } else { 0 };
            (destiny + value, soul + soul_part)
        })
}

pub fn numerology_profile(name: &str, birth_date: &str, scheme: Scheme) -> NumerologyProfile {
    let (destiny_sum, soul_sum) = name_sums(name, letter_map(scheme));

    NumerologyProfile {
        life_path: reduce_preserving_masters(digit_sum(birth_date)),
        destiny_number: reduce_preserving_masters(destiny_sum),
        soul_urge: reduce_preserving_masters(soul_sum),
        destiny_sum,
        soul_sum,
    }
}
