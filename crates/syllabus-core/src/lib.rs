//! Deterministic calculation core: digit-sum reduction, lost-item lookup,
//! numerology profiles, and the charm-casting simulation. No I/O.

pub mod casting;
pub mod letters;
pub mod lost_item;
pub mod numerology;
pub mod reduction;

pub use casting::{
    cast_with_seed, classify_zone, seeded_rng, BoardGeometry, CastError, CastId, CastOutcome,
    CastSession, StepEvent, StepOutcome, CHARMS, DEFAULT_MAX_STEPS,
};
pub use letters::{letter_map, LetterMap, CHALDEAN, PYTHAGOREAN};
pub use lost_item::{compute_for_query, compute_lost_item_result, interpretation_for};
pub use numerology::{numerology_profile, reduce_preserving_masters};
pub use reduction::{date_to_reduced_number, reduce_digit_sum, string_to_reduced_number};
