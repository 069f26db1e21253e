use contracts::Scheme;
use proptest::prelude::*;
use syllabus_core::lost_item::{interpretation_for, lookup, INDETERMINATE};
use syllabus_core::{
    compute_lost_item_result, date_to_reduced_number, reduce_digit_sum, reduce_preserving_masters,
    string_to_reduced_number, CHALDEAN, PYTHAGOREAN,
};

fn iterated_digit_sum(mut n: u64) -> u64 {
    while n >= 10 {
        let mut sum = 0;
        let mut rest = n;
        while rest > 0 {
            sum += rest % 10;
            rest /= 10;
        }
        n = sum;
    }
    n
}

fn scheme_strategy() -> impl Strategy<Value = Scheme> {
    prop_oneof![Just(Scheme::Pythagorean), Just(Scheme::Chaldean)]
}

#[test]
fn spec_examples_hold() {
    assert_eq!(string_to_reduced_number("RING", &PYTHAGOREAN), 3);
    assert_eq!(date_to_reduced_number("2024-03-15"), 8);

    let result = compute_lost_item_result("Keys", "2024-01-01", "", Scheme::Pythagorean);
    assert!((1..=9).contains(&result.master_number));
    assert!(lookup(result.master_number).is_some());
}

#[test]
fn each_scheme_yields_an_interpretation_for_keys() {
    for scheme in [Scheme::Pythagorean, Scheme::Chaldean] {
        let result = compute_lost_item_result("Keys", "2024-01-01", "", scheme);
        assert!(result.master_number <= 9);
        assert!(!result.interpretation.direction.is_empty());
    }
}

proptest! {
    #[test]
    fn reduce_matches_iterated_digit_sum(n in 1_u64..u64::MAX) {
        let reduced = reduce_digit_sum(n);
        prop_assert!((1..=9).contains(&reduced));
        prop_assert_eq!(u64::from(reduced), iterated_digit_sum(n));
    }

    #[test]
    fn reduce_is_idempotent(n in 0_u64..1_000_000) {
        let once = reduce_digit_sum(n);
        prop_assert_eq!(reduce_digit_sum(u64::from(once)), once);
    }

    #[test]
    fn string_reduction_ignores_case(text in "[a-zA-Z ]{0,40}") {
        for map in [&PYTHAGOREAN, &CHALDEAN] {
            let upper = string_to_reduced_number(&text.to_uppercase(), map);
            let lower = string_to_reduced_number(&text.to_lowercase(), map);
            prop_assert_eq!(upper, lower);
            prop_assert_eq!(string_to_reduced_number(&text, map), lower);
        }
    }

    #[test]
    fn string_reduction_ignores_non_letters(
        text in "[a-z]{0,20}",
        noise in "[0-9 !?.,'-]{0,10}",
    ) {
        let noisy = format!("{noise}{text}{noise}");
        prop_assert_eq!(
            string_to_reduced_number(&noisy, &PYTHAGOREAN),
            string_to_reduced_number(&text, &PYTHAGOREAN)
        );
    }

    #[test]
    fn date_separators_do_not_matter(year in 1000_u32..3000, month in 1_u32..13, day in 1_u32..29) {
        let dashed = format!("{year:04}-{month:02}-{day:02}");
        let slashed = format!("{year:04}/{month:02}/{day:02}");
        prop_assert_eq!(date_to_reduced_number(&dashed), date_to_reduced_number(&slashed));
    }

    #[test]
    fn lost_item_result_is_total(
        item in ".{0,30}",
        date in ".{0,12}",
        seeker in ".{0,30}",
        scheme in scheme_strategy(),
    ) {
        let result = compute_lost_item_result(&item, &date, &seeker, scheme);
        prop_assert!(result.master_number <= 9);
        prop_assert_eq!(
            result.breakdown.total_sum,
            result.item_number + result.date_number + result.seeker_number
        );
        let expected = interpretation_for(result.master_number);
        prop_assert_eq!(&result.interpretation.direction, &expected.direction.to_string());
        if result.master_number == 0 {
            prop_assert_eq!(result.interpretation.direction.as_str(), INDETERMINATE.direction);
        }
    }

    #[test]
    fn master_preserving_reducer_lands_on_digit_or_master(n in 0_u64..10_000_000) {
        let reduced = reduce_preserving_masters(n);
        prop_assert!(reduced < 10 || [11, 22, 33].contains(&reduced));
    }
}
