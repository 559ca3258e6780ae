//! Round generation: question order and shuffled multiple-choice options.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::catalog::Country;

/// Answer options shown per round.
pub const OPTION_COUNT: usize = 4;

/// One flag question with its options and countdown.
#[derive(Clone, Debug)]
pub struct Round {
    pub country: Country,
    pub options: Vec<Country>,
    pub correct_index: usize,
    /// Seconds left on the countdown.
    pub time_remaining: f64,
    /// Option submitted by the player, if any.
    pub picked: Option<usize>,
}

impl Round {
    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_index
    }
}

/// Builds a round for `target` with distractors drawn uniformly without
/// replacement from the rest of `catalog`.
pub fn new_round<R: Rng + ?Sized>(
    catalog: &[Country],
    target: &Country,
    question_time: f64,
    rng: &mut R,
) -> Round {
    let mut pool: Vec<&Country> = catalog.iter().filter(|c| c.code != target.code).collect();
    let (distractors, _) = pool.partial_shuffle(rng, OPTION_COUNT - 1);

    let mut options: Vec<Country> = Vec::with_capacity(OPTION_COUNT);
    options.push(target.clone());
    options.extend(distractors.iter().map(|c| (*c).clone()));
    options.shuffle(rng);

    let correct_index = options
        .iter()
        .position(|c| c.code == target.code)
        .unwrap_or_default();

    Round {
        country: target.clone(),
        options,
        correct_index,
        time_remaining: question_time,
        picked: None,
    }
}

/// `count` distinct countries in uniformly random order.
pub fn draw_question_order<R: Rng + ?Sized>(catalog: &[Country], count: usize, rng: &mut R) -> Vec<Country> {
    let mut pool: Vec<&Country> = catalog.iter().collect();
    let (picked, _) = pool.partial_shuffle(rng, count);
    picked.iter().map(|c| (*c).clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_catalog;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn options_are_unique_and_contain_target() {
        let catalog = default_catalog();
        let mut rng = StdRng::seed_from_u64(7);
        for target in catalog.iter().take(60) {
            let round = new_round(catalog, target, 5.0, &mut rng);
            assert_eq!(round.options.len(), OPTION_COUNT);
            let codes: HashSet<_> = round.options.iter().map(|c| c.code).collect();
            assert_eq!(codes.len(), OPTION_COUNT, "duplicate option for {}", target.code);
            assert_eq!(round.options[round.correct_index].code, target.code);
            assert!(round.is_correct(round.correct_index));
            assert!((round.time_remaining - 5.0).abs() < 1e-12);
            assert!(round.picked.is_none());
        }
    }

    #[test]
    fn correct_slot_is_uniform() {
        let catalog = default_catalog();
        let target = &catalog[0];
        let mut rng = StdRng::seed_from_u64(2024);
        let trials = 4000;
        let mut hits = [0usize; OPTION_COUNT];
        for _ in 0..trials {
            hits[new_round(catalog, target, 5.0, &mut rng).correct_index] += 1;
        }
        for (slot, &n) in hits.iter().enumerate() {
            let freq = n as f64 / trials as f64;
            assert!((freq - 0.25).abs() < 0.03, "slot {slot} chosen {freq:.3} of the time");
        }
    }

    #[test]
    fn question_order_is_distinct() {
        let catalog = default_catalog();
        let mut rng = StdRng::seed_from_u64(1);
        let order = draw_question_order(catalog, 25, &mut rng);
        assert_eq!(order.len(), 25);
        let codes: HashSet<_> = order.iter().map(|c| c.code).collect();
        assert_eq!(codes.len(), 25);
    }
}
