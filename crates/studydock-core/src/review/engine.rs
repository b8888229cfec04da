//! Flashcard review state machine.
//!
//! ```text
//! NotReviewing --start--> ShowingQuestion --reveal--> ShowingAnswer
//!      ^                        |                        |
//!      +---------stop-----------+--------stop / grade----+
//! ```
//!
//! The engine only remembers the id of the card under review. Grading looks
//! the card up in the live collection at that moment, so it never writes
//! through a stale copy.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::{Collection, Flashcard};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ReviewState {
    #[default]
    NotReviewing,
    ShowingQuestion {
        card_id: String,
    },
    ShowingAnswer {
        card_id: String,
    },
}

impl ReviewState {
    pub fn card_id(&self) -> Option<&str> {
        match self {
            ReviewState::NotReviewing => None,
            ReviewState::ShowingQuestion { card_id } | ReviewState::ShowingAnswer { card_id } => {
                Some(card_id)
            }
        }
    }
}

/// Result of a grade that reached a live card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeOutcome {
    pub card_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewEngine {
    state: ReviewState,
}

impl ReviewEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ReviewState {
        &self.state
    }

    pub fn is_reviewing(&self) -> bool {
        self.state != ReviewState::NotReviewing
    }

    pub fn current_card_id(&self) -> Option<&str> {
        self.state.card_id()
    }

    /// Pick a card uniformly at random from `cards` as they are now and show
    /// its question. Starting again mid-review replaces the current card.
    /// Returns `None` and leaves the state alone when there are no cards.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        cards: &Collection<Flashcard>,
        rng: &mut R,
    ) -> Option<&str> {
        if cards.is_empty() {
            return None;
        }
        let idx = rng.gen_range(0..cards.len());
        let card_id = cards.as_slice()[idx].id.clone();
        self.state = ReviewState::ShowingQuestion { card_id };
        self.state.card_id()
    }

    /// Returns `false` unless a question was showing.
    pub fn reveal(&mut self) -> bool {
        match std::mem::take(&mut self.state) {
            ReviewState::ShowingQuestion { card_id } => {
                self.state = ReviewState::ShowingAnswer { card_id };
                true
            }
            other => {
                self.state = other;
                false
            }
        }
    }

    /// Score the card whose answer is showing and end the review.
    ///
    /// Ignored unless the answer has been revealed. If the card has been
    /// deleted in the meantime nothing is scored, but the review still ends.
    pub fn grade(
        &mut self,
        cards: &mut Collection<Flashcard>,
        correct: bool,
        now: DateTime<Utc>,
    ) -> Option<GradeOutcome> {
        let ReviewState::ShowingAnswer { card_id } = &self.state else {
            return None;
        };
        let card_id = card_id.clone();
        self.state = ReviewState::NotReviewing;
        let card = cards.get_mut(&card_id)?;
        card.record_review(correct, now);
        Some(GradeOutcome { card_id })
    }

    /// End the review without scoring. Returns the card that was under review.
    pub fn stop(&mut self) -> Option<String> {
        match std::mem::take(&mut self.state) {
            ReviewState::NotReviewing => None,
            ReviewState::ShowingQuestion { card_id } | ReviewState::ShowingAnswer { card_id } => {
                Some(card_id)
            }
        }
    }

    /// Cancel the review if it is about `card_id`.
    pub fn forget_card(&mut self, card_id: &str) -> bool {
        if self.current_card_id() == Some(card_id) {
            self.state = ReviewState::NotReviewing;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;
    use std::collections::HashSet;

    fn deck(n: usize) -> Collection<Flashcard> {
        Collection::from_vec(
            (0..n)
                .map(|i| {
                    Flashcard::new(
                        format!("c{i}"),
                        format!("q{i}"),
                        format!("a{i}"),
                        "General".into(),
                    )
                })
                .collect(),
        )
    }

    #[test]
    fn empty_deck_stays_not_reviewing() {
        let mut engine = ReviewEngine::new();
        let mut rng = Pcg64::seed_from_u64(1);
        assert!(engine.start(&deck(0), &mut rng).is_none());
        assert_eq!(engine.state(), &ReviewState::NotReviewing);
    }

    #[test]
    fn full_cycle_scores_reviewed_card() {
        let mut cards = deck(3);
        let mut engine = ReviewEngine::new();
        let mut rng = Pcg64::seed_from_u64(7);
        let id = engine.start(&cards, &mut rng).unwrap().to_string();

        assert!(engine.grade(&mut cards, true, Utc::now()).is_none());
        assert!(engine.reveal());
        assert!(!engine.reveal());

        let now = Utc::now();
        let outcome = engine.grade(&mut cards, true, now).unwrap();
        assert_eq!(outcome.card_id, id);
        assert!(!engine.is_reviewing());

        let card = cards.get(&id).unwrap();
        assert_eq!(card.total_reviews(), 1);
        assert_eq!(card.correct_count(), 1);
        assert_eq!(card.last_reviewed(), Some(now));
        let untouched = cards.iter().filter(|c| c.total_reviews() == 0).count();
        assert_eq!(untouched, 2);
    }

    #[test]
    fn grading_deleted_card_is_noop_but_ends_review() {
        let mut cards = deck(1);
        let mut engine = ReviewEngine::new();
        let mut rng = Pcg64::seed_from_u64(3);
        engine.start(&cards, &mut rng);
        engine.reveal();
        cards.remove("c0");
        assert!(engine.grade(&mut cards, true, Utc::now()).is_none());
        assert_eq!(engine.state(), &ReviewState::NotReviewing);
    }

    #[test]
    fn stop_does_not_score() {
        let mut cards = deck(1);
        let mut engine = ReviewEngine::new();
        let mut rng = Pcg64::seed_from_u64(3);
        engine.start(&cards, &mut rng);
        engine.reveal();
        assert_eq!(engine.stop().as_deref(), Some("c0"));
        assert!(engine.stop().is_none());
        assert!(engine.grade(&mut cards, true, Utc::now()).is_none());
        assert_eq!(cards.get("c0").unwrap().total_reviews(), 0);
    }

    #[test]
    fn forget_card_only_cancels_matching_review() {
        let cards = deck(1);
        let mut engine = ReviewEngine::new();
        let mut rng = Pcg64::seed_from_u64(3);
        engine.start(&cards, &mut rng);
        assert!(!engine.forget_card("other"));
        assert!(engine.is_reviewing());
        assert!(engine.forget_card("c0"));
        assert!(!engine.is_reviewing());
    }

    #[test]
    fn selection_covers_whole_deck_with_repeats() {
        let cards = deck(4);
        let mut engine = ReviewEngine::new();
        let mut rng = Pcg64::seed_from_u64(42);
        let picks: Vec<String> = (0..200)
            .map(|_| engine.start(&cards, &mut rng).unwrap().to_string())
            .collect();
        let distinct: HashSet<_> = picks.iter().collect();
        assert_eq!(distinct.len(), 4);
        assert!(picks.windows(2).any(|w| w[0] == w[1]));
    }

    #[test]
    fn stores_as_bare_state() {
        let cards = deck(1);
        let mut engine = ReviewEngine::new();
        engine.start(&cards, &mut Pcg64::seed_from_u64(5));
        let json = serde_json::to_value(&engine).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"state": "showing_question", "card_id": "c0"})
        );
        let back: ReviewEngine = serde_json::from_value(json).unwrap();
        assert_eq!(back, engine);
    }

    proptest! {
        #[test]
        fn grade_never_overcounts(
            seed in any::<u64>(),
            answers in proptest::collection::vec(any::<bool>(), 1..40),
        ) {
            let mut cards = deck(3);
            let mut engine = ReviewEngine::new();
            let mut rng = Pcg64::seed_from_u64(seed);
            for correct in answers {
                let id = engine.start(&cards, &mut rng).unwrap().to_string();
                let before = cards.get(&id).unwrap().clone();
                engine.reveal();
                engine.grade(&mut cards, correct, Utc::now());
                let after = cards.get(&id).unwrap();
                prop_assert_eq!(after.total_reviews(), before.total_reviews() + 1);
                prop_assert_eq!(
                    after.correct_count(),
                    before.correct_count() + u32::from(correct)
                );
                prop_assert!(after.correct_count() <= after.total_reviews());
            }
        }
    }
}
