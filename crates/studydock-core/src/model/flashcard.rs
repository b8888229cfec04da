use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Record;

/// Subject label for cards created without one.
pub const DEFAULT_FLASHCARD_SUBJECT: &str = "General";

/// A question/answer card with its review tally.
///
/// `correct_count <= total_reviews` always holds; both only grow, through
/// [`Flashcard::record_review`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub subject: String,
    #[serde(default)]
    correct_count: u32,
    #[serde(default)]
    total_reviews: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_reviewed: Option<DateTime<Utc>>,
}

impl Flashcard {
    pub fn new(id: String, question: String, answer: String, subject: String) -> Self {
        Self {
            id,
            question,
            answer,
            subject,
            correct_count: 0,
            total_reviews: 0,
            last_reviewed: None,
        }
    }

    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    pub fn total_reviews(&self) -> u32 {
        self.total_reviews
    }

    pub fn last_reviewed(&self) -> Option<DateTime<Utc>> {
        self.last_reviewed
    }

    pub fn record_review(&mut self, correct: bool, at: DateTime<Utc>) {
        self.total_reviews = self.total_reviews.saturating_add(1);
        if correct {
            self.correct_count = self.correct_count.saturating_add(1);
        }
        self.last_reviewed = Some(at);
    }

    /// Rounded percentage of correct answers, `None` before the first review.
    pub fn accuracy_pct(&self) -> Option<u32> {
        if self.total_reviews == 0 {
            return None;
        }
        let pct = f64::from(self.correct_count) / f64::from(self.total_reviews) * 100.0;
        Some(pct.round() as u32)
    }
}

impl Record for Flashcard {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> Flashcard {
        Flashcard::new("c1".into(), "2+2?".into(), "4".into(), "Math".into())
    }

    #[test]
    fn record_review_counts() {
        let mut c = card();
        let now = Utc::now();
        c.record_review(true, now);
        c.record_review(false, now);
        c.record_review(true, now);
        assert_eq!(c.total_reviews(), 3);
        assert_eq!(c.correct_count(), 2);
        assert_eq!(c.last_reviewed(), Some(now));
    }

    #[test]
    fn accuracy_rounds() {
        let mut c = card();
        assert_eq!(c.accuracy_pct(), None);
        let now = Utc::now();
        c.record_review(true, now);
        c.record_review(true, now);
        c.record_review(false, now);
        assert_eq!(c.accuracy_pct(), Some(67));
    }

    #[test]
    fn reads_stored_counters() {
        let json = r#"{"id":"c1","question":"q","answer":"a","subject":"Geral","correctCount":2,"totalReviews":5}"#;
        let c: Flashcard = serde_json::from_str(json).unwrap();
        assert_eq!(c.correct_count(), 2);
        assert_eq!(c.total_reviews(), 5);
        assert!(c.last_reviewed().is_none());
    }
}
