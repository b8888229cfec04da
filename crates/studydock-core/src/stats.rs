//! Points and day-scoped statistics.
//!
//! Everything here is a pure function of the collections and a caller
//! supplied "now". Day bucketing compares calendar dates in `now`'s time
//! zone and ignores time of day.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{CalendarEvent, Collection, Flashcard, PomodoroSession, Subject, Task};

/// Awarded for each completed Focus session. Breaks earn nothing.
pub const POINTS_PER_FOCUS_SESSION: u64 = 10;

/// Recompute the points total from the session log.
pub fn points_from_log(sessions: &[PomodoroSession]) -> u64 {
    sessions.iter().filter(|s| s.is_focus()).count() as u64 * POINTS_PER_FOCUS_SESSION
}

pub fn is_same_day<Tz: TimeZone>(at: &DateTime<Utc>, now: &DateTime<Tz>) -> bool {
    at.with_timezone(&now.timezone()).date_naive() == now.date_naive()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStats {
    pub date: NaiveDate,
    pub tasks: usize,
    pub completed_tasks: usize,
    /// Rounded percentage, 0 when there are no tasks today.
    pub completion_rate_pct: u32,
    pub focus_sessions: usize,
    pub focus_minutes: u64,
    pub points: u64,
    pub events: usize,
}

impl DailyStats {
    pub fn compute<Tz: TimeZone>(
        tasks: &Collection<Task>,
        sessions: &[PomodoroSession],
        events: &Collection<CalendarEvent>,
        now: &DateTime<Tz>,
    ) -> Self {
        let today = now.date_naive();
        let todays_tasks: Vec<&Task> = tasks
            .iter()
            .filter(|t| is_same_day(&t.created_at, now))
            .collect();
        let completed_tasks = todays_tasks.iter().filter(|t| t.completed).count();
        let completion_rate_pct = if todays_tasks.is_empty() {
            0
        } else {
            (completed_tasks as f64 / todays_tasks.len() as f64 * 100.0).round() as u32
        };

        let focus_today: Vec<&PomodoroSession> = sessions
            .iter()
            .filter(|s| s.is_focus() && is_same_day(&s.completed_at, now))
            .collect();

        Self {
            date: today,
            tasks: todays_tasks.len(),
            completed_tasks,
            completion_rate_pct,
            focus_sessions: focus_today.len(),
            focus_minutes: focus_today.iter().map(|s| u64::from(s.duration)).sum(),
            points: focus_today.len() as u64 * POINTS_PER_FOCUS_SESSION,
            events: events.iter().filter(|e| e.date == today).count(),
        }
    }
}

/// All-time totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overview {
    pub points: u64,
    pub focus_sessions: usize,
    pub focus_minutes: u64,
    pub break_sessions: usize,
    pub tasks: usize,
    pub completed_tasks: usize,
    pub subjects: usize,
    pub flashcards: usize,
    pub flashcard_reviews: u64,
    pub events: usize,
}

impl Overview {
    pub fn compute(
        points: u64,
        tasks: &Collection<Task>,
        sessions: &[PomodoroSession],
        events: &Collection<CalendarEvent>,
        flashcards: &Collection<Flashcard>,
        subjects: &Collection<Subject>,
    ) -> Self {
        let (focus, breaks): (Vec<&PomodoroSession>, Vec<&PomodoroSession>) =
            sessions.iter().partition(|s| s.is_focus());
        Self {
            points,
            focus_sessions: focus.len(),
            focus_minutes: focus.iter().map(|s| u64::from(s.duration)).sum(),
            break_sessions: breaks.len(),
            tasks: tasks.len(),
            completed_tasks: tasks.iter().filter(|t| t.completed).count(),
            subjects: subjects.len(),
            flashcards: flashcards.len(),
            flashcard_reviews: flashcards
                .iter()
                .map(|c| u64::from(c.total_reviews()))
                .sum(),
            events: events.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::Phase;
    use chrono::{Duration, FixedOffset};

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn session(id: &str, kind: Phase, duration: u32, completed_at: DateTime<Utc>) -> PomodoroSession {
        PomodoroSession {
            id: id.into(),
            duration,
            kind,
            completed_at,
        }
    }

    fn task(id: &str, created_at: DateTime<Utc>, completed: bool) -> Task {
        let mut t = Task::new(id.into(), format!("task {id}"), None, created_at);
        t.completed = completed;
        t
    }

    #[test]
    fn points_count_only_focus() {
        let now = at("2024-03-01T10:00:00Z");
        let log = vec![
            session("1", Phase::Focus, 25, now),
            session("2", Phase::Break, 5, now),
            session("3", Phase::Focus, 25, now),
        ];
        assert_eq!(points_from_log(&log), 20);
        assert_eq!(points_from_log(&[]), 0);
    }

    #[test]
    fn same_day_ignores_time_of_day() {
        let now = at("2024-03-01T23:59:00Z");
        assert!(is_same_day(&at("2024-03-01T00:00:01Z"), &now));
        assert!(!is_same_day(&at("2024-02-29T23:59:59Z"), &now));
    }

    #[test]
    fn same_day_uses_callers_zone() {
        let tz = FixedOffset::east_opt(9 * 3600).unwrap();
        let now = at("2024-03-01T16:00:00Z").with_timezone(&tz); // Mar 2, 01:00 local
        assert!(is_same_day(&at("2024-03-01T15:30:00Z"), &now));
        assert!(!is_same_day(&at("2024-03-01T14:30:00Z"), &now));
    }

    #[test]
    fn daily_stats_buckets_by_date() {
        let now = at("2024-03-01T18:00:00Z");
        let yesterday = now - Duration::days(1);
        let tasks = Collection::from_vec(vec![
            task("a", now, true),
            task("b", now, false),
            task("c", now, true),
            task("old", yesterday, true),
        ]);
        let sessions = vec![
            session("1", Phase::Focus, 25, now),
            session("2", Phase::Break, 5, now),
            session("3", Phase::Focus, 50, now),
            session("4", Phase::Focus, 25, yesterday),
        ];
        let events = Collection::from_vec(vec![
            CalendarEvent {
                id: "e1".into(),
                title: "Exam".into(),
                date: now.date_naive(),
                time: None,
                description: None,
            },
            CalendarEvent {
                id: "e2".into(),
                title: "Lab".into(),
                date: yesterday.date_naive(),
                time: None,
                description: None,
            },
        ]);

        let stats = DailyStats::compute(&tasks, &sessions, &events, &now);
        assert_eq!(stats.tasks, 3);
        assert_eq!(stats.completed_tasks, 2);
        assert_eq!(stats.completion_rate_pct, 67);
        assert_eq!(stats.focus_sessions, 2);
        assert_eq!(stats.focus_minutes, 75);
        assert_eq!(stats.points, 20);
        assert_eq!(stats.events, 1);
    }

    #[test]
    fn completion_rate_zero_without_tasks() {
        let now = at("2024-03-01T18:00:00Z");
        let stats = DailyStats::compute(&Collection::new(), &[], &Collection::new(), &now);
        assert_eq!(stats.completion_rate_pct, 0);
        assert_eq!(stats.date, now.date_naive());
    }

    #[test]
    fn overview_totals() {
        let now = at("2024-03-01T18:00:00Z");
        let sessions = vec![
            session("1", Phase::Focus, 25, now),
            session("2", Phase::Break, 5, now),
        ];
        let mut card = Flashcard::new("c".into(), "q".into(), "a".into(), "General".into());
        card.record_review(true, now);
        let overview = Overview::compute(
            10,
            &Collection::from_vec(vec![task("a", now, true)]),
            &sessions,
            &Collection::new(),
            &Collection::from_vec(vec![card]),
            &Collection::new(),
        );
        assert_eq!(overview.focus_sessions, 1);
        assert_eq!(overview.focus_minutes, 25);
        assert_eq!(overview.break_sessions, 1);
        assert_eq!(overview.flashcard_reviews, 1);
        assert_eq!(overview.completed_tasks, 1);
    }
}
