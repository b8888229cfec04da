//! The study session context.
//!
//! [`StudyContext`] owns the current user's collections, the Pomodoro and
//! review engines, the injected [`Store`] and [`Clock`]. Every mutation is
//! written through to the store before the call returns. Store failures are
//! logged and the write is skipped; no operation here returns an error.

use std::future::Future;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use rand::SeedableRng;
use rand_pcg::Pcg64;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::events::{Event, WipeSummary};
use crate::model::{
    new_id, non_blank, CalendarEvent, Collection, Flashcard, PomodoroSession, Subject, Task,
    DEFAULT_FLASHCARD_SUBJECT, DEFAULT_SUBJECT_COLOR,
};
use crate::review::{ReviewEngine, ReviewState};
use crate::stats::{DailyStats, Overview, POINTS_PER_FOCUS_SESSION};
use crate::storage::{Store, StoreExt, StoreKey};
use crate::timer::{Phase, PhaseCompletion, PomodoroEngine, Ticker, TimerDurations, TimerSnapshot};
use crate::user::UserProfile;

/// Timer document: the engine plus the instant up to which ticks have been
/// applied while running.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TimerDoc {
    engine: PomodoroEngine,
    #[serde(default)]
    ticked_until: Option<DateTime<Utc>>,
}

pub struct StudyContext<S: Store, C: Clock = SystemClock> {
    store: S,
    clock: C,
    rng: Pcg64,
    user: Option<UserProfile>,
    tasks: Collection<Task>,
    events: Collection<CalendarEvent>,
    flashcards: Collection<Flashcard>,
    subjects: Collection<Subject>,
    sessions: Vec<PomodoroSession>,
    points: u64,
    timer: TimerDoc,
    review: ReviewEngine,
}

impl<S: Store, C: Clock> StudyContext<S, C> {
    /// Load everything from `store`. A timer that was never saved starts
    /// with default durations.
    pub fn load(store: S, clock: C) -> Self {
        Self::load_with(store, clock, TimerDurations::default())
    }

    /// Like [`StudyContext::load`], with the durations a never-saved timer
    /// starts from.
    pub fn load_with(store: S, clock: C, durations: TimerDurations) -> Self {
        let mut timer = store
            .load_or_default::<Option<TimerDoc>>(StoreKey::TimerState)
            .unwrap_or_else(|| TimerDoc {
                engine: PomodoroEngine::new(durations),
                ticked_until: None,
            });
        // A running timer without an anchor would never catch up.
        let unanchored = timer.engine.is_running() && timer.ticked_until.is_none();
        if unanchored {
            timer.ticked_until = Some(clock.now());
        }
        let mut ctx = Self {
            user: store.load_or_default(StoreKey::CurrentUser),
            tasks: Collection::from_vec(store.load_or_default(StoreKey::Tasks)),
            events: Collection::from_vec(store.load_or_default(StoreKey::CalendarEvents)),
            flashcards: Collection::from_vec(store.load_or_default(StoreKey::Flashcards)),
            subjects: Collection::from_vec(store.load_or_default(StoreKey::Subjects)),
            sessions: store.load_or_default(StoreKey::PomodoroSessions),
            points: store.load_or_default(StoreKey::UserPoints),
            review: store.load_or_default(StoreKey::ReviewState),
            timer,
            store,
            clock,
            rng: Pcg64::from_entropy(),
        };
        if unanchored {
            ctx.flush_timer();
        }
        // A review can outlive its card if the process died mid-delete.
        if let Some(id) = ctx.review.current_card_id().map(str::to_string) {
            if !ctx.flashcards.contains(&id) {
                ctx.review.forget_card(&id);
                ctx.store.save(StoreKey::ReviewState, &ctx.review);
            }
        }
        ctx
    }

    /// Make card selection reproducible.
    pub fn seeded(mut self, seed: u64) -> Self {
        self.rng = Pcg64::seed_from_u64(seed);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // ── User ─────────────────────────────────────────────────────────

    pub fn current_user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    /// Point the store at `profile`. A brand new account starts from wiped
    /// study data.
    pub fn sign_in(&mut self, profile: UserProfile) -> Option<Event> {
        let wiped = profile.is_new_user.then(|| self.wipe());
        self.store.save(StoreKey::CurrentUser, &profile);
        info!(email = %profile.email, new_user = profile.is_new_user, "signed in");
        self.user = Some(profile);
        wiped
    }

    /// Drop the user pointer. Study data is left in place.
    pub fn sign_out(&mut self) -> Option<UserProfile> {
        let user = self.user.take()?;
        self.store.discard(StoreKey::CurrentUser);
        info!(email = %user.email, "signed out");
        Some(user)
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub fn tasks(&self) -> &Collection<Task> {
        &self.tasks
    }

    /// Blank titles are ignored.
    pub fn add_task(&mut self, title: &str, subject: Option<&str>) -> Option<Task> {
        let title = non_blank(title)?;
        let task = Task::new(new_id(), title, subject.and_then(non_blank), self.clock.now());
        self.tasks.insert(task.clone());
        self.flush_tasks();
        Some(task)
    }

    /// Flip the completed flag. Returns the new value.
    pub fn toggle_task(&mut self, id: &str) -> Option<bool> {
        let task = self.tasks.get_mut(id)?;
        task.completed = !task.completed;
        let completed = task.completed;
        self.flush_tasks();
        Some(completed)
    }

    pub fn delete_task(&mut self, id: &str) -> bool {
        if self.tasks.remove(id).is_none() {
            return false;
        }
        self.flush_tasks();
        true
    }

    fn flush_tasks(&mut self) {
        self.store.save(StoreKey::Tasks, self.tasks.as_slice());
    }

    // ── Calendar ─────────────────────────────────────────────────────

    pub fn calendar_events(&self) -> &Collection<CalendarEvent> {
        &self.events
    }

    pub fn events_on(&self, date: NaiveDate) -> Vec<&CalendarEvent> {
        self.events.iter().filter(|e| e.date == date).collect()
    }

    /// Blank titles are ignored.
    pub fn add_event(
        &mut self,
        title: &str,
        date: NaiveDate,
        time: Option<NaiveTime>,
        description: Option<&str>,
    ) -> Option<CalendarEvent> {
        let event = CalendarEvent {
            id: new_id(),
            title: non_blank(title)?,
            date,
            time,
            description: description.and_then(non_blank),
        };
        self.events.insert(event.clone());
        self.flush_events();
        Some(event)
    }

    pub fn delete_event(&mut self, id: &str) -> bool {
        if self.events.remove(id).is_none() {
            return false;
        }
        self.flush_events();
        true
    }

    fn flush_events(&mut self) {
        self.store
            .save(StoreKey::CalendarEvents, self.events.as_slice());
    }

    // ── Subjects ─────────────────────────────────────────────────────

    pub fn subjects(&self) -> &Collection<Subject> {
        &self.subjects
    }

    pub fn add_subject(&mut self, name: &str, color: Option<&str>, notes: &str) -> Option<Subject> {
        let subject = Subject {
            id: new_id(),
            name: non_blank(name)?,
            color: color
                .and_then(non_blank)
                .unwrap_or_else(|| DEFAULT_SUBJECT_COLOR.to_string()),
            notes: notes.to_string(),
            created_at: self.clock.now(),
        };
        self.subjects.insert(subject.clone());
        self.flush_subjects();
        Some(subject)
    }

    pub fn delete_subject(&mut self, id: &str) -> bool {
        if self.subjects.remove(id).is_none() {
            return false;
        }
        self.flush_subjects();
        true
    }

    fn flush_subjects(&mut self) {
        self.store.save(StoreKey::Subjects, self.subjects.as_slice());
    }

    // ── Flashcards ───────────────────────────────────────────────────

    pub fn flashcards(&self) -> &Collection<Flashcard> {
        &self.flashcards
    }

    /// Question and answer must both be non-blank.
    pub fn add_flashcard(
        &mut self,
        question: &str,
        answer: &str,
        subject: Option<&str>,
    ) -> Option<Flashcard> {
        let card = Flashcard::new(
            new_id(),
            non_blank(question)?,
            non_blank(answer)?,
            subject
                .and_then(non_blank)
                .unwrap_or_else(|| DEFAULT_FLASHCARD_SUBJECT.to_string()),
        );
        self.flashcards.insert(card.clone());
        self.flush_flashcards();
        Some(card)
    }

    /// Deleting the card under review also ends that review.
    pub fn delete_flashcard(&mut self, id: &str) -> bool {
        if self.flashcards.remove(id).is_none() {
            return false;
        }
        self.flush_flashcards();
        if self.review.forget_card(id) {
            debug!(card_id = id, "review cancelled by delete");
            self.flush_review();
        }
        true
    }

    fn flush_flashcards(&mut self) {
        self.store
            .save(StoreKey::Flashcards, self.flashcards.as_slice());
    }

    // ── Review ───────────────────────────────────────────────────────

    pub fn review(&self) -> &ReviewEngine {
        &self.review
    }

    pub fn reviewing_card(&self) -> Option<&Flashcard> {
        self.flashcards.get(self.review.current_card_id()?)
    }

    /// No-op on an empty deck.
    pub fn start_review(&mut self) -> Option<Event> {
        let card_id = self
            .review
            .start(&self.flashcards, &mut self.rng)?
            .to_string();
        self.flush_review();
        debug!(%card_id, "review started");
        Some(Event::ReviewStarted {
            card_id,
            at: self.clock.now(),
        })
    }

    pub fn reveal_answer(&mut self) -> Option<Event> {
        if !self.review.reveal() {
            return None;
        }
        self.flush_review();
        Some(Event::AnswerRevealed {
            card_id: self.review.current_card_id()?.to_string(),
            at: self.clock.now(),
        })
    }

    /// Score the revealed card and end the review. If the card is gone the
    /// review still ends and `scored` is false.
    pub fn grade_card(&mut self, correct: bool) -> Option<Event> {
        if !matches!(self.review.state(), ReviewState::ShowingAnswer { .. }) {
            return None;
        }
        let card_id = self.review.current_card_id()?.to_string();
        let now = self.clock.now();
        let outcome = self.review.grade(&mut self.flashcards, correct, now);
        if outcome.is_some() {
            self.flush_flashcards();
        }
        self.flush_review();
        debug!(%card_id, correct, scored = outcome.is_some(), "card graded");
        Some(Event::CardGraded {
            card_id,
            correct,
            scored: outcome.is_some(),
            at: now,
        })
    }

    pub fn stop_review(&mut self) -> Option<Event> {
        let card_id = self.review.stop()?;
        self.flush_review();
        Some(Event::ReviewStopped {
            card_id,
            at: self.clock.now(),
        })
    }

    fn flush_review(&mut self) {
        self.store.save(StoreKey::ReviewState, &self.review);
    }

    // ── Pomodoro ─────────────────────────────────────────────────────

    pub fn timer(&self) -> &PomodoroEngine {
        &self.timer.engine
    }

    pub fn timer_snapshot(&self) -> TimerSnapshot {
        self.timer.engine.snapshot()
    }

    pub fn sessions(&self) -> &[PomodoroSession] {
        &self.sessions
    }

    pub fn points(&self) -> u64 {
        self.points
    }

    pub fn start_timer(&mut self) -> Option<Event> {
        if !self.timer.engine.start() {
            return None;
        }
        let at = self.clock.now();
        self.timer.ticked_until = Some(at);
        self.flush_timer();
        debug!(phase = self.timer.engine.phase().as_str(), "timer started");
        Some(Event::TimerStarted {
            phase: self.timer.engine.phase(),
            remaining_secs: self.timer.engine.remaining_secs(),
            at,
        })
    }

    pub fn pause_timer(&mut self) -> Option<Event> {
        if !self.timer.engine.pause() {
            return None;
        }
        self.timer.ticked_until = None;
        self.flush_timer();
        debug!(remaining = self.timer.engine.remaining_secs(), "timer paused");
        Some(Event::TimerPaused {
            phase: self.timer.engine.phase(),
            remaining_secs: self.timer.engine.remaining_secs(),
            at: self.clock.now(),
        })
    }

    pub fn reset_timer(&mut self) -> Event {
        self.timer.engine.reset();
        self.timer.ticked_until = None;
        self.flush_timer();
        debug!(phase = self.timer.engine.phase().as_str(), "timer reset");
        Event::TimerReset {
            phase: self.timer.engine.phase(),
            remaining_secs: self.timer.engine.remaining_secs(),
            at: self.clock.now(),
        }
    }

    /// Change a phase length. Ignored while running or for out-of-range
    /// minutes.
    pub fn set_timer_duration(&mut self, phase: Phase, minutes: u32) -> Option<Event> {
        if !self.timer.engine.set_duration(phase, minutes) {
            debug!(phase = phase.as_str(), minutes, "duration change ignored");
            return None;
        }
        self.flush_timer();
        let durations = self.timer.engine.durations();
        Some(Event::DurationsChanged {
            focus_min: durations.focus_min(),
            break_min: durations.break_min(),
            at: self.clock.now(),
        })
    }

    /// One elapsed second.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.timer.engine.is_running() {
            return None;
        }
        let event = self.advance_second();
        self.flush_timer();
        event
    }

    /// Apply one tick per whole second the clock has moved past the last
    /// applied tick. Stops at a completion. The timer document is saved
    /// once, after the last tick.
    pub fn catch_up(&mut self) -> Option<Event> {
        let since = self.timer.ticked_until?;
        let elapsed = (self.clock.now() - since).num_seconds();
        if elapsed <= 0 {
            return None;
        }
        let mut completed = None;
        for _ in 0..elapsed {
            completed = self.advance_second();
            if !self.timer.engine.is_running() {
                break;
            }
        }
        self.flush_timer();
        completed
    }

    /// Tick the engine and move the anchor, without saving the timer.
    fn advance_second(&mut self) -> Option<Event> {
        let tick_at = self
            .timer
            .ticked_until
            .map_or_else(|| self.clock.now(), |t| t + Duration::seconds(1));
        let completion = self.timer.engine.tick();
        self.timer.ticked_until = self.timer.engine.is_running().then_some(tick_at);
        completion.map(|done| self.record_completion(done, tick_at))
    }

    /// Drive the running timer from a live [`Ticker`] until the phase
    /// completes or `shutdown` resolves. On shutdown the timer is paused so
    /// nothing keeps counting after the caller goes away. Returns the
    /// completion event, if the phase finished.
    pub async fn run_timer<F, P>(
        &mut self,
        period: StdDuration,
        shutdown: F,
        mut on_tick: P,
    ) -> Option<Event>
    where
        F: Future,
        P: FnMut(&TimerSnapshot),
    {
        if !self.timer.engine.is_running() {
            return None;
        }
        let (mut ticker, mut ticks) = Ticker::spawn(period);
        tokio::pin!(shutdown);
        let mut completed = None;
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    self.pause_timer();
                    break;
                }
                signal = ticks.recv() => {
                    if signal.is_none() || !self.timer.engine.is_running() {
                        break;
                    }
                    completed = self.tick();
                    on_tick(&self.timer.engine.snapshot());
                    if !self.timer.engine.is_running() {
                        break;
                    }
                }
            }
        }
        ticker.stop();
        completed
    }

    /// `at` is the instant of the final tick, which is earlier than now
    /// when catching up.
    ///
    /// The log and points total are re-read first, so a wipe made by
    /// another process while this one was counting down sticks.
    fn record_completion(&mut self, done: PhaseCompletion, at: DateTime<Utc>) -> Event {
        let cached = std::mem::take(&mut self.sessions);
        self.sessions = self.reread(StoreKey::PomodoroSessions, cached);
        self.points = self.reread(StoreKey::UserPoints, self.points);

        let session = PomodoroSession {
            id: new_id(),
            duration: done.duration_min,
            kind: done.phase,
            completed_at: at,
        };
        self.sessions.push(session.clone());
        self.store.save(StoreKey::PomodoroSessions, &self.sessions);

        let points_awarded = match done.phase {
            Phase::Focus => POINTS_PER_FOCUS_SESSION,
            Phase::Break => 0,
        };
        if points_awarded > 0 {
            self.points += points_awarded;
            self.store.save(StoreKey::UserPoints, &self.points);
        }
        info!(
            kind = done.phase.as_str(),
            minutes = done.duration_min,
            points = self.points,
            "pomodoro session completed"
        );
        Event::SessionCompleted {
            session,
            points_awarded,
            next_phase: done.next_phase,
            at,
        }
    }

    /// Current stored value of `key`. A missing document reads as empty;
    /// a failed or unreadable read keeps `current`.
    fn reread<T: DeserializeOwned + Default>(&self, key: StoreKey, current: T) -> T {
        match self.store.read(key) {
            Ok(None) => T::default(),
            Ok(Some(value)) => serde_json::from_value(value).unwrap_or_else(|e| {
                warn!(%key, error = %e, "stored document unreadable, keeping cached copy");
                current
            }),
            Err(e) => {
                warn!(%key, error = %e, "store read failed, keeping cached copy");
                current
            }
        }
    }

    fn flush_timer(&mut self) {
        self.store.save(StoreKey::TimerState, &self.timer);
    }

    // ── Stats ────────────────────────────────────────────────────────

    pub fn daily_stats_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> DailyStats {
        DailyStats::compute(&self.tasks, &self.sessions, &self.events, now)
    }

    /// Today's stats, bucketed by UTC date.
    pub fn daily_stats(&self) -> DailyStats {
        self.daily_stats_at(&self.clock.now())
    }

    pub fn overview(&self) -> Overview {
        Overview::compute(
            self.points,
            &self.tasks,
            &self.sessions,
            &self.events,
            &self.flashcards,
            &self.subjects,
        )
    }

    // ── Wipe ─────────────────────────────────────────────────────────

    /// Remove every study-data key and empty the in-memory mirrors. The
    /// user pointer and timer survive. Running it twice leaves the same
    /// state as running it once.
    pub fn wipe(&mut self) -> Event {
        let summary = WipeSummary {
            tasks: self.tasks.len(),
            sessions: self.sessions.len(),
            events: self.events.len(),
            flashcards: self.flashcards.len(),
            subjects: self.subjects.len(),
            points: self.points,
        };
        for key in StoreKey::WIPE_SET {
            self.store.discard(key);
        }
        self.tasks.clear();
        self.sessions.clear();
        self.events.clear();
        self.flashcards.clear();
        self.subjects.clear();
        self.points = 0;
        if self.review.stop().is_some() {
            self.flush_review();
        }
        info!(?summary, "study data wiped");
        Event::DataWiped {
            summary,
            at: self.clock.now(),
        }
    }
}
