//! Live clock driver.
//!
//! A [`Ticker`] owns a tokio task that sends one signal per period. It never
//! touches engine state: the owner receives the signals and applies ticks on
//! its own task, so all mutation stays on a single logical thread. Stopping
//! or dropping the ticker aborts the task.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

pub struct Ticker {
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Spawn a ticker on the current runtime. The first signal arrives one
    /// `period` after spawning.
    pub fn spawn(period: Duration) -> (Self, mpsc::Receiver<Instant>) {
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
            loop {
                let at = interval.tick().await;
                if tx.send(at).await.is_err() {
                    break;
                }
            }
        });
        (
            Self {
                handle: Some(handle),
            },
            rx,
        )
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn signals_once_per_period() {
        let (_ticker, mut rx) = Ticker::spawn(Duration::from_secs(1));
        let start = Instant::now();
        for i in 1..=3u64 {
            let at = rx.recv().await.unwrap();
            assert_eq!(at - start, Duration::from_secs(i));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn stop_closes_the_channel() {
        let (mut ticker, mut rx) = Ticker::spawn(Duration::from_secs(1));
        rx.recv().await.unwrap();
        ticker.stop();
        assert!(ticker.is_stopped());
        // Drain anything buffered before the abort, then the channel ends.
        while rx.recv().await.is_some() {}
    }

    #[tokio::test(start_paused = true)]
    async fn drop_aborts_the_task() {
        let (ticker, mut rx) = Ticker::spawn(Duration::from_secs(1));
        drop(ticker);
        while rx.recv().await.is_some() {}
    }
}
