//! One-shot dwell timer.
//!
//! The timer only reports that a delay elapsed for a ticket; deciding whether
//! the ticket still counts is up to the navigation state that issued it.

use std::time::Duration;

use reader_core::navigation::DwellTicket;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// How long a concept must stay active before it counts as read.
pub const DEFAULT_DWELL: Duration = Duration::from_secs(10);

/// Schedules at most one pending dwell at a time.
#[derive(Debug)]
pub struct DwellTimer {
    delay: Duration,
    tx: mpsc::UnboundedSender<DwellTicket>,
    task: Option<JoinHandle<()>>,
}

/// Receiving end of a `DwellTimer`: yields tickets whose delay elapsed.
#[derive(Debug)]
pub struct DwellEvents {
    rx: mpsc::UnboundedReceiver<DwellTicket>,
}

impl DwellEvents {
    /// Waits for the next elapsed ticket. Returns `None` once the timer is gone.
    pub async fn recv(&mut self) -> Option<DwellTicket> {
        self.rx.recv().await
    }
}

/// Creates a timer and its event stream.
#[must_use]
pub fn channel(delay: Duration) -> (DwellTimer, DwellEvents) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        DwellTimer {
            delay,
            tx,
            task: None,
        },
        DwellEvents { rx },
    )
}

impl DwellTimer {
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Starts waiting for `ticket`, aborting whatever was pending.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, ticket: DwellTicket) {
        self.cancel();
        let tx = self.tx.clone();
        let delay = self.delay;
        self.task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The receiver may be gone if the session was dropped mid-wait.
            let _ = tx.send(ticket);
        }));
        debug!(index = ticket.index(), ?delay, "dwell started");
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for DwellTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reader_core::model::{Concept, Item, ItemId};
    use reader_core::navigation::NavigationController;

    fn tickets() -> (DwellTicket, DwellTicket) {
        let items = vec![
            Item::concept(ItemId::new("a"), "A", Concept::default()),
            Item::concept(ItemId::new("b"), "B", Concept::default()),
        ];
        let mut nav = NavigationController::new();
        let first = nav.activate(0, &items).and_then(|a| a.dwell).unwrap();
        let second = nav.activate(1, &items).and_then(|a| a.dwell).unwrap();
        (first, second)
    }

    #[tokio::test(start_paused = true)]
    async fn fires_after_delay() {
        let (mut timer, mut events) = channel(DEFAULT_DWELL);
        let (ticket, _) = tickets();
        timer.start(ticket);
        assert!(timer.is_pending());

        tokio::time::advance(Duration::from_secs(9)).await;
        assert!(events.rx.try_recv().is_err());

        assert_eq!(events.recv().await, Some(ticket));
    }

    #[tokio::test(start_paused = true)]
    async fn restart_replaces_pending_ticket() {
        let (mut timer, mut events) = channel(DEFAULT_DWELL);
        let (first, second) = tickets();
        timer.start(first);
        tokio::time::advance(Duration::from_secs(5)).await;
        timer.start(second);

        assert_eq!(events.recv().await, Some(second));
        tokio::time::advance(Duration::from_secs(30)).await;
        assert!(events.rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_firing() {
        let (mut timer, mut events) = channel(DEFAULT_DWELL);
        let (ticket, _) = tickets();
        timer.start(ticket);
        timer.cancel();
        assert!(!timer.is_pending());

        tokio::time::advance(Duration::from_secs(30)).await;
        assert!(events.rx.try_recv().is_err());
    }
}
