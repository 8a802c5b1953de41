//! Runs one tool job on a background thread.
//!
//! The job owns its parameters and a [`Sender`]. The caller keeps the receiving end
//! and renders events as they arrive. Every job ends with exactly one terminal event.

use std::fmt;
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

/// Messages sent from a running job to the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Log text, one or more lines.
    Log(String),
    Progress { current: usize, total: usize },
    /// Successful end of a run. `succeeded` counts every item that reached the writer.
    Finished { succeeded: usize, total: usize },
    /// Run aborted with an error message.
    Failed(String),
}

impl Event {
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished { .. } | Self::Failed(_))
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Log(text) => write!(f, "{text}"),
            Self::Progress { current, total } => write!(f, "Progress {current}/{total}"),
            Self::Finished { succeeded, total } => write!(f, "Finished: {succeeded}/{total}"),
            Self::Failed(message) => write!(f, "Failed: {message}"),
        }
    }
}

/// Work that can be moved to the worker thread.
pub trait Job: Send + 'static {
    /// Run to completion, reporting through `events`.
    ///
    /// Must send exactly one terminal event as the last message.
    fn execute(self, events: &Sender<Event>);
}

/// Handle to a running job.
pub struct WorkerHandle {
    receiver: Receiver<Event>,
    thread: JoinHandle<()>,
}

/// Start `job` on a new thread.
///
/// # Errors
/// Returns an error if the operating system refuses to create the thread.
pub fn spawn<J: Job>(job: J) -> io::Result<WorkerHandle> {
    let (sender, receiver) = mpsc::channel();
    let thread = thread::Builder::new()
        .name("file-tools-worker".to_string())
        .spawn(move || job.execute(&sender))?;

    Ok(WorkerHandle { receiver, thread })
}

impl WorkerHandle {
    /// Pass every event to `on_event` until the job ends, then return the terminal event.
    ///
    /// A job that stops without a terminal event, for example after a panic,
    /// gives a `Failed` event.
    pub fn wait(self, mut on_event: impl FnMut(&Event)) -> Event {
        let mut terminal = None;
        for event in &self.receiver {
            on_event(&event);
            if event.is_terminal() {
                terminal = Some(event);
                break;
            }
        }

        let panicked = self.thread.join().is_err();
        terminal.unwrap_or_else(|| {
            let event = Event::Failed(if panicked {
                "Worker thread panicked".to_string()
            } else {
                "Worker stopped without a result".to_string()
            });
            on_event(&event);
            event
        })
    }

    /// Wait for the terminal event, discarding everything else.
    #[must_use]
    pub fn join(self) -> Event {
        self.wait(|_| {})
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter(usize);

    impl Job for Counter {
        fn execute(self, events: &Sender<Event>) {
            for current in 1..=self.0 {
                let _ = events.send(Event::Progress {
                    current,
                    total: self.0,
                });
            }
            let _ = events.send(Event::Finished {
                succeeded: self.0,
                total: self.0,
            });
        }
    }

    struct Silent;

    impl Job for Silent {
        fn execute(self, _events: &Sender<Event>) {}
    }

    #[test]
    fn events_arrive_in_order() {
        let handle = spawn(Counter(3)).unwrap();
        let mut seen = Vec::new();
        let terminal = handle.wait(|event| seen.push(event.clone()));

        assert_eq!(terminal, Event::Finished { succeeded: 3, total: 3 });
        assert_eq!(seen.len(), 4);
        assert_eq!(seen[0], Event::Progress { current: 1, total: 3 });
        assert_eq!(seen.iter().filter(|event| event.is_terminal()).count(), 1);
    }

    #[test]
    fn missing_terminal_event_is_failure() {
        let terminal = spawn(Silent).unwrap().join();
        assert!(matches!(terminal, Event::Failed(_)));
    }

    #[test]
    fn terminal_events() {
        assert!(Event::Failed("x".to_string()).is_terminal());
        assert!(!Event::Log("x".to_string()).is_terminal());
        assert!(!Event::Progress { current: 0, total: 0 }.is_terminal());
    }
}
