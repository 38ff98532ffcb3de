use std::backtrace::Backtrace;
use thiserror::Error;

/// The condition reported when a queue operation outlives its deadline.
///
/// `Blocked` is an error type so it can travel through error reporting tooling, but no queue
/// operation ever returns it: after reporting, the operation keeps waiting until it succeeds.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Blocked {
    /// A push waited for free capacity past its deadline.
    #[error("blocked on push")]
    Push,
    /// A pop waited for an element past its deadline.
    #[error("blocked on pop")]
    Pop,
}

impl Blocked {
    /// Returns the name of the blocked operation, `"push"` or `"pop"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Blocked::Push => "push",
            Blocked::Pop => "pop",
        }
    }
}

/// Receives the diagnostics emitted by a `TimedQueue`.
///
/// A sink is handed to the queue at construction, so tests and applications can observe a queue
/// without touching process-wide logging state. `LogDiagnostics` is used when no sink is given.
pub trait Diagnostics: Send + Sync {
    /// Called once when a queue with the given capacity is created.
    fn created(&self, capacity: usize);

    /// Called when an operation on a queue with the given capacity waited past its deadline.
    ///
    /// `stack` is the call stack of the blocked operation.
    fn blocked(&self, blocked: Blocked, capacity: usize, stack: &Backtrace);
}

/// Forwards queue diagnostics to the `log` facade.
///
/// Creation is logged at `info` with a `capacity` field. A blocked operation is logged at `warn`
/// with `capacity` and `blocked` (`"push"` or `"pop"`) fields and the captured stack as the
/// message.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn created(&self, capacity: usize) {
        log::info!(capacity = capacity; "Created timed queue");
    }

    fn blocked(&self, blocked: Blocked, capacity: usize, stack: &Backtrace) {
        log::warn!(capacity = capacity, blocked = blocked.as_str(); "{blocked}\n{stack}");
    }
}

#[cfg(test)]
mod tests {
    use super::{Blocked, Diagnostics, LogDiagnostics};
    use log::kv::{Key, Source};
    use log::{Level, LevelFilter, Log, Metadata, Record};
    use std::backtrace::Backtrace;
    use std::sync::Mutex;

    struct Captured {
        level: Level,
        capacity: Option<String>,
        blocked: Option<String>,
        message: String,
    }

    struct CapturingLogger {
        records: Mutex<Vec<Captured>>,
    }

    impl Log for CapturingLogger {
        fn enabled(&self, _: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &Record) {
            let field = |name: &str| {
                record
                    .key_values()
                    .get(Key::from(name))
                    .map(|value| value.to_string())
            };

            self.records.lock().unwrap().push(Captured {
                level: record.level(),
                capacity: field("capacity"),
                blocked: field("blocked"),
                message: record.args().to_string(),
            });
        }

        fn flush(&self) {}
    }

    static LOGGER: CapturingLogger = CapturingLogger {
        records: Mutex::new(Vec::new()),
    };

    #[test]
    fn blocked_display() {
        assert_eq!(Blocked::Push.to_string(), "blocked on push");
        assert_eq!(Blocked::Pop.to_string(), "blocked on pop");
        assert_eq!(Blocked::Push.as_str(), "push");
        assert_eq!(Blocked::Pop.as_str(), "pop");
    }

    // The only test in this crate that installs a logger.
    #[test]
    fn log_diagnostics_emits_structured_records() {
        log::set_logger(&LOGGER).unwrap();
        log::set_max_level(LevelFilter::Trace);

        LogDiagnostics.created(7919);
        LogDiagnostics.blocked(Blocked::Pop, 7919, &Backtrace::force_capture());

        let records = LOGGER.records.lock().unwrap();
        let ours: Vec<&Captured> = records
            .iter()
            .filter(|record| record.capacity.as_deref() == Some("7919"))
            .collect();

        assert_eq!(ours.len(), 2);

        assert_eq!(ours[0].level, Level::Info);
        assert_eq!(ours[0].blocked, None);

        assert_eq!(ours[1].level, Level::Warn);
        assert_eq!(ours[1].blocked.as_deref(), Some("pop"));
        assert!(ours[1].message.starts_with("blocked on pop"));
    }
}
