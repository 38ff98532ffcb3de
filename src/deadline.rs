use crossbeam_channel::{at, bounded, never, Receiver, Select, SelectedOperation, Sender, TryRecvError};
use std::time::{Duration, Instant};

/// Signals when a blocked push or pop has waited long enough to be reported.
///
/// A `Deadline` never cancels an operation. When it fires while a `TimedQueue` operation is
/// still waiting, the queue reports the condition to its `Diagnostics` sink and keeps waiting.
///
/// Once fired, a deadline stays fired, so the same `Deadline` can be passed to any number of
/// operations.
///
/// # Examples
///
/// Basic usage:
///
/// ```
/// use timed_queue::Deadline;
/// use std::time::{Duration, Instant};
///
/// let in_one_hour = Deadline::after(Duration::from_secs(3600));
/// let already_passed = Deadline::at(Instant::now());
///
/// assert!(!in_one_hour.has_fired());
/// assert!(already_passed.has_fired());
/// assert!(!Deadline::never().has_fired());
/// ```
#[derive(Debug, Clone)]
pub struct Deadline {
    kind: Kind,
}

#[derive(Debug, Clone)]
enum Kind {
    At(Instant),
    Never,
    /// Nothing is ever sent on this channel. It fires by disconnecting when the
    /// `DeadlineTrigger` holding the sender goes away.
    Manual(Receiver<()>),
}

/// Fires the `Deadline` it was created with by `Deadline::manual`.
///
/// Dropping the trigger fires the deadline too.
#[derive(Debug)]
pub struct DeadlineTrigger {
    sender: Sender<()>,
}

impl Deadline {
    /// Creates a `Deadline` that fires when the given `Instant` is reached.
    ///
    /// # Examples
    ///
    /// Basic usage:
    ///
    /// ```
    /// use timed_queue::Deadline;
    /// use std::time::{Duration, Instant};
    ///
    /// let deadline = Deadline::at(Instant::now() + Duration::from_millis(10));
    /// ```
    pub fn at(instant: Instant) -> Deadline {
        Deadline {
            kind: Kind::At(instant),
        }
    }

    /// Creates a `Deadline` that fires once the given `Duration` has elapsed.
    ///
    /// A duration too large to be represented as an `Instant` gives a deadline that never fires.
    ///
    /// # Examples
    ///
    /// Basic usage:
    ///
    /// ```
    /// use timed_queue::Deadline;
    /// use std::time::Duration;
    ///
    /// let deadline = Deadline::after(Duration::from_secs(1));
    /// ```
    pub fn after(duration: Duration) -> Deadline {
        Instant::now()
            .checked_add(duration)
            .map_or_else(Deadline::never, Deadline::at)
    }

    /// Creates a `Deadline` that never fires.
    pub fn never() -> Deadline {
        Deadline { kind: Kind::Never }
    }

    /// Creates a `Deadline` that fires on request, together with the trigger that fires it.
    ///
    /// # Examples
    ///
    /// Basic usage:
    ///
    /// ```
    /// use timed_queue::Deadline;
    ///
    /// let (deadline, trigger) = Deadline::manual();
    /// assert!(!deadline.has_fired());
    ///
    /// trigger.fire();
    /// assert!(deadline.has_fired());
    /// ```
    pub fn manual() -> (Deadline, DeadlineTrigger) {
        let (sender, receiver) = bounded(0);
        let deadline = Deadline {
            kind: Kind::Manual(receiver),
        };

        (deadline, DeadlineTrigger { sender })
    }

    /// Checks, without blocking, whether the deadline has fired.
    pub fn has_fired(&self) -> bool {
        match &self.kind {
            Kind::At(instant) => Instant::now() >= *instant,
            Kind::Never => false,
            Kind::Manual(receiver) => matches!(receiver.try_recv(), Err(TryRecvError::Disconnected)),
        }
    }

    /// Returns a signal that can take part in a `Select` alongside a queue operation.
    pub(crate) fn signal(&self) -> Signal<'_> {
        match &self.kind {
            Kind::At(instant) => Signal::Timer(at(*instant)),
            Kind::Never => Signal::Timer(never()),
            Kind::Manual(receiver) => Signal::Manual(receiver),
        }
    }
}

impl Default for Deadline {
    /// Creates a `Deadline` that never fires.
    fn default() -> Deadline {
        Deadline::never()
    }
}

impl DeadlineTrigger {
    /// Fires the paired `Deadline`.
    pub fn fire(self) {
        drop(self.sender);
    }
}

/// A selectable view of a `Deadline`.
///
/// Timers are created per wait, so an `At` deadline that already passed is ready immediately.
pub(crate) enum Signal<'a> {
    Timer(Receiver<Instant>),
    Manual(&'a Receiver<()>),
}

impl<'a> Signal<'a> {
    /// Adds the signal to `select` and returns its operation index.
    pub(crate) fn register<'s>(&'s self, select: &mut Select<'s>) -> usize {
        match self {
            Signal::Timer(receiver) => select.recv(receiver),
            Signal::Manual(receiver) => select.recv(*receiver),
        }
    }

    /// Completes a selected operation on this signal.
    pub(crate) fn complete(&self, operation: SelectedOperation<'_>) {
        // A tick and a disconnected trigger both mean the deadline fired.
        match self {
            Signal::Timer(receiver) => {
                let _ = operation.recv(receiver);
            }
            Signal::Manual(receiver) => {
                let _ = operation.recv(*receiver);
            }
        }
    }
}
