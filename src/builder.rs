use crate::diagnostics::{Diagnostics, LogDiagnostics};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use crate::timed_queue::{TimedQueue, DEFAULT_TIMEOUT};

/// Configures a `TimedQueue` before it is created.
///
/// # Examples
///
/// Basic usage:
///
/// ```
/// use timed_queue::{Builder, LogDiagnostics, TimedQueue};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let queue: TimedQueue<String> = Builder::new(16)
///     .default_timeout(Duration::from_millis(250))
///     .diagnostics(Arc::new(LogDiagnostics))
///     .build();
///
/// assert_eq!(queue.capacity(), 16);
/// assert_eq!(queue.default_timeout(), Duration::from_millis(250));
/// ```
#[derive(Clone)]
pub struct Builder {
    capacity: usize,
    default_timeout: Duration,
    diagnostics: Arc<dyn Diagnostics>,
}

impl Builder {
    /// Starts configuring a queue that buffers up to `capacity` elements.
    ///
    /// The default timeout is `DEFAULT_TIMEOUT` and diagnostics go to `LogDiagnostics`.
    pub fn new(capacity: usize) -> Builder {
        Builder {
            capacity,
            default_timeout: DEFAULT_TIMEOUT,
            diagnostics: Arc::new(LogDiagnostics),
        }
    }

    /// Sets the timeout used by `TimedQueue::push` and `TimedQueue::pop`.
    pub fn default_timeout(mut self, timeout: Duration) -> Builder {
        self.default_timeout = timeout;
        self
    }

    /// Sets the sink that receives the queue's diagnostics.
    pub fn diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Builder {
        self.diagnostics = diagnostics;
        self
    }

    /// Creates the queue, reporting its capacity to the diagnostics sink.
    pub fn build<T>(self) -> TimedQueue<T> {
        TimedQueue::from_builder(self.capacity, self.default_timeout, self.diagnostics)
    }
}

impl fmt::Debug for Builder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Builder")
            .field("capacity", &self.capacity)
            .field("default_timeout", &self.default_timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::Builder;
    use std::time::Duration;
    use crate::timed_queue::{TimedQueue, DEFAULT_TIMEOUT};

    #[test]
    fn defaults() {
        let queue: TimedQueue<u8> = Builder::new(3).build();

        assert_eq!(queue.capacity(), 3);
        assert_eq!(queue.default_timeout(), DEFAULT_TIMEOUT);
        assert_eq!(DEFAULT_TIMEOUT, Duration::from_secs(1));
    }

    #[test]
    fn zero_capacity_is_allowed() {
        let queue: TimedQueue<u8> = Builder::new(0).build();

        assert_eq!(queue.capacity(), 0);
        assert!(queue.is_empty());
    }
}
