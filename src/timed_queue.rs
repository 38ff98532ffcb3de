use crate::builder::Builder;
use crate::deadline::Deadline;
use crate::diagnostics::{Blocked, Diagnostics};
use crate::raw::RawChannel;
use crossbeam_channel::{bounded, Receiver, Select, Sender, TryRecvError, TrySendError};
use std::backtrace::Backtrace;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// The timeout used by `TimedQueue::push` and `TimedQueue::pop` unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Every queue handle owns both endpoints, so the channel cannot disconnect while it is in use.
const CONNECTED: &str = "timed queue holds both channel endpoints";

/// A concurrent bounded blocking FIFO queue that reports operations blocked past a deadline.
///
/// The queue supports multiple producers and multiple consumers. A push waits while the queue is
/// full and a pop waits while it is empty. If that wait outlives the operation's deadline, the
/// queue reports `Blocked::Push` or `Blocked::Pop` along with the caller's stack to its
/// `Diagnostics` sink, then keeps waiting without a deadline. No operation ever fails or drops an
/// element: the deadline only decides whether the wait gets reported.
///
/// A capacity of zero makes every push a hand-off to a waiting pop.
///
/// # Examples
///
/// Basic usage:
///
/// ```
/// use timed_queue::TimedQueue;
///
/// let queue = TimedQueue::with_capacity(2);
/// queue.push("1st");
/// queue.push("2nd");
///
/// assert_eq!(queue.pop(), "1st");
/// assert_eq!(queue.pop(), "2nd");
/// assert!(queue.is_empty());
/// ```
pub struct TimedQueue<T> {
    /// Points to the data that is shared between instances of the same queue (created by
    /// cloning a queue).
    shared_data: Arc<TimedQueueSharedData<T>>,
}

/// The underlying data of a queue.
struct TimedQueueSharedData<T> {
    sender: Sender<T>,
    receiver: Receiver<T>,
    capacity: usize,
    default_timeout: Duration,
    diagnostics: Arc<dyn Diagnostics>,
}

impl<T> TimedQueue<T> {
    /// Creates an empty `TimedQueue<T>` that can buffer up to `capacity` elements.
    ///
    /// Diagnostics go to `LogDiagnostics`. Use `with_diagnostics` or `Builder` to send them
    /// elsewhere.
    ///
    /// # Examples
    ///
    /// Basic usage:
    ///
    /// ```
    /// use timed_queue::TimedQueue;
    ///
    /// let queue: TimedQueue<i32> = TimedQueue::with_capacity(10);
    /// assert_eq!(queue.len(), 0);
    /// ```
    pub fn with_capacity(capacity: usize) -> TimedQueue<T> {
        Builder::new(capacity).build()
    }

    /// Creates an empty `TimedQueue<T>` that reports to the given `Diagnostics` sink.
    pub fn with_diagnostics(capacity: usize, diagnostics: Arc<dyn Diagnostics>) -> TimedQueue<T> {
        Builder::new(capacity).diagnostics(diagnostics).build()
    }

    pub(crate) fn from_builder(
        capacity: usize,
        default_timeout: Duration,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> TimedQueue<T> {
        let (sender, receiver) = bounded(capacity);
        diagnostics.created(capacity);

        TimedQueue {
            shared_data: Arc::new(TimedQueueSharedData {
                sender,
                receiver,
                capacity,
                default_timeout,
                diagnostics,
            }),
        }
    }

    /// Pushes an item onto the queue, reporting if it is still blocked when `deadline` fires.
    ///
    /// # Examples
    ///
    /// Basic usage:
    ///
    /// ```
    /// use timed_queue::{Deadline, TimedQueue};
    ///
    /// let (deadline, _trigger) = Deadline::manual();
    ///
    /// let queue = TimedQueue::with_capacity(1);
    /// queue.push_until(&deadline, "abc");
    /// ```
    pub fn push_until(&self, deadline: &Deadline, item: T) {
        let shared = &*self.shared_data;

        let item = match shared.sender.try_send(item) {
            Ok(()) => return,
            Err(TrySendError::Full(item)) => item,
            Err(TrySendError::Disconnected(_)) => unreachable!("{}", CONNECTED),
        };

        // Wait for room or the deadline, whichever comes first
        let signal = deadline.signal();
        let mut select = Select::new();
        let send_index = select.send(&shared.sender);
        signal.register(&mut select);

        let operation = select.select();
        if operation.index() == send_index {
            operation.send(&shared.sender, item).expect(CONNECTED);
            return;
        }
        signal.complete(operation);

        // The deadline fired first: report it, then wait for as long as it takes
        self.report(Blocked::Push);
        shared.sender.send(item).expect(CONNECTED);
    }

    /// Pushes an item onto the queue, reporting if it is still blocked after `timeout`.
    ///
    /// # Examples
    ///
    /// Basic usage:
    ///
    /// ```
    /// use timed_queue::TimedQueue;
    /// use std::time::Duration;
    ///
    /// let queue = TimedQueue::with_capacity(1);
    /// queue.push_with_timeout(Duration::from_millis(5), "abc");
    /// ```
    pub fn push_with_timeout(&self, timeout: Duration, item: T) {
        self.push_until(&Deadline::after(timeout), item);
    }

    /// Pushes an item onto the queue, reporting if it is still blocked after the default timeout.
    pub fn push(&self, item: T) {
        self.push_with_timeout(self.shared_data.default_timeout, item);
    }

    /// Pops the oldest item from the queue, reporting if none arrived before `deadline` fires.
    ///
    /// # Examples
    ///
    /// Basic usage:
    ///
    /// ```no_run
    /// use timed_queue::{Deadline, TimedQueue};
    /// use std::time::Duration;
    ///
    /// let queue: TimedQueue<&str> = TimedQueue::with_capacity(1);
    ///
    /// // Blocks until some other thread pushes, reporting once 2 seconds have passed.
    /// println!("First pop: {}", queue.pop_until(&Deadline::after(Duration::from_secs(2))));
    /// ```
    pub fn pop_until(&self, deadline: &Deadline) -> T {
        let shared = &*self.shared_data;

        match shared.receiver.try_recv() {
            Ok(item) => return item,
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => unreachable!("{}", CONNECTED),
        }

        // Wait for an item or the deadline, whichever comes first
        let signal = deadline.signal();
        let mut select = Select::new();
        let recv_index = select.recv(&shared.receiver);
        signal.register(&mut select);

        let operation = select.select();
        if operation.index() == recv_index {
            return operation.recv(&shared.receiver).expect(CONNECTED);
        }
        signal.complete(operation);

        // The deadline fired first: report it, then wait for as long as it takes
        self.report(Blocked::Pop);
        shared.receiver.recv().expect(CONNECTED)
    }

    /// Pops the oldest item from the queue, reporting if none arrived within `timeout`.
    pub fn pop_with_timeout(&self, timeout: Duration) -> T {
        self.pop_until(&Deadline::after(timeout))
    }

    /// Pops the oldest item from the queue, reporting if none arrived within the default timeout.
    pub fn pop(&self) -> T {
        self.pop_with_timeout(self.shared_data.default_timeout)
    }

    /// Returns the number of items in the queue at the moment of the call.
    pub fn len(&self) -> usize {
        self.shared_data.receiver.len()
    }

    /// Checks if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.shared_data.receiver.is_empty()
    }

    /// Returns the maximum number of items the queue buffers.
    pub fn capacity(&self) -> usize {
        self.shared_data.capacity
    }

    /// Returns the timeout used by `push` and `pop`.
    pub fn default_timeout(&self) -> Duration {
        self.shared_data.default_timeout
    }

    /// Returns the raw channel endpoints, which bypass deadlines and diagnostics.
    pub fn raw(&self) -> RawChannel<'_, T> {
        RawChannel::new(&self.shared_data.sender, &self.shared_data.receiver)
    }

    fn report(&self, blocked: Blocked) {
        let stack = Backtrace::force_capture();
        self.shared_data
            .diagnostics
            .blocked(blocked, self.shared_data.capacity, &stack);
    }
}

impl<T> Clone for TimedQueue<T> {
    /// Returns a new `TimedQueue` that points to the same underlying data.
    ///
    /// This method can be used to share a queue between different threads.
    ///
    /// # Examples
    ///
    /// Basic usage:
    ///
    /// ```
    /// use timed_queue::TimedQueue;
    /// use std::thread;
    ///
    /// let queue = TimedQueue::with_capacity(1);
    /// let cloned_queue = queue.clone();
    ///
    /// let handle = thread::spawn(move || {
    ///     assert_eq!(cloned_queue.pop(), "1st");
    ///     assert_eq!(cloned_queue.pop(), "2nd");
    /// });
    ///
    /// queue.push("1st");
    /// queue.push("2nd");
    ///
    /// handle.join().unwrap();
    /// ```
    fn clone(&self) -> TimedQueue<T> {
        TimedQueue {
            shared_data: self.shared_data.clone(),
        }
    }
}

impl<T> fmt::Debug for TimedQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TimedQueue")
            .field("capacity", &self.shared_data.capacity)
            .field("len", &self.len())
            .field("default_timeout", &self.shared_data.default_timeout)
            .finish()
    }
}
