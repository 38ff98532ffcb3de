use crossbeam_channel::{Receiver, Sender};

/// Direct access to the channel underneath a `TimedQueue`.
///
/// Operations on these endpoints bypass deadlines and diagnostics entirely; they act on the same
/// buffer as the timed operations. Clone an endpoint to keep it beyond the borrow of the queue.
///
/// # Examples
///
/// Basic usage:
///
/// ```
/// use timed_queue::TimedQueue;
///
/// let queue = TimedQueue::with_capacity(1);
/// queue.push(12345);
///
/// assert_eq!(queue.raw().receiver().recv().unwrap(), 12345);
/// ```
#[derive(Debug)]
pub struct RawChannel<'a, T> {
    sender: &'a Sender<T>,
    receiver: &'a Receiver<T>,
}

impl<'a, T> RawChannel<'a, T> {
    pub(crate) fn new(sender: &'a Sender<T>, receiver: &'a Receiver<T>) -> RawChannel<'a, T> {
        RawChannel { sender, receiver }
    }

    /// Returns the sending endpoint of the queue.
    pub fn sender(&self) -> &'a Sender<T> {
        self.sender
    }

    /// Returns the receiving endpoint of the queue.
    pub fn receiver(&self) -> &'a Receiver<T> {
        self.receiver
    }
}

impl<'a, T> Clone for RawChannel<'a, T> {
    fn clone(&self) -> RawChannel<'a, T> {
        *self
    }
}

impl<'a, T> Copy for RawChannel<'a, T> {}
