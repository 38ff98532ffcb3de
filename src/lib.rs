//! A concurrent bounded blocking queue whose push and pop operations report, but never abandon,
//! a wait that outlives its deadline.

#![warn(missing_docs)]

mod builder;
mod deadline;
mod diagnostics;
mod raw;
mod timed_queue;

pub use builder::Builder;
pub use deadline::{Deadline, DeadlineTrigger};
pub use diagnostics::{Blocked, Diagnostics, LogDiagnostics};
pub use raw::RawChannel;
pub use timed_queue::{TimedQueue, DEFAULT_TIMEOUT};
