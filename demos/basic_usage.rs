use std::thread;
use std::time::Duration;
use timed_queue::TimedQueue;

// Run with `RUST_LOG=info` to see the creation record and the blocked-push warning.
fn main() {
    env_logger::init();

    let queue: TimedQueue<&str> = TimedQueue::with_capacity(1);

    // Clone the queue and move it to the producer thread
    let producer_queue = queue.clone();
    let producer_handle = thread::spawn(move || {
        producer_queue.push("1st");

        // The queue is full until the consumer wakes up, so this push is reported after 100ms
        // and then completes once there is room
        producer_queue.push_with_timeout(Duration::from_millis(100), "2nd");
    });

    // Clone the queue and move it to the consumer thread
    let consumer_queue = queue.clone();
    let consumer_handle = thread::spawn(move || {
        thread::sleep(Duration::from_millis(500));

        println!("First pop: {}", consumer_queue.pop()); // Prints "First pop: 1st"
        println!("Second pop: {}", consumer_queue.pop()); // Prints "Second pop: 2nd"
    });

    producer_handle.join().unwrap();
    consumer_handle.join().unwrap();

    assert!(queue.is_empty());
}
