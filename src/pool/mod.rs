//! # Pool de Workers
//!
//! Un conjunto fijo de threads que drenan una cola FIFO compartida.
//!
//! ```text
//! Acceptor ──enqueue──► TaskQueue ──pop──► worker-0 .. worker-N
//! ```

pub mod queue;
pub mod task;
pub mod worker_pool;

pub use queue::TaskQueue;
pub use task::{Task, TaskError, TaskResult};
pub use worker_pool::WorkerPool;
