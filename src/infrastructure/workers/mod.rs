pub mod job_poller;

pub use job_poller::*;
