//! Request pacing shared by every fetch in a run.

mod limiter;

pub use limiter::RateLimiter;
