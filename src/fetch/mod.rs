//! Rate-limited, batched fetching against external providers.

pub mod batch;
pub mod limiter;

pub use batch::BatchDriver;
pub use limiter::TokenBucket;
