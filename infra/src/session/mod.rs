//! Session store implementations
//!
//! Both stores hand out a fresh, empty session (with a new id) when the
//! requested id is absent, unknown or expired, and keep a saved session for
//! `options.max_age` seconds.

pub mod memory;
#[cfg(feature = "redis-cache")]
pub mod redis_store;

#[cfg(test)]
mod tests;

pub use memory::MemorySessionStore;
#[cfg(feature = "redis-cache")]
pub use redis_store::RedisSessionStore;
