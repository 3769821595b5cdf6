//! Storage layer for the per-account nonce counter.
//!
//! The counter is the one piece of state in this crate that requires strict
//! mutual exclusion. Both implementations provide an atomic
//! increment-and-return primitive; nothing here caches or mirrors the
//! counter locally.

mod redis_base;
pub use redis_base::*;

mod nonce_counter;
pub use nonce_counter::*;
