//! Transaction Relay Dispatcher Library
//!
//! This library provides functionality for submitting user operations on
//! behalf of a sponsored smart account through a remote bundler/paymaster
//! pair. It includes:
//!
//! - Lazily constructed, process-wide client handles (chain query, paymaster,
//!   bundler, sponsored account)
//! - Externally persisted per-account nonce allocation
//! - A submission pipeline with receipt polling and bounded retries
//! - Sequential, parallel and batched dispatch strategies
//!
//! # Module Structure
//!
//! - `config`: Environment-driven configuration
//! - `constants`: Polling intervals, timeouts and retry budgets
//! - `logging`: Logging setup with file rolling
//! - `models`: Call descriptors, operation wire types and error taxonomy
//! - `repositories`: Nonce counter storage (in-memory and Redis)
//! - `services`: Clients, the nonce allocator and the dispatcher itself

pub mod config;
pub mod constants;
pub mod logging;
pub mod models;
pub mod repositories;
pub mod services;
