mod account;
pub use account::*;

mod bundler;
pub use bundler::*;

mod config;
pub use config::*;

mod dispatcher;
pub use dispatcher::*;

mod nonce;
pub use nonce::*;

mod provider;
pub use provider::*;

mod repository;
pub use repository::*;
