pub mod provider;
pub use provider::*;

pub mod bundler;
pub use bundler::*;

pub mod paymaster;
pub use paymaster::*;

pub mod account;
pub use account::*;

pub mod nonce;
pub use nonce::*;

pub mod dispatcher;
pub use dispatcher::*;
