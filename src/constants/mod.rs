//! This module contains all the constant values used in the system
mod relay;
pub use relay::*;
