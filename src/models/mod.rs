mod call;
pub use call::*;

mod secret_string;
pub use secret_string::*;

mod user_operation;
pub use user_operation::*;

mod error;
pub use error::*;
