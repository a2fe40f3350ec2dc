pub mod claims;
pub mod password;
pub mod token;

pub use claims::Claims;
pub use password::{PasswordError, PasswordHasher};
pub use token::{TokenCodec, TokenConfig, TokenError};
