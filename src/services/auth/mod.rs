pub mod credentials;
pub mod token_codec;

pub use credentials::CredentialTable;
pub use token_codec::{Claims, TokenCodec, TokenError, TokenSettings, ValidationPolicy};
