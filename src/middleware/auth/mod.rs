pub mod role;
pub mod token_gate;

pub use role::{RequiredRole, require_role};
