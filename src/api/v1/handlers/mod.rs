pub mod auth;
pub mod fallback;
pub mod health;
pub mod secure;
pub mod users;
