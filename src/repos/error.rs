/**
 * Responsibility
 * - repo が上位に伝える意味の定義
 */
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepoError {
    #[error("User '{0}' already exists.")]
    Conflict(String),
    #[error("User '{0}' not found")]
    NotFound(String),
}
