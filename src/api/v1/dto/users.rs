/*
 * Responsibility
 * - Users の request/response DTO
 * - validate() で形式チェック (name 必須 / 制御文字・markup 禁止 / age 範囲)
 */
use serde::{Deserialize, Serialize};

use crate::repos::User;

pub const MIN_AGE: i32 = 18;
pub const MAX_AGE: i32 = 100;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub age: i32,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_name(&self.name)?;
        validate_age(self.age)
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    // None: keep the current name
    pub name: Option<String>,
    pub age: i32,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        validate_age(self.age)
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub name: String,
    pub age: i32,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            name: u.name,
            age: u.age,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn validate_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Name is required.");
    }
    if name.chars().any(char::is_control) {
        return Err("Name must not contain control characters.");
    }
    if contains_markup(name) {
        return Err("Name must not contain script or iframe markup.");
    }
    Ok(())
}

fn validate_age(age: i32) -> Result<(), &'static str> {
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err("Age must be between 18 and 100.");
    }
    Ok(())
}

/// `<script` / `<iframe`, case-insensitive, whitespace after `<` ignored.
fn contains_markup(input: &str) -> bool {
    let lower = input.to_ascii_lowercase();

    lower.match_indices('<').any(|(i, _)| {
        let rest = lower[i + 1..].trim_start();
        rest.starts_with("script") || rest.starts_with("iframe")
    })
}
