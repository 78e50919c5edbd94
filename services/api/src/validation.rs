//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username is required".to_string());
    }

    if username.len() < 3 {
        return Err("Username must be at least 3 characters long".to_string());
    }

    if username.len() > 32 {
        return Err("Username must be at most 32 characters long".to_string());
    }

    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("Failed to compile username regex"));

    if !regex.is_match(username) {
        return Err("Username can only contain letters, numbers, and underscores".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.len() < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }

    if password.len() > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    Ok(())
}

/// Validate adventurer name
pub fn validate_adventurer_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Adventurer name is required".to_string());
    }

    if name.len() > 64 {
        return Err("Adventurer name must be at most 64 characters long".to_string());
    }

    Ok(())
}

/// Validate save name
pub fn validate_save_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Save name is required".to_string());
    }

    if name.len() > 64 {
        return Err("Save name must be at most 64 characters long".to_string());
    }

    Ok(())
}
