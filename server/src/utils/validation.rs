use regex::Regex;
use std::sync::OnceLock;

/// Both fields of a login/register body must be present.
pub fn validate_credentials(username: &str, password: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username is required".to_string());
    }
    if password.is_empty() {
        return Err("Password is required".to_string());
    }
    Ok(())
}

/// Validates a username for registration.
///
/// Rules:
/// 1. Between 3 and 32 characters
/// 2. ASCII letters, digits, `_`, `.` and `-` only
///
/// Login doesn't apply these, so accounts created under looser rules can
/// still sign in.
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.len() < 3 {
        return Err("Username must be at least 3 characters long".to_string());
    }
    if username.len() > 32 {
        return Err("Username must be at most 32 characters long".to_string());
    }

    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("username regex"));

    if !re.is_match(username) {
        return Err(
            "Username may only contain letters, digits, underscores, dots and hyphens".to_string(),
        );
    }

    Ok(())
}

/// A project needs a name, and it should fit on a card.
pub fn validate_project_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Project name is required".to_string());
    }
    if name.chars().count() > 128 {
        return Err("Project name must be at most 128 characters long".to_string());
    }
    Ok(())
}
