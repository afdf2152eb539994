//! Credential hashing, bearer tokens and the ownership guard.

pub mod guard;
pub mod password;
pub mod token;

pub use guard::{Access, authorize_ownership, scope_filter_for};
pub use password::{HashError, hash_password, verify_dummy, verify_password};
pub use token::{Claims, TokenError, issue_token, validate_token};
