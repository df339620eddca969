pub mod appointment;
pub mod auth;
pub mod error;
pub mod hospital;
pub mod user;

/// Case-insensitive substring test shared by the search paths.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
