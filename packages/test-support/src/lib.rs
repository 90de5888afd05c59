//! Helpers shared by integration tests across the workspace.
//!
//! Unique identifiers come from ULIDs so tests sharing a store or a temp
//! directory never collide.

pub mod logging;

use ulid::Ulid;

/// Generate a unique string with the given prefix
///
/// # Examples
/// ```
/// use test_support::unique_str;
///
/// let id1 = unique_str("tx");
/// let id2 = unique_str("tx");
/// assert_ne!(id1, id2);
/// assert!(id1.starts_with("tx-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Unique profile id, shaped like the ids handed out by the auth provider.
///
/// ```
/// use test_support::unique_profile;
///
/// assert!(unique_profile().starts_with("profile-"));
/// ```
pub fn unique_profile() -> String {
    unique_str("profile")
}

/// File name for a throwaway session document.
pub fn unique_state_file() -> String {
    format!("session-{}.json", Ulid::new().to_string().to_lowercase())
}
