//! Collision-resistant id generation
//!
//! Random v4 suffixes, never clock-derived: rapid successive calls stay unique.

use uuid::Uuid;

/// `prefix-<32 hex digits>`
pub fn generate_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}
