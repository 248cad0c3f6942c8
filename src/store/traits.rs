//! `ProfileStore` trait: the single async interface for profile persistence.

use async_trait::async_trait;

use crate::career::model::UserProfile;
use crate::error::DatabaseError;

/// Durable mapping from user id to that user's last committed profile.
///
/// Implementations serialize conflicting writes to the same key; callers do
/// no locking of their own.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Insert or fully replace the profile for `profile.user_id`.
    async fn upsert_profile(&self, profile: &UserProfile) -> Result<(), DatabaseError>;

    /// Fetch the committed profile. `Ok(None)` means the user never finished
    /// the dialogue.
    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, DatabaseError>;

    /// Remove a profile. Returns whether a row was deleted.
    async fn delete_profile(&self, user_id: &str) -> Result<bool, DatabaseError>;
}
