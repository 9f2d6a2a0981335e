use async_trait::async_trait;

use crate::domain::chirp::errors::ChirpError;
use crate::domain::chirp::models::Chirp;
use crate::domain::chirp::models::ChirpId;
use crate::domain::chirp::models::CreateChirpCommand;
use crate::domain::user::models::UserId;

/// Port for chirp domain service operations.
#[async_trait]
pub trait ChirpServicePort: Send + Sync + 'static {
    /// Publish a chirp for its author.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create_chirp(&self, command: CreateChirpCommand) -> Result<Chirp, ChirpError>;

    /// List every chirp, oldest first.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_chirps(&self) -> Result<Vec<Chirp>, ChirpError>;

    /// Retrieve a chirp by identifier.
    ///
    /// # Errors
    /// * `NotFound` - Chirp does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_chirp(&self, id: &ChirpId) -> Result<Chirp, ChirpError>;

    /// Delete a chirp on behalf of `requester`.
    ///
    /// # Errors
    /// * `NotFound` - Chirp does not exist
    /// * `Forbidden` - Chirp was written by someone else
    /// * `DatabaseError` - Database operation failed
    async fn delete_chirp(&self, requester: &UserId, id: &ChirpId) -> Result<(), ChirpError>;

    /// Delete every chirp.
    ///
    /// # Returns
    /// Number of chirps removed
    async fn reset_chirps(&self) -> Result<u64, ChirpError>;
}

/// Persistence operations for chirp aggregate.
#[async_trait]
pub trait ChirpRepository: Send + Sync + 'static {
    /// Persist new chirp.
    async fn create(&self, chirp: Chirp) -> Result<Chirp, ChirpError>;

    /// Retrieve all chirps ordered by creation time, oldest first.
    async fn list_all(&self) -> Result<Vec<Chirp>, ChirpError>;

    /// Retrieve chirp by identifier.
    ///
    /// # Returns
    /// Optional chirp (None if not found)
    async fn find_by_id(&self, id: &ChirpId) -> Result<Option<Chirp>, ChirpError>;

    /// Remove a chirp.
    ///
    /// # Errors
    /// * `NotFound` - Chirp does not exist
    async fn delete(&self, id: &ChirpId) -> Result<(), ChirpError>;

    /// Remove all chirps.
    ///
    /// # Returns
    /// Number of rows removed
    async fn delete_all(&self) -> Result<u64, ChirpError>;
}
