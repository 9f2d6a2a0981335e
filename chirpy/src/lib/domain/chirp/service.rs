use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::chirp::errors::ChirpError;
use crate::domain::chirp::models::Chirp;
use crate::domain::chirp::models::ChirpId;
use crate::domain::chirp::models::CreateChirpCommand;
use crate::domain::chirp::ports::ChirpRepository;
use crate::domain::chirp::ports::ChirpServicePort;
use crate::domain::user::models::UserId;

/// Domain service for chirp operations.
pub struct ChirpService<CR>
where
    CR: ChirpRepository,
{
    repository: Arc<CR>,
}

impl<CR> ChirpService<CR>
where
    CR: ChirpRepository,
{
    pub fn new(repository: Arc<CR>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<CR> ChirpServicePort for ChirpService<CR>
where
    CR: ChirpRepository,
{
    async fn create_chirp(&self, command: CreateChirpCommand) -> Result<Chirp, ChirpError> {
        let now = Utc::now();
        let chirp = Chirp {
            id: ChirpId::new(),
            body: command.body,
            user_id: command.author,
            created_at: now,
            updated_at: now,
        };

        let chirp = self.repository.create(chirp).await?;
        tracing::info!(chirp_id = %chirp.id, user_id = %chirp.user_id, "Chirp created");

        Ok(chirp)
    }

    async fn list_chirps(&self) -> Result<Vec<Chirp>, ChirpError> {
        self.repository.list_all().await
    }

    async fn get_chirp(&self, id: &ChirpId) -> Result<Chirp, ChirpError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ChirpError::NotFound(id.to_string()))
    }

    async fn delete_chirp(&self, requester: &UserId, id: &ChirpId) -> Result<(), ChirpError> {
        let chirp = self.get_chirp(id).await?;

        if chirp.user_id != *requester {
            tracing::warn!(
                chirp_id = %id,
                requester = %requester,
                "Refusing to delete another user's chirp"
            );
            return Err(ChirpError::Forbidden(id.to_string()));
        }

        self.repository.delete(id).await?;
        tracing::info!(chirp_id = %id, user_id = %requester, "Chirp deleted");

        Ok(())
    }

    async fn reset_chirps(&self) -> Result<u64, ChirpError> {
        let removed = self.repository.delete_all().await?;
        tracing::warn!(removed, "All chirps deleted");

        Ok(removed)
    }
}
