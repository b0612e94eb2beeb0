use async_trait::async_trait;

use crate::error::ApiError;
use crate::types::{
    Backup, EncryptedCredentialBackup, HandlerDetail, Invitation, Profile, ProfileUpdate,
};

/// The authenticated vault API as seen by the client. Every operation takes
/// the bearer token already resolved by the caller; providers never consult
/// session state themselves.
#[async_trait]
pub trait VaultApi: Send + Sync {
    async fn list_backups(&self, token: &str) -> Result<Vec<Backup>, ApiError>;

    async fn delete_backup(&self, token: &str, id: &str) -> Result<(), ApiError>;

    async fn create_invitation(&self, token: &str) -> Result<Invitation, ApiError>;

    async fn upload_credential_backup(
        &self,
        token: &str,
        backup: &EncryptedCredentialBackup,
    ) -> Result<(), ApiError>;

    async fn fetch_credential_backup(
        &self,
        token: &str,
    ) -> Result<EncryptedCredentialBackup, ApiError>;

    async fn handler_detail(&self, token: &str, id: &str) -> Result<HandlerDetail, ApiError>;

    async fn install_handler(&self, token: &str, id: &str) -> Result<(), ApiError>;

    async fn uninstall_handler(&self, token: &str, id: &str) -> Result<(), ApiError>;

    async fn fetch_profile(&self, token: &str) -> Result<Profile, ApiError>;

    async fn update_profile(
        &self,
        token: &str,
        update: &ProfileUpdate,
    ) -> Result<Profile, ApiError>;
}
