mod auth;
mod error;
mod traits;
mod types;

pub use auth::AuthTokenProvider;
pub use error::{ApiError, NetworkStage};
pub use traits::VaultApi;
pub use types::{
    Backup, BackupGroup, BackupKind, BackupStatus, EncryptedCredentialBackup, HandlerDetail,
    Invitation, Profile, ProfileUpdate,
};
