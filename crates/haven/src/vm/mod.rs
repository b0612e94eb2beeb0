//! Per-screen view-models. Each one is created fresh when its screen appears,
//! owns its state enum, and talks to the vault through an injected
//! [`VaultApi`](haven_backend::VaultApi) plus an
//! [`AuthTokenProvider`](haven_backend::AuthTokenProvider).

mod backups;
mod credential_backup;
mod handler_detail;
mod invitation;
mod profile;

#[cfg(test)]
pub(crate) mod testing;

pub use backups::{BackupListModel, BackupListState};
pub use credential_backup::{CredentialBackupModel, CredentialBackupState};
pub use handler_detail::{HandlerDetailModel, HandlerDetailState};
pub use invitation::{CreateInvitationModel, InvitationState};
pub use profile::{ProfileModel, ProfileState};

use std::sync::Arc;

use haven_backend::{AuthTokenProvider, VaultApi};

use crate::settings::ClientSettings;

/// Message every operation surfaces when no session token is available.
pub const NOT_AUTHENTICATED: &str = "Not authenticated";

pub(crate) fn require_token(auth: &dyn AuthTokenProvider) -> Result<String, String> {
    auth.token().ok_or_else(|| NOT_AUTHENTICATED.to_string())
}

/// Builds a fresh view-model per screen visit, wiring each one to the shared
/// API client, session and settings.
pub struct Screens {
    api: Arc<dyn VaultApi>,
    auth: Arc<dyn AuthTokenProvider>,
    settings: ClientSettings,
}

impl Screens {
    #[must_use]
    pub fn new(
        api: Arc<dyn VaultApi>,
        auth: Arc<dyn AuthTokenProvider>,
        settings: ClientSettings,
    ) -> Self {
        Self {
            api,
            auth,
            settings,
        }
    }

    #[must_use]
    pub fn backups(&self) -> BackupListModel {
        BackupListModel::new(self.api.clone(), self.auth.clone())
            .with_fetch_timeout(self.settings.fetch_timeout())
    }

    #[must_use]
    pub fn invitation(&self) -> CreateInvitationModel {
        CreateInvitationModel::new(self.api.clone(), self.auth.clone())
    }

    #[must_use]
    pub fn credential_backup(&self) -> CredentialBackupModel {
        CredentialBackupModel::new(self.api.clone(), self.auth.clone())
            .with_phrase_settings(self.settings.phrase_word_count, self.settings.challenge_size)
            .with_upload_timeout(self.settings.upload_timeout())
    }

    #[must_use]
    pub fn handler_detail(&self, handler_id: impl Into<String>) -> HandlerDetailModel {
        HandlerDetailModel::new(self.api.clone(), self.auth.clone(), handler_id)
            .with_fetch_timeout(self.settings.fetch_timeout())
    }

    #[must_use]
    pub fn profile(&self) -> ProfileModel {
        ProfileModel::new(self.api.clone(), self.auth.clone())
            .with_fetch_timeout(self.settings.fetch_timeout())
    }
}
