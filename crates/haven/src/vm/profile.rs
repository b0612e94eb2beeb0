use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use log::debug;

use haven_backend::{AuthTokenProvider, Profile, ProfileUpdate, VaultApi};

use super::require_token;
use crate::async_util::run_with_timeout;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProfileState {
    #[default]
    Loading,
    Loaded(Profile),
    Error(String),
}

/// State holder for the account profile screen.
pub struct ProfileModel {
    api: Arc<dyn VaultApi>,
    auth: Arc<dyn AuthTokenProvider>,
    fetch_timeout: Option<Duration>,
    pub state: ProfileState,
    pub is_saving: bool,
}

impl fmt::Debug for ProfileModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileModel")
            .field("state", &self.state)
            .field("is_saving", &self.is_saving)
            .finish_non_exhaustive()
    }
}

impl ProfileModel {
    #[must_use]
    pub fn new(api: Arc<dyn VaultApi>, auth: Arc<dyn AuthTokenProvider>) -> Self {
        Self {
            api,
            auth,
            fetch_timeout: None,
            state: ProfileState::default(),
            is_saving: false,
        }
    }

    #[must_use]
    pub fn with_fetch_timeout(mut self, limit: Duration) -> Self {
        self.fetch_timeout = Some(limit);
        self
    }

    pub async fn load(&mut self) {
        self.state = ProfileState::Loading;
        let outcome = async {
            let token = require_token(self.auth.as_ref())?;
            match self.fetch_timeout {
                Some(limit) => {
                    run_with_timeout(limit, "profile fetch", self.api.fetch_profile(&token)).await
                }
                None => self
                    .api
                    .fetch_profile(&token)
                    .await
                    .map_err(|error| error.to_string()),
            }
        }
        .await;

        self.state = match outcome {
            Ok(profile) => ProfileState::Loaded(profile),
            Err(message) => ProfileState::Error(message),
        };
    }

    /// Push a patch to the server; the returned record becomes the new state.
    pub async fn save(&mut self, update: ProfileUpdate) {
        if self.is_saving {
            return;
        }
        if update.is_empty() {
            debug!("profile save skipped: empty update");
            return;
        }

        self.is_saving = true;
        let outcome = async {
            let token = require_token(self.auth.as_ref())?;
            self.api
                .update_profile(&token, &update)
                .await
                .map_err(|error| error.to_string())
        }
        .await;
        self.is_saving = false;

        self.state = match outcome {
            Ok(profile) => ProfileState::Loaded(profile),
            Err(message) => ProfileState::Error(message),
        };
    }

    pub fn reset(&mut self) {
        self.state = ProfileState::Loading;
        self.is_saving = false;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use haven_backend::{ApiError, ProfileUpdate};

    use super::*;
    use crate::vm::testing::{StubApi, authed, signed_out};

    #[test]
    fn starts_loading_with_no_busy_flag() {
        let vm = ProfileModel::new(Arc::new(StubApi::new()), authed());
        assert_eq!(vm.state, ProfileState::Loading);
        assert!(!vm.is_saving);
    }

    #[tokio::test]
    async fn load_without_token_reports_not_authenticated() {
        let api = Arc::new(StubApi::new());
        let mut vm = ProfileModel::new(api.clone(), signed_out());

        vm.load().await;

        assert_eq!(vm.state, ProfileState::Error("Not authenticated".to_string()));
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn load_surfaces_the_account_profile() {
        let mut vm = ProfileModel::new(Arc::new(StubApi::new()), authed());

        vm.load().await;

        match &vm.state {
            ProfileState::Loaded(profile) => assert_eq!(profile.display_name, "Ada"),
            other => panic!("expected Loaded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn save_applies_the_patch_and_keeps_untouched_fields() {
        let mut vm = ProfileModel::new(Arc::new(StubApi::new()), authed());

        vm.load().await;
        vm.save(ProfileUpdate {
            bio: Some("Keeper of receipts".to_string()),
            ..ProfileUpdate::default()
        })
        .await;

        assert!(!vm.is_saving);
        match &vm.state {
            ProfileState::Loaded(profile) => {
                assert_eq!(profile.display_name, "Ada");
                assert_eq!(profile.bio.as_deref(), Some("Keeper of receipts"));
            }
            other => panic!("expected Loaded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn save_without_token_reports_not_authenticated() {
        let api = Arc::new(StubApi::new());
        let mut vm = ProfileModel::new(api.clone(), signed_out());

        vm.save(ProfileUpdate {
            display_name: Some("Grace".to_string()),
            ..ProfileUpdate::default()
        })
        .await;

        assert_eq!(vm.state, ProfileState::Error("Not authenticated".to_string()));
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn empty_update_is_not_sent() {
        let api = Arc::new(StubApi::new());
        let mut vm = ProfileModel::new(api.clone(), authed());

        vm.save(ProfileUpdate::default()).await;

        assert_eq!(vm.state, ProfileState::Loading);
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn server_failure_maps_to_error_state() {
        let api = Arc::new(StubApi::new());
        *api.profile.lock().unwrap() = Err(ApiError::Unauthorized {
            operation: "profile fetch",
        });
        let mut vm = ProfileModel::new(api, authed());

        vm.load().await;

        assert_eq!(
            vm.state,
            ProfileState::Error("Session rejected during profile fetch".to_string())
        );
    }

    #[tokio::test]
    async fn reset_returns_to_loading() {
        let mut vm = ProfileModel::new(Arc::new(StubApi::new()), authed());

        vm.load().await;
        assert_ne!(vm.state, ProfileState::Loading);

        vm.reset();
        assert_eq!(vm.state, ProfileState::Loading);
        assert!(!vm.is_saving);
    }
}
