use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use log::debug;

use haven_backend::{AuthTokenProvider, Backup, VaultApi};

use super::require_token;
use crate::async_util::run_with_timeout;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BackupListState {
    /// Nothing fetched yet; the screen shows a spinner.
    #[default]
    Loading,
    /// The account has no backups at all.
    Empty,
    Loaded(Vec<Backup>),
    Error(String),
}

/// State holder for the backup listing screen.
pub struct BackupListModel {
    api: Arc<dyn VaultApi>,
    auth: Arc<dyn AuthTokenProvider>,
    fetch_timeout: Option<Duration>,
    pub state: BackupListState,
    pub is_refreshing: bool,
}

impl fmt::Debug for BackupListModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackupListModel")
            .field("state", &self.state)
            .field("is_refreshing", &self.is_refreshing)
            .finish_non_exhaustive()
    }
}

impl BackupListModel {
    #[must_use]
    pub fn new(api: Arc<dyn VaultApi>, auth: Arc<dyn AuthTokenProvider>) -> Self {
        Self {
            api,
            auth,
            fetch_timeout: None,
            state: BackupListState::default(),
            is_refreshing: false,
        }
    }

    /// Bound the listing fetch; without this the call waits as long as the
    /// transport does.
    #[must_use]
    pub fn with_fetch_timeout(mut self, limit: Duration) -> Self {
        self.fetch_timeout = Some(limit);
        self
    }

    pub async fn load(&mut self) {
        self.state = BackupListState::Loading;
        let outcome = self.fetch().await;
        self.apply(outcome);
    }

    /// Refetch while the current listing stays on screen.
    pub async fn refresh(&mut self) {
        if self.is_refreshing {
            return;
        }
        self.is_refreshing = true;
        let outcome = self.fetch().await;
        self.is_refreshing = false;
        self.apply(outcome);
    }

    /// Delete one backup, then refetch the listing.
    pub async fn delete_backup(&mut self, id: &str) {
        let outcome = async {
            let token = require_token(self.auth.as_ref())?;
            self.api
                .delete_backup(&token, id)
                .await
                .map_err(|error| error.to_string())?;
            debug!("deleted backup {id}");
            self.api
                .list_backups(&token)
                .await
                .map_err(|error| error.to_string())
        }
        .await;
        self.apply(outcome);
    }

    pub fn reset(&mut self) {
        self.state = BackupListState::Loading;
        self.is_refreshing = false;
    }

    async fn fetch(&self) -> Result<Vec<Backup>, String> {
        let token = require_token(self.auth.as_ref())?;
        match self.fetch_timeout {
            Some(limit) => {
                run_with_timeout(limit, "backup listing", self.api.list_backups(&token)).await
            }
            None => self
                .api
                .list_backups(&token)
                .await
                .map_err(|error| error.to_string()),
        }
    }

    fn apply(&mut self, outcome: Result<Vec<Backup>, String>) {
        self.state = match outcome {
            Ok(backups) if backups.is_empty() => BackupListState::Empty,
            Ok(backups) => BackupListState::Loaded(backups),
            Err(message) => BackupListState::Error(message),
        };
    }
}
