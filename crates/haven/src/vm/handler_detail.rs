use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use log::debug;

use haven_backend::{AuthTokenProvider, HandlerDetail, VaultApi};

use super::require_token;
use crate::async_util::run_with_timeout;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HandlerDetailState {
    #[default]
    Loading,
    Loaded(HandlerDetail),
    Error(String),
}

/// State holder for one handler's registry page.
pub struct HandlerDetailModel {
    api: Arc<dyn VaultApi>,
    auth: Arc<dyn AuthTokenProvider>,
    handler_id: String,
    fetch_timeout: Option<Duration>,
    pub state: HandlerDetailState,
    pub is_installing: bool,
}

impl fmt::Debug for HandlerDetailModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerDetailModel")
            .field("handler_id", &self.handler_id)
            .field("state", &self.state)
            .field("is_installing", &self.is_installing)
            .finish_non_exhaustive()
    }
}

impl HandlerDetailModel {
    #[must_use]
    pub fn new(
        api: Arc<dyn VaultApi>,
        auth: Arc<dyn AuthTokenProvider>,
        handler_id: impl Into<String>,
    ) -> Self {
        Self {
            api,
            auth,
            handler_id: handler_id.into(),
            fetch_timeout: None,
            state: HandlerDetailState::default(),
            is_installing: false,
        }
    }

    #[must_use]
    pub fn with_fetch_timeout(mut self, limit: Duration) -> Self {
        self.fetch_timeout = Some(limit);
        self
    }

    #[must_use]
    pub fn handler_id(&self) -> &str {
        &self.handler_id
    }

    pub async fn load(&mut self) {
        self.state = HandlerDetailState::Loading;
        let outcome = async {
            let token = require_token(self.auth.as_ref())?;
            match self.fetch_timeout {
                Some(limit) => {
                    run_with_timeout(
                        limit,
                        "handler detail",
                        self.api.handler_detail(&token, &self.handler_id),
                    )
                    .await
                }
                None => self
                    .api
                    .handler_detail(&token, &self.handler_id)
                    .await
                    .map_err(|error| error.to_string()),
            }
        }
        .await;

        self.state = match outcome {
            Ok(detail) => HandlerDetailState::Loaded(detail),
            Err(message) => HandlerDetailState::Error(message),
        };
    }

    pub async fn install(&mut self) {
        self.toggle_install(true).await;
    }

    pub async fn uninstall(&mut self) {
        self.toggle_install(false).await;
    }

    pub fn reset(&mut self) {
        self.state = HandlerDetailState::Loading;
        self.is_installing = false;
    }

    /// Install or remove the handler, then refetch its record so the
    /// installed flag reflects the server's view.
    async fn toggle_install(&mut self, install: bool) {
        if self.is_installing {
            return;
        }
        let token = match require_token(self.auth.as_ref()) {
            Ok(token) => token,
            Err(message) => {
                self.state = HandlerDetailState::Error(message);
                return;
            }
        };
        if !matches!(self.state, HandlerDetailState::Loaded(_)) {
            debug!("install toggle ignored: handler {} not loaded", self.handler_id);
            return;
        }

        self.is_installing = true;
        let outcome = async {
            let result = if install {
                self.api.install_handler(&token, &self.handler_id).await
            } else {
                self.api.uninstall_handler(&token, &self.handler_id).await
            };
            result.map_err(|error| error.to_string())?;
            self.api
                .handler_detail(&token, &self.handler_id)
                .await
                .map_err(|error| error.to_string())
        }
        .await;
        self.is_installing = false;

        self.state = match outcome {
            Ok(detail) => HandlerDetailState::Loaded(detail),
            Err(message) => HandlerDetailState::Error(message),
        };
    }
}
