use std::fmt;
use std::sync::Arc;

use log::debug;

use haven_backend::{AuthTokenProvider, Invitation, VaultApi};

use super::require_token;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InvitationState {
    #[default]
    Idle,
    Created(Invitation),
    Error(String),
}

/// State holder for the invite-a-contact screen.
pub struct CreateInvitationModel {
    api: Arc<dyn VaultApi>,
    auth: Arc<dyn AuthTokenProvider>,
    pub state: InvitationState,
    pub is_creating: bool,
}

impl fmt::Debug for CreateInvitationModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateInvitationModel")
            .field("state", &self.state)
            .field("is_creating", &self.is_creating)
            .finish_non_exhaustive()
    }
}

impl CreateInvitationModel {
    #[must_use]
    pub fn new(api: Arc<dyn VaultApi>, auth: Arc<dyn AuthTokenProvider>) -> Self {
        Self {
            api,
            auth,
            state: InvitationState::default(),
            is_creating: false,
        }
    }

    pub async fn create_invitation(&mut self) {
        if self.is_creating {
            return;
        }
        self.is_creating = true;
        let outcome = async {
            let token = require_token(self.auth.as_ref())?;
            self.api
                .create_invitation(&token)
                .await
                .map_err(|error| error.to_string())
        }
        .await;
        self.is_creating = false;

        self.state = match outcome {
            Ok(invitation) => {
                debug!("created invitation {}", invitation.id);
                InvitationState::Created(invitation)
            }
            Err(message) => InvitationState::Error(message),
        };
    }

    pub fn reset(&mut self) {
        self.state = InvitationState::Idle;
        self.is_creating = false;
    }
}
