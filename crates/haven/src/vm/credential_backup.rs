use std::fmt;
use std::sync::Arc;

use log::debug;
use zeroize::Zeroizing;

use haven_backend::{AuthTokenProvider, VaultApi};

use super::{NOT_AUTHENTICATED, require_token};
use crate::{crypto, phrase};

const DEFAULT_WORD_COUNT: usize = 12;
const DEFAULT_CHALLENGE_SIZE: usize = 3;
const MISMATCH_MESSAGE: &str = "Those words do not match the phrase, try again";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CredentialBackupState {
    #[default]
    Initial,
    /// The freshly generated recovery phrase is on screen, waiting to be
    /// written down.
    ShowingPhrase { words: Vec<String> },
    /// The user must re-select the challenged positions to prove the phrase
    /// was saved. `message` reports a failed previous attempt.
    Verifying {
        words: Vec<String>,
        challenge: Vec<usize>,
        selected: Vec<usize>,
        message: Option<String>,
    },
    /// Deriving the key and sealing the credentials.
    Generating,
    Uploading,
    Complete,
    Error(String),
}

/// Drives the credential-backup flow: stage plaintext credentials, show a
/// recovery phrase, verify the user kept it, then seal and upload.
pub struct CredentialBackupModel {
    api: Arc<dyn VaultApi>,
    auth: Arc<dyn AuthTokenProvider>,
    word_count: usize,
    challenge_size: usize,
    upload_timeout: Option<std::time::Duration>,
    credentials: Option<Zeroizing<Vec<u8>>>,
    pub state: CredentialBackupState,
}

impl fmt::Debug for CredentialBackupModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialBackupModel")
            .field("state", &self.state)
            .field("staged", &self.credentials.is_some())
            .finish_non_exhaustive()
    }
}

impl CredentialBackupModel {
    #[must_use]
    pub fn new(api: Arc<dyn VaultApi>, auth: Arc<dyn AuthTokenProvider>) -> Self {
        Self {
            api,
            auth,
            word_count: DEFAULT_WORD_COUNT,
            challenge_size: DEFAULT_CHALLENGE_SIZE,
            upload_timeout: None,
            credentials: None,
            state: CredentialBackupState::default(),
        }
    }

    #[must_use]
    pub fn with_phrase_settings(mut self, word_count: usize, challenge_size: usize) -> Self {
        self.word_count = word_count.max(1);
        self.challenge_size = challenge_size.max(1);
        self
    }

    #[must_use]
    pub fn with_upload_timeout(mut self, limit: std::time::Duration) -> Self {
        self.upload_timeout = Some(limit);
        self
    }

    /// Stage plaintext credentials and generate the recovery phrase.
    pub fn begin(&mut self, credentials: Vec<u8>) {
        if self.auth.token().is_none() {
            self.state = CredentialBackupState::Error(NOT_AUTHENTICATED.to_string());
            return;
        }

        let words = phrase::generate_phrase(&mut rand::rng(), self.word_count);
        self.credentials = Some(Zeroizing::new(credentials));
        self.state = CredentialBackupState::ShowingPhrase { words };
    }

    /// The phrase is written down; issue a verification challenge.
    pub fn acknowledge_phrase(&mut self) {
        let CredentialBackupState::ShowingPhrase { words } = &self.state else {
            return;
        };
        let words = words.clone();
        let challenge =
            phrase::verification_challenge(&mut rand::rng(), words.len(), self.challenge_size);
        self.state = CredentialBackupState::Verifying {
            words,
            challenge,
            selected: Vec::new(),
            message: None,
        };
    }

    /// Toggle one phrase position in the current selection.
    pub fn toggle_word(&mut self, position: usize) {
        let CredentialBackupState::Verifying {
            words, selected, ..
        } = &mut self.state
        else {
            return;
        };
        if position >= words.len() {
            return;
        }
        if let Some(found) = selected.iter().position(|&p| p == position) {
            selected.remove(found);
        } else {
            selected.push(position);
        }
    }

    /// Check the challenge; on success seal the staged credentials and
    /// upload the result.
    pub async fn submit_verification(&mut self) {
        let token = match require_token(self.auth.as_ref()) {
            Ok(token) => token,
            Err(message) => {
                self.state = CredentialBackupState::Error(message);
                return;
            }
        };
        let CredentialBackupState::Verifying {
            words,
            challenge,
            selected,
            ..
        } = &self.state
        else {
            return;
        };

        if !phrase::selection_matches(challenge, selected) {
            // A mis-tap must not cost the user the phrase; re-challenge.
            let words = words.clone();
            let challenge =
                phrase::verification_challenge(&mut rand::rng(), words.len(), self.challenge_size);
            self.state = CredentialBackupState::Verifying {
                words,
                challenge,
                selected: Vec::new(),
                message: Some(MISMATCH_MESSAGE.to_string()),
            };
            return;
        }

        let words = words.clone();
        let Some(credentials) = self.credentials.take() else {
            self.state =
                CredentialBackupState::Error("No credentials staged for backup".to_string());
            return;
        };
        let passphrase = Zeroizing::new(words.join(" "));

        self.state = CredentialBackupState::Generating;
        let sealed = tokio::task::spawn_blocking(move || {
            crypto::seal(&mut rand::rng(), &passphrase, &credentials)
        })
        .await;

        let backup = match sealed {
            Ok(Ok(backup)) => backup,
            Ok(Err(error)) => {
                self.state = CredentialBackupState::Error(error.to_string());
                return;
            }
            Err(join_error) => {
                self.state =
                    CredentialBackupState::Error(format!("Sealing task failed: {join_error}"));
                return;
            }
        };

        self.state = CredentialBackupState::Uploading;
        let upload = self.api.upload_credential_backup(&token, &backup);
        let outcome = match self.upload_timeout {
            Some(limit) => {
                crate::async_util::run_with_timeout(limit, "credential backup upload", upload)
                    .await
            }
            None => upload.await.map_err(|error| error.to_string()),
        };
        match outcome {
            Ok(()) => {
                debug!("credential backup uploaded");
                self.state = CredentialBackupState::Complete;
            }
            Err(message) => self.state = CredentialBackupState::Error(message),
        }
    }

    pub fn reset(&mut self) {
        self.credentials = None;
        self.state = CredentialBackupState::Initial;
    }
}
