//! Scriptable in-memory vault shared by the view-model tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use haven_backend::{
    ApiError, AuthTokenProvider, Backup, BackupKind, BackupStatus, EncryptedCredentialBackup,
    HandlerDetail, Invitation, Profile, ProfileUpdate, VaultApi,
};

pub(crate) struct StubApi {
    pub backups: Mutex<Result<Vec<Backup>, ApiError>>,
    pub invitation: Mutex<Result<Invitation, ApiError>>,
    pub handler: Mutex<Result<HandlerDetail, ApiError>>,
    pub profile: Mutex<Result<Profile, ApiError>>,
    pub upload_result: Mutex<Result<(), ApiError>>,
    pub uploaded: Mutex<Option<EncryptedCredentialBackup>>,
    /// Artificial latency applied to every call, for timeout tests.
    pub stall: Mutex<Option<std::time::Duration>>,
    calls: AtomicUsize,
}

impl StubApi {
    pub fn new() -> Self {
        Self {
            backups: Mutex::new(Ok(Vec::new())),
            invitation: Mutex::new(Ok(sample_invitation())),
            handler: Mutex::new(Ok(sample_handler())),
            profile: Mutex::new(Ok(sample_profile())),
            upload_result: Mutex::new(Ok(())),
            uploaded: Mutex::new(None),
            stall: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn bump(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let stall = *self.stall.lock().unwrap();
        if let Some(delay) = stall {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl VaultApi for StubApi {
    async fn list_backups(&self, _token: &str) -> Result<Vec<Backup>, ApiError> {
        self.bump().await;
        self.backups.lock().unwrap().clone()
    }

    async fn delete_backup(&self, _token: &str, id: &str) -> Result<(), ApiError> {
        self.bump().await;
        if let Ok(list) = &mut *self.backups.lock().unwrap() {
            list.retain(|backup| backup.id != id);
        }
        Ok(())
    }

    async fn create_invitation(&self, _token: &str) -> Result<Invitation, ApiError> {
        self.bump().await;
        self.invitation.lock().unwrap().clone()
    }

    async fn upload_credential_backup(
        &self,
        _token: &str,
        backup: &EncryptedCredentialBackup,
    ) -> Result<(), ApiError> {
        self.bump().await;
        (*self.upload_result.lock().unwrap()).clone()?;
        *self.uploaded.lock().unwrap() = Some(backup.clone());
        Ok(())
    }

    async fn fetch_credential_backup(
        &self,
        _token: &str,
    ) -> Result<EncryptedCredentialBackup, ApiError> {
        self.bump().await;
        self.uploaded
            .lock()
            .unwrap()
            .clone()
            .ok_or(ApiError::NotFound {
                resource: "credential backup",
            })
    }

    async fn handler_detail(&self, _token: &str, _id: &str) -> Result<HandlerDetail, ApiError> {
        self.bump().await;
        self.handler.lock().unwrap().clone()
    }

    async fn install_handler(&self, _token: &str, _id: &str) -> Result<(), ApiError> {
        self.bump().await;
        if let Ok(handler) = &mut *self.handler.lock().unwrap() {
            handler.installed = true;
            handler.installed_version = Some(handler.version.clone());
        }
        Ok(())
    }

    async fn uninstall_handler(&self, _token: &str, _id: &str) -> Result<(), ApiError> {
        self.bump().await;
        if let Ok(handler) = &mut *self.handler.lock().unwrap() {
            handler.installed = false;
            handler.installed_version = None;
        }
        Ok(())
    }

    async fn fetch_profile(&self, _token: &str) -> Result<Profile, ApiError> {
        self.bump().await;
        self.profile.lock().unwrap().clone()
    }

    async fn update_profile(
        &self,
        _token: &str,
        update: &ProfileUpdate,
    ) -> Result<Profile, ApiError> {
        self.bump().await;
        let mut guard = self.profile.lock().unwrap();
        match &mut *guard {
            Ok(profile) => {
                if let Some(name) = &update.display_name {
                    profile.display_name = name.clone();
                }
                if let Some(url) = &update.avatar_url {
                    profile.avatar_url = Some(url.clone());
                }
                if let Some(bio) = &update.bio {
                    profile.bio = Some(bio.clone());
                }
                if let Some(location) = &update.location {
                    profile.location = Some(location.clone());
                }
                Ok(profile.clone())
            }
            Err(error) => Err(error.clone()),
        }
    }
}

pub(crate) fn sample_backup(id: &str) -> Backup {
    Backup {
        id: id.to_string(),
        created_at: Utc.with_ymd_and_hms(2026, 5, 1, 10, 0, 0).unwrap(),
        size_bytes: 64 * 1024,
        kind: BackupKind::Auto,
        status: BackupStatus::Complete,
        encryption: "AES-256-GCM".to_string(),
    }
}

pub(crate) fn sample_invitation() -> Invitation {
    Invitation {
        id: "inv_1".to_string(),
        code: "HVN-4821".to_string(),
        created_at: Utc.with_ymd_and_hms(2026, 5, 1, 10, 0, 0).unwrap(),
        expires_at: Utc.with_ymd_and_hms(2026, 5, 8, 10, 0, 0).unwrap(),
    }
}

pub(crate) fn sample_handler() -> HandlerDetail {
    HandlerDetail {
        id: "h_1".to_string(),
        name: "Receipt scanner".to_string(),
        description: "Extracts totals from receipts".to_string(),
        version: "2.1.0".to_string(),
        category: "finance".to_string(),
        icon_url: None,
        publisher: "Acme".to_string(),
        published_at: Utc.with_ymd_and_hms(2025, 11, 2, 12, 0, 0).unwrap(),
        size_bytes: 200_000,
        permissions: vec!["read:receipts".to_string()],
        input_schema: std::collections::HashMap::new(),
        output_schema: std::collections::HashMap::new(),
        changelog: None,
        installed: false,
        installed_version: None,
    }
}

pub(crate) fn sample_profile() -> Profile {
    Profile {
        id: "guid-1".to_string(),
        display_name: "Ada".to_string(),
        avatar_url: None,
        bio: None,
        location: None,
        updated_at: Utc.with_ymd_and_hms(2026, 4, 20, 8, 0, 0).unwrap(),
    }
}

pub(crate) fn authed() -> Arc<dyn AuthTokenProvider> {
    Arc::new(|| Some("tok_test".to_string()))
}

pub(crate) fn signed_out() -> Arc<dyn AuthTokenProvider> {
    Arc::new(|| None::<String>)
}
