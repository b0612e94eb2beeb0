use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// How a backup was triggered on the owning device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackupKind {
    Auto,
    Manual,
}

impl fmt::Display for BackupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "automatic"),
            Self::Manual => write!(f, "manual"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackupStatus {
    Complete,
    Partial,
    Failed,
}

impl fmt::Display for BackupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Complete => write!(f, "complete"),
            Self::Partial => write!(f, "partial"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// One vault backup as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backup {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
    pub kind: BackupKind,
    pub status: BackupStatus,
    /// Human-readable label of the encryption scheme, for example
    /// "AES-256-GCM". The server treats it as opaque.
    pub encryption: String,
}

/// Backups grouped by calendar month for listing screens, newest month first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupGroup {
    pub year: i32,
    pub month: u32,
    pub backups: Vec<Backup>,
}

impl BackupGroup {
    #[must_use]
    pub fn from_backups(backups: &[Backup]) -> Vec<Self> {
        use std::collections::BTreeMap;

        let mut groups: BTreeMap<(i32, u32), Vec<Backup>> = BTreeMap::new();

        for backup in backups {
            let key = (backup.created_at.year(), backup.created_at.month());
            groups.entry(key).or_default().push(backup.clone());
        }

        groups
            .into_iter()
            .rev()
            .map(|((year, month), mut backups)| {
                backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                BackupGroup {
                    year,
                    month,
                    backups,
                }
            })
            .collect()
    }
}

/// A single-use invite issued by the current account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitation {
    pub id: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Full registry record for a message handler, as shown on its detail screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerDetail {
    pub id: String,
    pub name: String,
    pub description: String,
    pub version: String,
    pub category: String,
    #[serde(default)]
    pub icon_url: Option<String>,
    pub publisher: String,
    pub published_at: DateTime<Utc>,
    pub size_bytes: u64,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub input_schema: HashMap<String, String>,
    #[serde(default)]
    pub output_schema: HashMap<String, String>,
    #[serde(default)]
    pub changelog: Option<String>,
    #[serde(default)]
    pub installed: bool,
    #[serde(default)]
    pub installed_version: Option<String>,
}

impl HandlerDetail {
    /// True when an installed copy lags behind the registry version.
    #[must_use]
    pub fn update_available(&self) -> bool {
        self.installed
            && self
                .installed_version
                .as_ref()
                .is_some_and(|installed| installed != &self.version)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Patch record for profile mutation. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl ProfileUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none()
            && self.avatar_url.is_none()
            && self.bio.is_none()
            && self.location.is_none()
    }
}

/// Client-sealed credential material. The server never sees the plaintext;
/// ciphertext, salt and nonce travel as base64 strings on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedCredentialBackup {
    #[serde(with = "base64_bytes")]
    pub ciphertext: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub salt: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub nonce: Vec<u8>,
}

mod base64_bytes {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
