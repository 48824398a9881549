use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const AUTH_TOKEN_KEY: &str = "auth_token";
pub const OTP_TOKEN_KEY: &str = "otp_token";

/// Key/value storage for the session tokens.
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct StoredCredentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    auth_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    otp_token: Option<String>,
}

impl StoredCredentials {
    fn slot(&mut self, key: &str) -> Result<&mut Option<String>> {
        match key {
            AUTH_TOKEN_KEY => Ok(&mut self.auth_token),
            OTP_TOKEN_KEY => Ok(&mut self.otp_token),
            other => Err(anyhow!("unknown credential key: {}", other)),
        }
    }
}

/// Tokens kept as a small JSON document on disk.
pub struct FileCredentialStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<StoredCredentials> {
        match std::fs::read(&self.path) {
            Ok(raw) if raw.is_empty() => Ok(StoredCredentials::default()),
            Ok(raw) => serde_json::from_slice(&raw)
                .with_context(|| format!("corrupt credentials file {}", self.path.display())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Ok(StoredCredentials::default())
            }
            Err(err) => Err(err)
                .with_context(|| format!("failed to read {}", self.path.display())),
        }
    }

    fn write(&self, credentials: &StoredCredentials) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        if *credentials == StoredCredentials::default() {
            return match std::fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(err) => Err(err)
                    .with_context(|| format!("failed to remove {}", self.path.display())),
            };
        }

        let payload = serde_json::to_vec_pretty(credentials)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, payload)
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;
        Ok(())
    }

    fn update<F>(&self, apply: F) -> Result<()>
    where
        F: FnOnce(&mut StoredCredentials) -> Result<()>,
    {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| anyhow!("credential store lock poisoned"))?;
        let mut credentials = self.read()?;
        apply(&mut credentials)?;
        self.write(&credentials)
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| anyhow!("credential store lock poisoned"))?;
        let mut credentials = self.read()?;
        Ok(credentials.slot(key)?.clone())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.update(|credentials| {
            *credentials.slot(key)? = Some(value.to_string());
            Ok(())
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.update(|credentials| {
            *credentials.slot(key)? = None;
            Ok(())
        })
    }
}

/// Process-local store, used when nothing should touch the disk.
#[derive(Default)]
pub struct MemoryCredentialStore {
    credentials: Mutex<StoredCredentials>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_auth_token(token: &str) -> Self {
        Self {
            credentials: Mutex::new(StoredCredentials {
                auth_token: Some(token.to_string()),
                otp_token: None,
            }),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let mut credentials = self
            .credentials
            .lock()
            .map_err(|_| anyhow!("credential store lock poisoned"))?;
        Ok(credentials.slot(key)?.clone())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut credentials = self
            .credentials
            .lock()
            .map_err(|_| anyhow!("credential store lock poisoned"))?;
        *credentials.slot(key)? = Some(value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut credentials = self
            .credentials
            .lock()
            .map_err(|_| anyhow!("credential store lock poisoned"))?;
        *credentials.slot(key)? = None;
        Ok(())
    }
}
