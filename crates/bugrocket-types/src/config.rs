use serde::{Deserialize, Serialize};

/// Storage key holding the serialized archive
pub const ARCHIVE_KEY: &str = "bugrocket-lite-history";

/// Top-level client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Origin of the BugRocket server; empty means same origin
    #[serde(default)]
    pub api_base: String,
    #[serde(default = "default_chat_path")]
    pub chat_path: String,
    #[serde(default = "default_image_path")]
    pub image_path: String,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default = "default_archive_key")]
    pub archive_key: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            chat_path: default_chat_path(),
            image_path: default_image_path(),
            storage: StorageConfig::default(),
            archive_key: default_archive_key(),
        }
    }
}

impl AppConfig {
    pub fn chat_url(&self) -> String {
        join_url(&self.api_base, &self.chat_path)
    }

    pub fn image_url(&self) -> String {
        join_url(&self.api_base, &self.image_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

fn default_chat_path() -> String {
    "/api/chat".to_string()
}

fn default_image_path() -> String {
    "/api/image".to_string()
}

fn default_archive_key() -> String {
    ARCHIVE_KEY.to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackendType,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageBackendType {
    /// Auto-detect best available backend
    #[default]
    Auto,
    Memory,
    LocalStorage,
}

impl StorageBackendType {
    pub fn all() -> &'static [StorageBackendType] {
        &[
            StorageBackendType::Auto,
            StorageBackendType::Memory,
            StorageBackendType::LocalStorage,
        ]
    }

    pub fn label(&self) -> &str {
        match self {
            StorageBackendType::Auto => "Auto",
            StorageBackendType::Memory => "Memory (not persisted)",
            StorageBackendType::LocalStorage => "Local Storage",
        }
    }
}
