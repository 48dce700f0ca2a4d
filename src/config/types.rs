use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Optional directory served for any path no route matches (admin UI build)
    #[serde(default)]
    pub static_dir: Option<PathBuf>,

    /// Upper bound on request bodies, multipart uploads included
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// SQLite file; created on first start
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("showroom.db")
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Supabase Storage over its REST API
    #[default]
    Supabase,
    /// Directory on local disk, served by this process
    Local,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Bucket holding every image
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// Supabase project URL, e.g. `https://<project>.supabase.co`
    #[serde(default)]
    pub url: Option<String>,

    /// Supabase service-role key (sent as bearer token and `apikey`)
    #[serde(default)]
    pub service_key: Option<String>,

    /// Root directory for the local backend
    #[serde(default = "default_local_dir")]
    pub local_dir: PathBuf,

    /// Public origin the local backend builds URLs from
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

fn default_bucket() -> String {
    "gsl".to_string()
}
fn default_local_dir() -> PathBuf {
    PathBuf::from("storage")
}
fn default_public_base_url() -> String {
    format!("http://localhost:{}", default_port())
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            bucket: default_bucket(),
            url: None,
            service_key: None,
            local_dir: default_local_dir(),
            public_base_url: default_public_base_url(),
        }
    }
}
