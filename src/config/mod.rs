mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Environment variables that override the storage section.
const ENV_SUPABASE_URL: &str = "SUPABASE_URL";
const ENV_SUPABASE_KEY: &str = "SUPABASE_SERVICE_KEY";
const ENV_BUCKET: &str = "SHOWROOM_BUCKET";

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    apply_env_overrides(&mut config);
    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./config.toml",
        "./showroom.toml",
        "~/.config/showroom/config.toml",
        "/etc/showroom/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    let mut config = Config::default();
    apply_env_overrides(&mut config);
    validate_config(&config)?;
    Ok(config)
}

fn apply_env_overrides(config: &mut Config) {
    override_from(config, |key| std::env::var(key).ok());
}

/// Apply storage overrides using `lookup` to read variables.
fn override_from(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = non_empty(ENV_SUPABASE_URL) {
        config.storage.url = Some(url);
    }
    if let Some(key) = non_empty(ENV_SUPABASE_KEY) {
        config.storage.service_key = Some(key);
    }
    if let Some(bucket) = non_empty(ENV_BUCKET) {
        config.storage.bucket = bucket;
    }
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if config.server.max_upload_bytes == 0 {
        anyhow::bail!("server.max_upload_bytes must be greater than 0");
    }

    let bucket = config.storage.bucket.trim();
    if bucket.is_empty() {
        anyhow::bail!("storage.bucket cannot be empty");
    }
    if bucket.contains('/') {
        anyhow::bail!("storage.bucket '{}' must be a single path segment", bucket);
    }

    match config.storage.backend {
        StorageBackend::Supabase => {
            let url = config.storage.url.as_deref().unwrap_or_default();
            if url.trim().is_empty() {
                anyhow::bail!("Supabase storage requires storage.url (or {ENV_SUPABASE_URL})");
            }
            url::Url::parse(url)
                .with_context(|| format!("storage.url is not a valid URL: {url}"))?;
            if config
                .storage
                .service_key
                .as_deref()
                .map_or(true, |k| k.trim().is_empty())
            {
                anyhow::bail!(
                    "Supabase storage requires storage.service_key (or {ENV_SUPABASE_KEY})"
                );
            }
        }
        StorageBackend::Local => {
            url::Url::parse(&config.storage.public_base_url).with_context(|| {
                format!(
                    "storage.public_base_url is not a valid URL: {}",
                    config.storage.public_base_url
                )
            })?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn local_config() -> Config {
        let mut config = Config::default();
        config.storage.backend = StorageBackend::Local;
        config
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.storage.bucket, "gsl");
        assert_eq!(config.storage.backend, StorageBackend::Supabase);
        assert_eq!(config.database.path, std::path::PathBuf::from("showroom.db"));
    }

    #[test]
    fn test_parse_toml() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 9000

            [storage]
            backend = "local"
            bucket = "media"
            local_dir = "/srv/showroom"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.storage.backend, StorageBackend::Local);
        assert_eq!(config.storage.bucket, "media");
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_local_backend_is_valid_without_credentials() {
        assert!(validate_config(&local_config()).is_ok());
    }

    #[test]
    fn test_supabase_requires_url_and_key() {
        let mut config = Config::default();
        assert!(validate_config(&config).is_err());

        config.storage.url = Some("https://abc.supabase.co".into());
        assert!(validate_config(&config).is_err());

        config.storage.service_key = Some("service-role-key".into());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = local_config();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());

        let mut config = local_config();
        config.storage.bucket = "  ".into();
        assert!(validate_config(&config).is_err());

        let mut config = local_config();
        config.storage.bucket = "a/b".into();
        assert!(validate_config(&config).is_err());

        let mut config = local_config();
        config.server.max_upload_bytes = 0;
        assert!(validate_config(&config).is_err());

        let mut config = local_config();
        config.storage.public_base_url = "not a url".into();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("SUPABASE_URL", "https://abc.supabase.co"),
            ("SUPABASE_SERVICE_KEY", "secret"),
            ("SHOWROOM_BUCKET", ""),
        ]);
        let mut config = Config::default();
        override_from(&mut config, |key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.storage.url.as_deref(), Some("https://abc.supabase.co"));
        assert_eq!(config.storage.service_key.as_deref(), Some("secret"));
        // Empty values do not override
        assert_eq!(config.storage.bucket, "gsl");
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[storage]\nbackend = \"local\"\n\n[database]\npath = \"/tmp/x.db\"\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Local);
        assert_eq!(config.database.path, std::path::PathBuf::from("/tmp/x.db"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config(Path::new("/nonexistent/showroom.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
