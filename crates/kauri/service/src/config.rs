use std::path::PathBuf;

/// Gateway configuration.
///
/// All fields have documented defaults; the binary populates overrides from
/// the environment in one place rather than reading variables at call sites.
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    /// Listen address. Env: `KAURI_BIND_ADDR`. Default `127.0.0.1:8321`.
    pub bind_addr: String,
    /// Directory holding the persisted signing key. Env: `KAURI_DATA_DIR`.
    /// Default `./data`.
    pub data_dir: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8321".to_string(),
            data_dir: PathBuf::from("./data"),
        }
    }
}

impl ServiceConfig {
    /// Build a config from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: std::env::var("KAURI_BIND_ADDR").unwrap_or(defaults.bind_addr),
            data_dir: std::env::var("KAURI_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
        }
    }

    /// Where the Ed25519 signing seed lives.
    pub fn signing_key_path(&self) -> PathBuf {
        self.data_dir.join("signing.key")
    }
}
