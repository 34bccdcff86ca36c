use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{errors::GenError, naming};

pub const CONFIG_FILE_NAME: &str = "model-gen.json";
pub const TABLE_PREFIX_ENV: &str = "DB_TABLE_PREFIX";

/// Generator settings shared by every run in a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub namespace: String,
    pub base_model: String,
    pub dir: String,
    pub prefer_array_rules: bool,
    pub global_trans_keys: Vec<String>,
    pub table_prefix: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            namespace: "App\\Models".to_string(),
            base_model: "Overlord\\Model\\OverlordModel".to_string(),
            dir: "app/Models".to_string(),
            prefer_array_rules: false,
            global_trans_keys: ["id", "created_at", "updated_at", "deleted_at"]
                .iter()
                .map(|key| key.to_string())
                .collect(),
            table_prefix: String::new(),
        }
    }
}

impl GeneratorConfig {
    /// Loads `path`, or `model-gen.json` under `base_path` when it exists,
    /// then applies environment overrides.
    pub fn load(base_path: &Path, path: Option<&Path>) -> Result<Self, GenError> {
        let file = match path {
            Some(path) => Some(path.to_path_buf()),
            None => {
                let default = base_path.join(CONFIG_FILE_NAME);
                default.is_file().then_some(default)
            }
        };

        let mut config = match file {
            Some(file) => Self::from_file(&file)?,
            None => Self::default(),
        };

        if let Ok(prefix) = env::var(TABLE_PREFIX_ENV) {
            config.table_prefix = prefix;
        }

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, GenError> {
        let text = fs::read_to_string(path)
            .map_err(|e| GenError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        log::debug!("Loaded generator config from {}", path.display());
        serde_json::from_str(&text)
            .map_err(|e| GenError::Config(format!("invalid {}: {}", path.display(), e)))
    }

    /// Directory of the model files under `base_path`.
    pub fn models_dir(&self, base_path: &Path) -> PathBuf {
        base_path.join(naming::dir_to_path(&self.dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_file() {
        let dir = tempdir().unwrap();
        let config = GeneratorConfig::load(dir.path(), None).unwrap();

        assert_eq!(config.namespace, "App\\Models");
        assert_eq!(config.base_model, "Overlord\\Model\\OverlordModel");
        assert_eq!(config.global_trans_keys.len(), 4);
        assert!(!config.prefer_array_rules);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "namespace": "Domain\\Models", "dir": "src\\Models" }"#,
        )
        .unwrap();

        let config = GeneratorConfig::load(dir.path(), None).unwrap();
        assert_eq!(config.namespace, "Domain\\Models");
        assert_eq!(config.base_model, "Overlord\\Model\\OverlordModel");
        assert_eq!(
            config.models_dir(dir.path()),
            dir.path().join("src").join("Models")
        );
    }

    #[test]
    fn test_unknown_file_is_config_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let result = GeneratorConfig::load(dir.path(), Some(&missing));
        assert!(matches!(result, Err(GenError::Config(_))));
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ namespace").unwrap();
        let result = GeneratorConfig::load(dir.path(), Some(&path));
        assert!(matches!(result, Err(GenError::Config(_))));
    }
}
