use std::path::{Path, PathBuf};
use std::sync::Arc;

use medassist_patients::{EnvToken, SelectionPolicy, StaticToken, TokenProvider};
use medassist_prefs::FileSlot;
use serde::{Deserialize, Serialize};

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

const CONFIG_FILE: &str = "config.json";

pub const DEFAULT_PATIENTS_PATH: &str = "/api/patients";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    pub api_base_url: String,
    /// Added in v1; older configs get [`DEFAULT_PATIENTS_PATH`].
    pub patients_path: String,
    pub credentials: CredentialSource,
    /// Added in v1; older configs keep stale selections.
    pub selection_policy: SelectionMode,
    #[serde(default)]
    pub auto_flush: bool,
    pub created_at: jiff::Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialSource {
    Inline { token: String },
    Env { var: String },
}

impl CredentialSource {
    pub fn provider(&self) -> Arc<dyn TokenProvider> {
        match self {
            Self::Inline { token } => Arc::new(StaticToken::new(token.clone())),
            Self::Env { var } => Arc::new(EnvToken::new(var.clone())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    #[default]
    Retain,
    ClearWhenMissing,
}

impl From<SelectionMode> for SelectionPolicy {
    fn from(mode: SelectionMode) -> Self {
        match mode {
            SelectionMode::Retain => SelectionPolicy::Retain,
            SelectionMode::ClearWhenMissing => SelectionPolicy::ClearWhenMissing,
        }
    }
}

/// Redacted config info safe to print.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigInfo {
    pub api_base_url: String,
    pub patients_path: String,
    pub created_at: String,
    pub credential_type: String,
    pub token_hint: Option<String>,
    pub token_env: Option<String>,
    pub selection_policy: SelectionMode,
    pub auto_flush: bool,
}

/// The preference store's default directory; the config file lives next to
/// the preference snapshot.
pub fn config_dir() -> eyre::Result<PathBuf> {
    let slot = FileSlot::default_location()?;
    Ok(slot.dir().to_path_buf())
}

pub fn config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE)
}

pub fn has_config(dir: &Path) -> bool {
    config_path(dir).exists()
}

pub fn load_config(dir: &Path) -> eyre::Result<AppConfig> {
    let path = config_path(dir);
    let contents = std::fs::read_to_string(&path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let raw_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0);
    let on_disk_version = u32::try_from(raw_version).map_err(|_| {
        eyre::eyre!(
            "config_version {raw_version} is newer than this build supports \
             ({CURRENT_VERSION}). Please update medassist."
        )
    })?;

    let migrated = migrate(json, on_disk_version)?;
    let config: AppConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
///
/// Each migration is a pure transform on the raw JSON value.
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update medassist."
        ));
    }

    // v0 -> v1: patients_path and selection_policy became configurable
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        obj.entry("patients_path")
            .or_insert(serde_json::Value::String(DEFAULT_PATIENTS_PATH.to_string()));
        obj.entry("selection_policy")
            .or_insert(serde_json::Value::String("retain".to_string()));
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 -> v1 (added patients_path, selection_policy)");
    }

    Ok(json)
}

pub fn save_config(dir: &Path, config: &AppConfig) -> eyre::Result<()> {
    std::fs::create_dir_all(dir)?;

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let path = config_path(dir);
    let json = serde_json::to_string_pretty(&stamped)?;

    // Write to a temp file then rename for atomicity
    let tmp_path = dir.join(format!("{CONFIG_FILE}.tmp"));
    std::fs::write(&tmp_path, json.as_bytes())?;

    // The inline token is a secret
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, &path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}

pub fn config_info(config: &AppConfig) -> ConfigInfo {
    let (credential_type, token_hint, token_env) = match &config.credentials {
        CredentialSource::Inline { token } => {
            ("inline".to_string(), Some(redact_token(token)), None)
        }
        CredentialSource::Env { var } => ("env".to_string(), None, Some(var.clone())),
    };

    ConfigInfo {
        api_base_url: config.api_base_url.clone(),
        patients_path: config.patients_path.clone(),
        created_at: config.created_at.to_string(),
        credential_type,
        token_hint,
        token_env,
        selection_policy: config.selection_policy,
        auto_flush: config.auto_flush,
    }
}

pub fn redact_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let prefix: String = chars[..4].iter().collect();
    let suffix: String = chars[chars.len() - 4..].iter().collect();
    format!("{prefix}...{suffix}")
}
