use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

pub const CONFIG_FILE: &str = "schedulerd.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub workspace: Option<PathBuf>,
    pub storage_key: String,
    pub locale: String,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            workspace: None,
            storage_key: "scheduleEntries".into(),
            locale: "en".into(),
            log_filter: "info".into(),
        }
    }
}

/// Defaults, then `schedulerd.toml` in the working directory, then env.
///
/// An unreadable config file does not stop startup; the error is handed
/// back so it can be logged once logging is initialised.
pub fn load_settings() -> (Settings, Option<anyhow::Error>) {
    let mut settings = Settings::default();
    let mut file_error = None;

    match read_file_settings(Path::new(CONFIG_FILE)) {
        Ok(Some(file_cfg)) => apply_file_settings(&mut settings, &file_cfg),
        Ok(None) => {}
        Err(e) => file_error = Some(e),
    }

    apply_env(&mut settings, |k| std::env::var(k).ok());
    (settings, file_error)
}

fn read_file_settings(path: &Path) -> anyhow::Result<Option<HashMap<String, String>>> {
    let raw = match fs::read_to_string(path) {
        Ok(v) => v,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).context("failed to read config file"),
    };
    let parsed = toml::from_str::<HashMap<String, String>>(&raw)
        .with_context(|| format!("invalid config file {}", path.to_string_lossy()))?;
    Ok(Some(parsed))
}

fn apply_file_settings(settings: &mut Settings, file_cfg: &HashMap<String, String>) {
    if let Some(v) = file_cfg.get("workspace") {
        settings.workspace = Some(PathBuf::from(v));
    }
    if let Some(v) = file_cfg.get("storage_key") {
        settings.storage_key = v.clone();
    }
    if let Some(v) = file_cfg.get("locale") {
        settings.locale = v.clone();
    }
    if let Some(v) = file_cfg.get("log") {
        settings.log_filter = v.clone();
    }
}

fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("SCHEDULERD_WORKSPACE").filter(|v| !v.trim().is_empty()) {
        settings.workspace = Some(PathBuf::from(v));
    }
    if let Some(v) = var("SCHEDULERD_STORAGE_KEY").filter(|v| !v.trim().is_empty()) {
        settings.storage_key = v;
    }
    if let Some(v) = var("SCHEDULERD_LOCALE") {
        settings.locale = v;
    }
    if let Some(v) = var("SCHEDULERD_LOG") {
        settings.log_filter = v;
    }
}
