use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "bridge.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub tci_url: String,
    pub midi_port: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tci_url: "ws://127.0.0.1:40001".into(),
            midi_port: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub tci_url: Option<String>,
    pub midi_port: Option<String>,
}

pub fn load_settings(overrides: &Overrides) -> anyhow::Result<Settings> {
    load_settings_with(overrides, |key| std::env::var(key).ok())
}

fn load_settings_with(
    overrides: &Overrides,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    // An explicit --config must exist; the default file is optional.
    match &overrides.config {
        Some(path) => apply_file(&mut settings, path)?,
        None => {
            let path = Path::new(DEFAULT_CONFIG_PATH);
            if path.exists() {
                apply_file(&mut settings, path)?;
            }
        }
    }

    if let Some(v) = env("TCI_URL") {
        settings.tci_url = v;
    }
    if let Some(v) = env("APP__TCI_URL") {
        settings.tci_url = v;
    }

    if let Some(v) = env("MIDI_PORT") {
        settings.midi_port = Some(v);
    }
    if let Some(v) = env("APP__MIDI_PORT") {
        settings.midi_port = Some(v);
    }

    if let Some(v) = &overrides.tci_url {
        settings.tci_url = v.clone();
    }
    if let Some(v) = &overrides.midi_port {
        settings.midi_port = Some(v.clone());
    }

    settings.midi_port = settings.midi_port.filter(|port| !port.trim().is_empty());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, path: &Path) -> anyhow::Result<()> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file '{}'", path.display()))?;
    let file_cfg = toml::from_str::<HashMap<String, String>>(&raw)
        .with_context(|| format!("failed to parse config file '{}'", path.display()))?;

    if let Some(v) = file_cfg.get("tci_url") {
        settings.tci_url = v.clone();
    }
    if let Some(v) = file_cfg.get("midi_port") {
        settings.midi_port = Some(v.clone());
    }
    Ok(())
}
