//! Persistent player preferences.
//!
//! Values are plain strings keyed by name so the store stays agnostic of the
//! settings layered on top of it.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use curve_fit_rendering::Theme;
use serde::{Deserialize, Serialize};

use crate::localization::Language;

/// Key under which the selected theme is stored.
pub(crate) const THEME_KEY: &str = "theme";
/// Key under which the selected language is stored.
pub(crate) const LANGUAGE_KEY: &str = "lang";

/// Key/value storage for player preferences.
pub(crate) trait PreferenceStore {
    /// Returns the stored value for `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Preferences kept only for the lifetime of the process.
#[derive(Debug, Default)]
pub(crate) struct MemoryPreferenceStore {
    values: BTreeMap<String, String>,
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let _ = self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PreferenceFile {
    #[serde(default)]
    values: BTreeMap<String, String>,
}

/// Preferences persisted to a TOML file after every change.
#[derive(Debug)]
pub(crate) struct TomlPreferenceStore {
    path: PathBuf,
    file: PreferenceFile,
}

impl TomlPreferenceStore {
    /// Loads preferences from `path`, falling back to empty values when the
    /// file is missing or malformed.
    pub(crate) fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file = match fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(file) => {
                    log::info!("loaded preferences from {}", path.display());
                    file
                }
                Err(error) => {
                    log::warn!(
                        "preferences at {} are malformed, using defaults: {error}",
                        path.display()
                    );
                    PreferenceFile::default()
                }
            },
            Err(_) => {
                log::info!("no preferences at {}, using defaults", path.display());
                PreferenceFile::default()
            }
        };
        Self { path, file }
    }

    /// File the preferences are written to.
    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        let content =
            toml::to_string_pretty(&self.file).context("failed to serialize preferences")?;
        fs::write(&self.path, content)
            .with_context(|| format!("failed to write preferences to {}", self.path.display()))?;
        log::debug!("saved preferences to {}", self.path.display());
        Ok(())
    }
}

impl PreferenceStore for TomlPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.file.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let _ = self.file.values.insert(key.to_owned(), value.to_owned());
        self.save()
    }
}

/// Reads the stored theme, defaulting to light for missing or unknown values.
pub(crate) fn load_theme(store: &dyn PreferenceStore) -> Theme {
    match store.get(THEME_KEY).as_deref() {
        Some("dark") => Theme::Dark,
        Some("light") | None => Theme::Light,
        Some(other) => {
            log::warn!("ignoring unknown theme preference `{other}`");
            Theme::Light
        }
    }
}

/// Persists the theme.
pub(crate) fn save_theme(store: &mut dyn PreferenceStore, theme: Theme) -> Result<()> {
    let name = match theme {
        Theme::Light => "light",
        Theme::Dark => "dark",
    };
    store.set(THEME_KEY, name)
}

/// Reads the stored language, defaulting to English.
pub(crate) fn load_language(store: &dyn PreferenceStore) -> Language {
    let Some(code) = store.get(LANGUAGE_KEY) else {
        return Language::default();
    };
    code.parse().unwrap_or_else(|error| {
        log::warn!("ignoring language preference: {error}");
        Language::default()
    })
}

/// Persists the language.
pub(crate) fn save_language(store: &mut dyn PreferenceStore, language: Language) -> Result<()> {
    store.set(LANGUAGE_KEY, language.code())
}
