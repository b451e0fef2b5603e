use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn from_dark(dark: bool) -> Self {
        if dark { Theme::Dark } else { Theme::Light }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }

    pub fn toggled(&self) -> Self {
        Theme::from_dark(!self.is_dark())
    }
}

/// Locally persisted client preferences
#[derive(Debug, Default, Serialize, Deserialize)]
struct Preferences {
    #[serde(default, rename = "dark-theme")]
    dark_theme: Option<bool>,
}

/// Theme preference kept in a small JSON file
#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: PathBuf,
}

impl ThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored theme; dark unless light was explicitly saved
    pub fn load(&self) -> Theme {
        let Ok(data) = fs::read_to_string(&self.path) else {
            return Theme::Dark;
        };

        match serde_json::from_str::<Preferences>(&data) {
            Ok(prefs) => Theme::from_dark(prefs.dark_theme != Some(false)),
            Err(e) => {
                tracing::warn!("Ignoring unreadable preferences {}: {e}", self.path.display());
                Theme::Dark
            }
        }
    }

    pub fn save(&self, theme: Theme) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let prefs = Preferences {
            dark_theme: Some(theme.is_dark()),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&prefs)?)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }
}
