//! Path resolution for freechat's configuration directory.

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::constants::{
    APP_NAME, CONFIG_FILENAME, HISTORY_FILENAME, PORTABLE_DIRNAME, PROMPTS_FILENAME,
    SESSIONS_DIRNAME,
};

/// Locations of every file freechat reads or writes.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub dir: PathBuf,
    pub config: PathBuf,
    pub prompts: PathBuf,
    pub history: PathBuf,
    pub sessions: PathBuf,
    /// Whether the directory was picked up from next to the executable.
    pub portable: bool,
}

impl ConfigPaths {
    /// Lays out the standard files under `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            config: dir.join(CONFIG_FILENAME),
            prompts: dir.join(PROMPTS_FILENAME),
            history: dir.join(HISTORY_FILENAME),
            sessions: dir.join(SESSIONS_DIRNAME),
            portable: false,
            dir,
        }
    }

    /// Resolves the config directory.
    ///
    /// Precedence: explicit override > `freechat_config/` next to the
    /// executable > `~/.config/freechat/` (platform config dir).
    ///
    /// # Errors
    ///
    /// Returns an error if the platform's config directory cannot be determined.
    pub fn resolve(override_dir: Option<&Path>) -> Result<Self> {
        if let Some(dir) = override_dir {
            return Ok(Self::in_dir(dir));
        }

        if let Some(portable) = Self::portable_dir().filter(|d| d.is_dir()) {
            let mut paths = Self::in_dir(portable);
            paths.portable = true;
            return Ok(paths);
        }

        let dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join(APP_NAME);
        Ok(Self::in_dir(dir))
    }

    fn portable_dir() -> Option<PathBuf> {
        let exe = std::env::current_exe().ok()?;
        Some(exe.parent()?.join(PORTABLE_DIRNAME))
    }
}
