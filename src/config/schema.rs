use std::time::Duration;

use serde::Deserialize;

/// Top-level settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/tutti/config.toml` or `~/.config/tutti/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `TUTTI__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub playback: PlaybackSettings,
    pub library: LibrarySettings,
    pub signing: SigningSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// How often each track's position and playing state are sampled (milliseconds).
    pub position_interval_ms: u64,
    /// How often each track's duration and load status are sampled (milliseconds).
    pub duration_interval_ms: u64,
    /// Volume every track starts with, in `0.0..=1.0`.
    pub default_volume: f32,
}

impl PlaybackSettings {
    pub fn position_interval(&self) -> Duration {
        Duration::from_millis(self.position_interval_ms.max(1))
    }

    pub fn duration_interval(&self) -> Duration {
        Duration::from_millis(self.duration_interval_ms.max(1))
    }
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            position_interval_ms: 50,
            duration_interval_ms: 1000,
            default_volume: 0.5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to include hidden files (dotfiles) in a song's track list.
    pub include_hidden: bool,
    /// Whether to follow symlinks when listing a song folder.
    pub follow_links: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()],
            include_hidden: false,
            follow_links: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SigningSettings {
    /// Lifetime requested for every newly signed URL (seconds).
    pub url_lifetime_secs: u64,
    /// A cached URL is re-signed once less than this much lifetime remains (seconds).
    pub refresh_margin_secs: u64,
}

impl SigningSettings {
    pub fn url_lifetime(&self) -> Duration {
        Duration::from_secs(self.url_lifetime_secs)
    }

    pub fn refresh_margin(&self) -> Duration {
        Duration::from_secs(self.refresh_margin_secs)
    }
}

impl Default for SigningSettings {
    fn default() -> Self {
        Self {
            url_lifetime_secs: 60 * 60,
            refresh_margin_secs: 10 * 60,
        }
    }
}
