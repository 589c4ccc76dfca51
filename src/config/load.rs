use std::{env, path::PathBuf};

use super::schema::Settings;

/// Longest lifetime object stores accept for a presigned URL (7 days).
const MAX_URL_LIFETIME_SECS: u64 = 7 * 24 * 60 * 60;

impl Settings {
    /// Read the `[playback]`, `[library]` and `[signing]` sections.
    ///
    /// Sources, highest precedence first: `TUTTI__<SECTION>__<KEY>` environment
    /// variables, the TOML file from `resolve_config_path` (optional), then the
    /// defaults (50 ms position and 1 s duration sampling, volume 0.5, 1 h URLs
    /// refreshed 10 min before expiry).
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = resolve_config_path() {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("TUTTI")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// `load` followed by `validate`; any failure logs a warning and yields the
    /// defaults, so a broken config file never prevents a session from starting.
    pub fn load_or_default() -> Self {
        let loaded = Self::load()
            .map_err(|e| format!("failed to load config: {e}"))
            .and_then(|s| s.validate().map(|()| s).map_err(|e| format!("invalid config: {e}")));

        loaded.unwrap_or_else(|msg| {
            log::warn!("{msg}, using defaults");
            Self::default()
        })
    }

    /// Reject settings the session cannot run with: zero sampling intervals, a
    /// default volume outside `0.0..=1.0`, a URL lifetime over 7 days, or a
    /// refresh margin that is not shorter than the lifetime.
    pub fn validate(&self) -> Result<(), String> {
        let playback = &self.playback;
        if playback.position_interval_ms == 0 {
            return Err("playback.position_interval_ms must be >= 1".to_string());
        }
        if playback.duration_interval_ms == 0 {
            return Err("playback.duration_interval_ms must be >= 1".to_string());
        }
        if !(0.0..=1.0).contains(&playback.default_volume) {
            return Err("playback.default_volume must be within 0.0..=1.0".to_string());
        }

        let signing = &self.signing;
        if signing.url_lifetime_secs > MAX_URL_LIFETIME_SECS {
            return Err(format!(
                "signing.url_lifetime_secs must be <= {MAX_URL_LIFETIME_SECS}"
            ));
        }
        if signing.refresh_margin_secs >= signing.url_lifetime_secs {
            return Err(
                "signing.refresh_margin_secs must be shorter than signing.url_lifetime_secs"
                    .to_string(),
            );
        }
        Ok(())
    }
}

/// Where `tutti` looks for `config.toml`: `TUTTI_CONFIG_PATH` when set,
/// otherwise `default_config_path`.
pub fn resolve_config_path() -> Option<PathBuf> {
    env::var_os("TUTTI_CONFIG_PATH")
        .map(PathBuf::from)
        .or_else(default_config_path)
}

/// `$XDG_CONFIG_HOME/tutti/config.toml`, or `~/.config/tutti/config.toml`
/// when `XDG_CONFIG_HOME` is unset. `None` without either variable.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;

    Some(config_home.join("tutti").join("config.toml"))
}
