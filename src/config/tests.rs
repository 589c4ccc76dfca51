use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_tutti_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("TUTTI_CONFIG_PATH", "/tmp/tutti-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/tutti-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("tutti")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("tutti")
            .join("config.toml")
    );
}

#[test]
fn defaults_match_sampling_cadences_and_signing_policy() {
    let s = Settings::default();
    assert_eq!(s.playback.position_interval(), Duration::from_millis(50));
    assert_eq!(s.playback.duration_interval(), Duration::from_secs(1));
    assert_eq!(s.playback.default_volume, 0.5);
    assert_eq!(s.signing.url_lifetime(), Duration::from_secs(3600));
    assert_eq!(s.signing.refresh_margin(), Duration::from_secs(600));
    assert!(!s.library.include_hidden);
    assert!(s.validate().is_ok());
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
position_interval_ms = 20
duration_interval_ms = 500
default_volume = 0.8

[library]
extensions = ["mp3"]
include_hidden = true
follow_links = false

[signing]
url_lifetime_secs = 7200
refresh_margin_secs = 300
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("TUTTI_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("TUTTI__PLAYBACK__POSITION_INTERVAL_MS");

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.position_interval_ms, 20);
    assert_eq!(s.playback.duration_interval_ms, 500);
    assert!((s.playback.default_volume - 0.8).abs() < f32::EPSILON);
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(s.library.include_hidden);
    assert!(!s.library.follow_links);
    assert_eq!(s.signing.url_lifetime_secs, 7200);
    assert_eq!(s.signing.refresh_margin_secs, 300);
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
position_interval_ms = 50
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("TUTTI_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("TUTTI__PLAYBACK__POSITION_INTERVAL_MS", "25");

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.position_interval_ms, 25);
}

#[test]
fn validate_rejects_out_of_range_values() {
    let mut s = Settings::default();
    s.playback.position_interval_ms = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.playback.default_volume = 1.5;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.signing.refresh_margin_secs = s.signing.url_lifetime_secs;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.signing.url_lifetime_secs = 7 * 24 * 60 * 60;
    assert!(s.validate().is_ok());
    s.signing.url_lifetime_secs += 1;
    assert!(s.validate().is_err());
}

#[test]
fn load_or_default_falls_back_on_invalid_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
duration_interval_ms = 0
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("TUTTI_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("TUTTI__PLAYBACK__POSITION_INTERVAL_MS");

    let s = Settings::load_or_default();
    assert_eq!(s.playback.duration_interval_ms, 1000);
}
