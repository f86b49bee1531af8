use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

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
fn resolve_config_path_prefers_encore_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("ENCORE_CONFIG_PATH", "/tmp/encore-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/encore-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    assert_eq!(
        default_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("encore")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("encore")
            .join("config.toml")
    );
}

#[test]
fn settings_load_from_config_file_with_track_list() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
shuffle = true
repeat = "repeat-one"
volume = 0.7
seed = 42

[controls]
seek_seconds = 9
volume_step = 0.1

[ui]
view = "fullscreen"
header_text = "hello"

[logging]
level = "encore=debug"
file = "/tmp/encore.log"

[[tracks]]
title = "Die with a smile"
artist = "Bruno Mars and Lady Gaga"
album = "Die With A Smile"
duration = 180
art = "/DWS.png"
source = "/music/dws.mp3"

[[tracks]]
title = "Mockingbird"
artist = "Eminem"
source = "/music/mockingbird.mp3"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("ENCORE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("ENCORE__PLAYBACK__VOLUME");

    let s = Settings::load().unwrap();
    assert!(s.playback.shuffle);
    assert_eq!(s.playback.repeat, RepeatSetting::One);
    assert_eq!(s.playback.volume, 0.7);
    assert_eq!(s.playback.seed, Some(42));
    assert_eq!(s.controls.seek_seconds, 9);
    assert_eq!(s.ui.view, ViewSetting::Full);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.ui.time_separator, " / ");
    assert_eq!(s.logging.level, "encore=debug");
    assert_eq!(
        s.logging.file.as_deref(),
        Some(std::path::Path::new("/tmp/encore.log"))
    );
    assert_eq!(s.tracks.len(), 2);
    assert_eq!(s.tracks[0].duration, Some(180.0));
    assert_eq!(s.tracks[1].album, None);
    assert!(s.validate().is_ok());
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
volume = 0.9
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("ENCORE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("ENCORE__PLAYBACK__VOLUME", "0.25");

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.volume, 0.25);
}

#[test]
fn missing_config_file_yields_defaults() {
    let _lock = env_lock();
    let dir = tempfile::tempdir().unwrap();
    let _g1 = EnvGuard::set(
        "ENCORE_CONFIG_PATH",
        dir.path().join("absent.toml").to_str().unwrap(),
    );

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.repeat, RepeatSetting::Off);
    assert_eq!(s.playback.volume, 1.0);
    assert!(s.tracks.is_empty());
}

#[test]
fn repeat_aliases_parse() {
    #[derive(serde::Deserialize)]
    struct Wrapper {
        repeat: RepeatSetting,
    }

    for (raw, expected) in [
        ("off", RepeatSetting::Off),
        ("no-loop", RepeatSetting::Off),
        ("all", RepeatSetting::All),
        ("playlist", RepeatSetting::All),
        ("one", RepeatSetting::One),
        ("track", RepeatSetting::One),
    ] {
        let w: Wrapper = toml::from_str(&format!("repeat = \"{raw}\"")).unwrap();
        assert_eq!(w.repeat, expected, "alias {raw}");
    }
}

#[test]
fn validate_rejects_out_of_range_values() {
    let mut s = Settings::default();
    assert!(s.validate().is_ok());

    s.playback.volume = 1.5;
    assert!(s.validate().is_err());

    s.playback.volume = 0.5;
    s.controls.volume_step = 0.0;
    assert!(s.validate().is_err());

    s.controls.volume_step = 0.05;
    s.controls.seek_seconds = 0;
    assert!(s.validate().is_err());
}
