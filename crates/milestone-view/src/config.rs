use crate::events::AppEvent;
use crate::icon::IconName;
use async_channel::Sender;
use directories::ProjectDirs;
use milestone::Style;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StateConfig {
    pub title: Option<String>,
    #[serde(default)]
    pub active: bool,
    pub icon_active: Option<IconName>,
    pub icon_inactive: Option<IconName>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub style: Style,
    #[serde(default)]
    pub states: Vec<StateConfig>,
}

impl Config {
    /// The configured style, keeping an activity override set at runtime
    /// when the file does not name one.
    pub fn style_with_override(&self, current: Option<usize>) -> Style {
        let mut style = self.style.clone();
        style.activity_index = style.activity_index.or(current);
        style
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

pub fn get_config_path() -> Result<std::path::PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "troia", "milestone").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(
            config::Environment::with_prefix("MILESTONE")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(s.try_deserialize()?)
}

/// Parses a config document without touching the filesystem.
pub fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;

    Ok(s.try_deserialize()?)
}

fn default_config() -> Config {
    parse_config(DEFAULT_CONFIG).unwrap_or_else(|e| {
        log::error!("Bundled default config is invalid: {}", e);
        Config::default()
    })
}

/// Loads the user config, writing the bundled default on first run.
pub fn load_or_setup() -> Config {
    if let Ok(path) = get_config_path()
        && !path.exists()
    {
        if let Err(e) = write_default_config() {
            log::warn!("Failed to write default config: {}", e);
        }
        return default_config();
    }

    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load config, using defaults: {}", e);
            default_config()
        }
    }
}

pub fn write_default_config() -> std::io::Result<std::path::PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", ConfigError::from(e));
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", ConfigError::from(e));
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use milestone::style::LayoutMode;

    #[test]
    fn test_default_config_parses() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        let titles: Vec<_> = config
            .states
            .iter()
            .map(|s| s.title.as_deref().unwrap_or_default())
            .collect();

        assert_eq!(
            titles,
            vec!["Awaiting Approval", "Packaging", "On My Way", "Delivered"]
        );
        assert_eq!(
            config.states.iter().filter(|s| s.active).count(),
            2,
            "default timeline stops at packaging"
        );
    }

    #[test]
    fn test_partial_config() {
        let config = parse_config(
            r##"
            [style]
            circle_active_color = "#2a7ae2"
            circle_max_size = 64.0
            activity_index = 1
            layout = "leading"

            [[states]]
            title = "Ordered"
            active = true
            icon_active = "emblem-ok"

            [[states]]
            title = "Shipped"
            "##,
        )
        .unwrap();

        assert_eq!(config.style.circle_active_color.to_string(), "#2a7ae2ff");
        assert_eq!(config.style.circle_max_size, Some(64.0));
        assert_eq!(config.style.activity_index, Some(1));
        assert_eq!(config.style.layout, LayoutMode::Leading);
        assert_eq!(config.style.separator_length, 10.0);

        assert_eq!(config.states.len(), 2);
        assert_eq!(
            config.states[0].icon_active,
            Some(IconName::new("emblem-ok"))
        );
        assert_eq!(
            config.states[1],
            StateConfig {
                title: Some("Shipped".to_string()),
                ..StateConfig::default()
            }
        );
    }

    #[test]
    fn test_reload_keeps_runtime_override() {
        let config = parse_config("[style]\nseparator_length = 4.0").unwrap();
        let style = config.style_with_override(Some(2));
        assert_eq!(style.activity_index, Some(2));
        assert_eq!(style.separator_length, 4.0);
        assert_eq!(config.style_with_override(None).activity_index, None);

        let pinned = parse_config("[style]\nactivity_index = 0").unwrap();
        assert_eq!(pinned.style_with_override(Some(2)).activity_index, Some(0));
    }

    #[test]
    fn test_empty_config() {
        let config = parse_config("").unwrap();
        assert!(config.states.is_empty());
        assert_eq!(config.style, Style::default());
    }

    #[test]
    fn test_state_config_json() {
        let state: StateConfig =
            serde_json::from_str(r#"{"title": "Delivered", "icon_inactive": "/tmp/x.png"}"#)
                .unwrap();
        assert!(!state.active);
        assert_eq!(state.icon_inactive.as_deref().map(String::as_str), Some("/tmp/x.png"));
    }
}
