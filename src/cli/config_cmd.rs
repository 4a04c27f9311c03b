//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::error::ConfigError;
use crate::domain::recording::Duration;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => {
            presenter.output(&store.path().to_string_lossy());
            Ok(())
        }
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let mut config = store.load().await?;
    match key {
        "input_device" => config.input_device = Some(value.to_string()),
        "max_duration" => {
            let duration =
                value
                    .parse::<Duration>()
                    .map_err(|e| ConfigError::ValidationError {
                        key: key.to_string(),
                        message: e.to_string(),
                    })?;
            config.max_duration = Some(duration.to_string());
        }
        "audio_cues" => config.audio_cues = Some(parse_bool(key, value)?),
        _ => unreachable!(), // checked above
    }

    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));
    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let config = store.load().await?;
    let value = match key {
        "input_device" => config.input_device,
        "max_duration" => config.max_duration,
        "audio_cues" => config.audio_cues.map(|b| b.to_string()),
        _ => unreachable!(),
    };

    presenter.output(value.as_deref().unwrap_or(NOT_SET));
    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    presenter.key_value(
        "input_device",
        config.input_device.as_deref().unwrap_or(NOT_SET),
    );
    presenter.key_value(
        "max_duration",
        config.max_duration.as_deref().unwrap_or(NOT_SET),
    );
    presenter.key_value(
        "audio_cues",
        &config
            .audio_cues
            .map(|b| b.to_string())
            .unwrap_or_else(|| NOT_SET.to_string()),
    );
    Ok(())
}

fn check_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        })
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: "Value must be 'true' or 'false'".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::AppConfig;
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Config store held in memory
    #[derive(Default)]
    struct MemoryStore {
        config: Mutex<Option<AppConfig>>,
    }

    #[async_trait]
    impl ConfigStore for MemoryStore {
        async fn load(&self) -> Result<AppConfig, ConfigError> {
            Ok(self.config.lock().unwrap().clone().unwrap_or_default())
        }

        async fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
            *self.config.lock().unwrap() = Some(config.clone());
            Ok(())
        }

        fn path(&self) -> PathBuf {
            PathBuf::from("/tmp/vox/config.toml")
        }

        fn exists(&self) -> bool {
            self.config.lock().unwrap().is_some()
        }

        async fn init(&self) -> Result<(), ConfigError> {
            if self.exists() {
                return Err(ConfigError::AlreadyExists(self.path().display().to_string()));
            }
            self.save(&AppConfig::defaults()).await
        }
    }

    #[test]
    fn parse_bool_values() {
        assert!(parse_bool("k", "yes").unwrap());
        assert!(!parse_bool("k", "OFF").unwrap());
        assert!(parse_bool("k", "maybe").is_err());
    }

    #[tokio::test]
    async fn set_normalizes_max_duration() {
        let store = MemoryStore::default();
        let presenter = Presenter::new();

        handle_set(&store, &presenter, "max_duration", "90s").await.unwrap();
        assert_eq!(
            store.load().await.unwrap().max_duration.as_deref(),
            Some("1m30s")
        );
    }

    #[tokio::test]
    async fn set_rejects_invalid_values() {
        let store = MemoryStore::default();
        let presenter = Presenter::new();

        let err = handle_set(&store, &presenter, "max_duration", "soon")
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));

        let err = handle_set(&store, &presenter, "audio_cues", "loud")
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
        assert!(!store.exists());
    }

    #[tokio::test]
    async fn unknown_key_is_rejected() {
        let store = MemoryStore::default();
        let presenter = Presenter::new();

        let err = handle_get(&store, &presenter, "api_key").await.unwrap_err();
        assert!(err.to_string().contains("input_device, max_duration, audio_cues"));
    }

    #[tokio::test]
    async fn set_keeps_other_keys() {
        let store = MemoryStore::default();
        let presenter = Presenter::new();

        handle_set(&store, &presenter, "input_device", "USB Mic").await.unwrap();
        handle_set(&store, &presenter, "audio_cues", "false").await.unwrap();

        let config = store.load().await.unwrap();
        assert_eq!(config.input_device.as_deref(), Some("USB Mic"));
        assert_eq!(config.audio_cues, Some(false));
    }
}
