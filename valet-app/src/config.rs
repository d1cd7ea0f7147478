use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_assistant_name() -> String {
    "Valet".to_string()
}

fn default_user_name() -> String {
    "User".to_string()
}

fn default_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_model() -> String {
    "llama-3.1-8b-instant".to_string()
}

fn default_history_limit() -> usize {
    40
}

fn default_image_api_url() -> String {
    "https://api-inference.huggingface.co/models/CompVis/stable-diffusion-v1-4".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_task_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_assistant_name")]
    pub assistant_name: String,
    #[serde(default = "default_user_name")]
    pub user_name: String,
    #[serde(default = "default_task_timeout_secs")]
    pub task_timeout_secs: u64,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub image: ImageConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    #[serde(default = "default_image_api_url")]
    pub api_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            assistant_name: default_assistant_name(),
            user_name: default_user_name(),
            task_timeout_secs: default_task_timeout_secs(),
            chat: ChatConfig::default(),
            image: ImageConfig::default(),
            paths: PathsConfig::default(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            history_limit: default_history_limit(),
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            api_url: default_image_api_url(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Config {
    /// Load config.toml from the working directory, falling back to
    /// defaults when it does not exist. Environment variables win over
    /// both; API keys come only from the environment.
    pub fn load() -> Result<Self> {
        let config_path = PathBuf::from("config.toml");
        let mut config = if config_path.exists() {
            let content =
                std::fs::read_to_string(&config_path).context("Failed to read config.toml")?;
            toml::from_str(&content).context("Failed to parse config.toml")?
        } else {
            Config::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(name) = std::env::var("VALET_ASSISTANT_NAME") {
            self.assistant_name = name;
        }
        if let Ok(name) = std::env::var("VALET_USER_NAME") {
            self.user_name = name;
        }
        if let Ok(url) = std::env::var("VALET_CHAT_BASE_URL") {
            self.chat.base_url = url;
        }
        if let Ok(model) = std::env::var("VALET_CHAT_MODEL") {
            self.chat.model = model;
        }
        if let Ok(url) = std::env::var("VALET_IMAGE_API_URL") {
            self.image.api_url = url;
        }
        if let Ok(dir) = std::env::var("VALET_DATA_DIR") {
            self.paths.data_dir = PathBuf::from(dir);
        }
    }

    pub fn api_key() -> Option<String> {
        std::env::var("VALET_API_KEY").ok()
    }

    pub fn image_api_key() -> Option<String> {
        std::env::var("VALET_IMAGE_API_KEY").ok().or_else(Self::api_key)
    }

    pub fn chat_log_dir(&self) -> PathBuf {
        self.paths.data_dir.join("chatlogs")
    }

    pub fn content_dir(&self) -> PathBuf {
        self.paths.data_dir.join("content")
    }

    pub fn image_dir(&self) -> PathBuf {
        self.paths.data_dir.join("images")
    }

    pub fn jobs_state_file(&self) -> PathBuf {
        self.paths.data_dir.join("jobs.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_complete() {
        let config = Config::default();
        assert_eq!(config.assistant_name, "Valet");
        assert_eq!(config.chat.model, "llama-3.1-8b-instant");
        assert_eq!(config.task_timeout_secs, 60);
        assert_eq!(config.paths.data_dir, PathBuf::from("./data"));
    }

    #[test]
    fn test_partial_toml_fills_missing_fields() {
        let config: Config = toml::from_str(
            r#"
            assistant_name = "Jeeves"

            [chat]
            model = "mixtral-8x7b-32768"
            "#,
        )
        .unwrap();
        assert_eq!(config.assistant_name, "Jeeves");
        assert_eq!(config.chat.model, "mixtral-8x7b-32768");
        assert_eq!(config.chat.base_url, default_base_url());
        assert_eq!(config.user_name, "User");
    }

    #[test]
    fn test_derived_paths_hang_off_data_dir() {
        let mut config = Config::default();
        config.paths.data_dir = PathBuf::from("/tmp/valet");
        assert_eq!(config.chat_log_dir(), PathBuf::from("/tmp/valet/chatlogs"));
        assert_eq!(config.jobs_state_file(), PathBuf::from("/tmp/valet/jobs.json"));
    }
}
