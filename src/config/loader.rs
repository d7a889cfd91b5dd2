//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/apiscribe/config.toml)
//! 3. Project config (.apiscribe/config.toml)
//! 4. Environment variables (APISCRIBE_* prefix, `__` separates nesting levels)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::types::{Result, ScribeError};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain using Figment:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        let project_path = Self::project_config_path();
        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        figment = figment.merge(Self::env_layer("APISCRIBE_"));

        Self::extract(figment)
    }

    /// `{prefix}LLM__MIN_INTERVAL_MS` -> `llm.min_interval_ms`
    ///
    /// Section and key are split on `__` only; single underscores stay inside
    /// key names such as `min_interval_ms`.
    fn env_layer(prefix: &str) -> Env {
        Env::prefixed(prefix).split("__").lowercase(true)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path));
        Self::extract(figment)
    }

    fn extract(figment: Figment) -> Result<Config> {
        let config: Config = figment
            .extract()
            .map_err(|e| ScribeError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/apiscribe/)
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .map(|p| p.join("apiscribe"))
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get project data directory
    pub fn project_dir() -> PathBuf {
        PathBuf::from(".apiscribe")
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        Self::project_dir().join("config.toml")
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Show config file paths
    pub fn show_path() {
        println!("Configuration paths:");
        println!();

        if let Some(global) = Self::global_config_path() {
            let exists = if global.exists() { "✓" } else { "✗" };
            println!("  Global:  {} {}", exists, global.display());
        } else {
            println!("  Global:  (not available)");
        }

        let project = Self::project_config_path();
        let exists = if project.exists() { "✓" } else { "✗" };
        println!("  Project: {} {}", exists, project.display());
    }

    /// Render the effective configuration in the requested format
    pub fn render_config(config: &Config, format: &str) -> Result<String> {
        match format {
            "json" => Ok(serde_json::to_string_pretty(config)?),
            "yaml" => Ok(serde_yaml::to_string(config)?),
            _ => toml::to_string_pretty(config).map_err(|e| ScribeError::Config(e.to_string())),
        }
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Initialize global configuration
    pub fn init_global(force: bool) -> Result<PathBuf> {
        let global_dir = Self::global_dir().ok_or_else(|| {
            ScribeError::Config("Cannot determine global config directory".to_string())
        })?;

        fs::create_dir_all(&global_dir)?;

        let config_path = global_dir.join("config.toml");
        Self::write_default(&config_path, force)?;
        Ok(config_path)
    }

    /// Initialize project configuration
    pub fn init_project(force: bool) -> Result<PathBuf> {
        let project_dir = Self::project_dir();
        fs::create_dir_all(&project_dir)?;

        let config_path = project_dir.join("config.toml");
        Self::write_default(&config_path, force)?;
        Ok(config_path)
    }

    fn write_default(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            info!("Config exists: {}", path.display());
            return Ok(());
        }

        fs::write(path, Self::default_config_content())?;
        info!("Created config: {}", path.display());
        Ok(())
    }

    /// Default config file content (TOML)
    fn default_config_content() -> String {
        r#"# apiscribe configuration
# Project settings in .apiscribe/config.toml override ~/.config/apiscribe/config.toml.
# API keys are never read from this file: pass --api-key or set GEMINI_API_KEY.

version = "1.0"

[discovery]
base_url = "https://www.googleapis.com/discovery/v1"
timeout_secs = 30

[llm]
provider = "gemini"
# model = "gemini-1.5-flash"
temperature = 0.3
top_p = 0.95
top_k = 40
max_tokens = 512
# Fixed wait before every generation call
min_interval_ms = 1200

[generation]
ai_intro = true
# Reuse per-method AI content between the PDF and the notebook
reuse_content = false

[output]
dir = "generated_docs"
unique_names = false

[server]
host = "0.0.0.0"
port = 5000
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_content_parses() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, ConfigLoader::default_config_content()).unwrap();

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.llm.min_interval_ms, 1200);
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "[output]\ndir = \"out\"\nunique_names = true\n[generation]\nreuse_content = true\n",
        )
        .unwrap();

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.output.dir, PathBuf::from("out"));
        assert!(config.output.unique_names);
        assert!(config.generation.reuse_content);
        assert_eq!(config.llm.provider, "gemini");
    }

    #[test]
    fn test_env_keys_split_on_double_underscore() {
        // SAFETY: the prefix is unique to this test
        unsafe {
            std::env::set_var("APISCRIBE_ENVSPLIT_LLM__MIN_INTERVAL_MS", "1500");
            std::env::set_var("APISCRIBE_ENVSPLIT_OUTPUT__UNIQUE_NAMES", "true");
        }

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(ConfigLoader::env_layer("APISCRIBE_ENVSPLIT_"))
            .extract()
            .unwrap();

        assert_eq!(config.llm.min_interval_ms, 1500);
        assert!(config.output.unique_names);
    }

    #[test]
    fn test_invalid_file_value_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[llm]\ntemperature = 5.0\n").unwrap();

        assert!(ConfigLoader::load_from_file(&path).is_err());
    }

    #[test]
    fn test_render_config_formats() {
        let config = Config::default();
        let json = ConfigLoader::render_config(&config, "json").unwrap();
        assert!(json.contains("\"provider\": \"gemini\""));

        let yaml = ConfigLoader::render_config(&config, "yaml").unwrap();
        assert!(yaml.contains("provider: gemini"));

        let toml_out = ConfigLoader::render_config(&config, "text").unwrap();
        assert!(toml_out.contains("[llm]"));
    }
}
