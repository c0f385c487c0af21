//! User configuration.
//!
//! A TOML file with rule color overrides, disabled built-ins, custom rules and a few display
//! defaults. Every field is optional. When no `--config` path is given the first existing file
//! among `$XDG_CONFIG_HOME/tilo/config.toml`, `~/.config/tilo/config.toml` and `~/.tilo.toml`
//! is used; finding none means defaults.

use crate::error::{Result, TiloError};
use crate::highlight::{build_rules, default_rules, CustomRule, Rule};
use crate::render::StatusPosition;
use log::{debug, info};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// One `[[custom_rules]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CustomRuleConfig {
    pub pattern: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl From<&CustomRuleConfig> for CustomRule {
    fn from(config: &CustomRuleConfig) -> Self {
        CustomRule {
            name: config.name.clone(),
            pattern: config.pattern.clone(),
            color: config.color.clone(),
            style: config.style.clone(),
            enabled: config.enabled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rule name to color name
    pub colors: HashMap<String, String>,
    /// Built-in rules to switch off
    pub disable_builtin: Vec<String>,
    pub custom_rules: Vec<CustomRuleConfig>,
    /// `"top"` or `"bottom"`
    pub status_bar: String,
    /// Whether the line-number gutter starts visible
    pub line_numbers: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            colors: HashMap::new(),
            disable_builtin: Vec::new(),
            custom_rules: Vec::new(),
            status_bar: String::new(),
            line_numbers: true,
        }
    }
}

impl Config {
    /// Parse and normalise TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(text).map_err(|e| TiloError::config(e.to_string()))?;
        config.normalize();
        Ok(config)
    }

    /// Read a configuration file. Any failure is fatal.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            TiloError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config = Self::from_toml(&text).map_err(|e| match e {
            TiloError::ConfigError { message } => {
                TiloError::config(format!("{}: {message}", path.display()))
            }
            other => other,
        })?;
        info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load from `explicit` if given, otherwise from the first discovered file.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match discover() {
            Some(path) => Self::from_file(&path),
            None => {
                debug!("no configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn normalize(&mut self) {
        self.colors = self
            .colors
            .drain()
            .map(|(name, color)| (name.to_lowercase(), color.to_lowercase()))
            .collect();
        for name in &mut self.disable_builtin {
            *name = name.to_lowercase();
        }
        for rule in &mut self.custom_rules {
            rule.color = rule.color.to_lowercase();
            rule.style = rule.style.to_lowercase();
        }
        self.status_bar = self.status_bar.trim().to_lowercase();
    }

    pub fn status_position(&self) -> StatusPosition {
        if self.status_bar == "top" {
            StatusPosition::Top
        } else {
            StatusPosition::Bottom
        }
    }

    pub fn custom_rules(&self) -> Vec<CustomRule> {
        self.custom_rules.iter().map(CustomRule::from).collect()
    }

    /// Built-in rules with this configuration applied, custom rules appended.
    pub fn rules(&self) -> Result<Vec<Rule>> {
        build_rules(
            default_rules()?,
            &self.colors,
            &self.disable_builtin,
            &self.custom_rules(),
        )
    }
}

/// Configuration file candidates in lookup order.
pub fn candidate_paths(xdg_config_home: Option<PathBuf>, home: Option<PathBuf>) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(xdg) = xdg_config_home.filter(|p| !p.as_os_str().is_empty()) {
        paths.push(xdg.join("tilo").join("config.toml"));
    }
    if let Some(home) = home {
        paths.push(home.join(".config").join("tilo").join("config.toml"));
        paths.push(home.join(".tilo.toml"));
    }
    paths
}

/// First existing configuration file.
pub fn discover() -> Option<PathBuf> {
    let xdg = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from);
    candidate_paths(xdg, dirs::home_dir())
        .into_iter()
        .find(|path| path.is_file())
}
