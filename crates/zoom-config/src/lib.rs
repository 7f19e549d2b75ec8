//! Zoom configuration system
//!
//! This crate holds the theme tokens (durations and easing curves) and the
//! controller defaults consumed by `zoom-transition`. Settings are loaded from
//! `zoom.toml` and can be overridden through environment variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`ZoomConfig`].
    #[error("failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A token name did not match any known token.
    #[error("unknown token name: {0}")]
    UnknownToken(String),
}

/// Logical speed class, resolved to milliseconds through [`DurationTokens`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedClass {
    Shortest,
    Shorter,
    Short,
    Standard,
    Complex,
    /// Elements appearing on screen.
    EnteringScreen,
    /// Elements leaving the screen.
    LeavingScreen,
}

impl FromStr for SpeedClass {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "shortest" => Ok(Self::Shortest),
            "shorter" => Ok(Self::Shorter),
            "short" => Ok(Self::Short),
            "standard" => Ok(Self::Standard),
            "complex" => Ok(Self::Complex),
            "entering_screen" | "enteringscreen" => Ok(Self::EnteringScreen),
            "leaving_screen" | "leavingscreen" => Ok(Self::LeavingScreen),
            other => Err(ConfigError::UnknownToken(other.to_string())),
        }
    }
}

/// Named easing curve, resolved to a CSS timing function through [`EasingTokens`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingToken {
    EaseInOut,
    EaseOut,
    EaseIn,
    Sharp,
}

impl FromStr for EasingToken {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "ease_in_out" | "easeinout" => Ok(Self::EaseInOut),
            "ease_out" | "easeout" => Ok(Self::EaseOut),
            "ease_in" | "easein" => Ok(Self::EaseIn),
            "sharp" => Ok(Self::Sharp),
            other => Err(ConfigError::UnknownToken(other.to_string())),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ZoomConfig {
    /// Base duration per speed class
    pub durations: DurationTokens,
    /// Easing curves as CSS timing functions
    pub easing: EasingTokens,
    /// Controller defaults
    pub zoom: ZoomDefaults,
}

/// Duration tokens in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DurationTokens {
    pub shortest: f64,
    pub shorter: f64,
    pub short: f64,
    pub standard: f64,
    pub complex: f64,
    pub entering_screen: f64,
    pub leaving_screen: f64,
}

/// Easing tokens as CSS `<easing-function>` strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EasingTokens {
    pub ease_in_out: String,
    pub ease_out: String,
    pub ease_in: String,
    pub sharp: String,
}

/// Defaults applied to every controller unless its props override them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomDefaults {
    /// Speed class used for the enter direction
    pub enter: SpeedClass,
    /// Speed class used for the exit direction
    pub exit: SpeedClass,
    /// Fixed enter duration, bypassing the speed class
    pub enter_ms: Option<f64>,
    /// Fixed exit duration, bypassing the speed class
    pub exit_ms: Option<f64>,
    /// Easing token used for both directions
    pub easing: EasingToken,
    /// Raw CSS timing function, takes precedence over `easing`
    pub easing_css: Option<String>,
    /// Animate the first enter when mounted with `in = true`
    pub appear: bool,
    /// Lengthen durations for large elements
    pub size_scaling: bool,
    /// Upper bound for size-derived durations
    pub max_auto_duration_ms: f64,
    /// Size change (px) below which cached timings are reused
    pub size_epsilon_px: f64,
    /// Bound caller-driven completion with a timeout equal to the duration.
    /// When false the caller's signal is the only way a transition completes.
    pub manual_fallback: bool,
}

impl Default for DurationTokens {
    fn default() -> Self {
        Self {
            shortest: 150.0,
            shorter: 200.0,
            short: 250.0,
            standard: 300.0,
            complex: 375.0,
            entering_screen: 225.0,
            leaving_screen: 195.0,
        }
    }
}

impl DurationTokens {
    /// Milliseconds for a speed class
    pub fn get(&self, class: SpeedClass) -> f64 {
        match class {
            SpeedClass::Shortest => self.shortest,
            SpeedClass::Shorter => self.shorter,
            SpeedClass::Short => self.short,
            SpeedClass::Standard => self.standard,
            SpeedClass::Complex => self.complex,
            SpeedClass::EnteringScreen => self.entering_screen,
            SpeedClass::LeavingScreen => self.leaving_screen,
        }
    }
}

impl Default for EasingTokens {
    fn default() -> Self {
        Self {
            // Material standard curves
            ease_in_out: "cubic-bezier(0.4, 0, 0.2, 1)".to_string(),
            ease_out: "cubic-bezier(0.0, 0, 0.2, 1)".to_string(),
            ease_in: "cubic-bezier(0.4, 0, 1, 1)".to_string(),
            sharp: "cubic-bezier(0.4, 0, 0.6, 1)".to_string(),
        }
    }
}

impl EasingTokens {
    /// CSS string for an easing token
    pub fn get(&self, token: EasingToken) -> &str {
        match token {
            EasingToken::EaseInOut => &self.ease_in_out,
            EasingToken::EaseOut => &self.ease_out,
            EasingToken::EaseIn => &self.ease_in,
            EasingToken::Sharp => &self.sharp,
        }
    }
}

impl Default for ZoomDefaults {
    fn default() -> Self {
        Self {
            enter: SpeedClass::EnteringScreen,
            exit: SpeedClass::LeavingScreen,
            enter_ms: None,
            exit_ms: None,
            easing: EasingToken::EaseInOut,
            easing_css: None,
            appear: true,
            size_scaling: true,
            max_auto_duration_ms: 500.0,
            size_epsilon_px: 1.0,
            manual_fallback: true,
        }
    }
}

impl ZoomConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration from the default location (zoom.toml in the current directory)
    /// or return default configuration if the file doesn't exist or is invalid
    pub fn load_or_default() -> Self {
        match Self::load_from_file("zoom.toml") {
            Ok(config) => config,
            Err(ConfigError::Read { .. }) => Self::default(),
            Err(err) => {
                tracing::warn!("{err}; using default configuration");
                Self::default()
            }
        }
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        if let Ok(val) = std::env::var("ZOOM_ENTER_MS") {
            if let Ok(ms) = val.parse::<f64>() {
                self.zoom.enter_ms = Some(ms);
            }
        }
        if let Ok(val) = std::env::var("ZOOM_EXIT_MS") {
            if let Ok(ms) = val.parse::<f64>() {
                self.zoom.exit_ms = Some(ms);
            }
        }
        if let Ok(val) = std::env::var("ZOOM_EASING") {
            match val.parse::<EasingToken>() {
                Ok(token) => {
                    self.zoom.easing = token;
                    self.zoom.easing_css = None;
                }
                Err(_) => self.zoom.easing_css = Some(val),
            }
        }
        if let Ok(val) = std::env::var("ZOOM_APPEAR") {
            self.zoom.appear = parse_flag(&val);
        }
        if let Ok(val) = std::env::var("ZOOM_SIZE_SCALING") {
            self.zoom.size_scaling = parse_flag(&val);
        }
        if let Ok(val) = std::env::var("ZOOM_MANUAL_FALLBACK") {
            self.zoom.manual_fallback = parse_flag(&val);
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from zoom.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }

    /// CSS timing function selected by the controller defaults
    pub fn default_easing_css(&self) -> &str {
        self.zoom
            .easing_css
            .as_deref()
            .unwrap_or_else(|| self.easing.get(self.zoom.easing))
    }
}

fn parse_flag(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}
