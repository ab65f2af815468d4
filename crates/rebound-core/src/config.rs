use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::animator::AnimatorKind;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefreshConfig {
    #[serde(default)]
    pub texts: RefreshTexts,
    #[serde(default)]
    pub animators: AnimatorDefaults,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub demo: DemoConfig,
}

/// Display texts shared by every animator.
/// Two-element arrays hold the `[top, bottom]` variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshTexts {
    #[serde(default = "default_pulling_text")]
    pub pulling: [String; 2],
    #[serde(default = "default_load_more_text")]
    pub load_more: [String; 2],
    #[serde(default = "default_release_to_refresh_text")]
    pub release_to_refresh: String,
    #[serde(default = "default_loading_text")]
    pub loading: String,
    #[serde(default = "default_refreshing_text")]
    pub refreshing: String,
    #[serde(default = "default_no_more_data_text")]
    pub no_more_data: String,
}

impl Default for RefreshTexts {
    fn default() -> Self {
        Self {
            pulling: default_pulling_text(),
            load_more: default_load_more_text(),
            release_to_refresh: default_release_to_refresh_text(),
            loading: default_loading_text(),
            refreshing: default_refreshing_text(),
            no_more_data: default_no_more_data_text(),
        }
    }
}

/// Animator built for each component kind when attaching
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimatorDefaults {
    #[serde(default = "default_pull_animator")]
    pub pull: AnimatorKind,
    #[serde(default = "default_auto_animator")]
    pub auto: AnimatorKind,
}

impl Default for AnimatorDefaults {
    fn default() -> Self {
        Self {
            pull: default_pull_animator(),
            auto: default_auto_animator(),
        }
    }
}

/// Easing curve applied to programmatic offset animations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    None,
    #[default]
    Linear,
    Cubic,
    Quintic,
    EaseOut,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Duration of the extend/restore offset animations
    #[serde(default = "default_animation_duration")]
    pub animation_duration_ms: u64,
    /// Easing used by extend/restore animations
    #[serde(default)]
    pub easing: EasingType,
    /// Duration of the bounce back after a drag ends out of range
    #[serde(default = "default_bounce_duration")]
    pub bounce_duration_ms: u64,
    /// Delay before an auto-load stops the opposite edge and fires
    #[serde(default = "default_cross_edge_delay")]
    pub cross_edge_delay_ms: u64,
    /// Delay before an auto-load resumes observing after stopping
    #[serde(default = "default_observe_release_delay")]
    pub observe_release_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            animation_duration_ms: default_animation_duration(),
            easing: EasingType::default(),
            bounce_duration_ms: default_bounce_duration(),
            cross_edge_delay_ms: default_cross_edge_delay(),
            observe_release_delay_ms: default_observe_release_delay(),
        }
    }
}

impl TimingConfig {
    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    pub fn bounce_duration(&self) -> Duration {
        Duration::from_millis(self.bounce_duration_ms)
    }

    pub fn cross_edge_delay(&self) -> Duration {
        Duration::from_millis(self.cross_edge_delay_ms)
    }

    pub fn observe_release_delay(&self) -> Duration {
        Duration::from_millis(self.observe_release_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Frame interval in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Points represented by one terminal row
    #[serde(default = "default_points_per_row")]
    pub points_per_row: f64,
    /// Simulated latency of a refresh or load
    #[serde(default = "default_load_latency")]
    pub load_latency_ms: u64,
    /// Items delivered per load
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Pages available before the footer reports no more data
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            points_per_row: default_points_per_row(),
            load_latency_ms: default_load_latency(),
            page_size: default_page_size(),
            max_pages: default_max_pages(),
        }
    }
}

fn default_pulling_text() -> [String; 2] {
    ["Pull to refresh".to_string(), "Pull to refresh".to_string()]
}

fn default_load_more_text() -> [String; 2] {
    ["Loading more".to_string(), "Loading more".to_string()]
}

fn default_release_to_refresh_text() -> String {
    "Release to refresh".to_string()
}

fn default_loading_text() -> String {
    "Loading...".to_string()
}

fn default_refreshing_text() -> String {
    "Refreshing...".to_string()
}

fn default_no_more_data_text() -> String {
    "No more data".to_string()
}

fn default_pull_animator() -> AnimatorKind {
    AnimatorKind::Pull
}

fn default_auto_animator() -> AnimatorKind {
    AnimatorKind::Auto
}

fn default_animation_duration() -> u64 {
    300
}

fn default_bounce_duration() -> u64 {
    250
}

fn default_cross_edge_delay() -> u64 {
    200
}

fn default_observe_release_delay() -> u64 {
    10
}

fn default_tick_rate() -> u64 {
    16
}

fn default_points_per_row() -> f64 {
    20.0
}

fn default_load_latency() -> u64 {
    800
}

fn default_page_size() -> usize {
    20
}

fn default_max_pages() -> usize {
    5
}

impl RefreshConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, defaulting when absent
    pub fn load_from(path: &std::path::Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &std::path::Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/rebound/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("rebound")
            .join("config.toml")
    }
}
