//! Configuration types for topology synthesis and rendering.
//!
//! Every type implements [`serde::Deserialize`] so the CLI can load it from
//! a TOML file; every field is optional and falls back to its default.
//!
//! - [`AppConfig`] - Top-level configuration combining synthesis and style settings.
//! - [`SynthesisConfig`] - Which edge directions are resolved and how much is reported.
//! - [`StyleConfig`] - Icons and colors of the rendered graph.
//!
//! # Example
//!
//! ```
//! # use tfviz::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(!config.synthesis().ignore_ingress());
//! assert_eq!(config.style().public_edge_color().unwrap(), "red");
//! ```

use std::{path::PathBuf, str::FromStr};

use color::DynamicColor;
use serde::Deserialize;

const DEFAULT_PUBLIC_EDGE_COLOR: &str = "red";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Synthesis configuration section.
    #[serde(default)]
    synthesis: SynthesisConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    pub fn new(synthesis: SynthesisConfig, style: StyleConfig) -> Self {
        Self { synthesis, style }
    }

    pub fn synthesis(&self) -> &SynthesisConfig {
        &self.synthesis
    }

    pub fn synthesis_mut(&mut self) -> &mut SynthesisConfig {
        &mut self.synthesis
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Switches honored by a synthesis pass.
///
/// None of them change where nodes are placed. The direction switches decide
/// whether security-group rules of that direction are turned into edges; the
/// other two only change how much is reported.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SynthesisConfig {
    /// Skip ingress rules.
    #[serde(default)]
    ignore_ingress: bool,

    /// Skip egress rules.
    #[serde(default)]
    ignore_egress: bool,

    /// Report unsupported resources and trace every graph mutation.
    #[serde(default)]
    verbose: bool,

    /// Do not report warning diagnostics.
    #[serde(default)]
    ignore_warnings: bool,
}

impl SynthesisConfig {
    pub fn ignore_ingress(&self) -> bool {
        self.ignore_ingress
    }

    pub fn ignore_egress(&self) -> bool {
        self.ignore_egress
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn ignore_warnings(&self) -> bool {
        self.ignore_warnings
    }

    pub fn set_ignore_ingress(&mut self, ignore: bool) -> &mut Self {
        self.ignore_ingress = ignore;
        self
    }

    pub fn set_ignore_egress(&mut self, ignore: bool) -> &mut Self {
        self.ignore_egress = ignore;
        self
    }

    pub fn set_verbose(&mut self, verbose: bool) -> &mut Self {
        self.verbose = verbose;
        self
    }

    pub fn set_ignore_warnings(&mut self, ignore: bool) -> &mut Self {
        self.ignore_warnings = ignore;
        self
    }
}

/// Visual styling of the rendered graph.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StyleConfig {
    /// Directory holding `ec2.png`, `db.png`, `alb.png`, `asg.png` and
    /// `internet.png`. Without it, nodes are drawn as plain shapes.
    #[serde(default)]
    icons_dir: Option<PathBuf>,

    /// Color of edges to and from the public internet.
    #[serde(default)]
    public_edge_color: Option<String>,

    /// Background color of the whole graph.
    #[serde(default)]
    background_color: Option<String>,
}

impl StyleConfig {
    pub fn new(
        icons_dir: Option<PathBuf>,
        public_edge_color: Option<String>,
        background_color: Option<String>,
    ) -> Self {
        Self {
            icons_dir,
            public_edge_color,
            background_color,
        }
    }

    /// Path of icon `file` inside the configured icons directory.
    pub fn icon(&self, file: &str) -> Option<String> {
        self.icons_dir
            .as_ref()
            .map(|dir| dir.join(file).display().to_string())
    }

    /// Returns the public edge color, `red` when none is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color is not a valid CSS color.
    pub fn public_edge_color(&self) -> Result<&str, String> {
        match &self.public_edge_color {
            Some(color) => validate_color(color).map(|()| color.as_str()),
            None => Ok(DEFAULT_PUBLIC_EDGE_COLOR),
        }
    }

    /// Returns the background color, or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color is not a valid CSS color.
    pub fn background_color(&self) -> Result<Option<&str>, String> {
        self.background_color
            .as_deref()
            .map(|color| validate_color(color).map(|()| color))
            .transpose()
    }
}

fn validate_color(color: &str) -> Result<(), String> {
    DynamicColor::from_str(color)
        .map(|_| ())
        .map_err(|err| format!("invalid color `{color}` in config: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_colors() {
        let style = StyleConfig::new(None, Some("#00ff00".to_string()), Some("white".to_string()));
        assert_eq!(style.public_edge_color().unwrap(), "#00ff00");
        assert_eq!(style.background_color().unwrap(), Some("white"));

        let style = StyleConfig::new(None, Some("not a color".to_string()), None);
        assert!(style.public_edge_color().is_err());
        assert_eq!(style.background_color().unwrap(), None);
    }

    #[test]
    fn test_icon_paths() {
        let style = StyleConfig::new(Some(PathBuf::from("icons")), None, None);
        assert_eq!(style.icon("ec2.png").as_deref(), Some("icons/ec2.png"));
        assert!(StyleConfig::default().icon("ec2.png").is_none());
    }

    #[test]
    fn test_synthesis_setters() {
        let mut config = AppConfig::default();
        config
            .synthesis_mut()
            .set_ignore_egress(true)
            .set_verbose(true);

        assert!(config.synthesis().ignore_egress());
        assert!(config.synthesis().verbose());
        assert!(!config.synthesis().ignore_ingress());
        assert!(!config.synthesis().ignore_warnings());
    }
}
