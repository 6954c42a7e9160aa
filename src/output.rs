//! # Output Configuration
//!
//! Utilities for controlling CLI output appearance. Color support honors
//! the `--color=never|always|auto` flag, the `NO_COLOR` convention
//! (<https://no-color.org/>), `CLICOLOR`/`CLICOLOR_FORCE`, and `TERM=dumb`.

use std::env;

use console::style;

/// Output configuration for controlling colored output.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// `--color=always` forces colors on (overriding `NO_COLOR`),
    /// `--color=never` forces them off, and `auto` detects from the
    /// environment and terminal.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // The presence of NO_COLOR (even empty) disables colors.
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    /// Render a discovered-project marker.
    pub fn found(&self, text: &str) -> String {
        if self.use_color {
            style(text).green().to_string()
        } else {
            text.to_string()
        }
    }

    /// Render a problem/conflict marker.
    pub fn problem(&self, text: &str) -> String {
        if self.use_color {
            style(text).red().bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// Render a dimmed detail such as a revision marker.
    pub fn detail(&self, text: &str) -> String {
        if self.use_color {
            style(text).dim().to_string()
        } else {
            text.to_string()
        }
    }

    /// Create a configuration with colors always enabled.
    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Create a configuration with colors always disabled.
    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_always() {
        let config = OutputConfig::from_env_and_flag("always");
        assert!(config.use_color);
    }

    #[test]
    fn test_color_never() {
        let config = OutputConfig::from_env_and_flag("never");
        assert!(!config.use_color);
    }

    #[test]
    fn test_plain_markers_without_color() {
        let config = OutputConfig::without_color();
        assert_eq!(config.found("+"), "+");
        assert_eq!(config.problem("!"), "!");
        assert_eq!(config.detail("r123"), "r123");
    }

    #[test]
    fn test_colored_markers_carry_escapes() {
        let config = OutputConfig::with_color();
        assert!(config.problem("!").contains('!'));
    }
}
