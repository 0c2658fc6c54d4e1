//! # Terminal Output
//!
//! Controls how the CLI decorates its human-readable output. Log lines go
//! through `log`/`env_logger`; this module only covers the summary and plan
//! listings printed to stdout.
//!
//! Colors and emoji are used when:
//! - `--color=always` is given, or
//! - `--color=auto` (the default) is given, `NO_COLOR` is unset, `TERM` is
//!   not `dumb`, and stdout supports colors.

use console::style;
use std::env;

/// Kinds of status markers printed in front of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Ok,
    Warn,
    Error,
    Info,
    Plan,
}

impl Marker {
    fn emoji(self) -> &'static str {
        match self {
            Marker::Ok => "✅",
            Marker::Warn => "⚠️",
            Marker::Error => "❌",
            Marker::Info => "📊",
            Marker::Plan => "🔎",
        }
    }

    fn plain(self) -> &'static str {
        match self {
            Marker::Ok => "[OK]",
            Marker::Warn => "[WARN]",
            Marker::Error => "[ERR]",
            Marker::Info => "[INFO]",
            Marker::Plan => "[PLAN]",
        }
    }
}

/// Output configuration for controlling colors and emoji.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub use_color: bool,
}

impl OutputConfig {
    /// Build from the `--color` flag value: `always`, `never` or `auto`.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };
        Self { use_color }
    }

    fn detect_color_support() -> bool {
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }
        console::Term::stdout().features().colors_supported()
    }

    pub fn plain() -> Self {
        Self { use_color: false }
    }

    /// The marker as emoji, or as bracketed text without colors.
    pub fn marker(&self, marker: Marker) -> &'static str {
        if self.use_color {
            marker.emoji()
        } else {
            marker.plain()
        }
    }

    /// A repository or file name, bold when colors are on.
    pub fn name(&self, name: &str) -> String {
        if self.use_color {
            style(name).bold().to_string()
        } else {
            name.to_string()
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}
