use crate::plugin::{CommandAccess, CommandTable};
use crate::sync::SyncReport;
use colored::{Color, Colorize};

/// Pretty printing utilities for CLI output
pub struct Formatter;

impl Formatter {
    /// Format one command line of the table listing.
    pub fn format_command(name: &str, description: &str, access: &CommandAccess) -> String {
        let access = match access {
            CommandAccess::Unrestricted => "everyone".to_string(),
            CommandAccess::Restricted(tags) => format!("restricted [{}]", tags.join(", ")),
        };
        format!("/{:<20} {:<24} {}", name, access, description)
    }

    /// Format the whole command table.
    pub fn format_table(table: &CommandTable) -> String {
        if table.is_empty() {
            return "No commands loaded".to_string();
        }

        let stats = table.statistics();
        let mut lines = vec![format!(
            "{} commands ({} restricted)",
            stats.total, stats.restricted
        )];
        lines.extend(table.declarations().iter().filter_map(|decl| {
            let entry = table.get(&decl.name)?;
            Some(format!(
                "  {}",
                Self::format_command(&decl.name, &decl.description, entry.access())
            ))
        }));
        lines.join("\n")
    }

    /// Format the result of one guild registration.
    pub fn format_sync_report(report: &SyncReport) -> String {
        let mut line = format!(
            "guild {}: {} commands registered, {} permission grants",
            report.guild, report.declared, report.granted
        );
        if !report.drifted.is_empty() {
            line.push_str(&format!(
                ", no local handler for: {}",
                report.drifted.join(", ")
            ));
        }
        line
    }

    /// Format an informational message in blue.
    pub fn info(message: impl AsRef<str>) -> String {
        Self::status(Tone::Info, message)
    }

    /// Format a success message in green.
    pub fn success(message: impl AsRef<str>) -> String {
        Self::status(Tone::Success, message)
    }

    /// Format a warning message in yellow.
    pub fn warning(message: impl AsRef<str>) -> String {
        Self::status(Tone::Warning, message)
    }

    /// Format an error message in red.
    pub fn error(message: impl AsRef<str>) -> String {
        Self::status(Tone::Error, message)
    }

    /// Color a status line by its tone
    pub fn status(tone: Tone, message: impl AsRef<str>) -> String {
        message.as_ref().color(tone.color()).to_string()
    }

    /// Force colors on or off for every later status line
    pub fn configure_colors(enable: bool) {
        colored::control::set_override(enable);
    }

    /// Turn colors off when `NO_COLOR` is set; otherwise leave the
    /// terminal detection of `colored` in charge.
    pub fn configure_colors_from_env() {
        if std::env::var_os("NO_COLOR").is_some() {
            Self::configure_colors(false);
        }
    }
}

/// Kind of status line printed by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Warning,
    Error,
}

impl Tone {
    fn color(self) -> Color {
        match self {
            Tone::Info => Color::Blue,
            Tone::Success => Color::Green,
            Tone::Warning => Color::Yellow,
            Tone::Error => Color::Red,
        }
    }
}
