//! Command-line surface
//!
//! Argument definitions, command dispatch against a [`PermissionStore`], and
//! output rendering. Rendering functions are pure and return the text to print.

use crate::config::{AppConfig, OutputFormat, validate_config};
use crate::error::{AppError, ConfigError, Result};
use crate::model::Group;
use crate::parser::{ParseReport, ParseWarning, parse_with_report};
use crate::store::PermissionStore;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Query and edit permission group files
#[derive(Parser, Debug)]
#[command(name = "permgroup")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "PERMGROUP_CONFIG")]
    pub config: Option<String>,

    /// Permission file to read (overrides source.path)
    #[arg(short, long)]
    pub file: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Fail when the permission file produces parse warnings
    #[arg(long)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// Apply command-line overrides on top of the loaded configuration,
    /// then validate the result
    pub fn apply_overrides(&self, config: &mut AppConfig) -> std::result::Result<(), ConfigError> {
        if let Some(file) = &self.file {
            config.source.path = file.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if self.strict {
            config.parser.strict = true;
        }
        validate_config(config)
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List group names
    Groups,
    /// List players of a group, or of every group holding a permission
    Players(PlayersArgs),
    /// Show every group with its permissions and players
    Show,
    /// Report parse warnings for the permission file
    Check,
    /// Add a player to a group and show the group before and after
    AddPlayer { player: String, group: String },
    /// Remove a player from a group and show the remaining players
    RemovePlayer { player: String, group: String },
    /// Create an empty group with the given permissions
    AddGroup {
        name: String,
        #[arg(short, long = "permission")]
        permissions: Vec<String>,
    },
    /// Delete a group and list the remaining groups
    RemoveGroup { name: String },
}

#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
#[group(required = true, multiple = false)]
pub struct PlayersArgs {
    /// Group to list
    #[arg(short, long)]
    pub group: Option<String>,

    /// Permission to match (repeatable)
    #[arg(short, long = "permission")]
    pub permissions: Vec<String>,
}

/// Read the permission file at `path`
pub fn read_source(path: &Path) -> std::result::Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Source {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse `text` and execute `command` against it, returning the rendered output
pub fn run(command: &Command, text: &str, config: &AppConfig) -> Result<String> {
    let report = parse_with_report(text);
    let format = config.output.format;

    if config.parser.strict && !report.is_clean() {
        return Err(AppError::StrictParse {
            warnings: report.warnings.iter().map(ToString::to_string).collect(),
        });
    }

    let ParseReport { groups, warnings } = report;
    let mut store = PermissionStore::from_groups(groups.into_values());
    debug!(command = ?command, "Running command");

    match command {
        Command::Groups => render_names(&sorted_names(&store)?, format),
        Command::Players(PlayersArgs {
            group: Some(group), ..
        }) => render_names(store.players_in_group(group)?, format),
        Command::Players(PlayersArgs { permissions, .. }) => {
            render_names(&store.players_with_permissions(permissions)?, format)
        }
        Command::Show => {
            let mut groups: Vec<&Group> = store.groups()?.collect();
            groups.sort_by(|a, b| a.name.cmp(&b.name));
            render_groups(&groups, format)
        }
        Command::AddPlayer { player, group } => {
            let before = store.players_in_group(group)?.to_vec();
            let added = store.add_player(player, group)?;
            render_player_change(
                &PlayerChange {
                    group,
                    player,
                    applied: added,
                    before: &before,
                    after: store.players_in_group(group)?,
                },
                format,
            )
        }
        Command::RemovePlayer { player, group } => {
            let before = store.players_in_group(group)?.to_vec();
            store.remove_player(player, group)?;
            render_player_change(
                &PlayerChange {
                    group,
                    player,
                    applied: true,
                    before: &before,
                    after: store.players_in_group(group)?,
                },
                format,
            )
        }
        Command::AddGroup { name, permissions } => {
            store.add_group(name, permissions.iter().cloned())?;
            render_groups(&[store.group(name)?], format)
        }
        Command::RemoveGroup { name } => {
            store.remove_group(name)?;
            render_names(&sorted_names(&store)?, format)
        }
        Command::Check => render_warnings(&warnings, format),
    }
}

fn sorted_names(store: &PermissionStore) -> Result<Vec<String>> {
    let mut names = store.group_names()?;
    names.sort();
    Ok(names)
}

/// Render a list of names, one per line or as a JSON array
pub fn render_names(names: &[String], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(lines(names.iter().map(String::as_str))),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(names)?),
    }
}

/// Render groups with their permissions and players
pub fn render_groups(groups: &[&Group], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => {
            let mut out = String::new();
            for group in groups {
                out.push_str(&format!(
                    "{} [{}]\n",
                    group.name,
                    group.permissions.join(", ")
                ));
                for player in &group.players {
                    out.push_str(&format!("  {}\n", player));
                }
            }
            Ok(out)
        }
        OutputFormat::Json => Ok(serde_json::to_string_pretty(groups)?),
    }
}

/// Render parse warnings, or a short all-clear line when there are none
pub fn render_warnings(warnings: &[ParseWarning], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text if warnings.is_empty() => Ok("no warnings\n".to_string()),
        OutputFormat::Text => Ok(lines(warnings.iter().map(ToString::to_string))),
        OutputFormat::Json => {
            let entries: Vec<WarningEntry> = warnings
                .iter()
                .map(|w| WarningEntry {
                    line: w.line,
                    message: w.to_string(),
                })
                .collect();
            Ok(serde_json::to_string_pretty(&entries)?)
        }
    }
}

/// Membership change produced by `add-player` or `remove-player`
#[derive(Debug, Serialize)]
pub struct PlayerChange<'a> {
    pub group: &'a str,
    pub player: &'a str,
    /// Whether the store changed
    pub applied: bool,
    pub before: &'a [String],
    pub after: &'a [String],
}

#[derive(Debug, Serialize)]
struct WarningEntry {
    line: usize,
    message: String,
}

/// Render a membership change as before/after lists separated by `----`
pub fn render_player_change(change: &PlayerChange<'_>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => {
            let mut out = lines(change.before.iter().map(String::as_str));
            out.push_str("----\n");
            if !change.applied {
                out.push_str(&format!(
                    "{} is already in {}\n",
                    change.player, change.group
                ));
            }
            out.push_str(&lines(change.after.iter().map(String::as_str)));
            Ok(out)
        }
        OutputFormat::Json => Ok(serde_json::to_string_pretty(change)?),
    }
}

fn lines<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items.into_iter().fold(String::new(), |mut out, item| {
        out.push_str(item.as_ref());
        out.push('\n');
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_render_names_text() {
        let out = render_names(&names(&["Alice", "Bob"]), OutputFormat::Text).unwrap();
        assert_eq!(out, "Alice\nBob\n");
    }

    #[test]
    fn test_render_names_json() {
        let out = render_names(&names(&["Alice"]), OutputFormat::Json).unwrap();
        let parsed: Vec<String> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, vec!["Alice"]);
    }

    #[test]
    fn test_render_groups_text() {
        let mut group = Group::new("VIP", ["vip", "special"]);
        group.players.push("Alice".to_string());
        let out = render_groups(&[&group], OutputFormat::Text).unwrap();
        assert_eq!(out, "VIP [vip, special]\n  Alice\n");
    }

    #[test]
    fn test_render_empty_warnings() {
        assert_eq!(
            render_warnings(&[], OutputFormat::Text).unwrap(),
            "no warnings\n"
        );
    }

    #[test]
    fn test_render_rejected_player_change() {
        let before = names(&["Alice"]);
        let change = PlayerChange {
            group: "VIP",
            player: "Alice",
            applied: false,
            before: &before,
            after: &before,
        };
        let out = render_player_change(&change, OutputFormat::Text).unwrap();
        assert_eq!(out, "Alice\n----\nAlice is already in VIP\nAlice\n");
    }

    #[test]
    fn test_apply_overrides() {
        let args = Args::try_parse_from([
            "permgroup",
            "--file",
            "other.psc",
            "--format",
            "json",
            "--strict",
            "groups",
        ])
        .unwrap();

        let mut config = AppConfig::default();
        args.apply_overrides(&mut config).unwrap();
        assert_eq!(config.source.path, "other.psc");
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.parser.strict);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_invalid_log_level_override_rejected() {
        let args = Args::try_parse_from(["permgroup", "--log-level", "loud", "groups"]).unwrap();

        let mut config = AppConfig::default();
        let result = args.apply_overrides(&mut config);
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_log_level_override_accepted() {
        let args = Args::try_parse_from(["permgroup", "--log-level", "debug", "groups"]).unwrap();

        let mut config = AppConfig::default();
        args.apply_overrides(&mut config).unwrap();
        assert_eq!(config.logging.level, "debug");
    }
}
