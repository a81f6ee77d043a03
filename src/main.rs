//! CLI entry point for shortcut-editor
//!
//! Provides a command-line interface for listing and searching actions,
//! checking for conflicts, assigning and resetting shortcuts, and exporting
//! the persisted customization record.

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::*;
use shortcut_editor::config::{serialize_customizations, DEFAULT_SETTINGS_PATH};
use shortcut_editor::core::{ActionId, AssignOutcome, Filter, FilterTarget, MatchMode, Shortcut, ShortcutState};
use shortcut_editor::ui::Controller;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Printed after the conflict report of `check`
const DUPLICATE_NOTICE: &str =
    "Each shortcut above is bound to more than one action; reassign or reset the duplicates.";

#[derive(Parser)]
#[command(name = "shortcut-editor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every subcommand
#[derive(Args)]
struct Files {
    /// Path to the action manifest
    #[arg(short, long)]
    manifest: PathBuf,

    /// Path to the customization settings file
    #[arg(short, long, default_value = DEFAULT_SETTINGS_PATH)]
    settings: PathBuf,

    /// First segment of every action identity
    #[arg(long, default_value = "app")]
    domain: String,
}

#[derive(Subcommand)]
enum Commands {
    /// List actions as a context → category → action tree
    List {
        #[command(flatten)]
        files: Files,

        /// Search text (empty shows everything)
        #[arg(short, long, default_value = "")]
        query: String,

        /// What the query is matched against
        #[arg(long, value_enum, default_value_t = SearchBy::Name)]
        by: SearchBy,

        /// How the query is matched
        #[arg(long = "match", value_enum, default_value_t = SearchMode::Contains)]
        mode: SearchMode,

        /// Only show these contexts (repeatable)
        #[arg(short, long)]
        context: Vec<String>,

        /// Only show actions whose shortcut differs from the default
        #[arg(long, conflicts_with = "default")]
        customized: bool,

        /// Only show actions still on their default shortcut
        #[arg(long)]
        default: bool,
    },

    /// Check for actions sharing a shortcut
    Check {
        #[command(flatten)]
        files: Files,
    },

    /// Assign a shortcut to an action and save
    Assign {
        #[command(flatten)]
        files: Files,

        /// Action identity, e.g. app.File.General.New
        id: String,

        /// Shortcut text, e.g. Ctrl+Shift+N (empty string clears)
        shortcut: String,

        /// Take the shortcut away from its current holder
        #[arg(short, long)]
        force: bool,
    },

    /// Reset actions to their default shortcuts and save
    Reset {
        #[command(flatten)]
        files: Files,

        /// Actions to reset (all when omitted)
        ids: Vec<String>,
    },

    /// Print the persisted customization record
    Export {
        #[command(flatten)]
        files: Files,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SearchBy {
    Name,
    Shortcut,
}

#[derive(Clone, Copy, ValueEnum)]
enum SearchMode {
    Contains,
    Exactly,
    StartsWith,
    EndsWith,
    Wildcard,
    Regex,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List {
            files,
            query,
            by,
            mode,
            context,
            customized,
            default,
        } => {
            let mut filter = Filter::with_mode(&query, by.into(), mode.into())?;
            if !context.is_empty() {
                filter = filter.restrict_contexts(context);
            }
            if customized {
                filter = filter.with_state(ShortcutState::Customized);
            } else if default {
                filter = filter.with_state(ShortcutState::Default);
            }
            list_actions(&files, filter)?
        }
        Commands::Check { files } => check_conflicts(&files)?,
        Commands::Assign {
            files,
            id,
            shortcut,
            force,
        } => assign_shortcut(&files, &id, &shortcut, force)?,
        Commands::Reset { files, ids } => reset_shortcuts(&files, &ids)?,
        Commands::Export { files } => export_settings(&files)?,
    }

    Ok(())
}

impl From<SearchBy> for FilterTarget {
    fn from(by: SearchBy) -> Self {
        match by {
            SearchBy::Name => FilterTarget::Name,
            SearchBy::Shortcut => FilterTarget::Shortcut,
        }
    }
}

impl From<SearchMode> for MatchMode {
    fn from(mode: SearchMode) -> Self {
        match mode {
            SearchMode::Contains => MatchMode::Contains,
            SearchMode::Exactly => MatchMode::Exactly,
            SearchMode::StartsWith => MatchMode::StartsWith,
            SearchMode::EndsWith => MatchMode::EndsWith,
            SearchMode::Wildcard => MatchMode::Wildcard,
            SearchMode::Regex => MatchMode::RegularExpression,
        }
    }
}

/// Expand tilde in a path argument
fn expand(path: &Path) -> anyhow::Result<PathBuf> {
    let text = path.to_str().ok_or_else(|| anyhow::anyhow!("Invalid path encoding"))?;
    Ok(PathBuf::from(shellexpand::tilde(text).as_ref()))
}

/// Build the registry from the manifest and apply saved customizations
fn open(files: &Files) -> anyhow::Result<Controller> {
    let manifest = expand(&files.manifest)?;
    let settings = expand(&files.settings)?;

    let controller = Controller::from_files(&files.domain, &manifest, Some(settings.clone()))
        .with_context(|| format!("Failed to load {}", manifest.display()))?;

    controller
        .load_settings()
        .with_context(|| format!("Failed to read settings from {}", settings.display()))?;

    Ok(controller)
}

/// Print the filtered action tree
fn list_actions(files: &Files, filter: Filter) -> anyhow::Result<()> {
    let controller = open(files)?;
    controller.set_filter(filter);

    let rows = controller.visible_rows();
    let mut shown = 0;

    for row in &rows {
        let indent = "  ".repeat(row.depth);
        match row.depth {
            0 => println!("{}", row.label.bold()),
            1 => println!("{}{}", indent, row.label.magenta()),
            _ => {
                shown += 1;
                let shortcut = match row.shortcut.as_deref() {
                    Some("") | None => "(unassigned)".dimmed(),
                    Some(text) if row.customized => text.yellow().bold(),
                    Some(text) => text.cyan().bold(),
                };
                println!("{}{} → {}", indent, row.label, shortcut);
            }
        }
    }

    println!("\n{} Showing {} of {} actions", "✓".green(), shown, controller.action_count());

    Ok(())
}

/// Check for actions sharing a shortcut
fn check_conflicts(files: &Files) -> anyhow::Result<()> {
    let controller = open(files)?;

    println!("{} Found {} actions\n", "✓".green(), controller.action_count());

    let conflicts = controller.get_conflicts();

    if conflicts.is_empty() {
        println!("{} {}", "✓".green().bold(), "No conflicts detected!".bold());
        return Ok(());
    }

    println!(
        "{} Found {} conflict{}:\n",
        "✗".red().bold(),
        conflicts.len(),
        if conflicts.len() == 1 { "" } else { "s" }
    );

    for (i, conflict) in conflicts.iter().enumerate() {
        println!(
            "{} {}",
            format!("Conflict {}", i + 1).yellow().bold(),
            conflict.shortcut.to_string().cyan()
        );

        for (idx, id) in conflict.actions.iter().enumerate() {
            println!("  {} {}", format!("{}.", idx + 1).dimmed(), id);
        }
        println!();
    }

    println!("{} {}", "⚠".yellow(), DUPLICATE_NOTICE.yellow());
    std::process::exit(1);
}

/// Assign a shortcut and save the settings
fn assign_shortcut(files: &Files, id: &str, text: &str, force: bool) -> anyhow::Result<()> {
    let controller = open(files)?;
    let id = ActionId::from(id);
    let shortcut = Shortcut::parse(text)?;

    let outcome = match controller.request_assign(&id, shortcut.clone())? {
        AssignOutcome::ConflictDetected(holder) if force => {
            println!("{} Taking {} from {}", "→".cyan(), shortcut.to_string().cyan(), holder);
            controller.confirm_reassign(&id, shortcut)?
        }
        AssignOutcome::ConflictDetected(holder) => {
            println!(
                "{} {} is already assigned to {}",
                "✗".red().bold(),
                shortcut.to_string().cyan(),
                holder
            );
            println!("Re-run with {} to reassign it.", "--force".bold());
            std::process::exit(1);
        }
        outcome => outcome,
    };

    match outcome {
        AssignOutcome::Applied(changes) => {
            for change in &changes {
                print_change(&change.id, &change.before, &change.after);
            }
            controller.save_settings()?;
        }
        _ => println!("{} Nothing to change", "✓".green()),
    }

    Ok(())
}

/// Reset some or all actions and save the settings
fn reset_shortcuts(files: &Files, ids: &[String]) -> anyhow::Result<()> {
    let controller = open(files)?;

    let changes = if ids.is_empty() {
        controller.reset_all()
    } else {
        let ids: Vec<ActionId> = ids.iter().map(|id| ActionId::from(id.as_str())).collect();
        controller.reset(&ids)?
    };

    if changes.is_empty() {
        println!("{} Already at defaults", "✓".green());
        return Ok(());
    }

    for change in &changes {
        print_change(&change.id, &change.before, &change.after);
    }
    controller.save_settings()?;
    println!("\n{} Reset {} shortcut{}", "✓".green(), changes.len(), if changes.len() == 1 { "" } else { "s" });

    Ok(())
}

/// Print the customization record of the saved settings
fn export_settings(files: &Files) -> anyhow::Result<()> {
    let controller = open(files)?;
    println!("{}", controller.with_registry(serialize_customizations));
    Ok(())
}

fn print_change(id: &ActionId, before: &Shortcut, after: &Shortcut) {
    let show = |s: &Shortcut| {
        if s.is_empty() {
            "(unassigned)".dimmed()
        } else {
            s.to_string().cyan()
        }
    };
    println!("  {} {} → {}", id, show(before), show(after));
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_duplicate_notice_describes_shared_binding() {
        assert!(DUPLICATE_NOTICE.contains("more than one action"));
        assert!(!DUPLICATE_NOTICE.contains("first"), "Every holder keeps the shortcut");
    }

    #[test]
    fn test_search_mode_maps_to_match_mode() {
        assert_eq!(MatchMode::from(SearchMode::Regex), MatchMode::RegularExpression);
        assert_eq!(FilterTarget::from(SearchBy::Shortcut), FilterTarget::Shortcut);
    }
}
