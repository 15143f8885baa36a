//! Command line front end for instant Access.
//!
//! The binary stands in for the screen reader in two ways:
//!
//! - Settings subcommands (`list`, `add`, `edit`, `remove`, `test`,
//!   `verbosity`, `export`, `import`) drive the same settings panel logic a
//!   host's GUI would.
//! - `session` runs the plugin against a line-driven terminal host: each input
//!   line is one key press (`nvda+e`, `d`, `escape`), speech and tones are
//!   printed.
//!
//! # Usage
//!
//! ```text
//! instant-access [--config FILE] [--config-dir DIR] <COMMAND>
//!
//! instant-access add Docs --type folder --path ~/Documents --shortcut d
//! instant-access list --filter doc
//! instant-access session
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable                 | Description                         |
//! |--------------------------|-------------------------------------|
//! | `INSTANT_ACCESS_CONFIG`  | TOML runtime configuration file     |
//! | `INSTANT_ACCESS_DIR`     | Folder holding `config.ini`         |
//! | `RUST_LOG`               | Tracing filter, overrides the file  |

#![allow(clippy::multiple_crate_versions)]

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use instant_access::app::{BindingSet, Host, ScriptAction};
use instant_access::domain::gesture::{is_valid_gesture, normalize_gesture, GestureRules};
use instant_access::settings::{ItemDraft, ItemRow, SettingsListener, SettingsPanel};
use instant_access::storage::{filter_items, IniStore, ItemStore};
use instant_access::worker::{execute, SystemLauncher};
use instant_access::{Config, Dispatch, Item, ItemKind, LauncherError, Result, Verbosity};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Single-key launcher for websites, programs, folders and files.
#[derive(Parser, Debug)]
#[command(name = "instant-access", version, about)]
struct Cli {
    /// TOML runtime configuration.
    #[arg(long, env = "INSTANT_ACCESS_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Folder holding config.ini; overrides the configuration file.
    #[arg(long, env = "INSTANT_ACCESS_DIR", value_name = "DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show configured items.
    List {
        /// Fuzzy filter on item names.
        #[arg(long)]
        filter: Option<String>,

        /// Print JSON instead of a table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Add an item.
    Add(ItemArgs),

    /// Change an item. Omitted options keep their current value.
    Edit {
        /// Current name of the item.
        name: String,

        #[command(flatten)]
        changes: EditArgs,
    },

    /// Delete an item with its shortcut and arguments.
    Remove { name: String },

    /// Launch an item now, outside instant mode.
    Test { name: String },

    /// Show the verbosity, or set it to beginner or advanced.
    Verbosity { level: Option<String> },

    /// Copy the item file somewhere else.
    Export { destination: PathBuf },

    /// Replace the item file with another one.
    Import { source: PathBuf },

    /// Interactive session: one key press per line, `:quit` to leave.
    Session,
}

#[derive(Args, Debug)]
struct ItemArgs {
    name: String,

    /// website, program, folder or file.
    #[arg(long = "type")]
    kind: ItemKind,

    #[arg(long)]
    path: String,

    /// Key gesture, with or without the `kb:` prefix (e.g. `control+d`).
    #[arg(long)]
    shortcut: String,

    /// Program arguments, passed to the shell verbatim.
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    arguments: String,
}

#[derive(Args, Debug)]
struct EditArgs {
    #[arg(long)]
    rename: Option<String>,

    #[arg(long = "type")]
    kind: Option<ItemKind>,

    #[arg(long)]
    path: Option<String>,

    #[arg(long)]
    shortcut: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    arguments: Option<String>,
}

// ── Settings listener for one-shot commands ───────────────────────────────────

/// Runs tested items inline and prints what the user would hear.
struct PrintingListener;

impl SettingsListener for PrintingListener {
    fn config_changed(&mut self) {
        tracing::debug!("configuration changed");
    }

    fn verbosity_changed(&mut self, verbosity: Verbosity) {
        tracing::debug!(%verbosity, "verbosity changed");
    }

    fn run_item(&mut self, item: Item) {
        execute(&item, &SystemLauncher, &mut |feedback| println!("{}", feedback.message()));
    }
}

// ── Terminal host for `session` ───────────────────────────────────────────────

/// Host that prints speech and tones to stdout.
struct TerminalHost {
    toggle_gestures: Vec<String>,
}

impl Host for TerminalHost {
    fn install_bindings(&mut self, bindings: &BindingSet) {
        let items = bindings.gestures_for(ScriptAction::RunItem).count();
        tracing::debug!(total = bindings.len(), items, "bindings installed");
    }

    fn speak(&mut self, message: &str) {
        println!("» {message}");
    }

    fn beep(&mut self, frequency_hz: u32, duration_ms: u32) {
        println!("♪ {frequency_hz} Hz, {duration_ms} ms");
    }

    fn toggle_gestures(&self) -> Vec<String> {
        self.toggle_gestures.clone()
    }
}

/// Identifiers a keyboard dispatcher would report for `line`.
fn identifiers_for(line: &str) -> Vec<String> {
    let gesture = normalize_gesture(line);
    match gesture.strip_prefix("kb:") {
        Some(key) => vec![format!("kb(desktop):{key}"), gesture.clone()],
        None => vec![gesture],
    }
}

fn run_session(config: &Config) -> Result<()> {
    let host = TerminalHost {
        toggle_gestures: config.toggle_gestures.clone(),
    };
    let mut plugin = instant_access::initialize(config, host)?;
    if plugin.is_inert() {
        println!("secure mode: instant Access is disabled");
        return Ok(());
    }

    let toggles = config
        .toggle_gestures
        .iter()
        .map(|g| g.trim_start_matches("kb:"))
        .collect::<Vec<_>>()
        .join(", ");
    println!("Type one key per line ({toggles} toggles instant mode, :quit exits).");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == ":quit" {
            break;
        }

        if plugin.on_gesture(&identifiers_for(line)) == Dispatch::PassThrough {
            println!("  ({line} passed through)");
        }
        std::thread::sleep(Duration::from_millis(150));
        plugin.pump_feedback();
        io::stdout().flush()?;
    }

    plugin.terminate();
    Ok(())
}

// ── Settings commands ─────────────────────────────────────────────────────────

fn print_rows(rows: &[ItemRow]) {
    if rows.is_empty() {
        println!("No commands configured.");
        return;
    }
    let width = rows.iter().map(|row| row.name.chars().count()).max().unwrap_or(4).max(4);
    println!("{:<width$}  {:<8}  {:<16}  PATH", "NAME", "TYPE", "SHORTCUT");
    for row in rows {
        println!("{:<width$}  {:<8}  {:<16}  {}", row.name, row.kind, row.shortcut, row.path);
    }
}

fn run_settings(config: &Config, command: Command) -> Result<()> {
    let store: Arc<dyn ItemStore> = Arc::new(IniStore::new(config.config_file())?);
    let rules = GestureRules::new(&config.toggle_gestures, is_valid_gesture);
    let mut listener = PrintingListener;
    let mut panel = SettingsPanel::new(Arc::clone(&store), rules, &mut listener);

    match command {
        Command::List { filter, json } => {
            let items = store.list_items()?;
            let rows: Vec<ItemRow> = filter_items(&items, filter.as_deref().unwrap_or(""))
                .into_iter()
                .map(ItemRow::from)
                .collect();
            if json {
                let text = serde_json::to_string_pretty(&rows)
                    .map_err(|e| LauncherError::Storage(e.to_string()))?;
                println!("{text}");
            } else {
                print_rows(&rows);
            }
        }
        Command::Add(args) => {
            let draft = ItemDraft::new(&args.name, args.kind, &args.path, &normalize_gesture(&args.shortcut))
                .with_arguments(&args.arguments);
            let item = panel.add(&draft)?;
            println!("Added {}.", item.name);
        }
        Command::Edit { name, changes } => {
            let existing = panel
                .find(&name)?
                .ok_or_else(|| LauncherError::Storage(format!("no item named {name:?}")))?;
            let mut draft = ItemDraft::from_item(&existing);
            if let Some(rename) = changes.rename {
                draft.name = rename;
            }
            if let Some(kind) = changes.kind {
                draft.kind = Some(kind);
            }
            if let Some(path) = changes.path {
                draft.path = path;
            }
            if let Some(shortcut) = changes.shortcut {
                draft.gesture = normalize_gesture(&shortcut);
            }
            if let Some(arguments) = changes.arguments {
                draft.arguments = arguments;
            }
            let item = panel.edit(&name, &draft)?;
            println!("Updated {}.", item.name);
        }
        Command::Remove { name } => {
            if panel.find(&name)?.is_none() {
                return Err(LauncherError::Storage(format!("no item named {name:?}")));
            }
            panel.delete(&name)?;
            println!("Removed {name}.");
        }
        Command::Test { name } => {
            if !panel.test(&name)? {
                return Err(LauncherError::Storage(format!("no item named {name:?}")));
            }
        }
        Command::Verbosity { level: None } => println!("{}", panel.verbosity()?),
        Command::Verbosity { level: Some(level) } => {
            let verbosity = Verbosity::parse_lenient(&level);
            panel.set_verbosity(verbosity)?;
            println!("Verbosity set to {verbosity}.");
        }
        Command::Export { destination } => {
            panel.export(&destination)?;
            println!("Exported to {}.", destination.display());
        }
        Command::Import { source } => {
            panel.import(&source)?;
            println!("Imported {}.", source.display());
        }
        Command::Session => return run_session(config),
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(dir) = &cli.config_dir {
        config.config_dir.clone_from(dir);
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    match cli.command {
        Command::Session => run_session(&config),
        command => {
            instant_access::observability::init_tracing(&config);
            run_settings(&config, command)
        }
    }
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
