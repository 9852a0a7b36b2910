#![forbid(unsafe_code)]

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{Level as TraceLevel, debug, info};
use tracing_subscriber::FmtSubscriber;

use scrcpy_launch::command;
use scrcpy_launch::config::{DeviceSettings, SettingsStore};
use scrcpy_launch::options::{self, OptionDefault};
use scrcpy_launch::validation::{self, CommandConfiguration, DeviceInfo};
use scrcpy_launch::version::{Capabilities, Version};

#[derive(Parser)]
#[command(name = "scrcpy-launch")]
#[command(version, about = "Compile and validate scrcpy launch settings", long_about = None)]
struct Cli {
    /// Store file (defaults to the platform config directory)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the argument vector as a JSON array
    Args(LaunchArgs),
    /// Print the command preview string
    Preview(LaunchArgs),
    /// Validate settings or an option map and print the report
    Validate(ValidateArgs),
    /// Print the capability flags for a tool version
    Capabilities {
        /// Version (`3.1`) or the tool's `--version` output
        version_text: String,
    },
    /// Manage saved presets
    Preset {
        #[command(subcommand)]
        action: PresetAction,
    },
    /// List the options the validator knows about
    Options {
        /// Only options in this category
        #[arg(long)]
        category: Option<String>,
    },
}

#[derive(Args)]
struct LaunchArgs {
    /// Device serial; defaults to the wireless address in the settings
    #[arg(short, long)]
    serial: Option<String>,

    /// JSON file with a (partial) settings record instead of the store
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Installed tool version; unsupported settings are reset before compiling
    #[arg(long)]
    version_text: Option<String>,
}

#[derive(Args)]
struct ValidateArgs {
    /// Device serial whose stored settings are validated
    #[arg(short, long)]
    serial: Option<String>,

    /// JSON file with a (partial) settings record
    #[arg(long, conflicts_with = "options")]
    settings: Option<PathBuf>,

    /// JSON file with an option map (`{"max-size": 1024}`)
    #[arg(long)]
    options: Option<PathBuf>,

    /// Device Android API level
    #[arg(long)]
    api_level: Option<u32>,
}

#[derive(Subcommand)]
enum PresetAction {
    /// Save a device's settings as a preset
    Save {
        #[arg(short, long)]
        serial: String,
        name: String,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// List saved presets
    List,
    /// Remove a preset by id
    Remove { id: String },
    /// Apply a preset to a device, keeping its recording settings
    Apply {
        #[arg(short, long)]
        serial: String,
        id: String,
    },
}

fn init_logging() -> Result<()> {
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    // stdout carries command output
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn read_json(path: &Path) -> Result<Value> {
    let contents = fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse JSON in {:?}", path))
}

fn load_store(path: Option<&Path>) -> Result<SettingsStore> {
    match path {
        Some(path) => SettingsStore::load_from(path),
        None => SettingsStore::load(),
    }
}

fn save_store(store: &SettingsStore, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => store.save_to(path),
        None => store.save(),
    }
}

/// Accepts a bare version or the tool's banner
fn detect_version(text: &str) -> Version {
    if text.trim().contains(char::is_whitespace) {
        Version::from_version_output(text)
    } else {
        Version::parse(text.trim())
    }
}

/// Settings from `--settings` or the store entry for `serial`
fn resolve_settings(file: Option<&Path>, serial: Option<&str>, store_path: Option<&Path>) -> Result<DeviceSettings> {
    if let Some(file) = file {
        return Ok(DeviceSettings::normalize_value(&read_json(file)?));
    }
    let Some(serial) = serial else {
        bail!("Either --serial or --settings is required");
    };
    Ok(load_store(store_path)?.device_settings(serial))
}

fn launch_args(args: &LaunchArgs, store_path: Option<&Path>) -> Result<Vec<String>> {
    let mut settings = resolve_settings(args.settings.as_deref(), args.serial.as_deref(), store_path)?;

    if let Some(text) = &args.version_text {
        let version = detect_version(text);
        info!(version = %version, "Restricting settings to tool capabilities");
        settings = Capabilities::resolve(Some(&version)).restrict(&settings);
    }

    let device_id = args
        .serial
        .clone()
        .or_else(|| settings.wireless_serial())
        .context("No device id: pass --serial or set an IP address in the settings")?;

    Ok(command::compile(&device_id, &settings))
}

fn run_validate(args: &ValidateArgs, store_path: Option<&Path>) -> Result<ExitCode> {
    let config = match &args.options {
        Some(path) => {
            let options: Map<String, Value> = serde_json::from_value(read_json(path)?)
                .with_context(|| format!("Option map in {:?} must be a JSON object", path))?;
            CommandConfiguration {
                options: options.into_iter().collect(),
            }
        }
        None => {
            let settings = resolve_settings(args.settings.as_deref(), args.serial.as_deref(), store_path)?;
            CommandConfiguration::from_settings(&settings)
        }
    };

    let device = args.api_level.map(|android_version| DeviceInfo { android_version });
    let report = validation::validate(&config, device.as_ref());
    info!(
        valid = report.is_valid,
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "Validation finished"
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(if report.has_blocking_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn run_preset(action: PresetAction, store_path: Option<&Path>) -> Result<()> {
    let mut store = load_store(store_path)?;

    match action {
        PresetAction::Save { serial, name, tags } => {
            let settings = store.device_settings(&serial);
            let id = store.add_preset(&name, tags, &settings);
            save_store(&store, store_path)?;
            info!(preset = %id, name = %name, "Saved preset");
            println!("{id}");
        }
        PresetAction::List => {
            for preset in &store.presets {
                let star = if preset.favorite { "*" } else { " " };
                if preset.tags.is_empty() {
                    println!("{star} {}  {}", preset.id, preset.name());
                } else {
                    println!("{star} {}  {}  [{}]", preset.id, preset.name(), preset.tags.join(", "));
                }
            }
        }
        PresetAction::Remove { id } => {
            if !store.remove_preset(&id) {
                bail!("No preset with id {id}");
            }
            save_store(&store, store_path)?;
            info!(preset = %id, "Removed preset");
        }
        PresetAction::Apply { serial, id } => {
            let Some(settings) = store.apply_preset(&serial, &id) else {
                bail!("No preset with id {id}");
            };
            save_store(&store, store_path)?;
            info!(preset = %id, serial = %serial, "Applied preset");
            println!("{}", command::format(&command::compile(&serial, &settings)));
        }
    }
    Ok(())
}

fn list_options(category: Option<&str>) {
    for option in options::registry().options() {
        let category_name = serde_json::to_value(option.category)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        if category.is_some_and(|c| !c.eq_ignore_ascii_case(&category_name)) {
            continue;
        }

        let short = option.short_name.map(|s| format!("-{s}, ")).unwrap_or_default();
        let default = match option.default {
            Some(OptionDefault::Text(text)) => format!(" [default: {text}]"),
            Some(other) => format!(" [default: {}]", other.to_value()),
            None => String::new(),
        };
        println!("{short}--{:<24} {:<10} {}{}", option.name, category_name, option.description, default);
    }
}

fn main() -> Result<ExitCode> {
    init_logging()?;
    let cli = Cli::parse();
    let store_path = cli.store.as_deref();
    debug!(store = ?store_path, "Starting");

    match cli.command {
        Command::Args(args) => {
            let argv = launch_args(&args, store_path)?;
            println!("{}", serde_json::to_string(&argv)?);
        }
        Command::Preview(args) => {
            let argv = launch_args(&args, store_path)?;
            println!("{}", command::format(&argv));
        }
        Command::Validate(args) => return run_validate(&args, store_path),
        Command::Capabilities { version_text } => {
            let version = detect_version(&version_text);
            let capabilities = Capabilities::resolve(Some(&version));
            println!("{}", serde_json::to_string_pretty(&capabilities)?);
        }
        Command::Preset { action } => run_preset(action, store_path)?,
        Command::Options { category } => list_options(category.as_deref()),
    }

    Ok(ExitCode::SUCCESS)
}
