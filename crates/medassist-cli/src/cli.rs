use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Clinical assistant preferences and patient picker.
#[derive(Debug, Parser)]
#[command(name = "medassist", version)]
pub struct Cli {
    /// Directory holding config.json and the preference snapshot.
    #[arg(long, global = true, env = "MEDASSIST_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read and change user preferences.
    #[command(subcommand)]
    Prefs(PrefsCommand),
    /// List, search and draft patients.
    #[command(subcommand)]
    Patients(PatientsCommand),
    /// Manage the connection config.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Subcommand)]
pub enum PrefsCommand {
    /// Print every setting with its kind and value.
    Show,
    /// Set one setting and save.
    Set { key: String, value: String },
    /// Restore the declared defaults and save.
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum PatientsCommand {
    /// Fetch the patient list and print the matches.
    List {
        #[arg(long, short)]
        search: Option<String>,
    },
    /// Request a new patient by name and print the resulting draft as JSON.
    New {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a new config.json.
    Init(InitArgs),
    /// Print the config with secrets redacted.
    Info,
}

#[derive(Debug, Args)]
pub struct InitArgs {
    #[arg(long)]
    pub api_base_url: String,

    #[arg(long, default_value = crate::config::DEFAULT_PATIENTS_PATH)]
    pub patients_path: String,

    /// Bearer token stored in the config file.
    #[arg(long, conflicts_with = "token_env", required_unless_present = "token_env")]
    pub token: Option<String>,

    /// Environment variable to read the bearer token from at run time.
    #[arg(long)]
    pub token_env: Option<String>,

    /// Drop the selection when a refresh no longer lists it.
    #[arg(long)]
    pub clear_missing_selection: bool,

    /// Save preferences on every change instead of on explicit save.
    #[arg(long)]
    pub auto_flush: bool,
}
