use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::{Arc, mpsc};

use medassist_core::models::patient::DraftPatient;
use medassist_core::models::setting::SettingKind;
use medassist_patients::{FilteredView, HttpPatientSource, PatientSelector};
use medassist_prefs::{Catalogue, FileSlot, PreferenceStore};

use crate::cli::{Cli, Command, ConfigCommand, InitArgs, PatientsCommand, PrefsCommand};
use crate::config::{self, AppConfig, CredentialSource, SelectionMode};

pub async fn run(cli: Cli) -> eyre::Result<()> {
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => config::config_dir()?,
    };

    match cli.command {
        Command::Prefs(cmd) => prefs(&data_dir, cmd),
        Command::Patients(cmd) => patients(&data_dir, cmd).await,
        Command::Config(cmd) => config_command(&data_dir, cmd),
    }
}

fn prefs(data_dir: &Path, cmd: PrefsCommand) -> eyre::Result<()> {
    let mut store = open_store(data_dir)?;
    match cmd {
        PrefsCommand::Show => {}
        PrefsCommand::Set { key, value } => {
            store.set_from_str(&key, &value)?;
        }
        PrefsCommand::Reset => {
            store.reset_to_defaults()?;
        }
    }
    if store.is_dirty() {
        store.persist()?;
    }
    print!("{}", render_preferences(&store));
    Ok(())
}

async fn patients(data_dir: &Path, cmd: PatientsCommand) -> eyre::Result<()> {
    match cmd {
        PatientsCommand::List { search } => {
            let config = config::load_config(data_dir)?;
            let selector = build_selector(&config);
            selector.refresh().await?;
            if let Some(term) = search {
                selector.set_search_term(term);
            }
            print!("{}", render_patients(&selector.filtered_view()));
        }
        PatientsCommand::New { name } => {
            let config = config::load_config(data_dir)?;
            let draft = request_draft(build_selector(&config), &name.join(" "))?;
            println!("{}", serde_json::to_string_pretty(&draft)?);
        }
    }
    Ok(())
}

fn config_command(data_dir: &Path, cmd: ConfigCommand) -> eyre::Result<()> {
    match cmd {
        ConfigCommand::Init(args) => {
            let config = config_from_args(args);
            config::save_config(data_dir, &config)?;
            println!("wrote {}", config::config_path(data_dir).display());
        }
        ConfigCommand::Info => {
            let config = config::load_config(data_dir)?;
            let info = config::config_info(&config);
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
    }
    Ok(())
}

/// Preference store backed by files in `data_dir`, honouring the config's
/// `auto_flush` when a config exists.
pub fn open_store(data_dir: &Path) -> eyre::Result<PreferenceStore> {
    let auto_flush = if config::has_config(data_dir) {
        config::load_config(data_dir)?.auto_flush
    } else {
        false
    };
    let slot = Arc::new(FileSlot::new(PathBuf::from(data_dir)));
    Ok(PreferenceStore::initialize(slot, Catalogue::clinical()).with_auto_flush(auto_flush))
}

pub fn build_selector(config: &AppConfig) -> PatientSelector {
    let source = HttpPatientSource::new(&config.api_base_url, &config.patients_path);
    PatientSelector::new(Arc::new(source), config.credentials.provider())
        .with_policy(config.selection_policy.into())
}

/// Ask `selector` to create a patient and return the draft it hands to its
/// create callback. Nothing is sent to the server.
pub fn request_draft(selector: PatientSelector, raw_name: &str) -> eyre::Result<DraftPatient> {
    let (tx, rx) = mpsc::channel();
    let selector = selector.on_create_requested(move |draft| {
        let _ = tx.send(draft.clone());
    });
    selector.request_create(raw_name)?;
    rx.try_recv().map_err(|_| eyre::eyre!("create request produced no draft"))
}

pub fn config_from_args(args: InitArgs) -> AppConfig {
    let credentials = match (args.token, args.token_env) {
        (_, Some(var)) => CredentialSource::Env { var },
        (Some(token), None) => CredentialSource::Inline { token },
        // clap requires one of the two
        (None, None) => CredentialSource::Env {
            var: "MEDASSIST_TOKEN".to_string(),
        },
    };
    let selection_policy = if args.clear_missing_selection {
        SelectionMode::ClearWhenMissing
    } else {
        SelectionMode::Retain
    };

    AppConfig {
        config_version: 0,
        api_base_url: args.api_base_url,
        patients_path: args.patients_path,
        credentials,
        selection_policy,
        auto_flush: args.auto_flush,
        created_at: jiff::Timestamp::now(),
    }
}

pub fn render_preferences(store: &PreferenceStore) -> String {
    let mut out = String::new();
    for setting in store.bag().iter() {
        let _ = write!(out, "{:<32} {:<8} {}", setting.key, setting.kind, setting.value);
        if setting.kind == SettingKind::Enum {
            if let Some(spec) = store.catalogue().get(&setting.key) {
                let _ = write!(out, "  [{}]", spec.allowed().join("|"));
            }
        }
        out.push('\n');
    }
    out
}

pub fn render_patients(view: &FilteredView) -> String {
    let mut out = String::new();
    for patient in view {
        let _ = write!(out, "{:<12} {:<10} {}", patient.id, patient.status, patient.display_name());
        if !patient.email.is_empty() {
            let _ = write!(out, " <{}>", patient.email);
        }
        out.push('\n');
    }
    if out.is_empty() {
        out.push_str("no matching patients\n");
    }
    out
}
