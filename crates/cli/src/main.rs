//! jstore CLI: run one document store operation against a data directory.
//!
//! `jstore [--dir DIR] [--config FILE] [--json|--raw] COMMAND`
//!
//! The store lives in `DIR` (default `.jstore`) with defaults `{}`. Set
//! `RUST_LOG=jstore=debug` to see every persisted write.

mod commands;
mod format;
mod parse;
mod value;

use std::path::{Path, PathBuf};
use std::process;

use jstore::{FileStorage, Store, StoreConfig, Value, CONFIG_FILE_NAME};

use commands::build_cli;
use format::{format_error, format_message_error, format_output, Output, OutputMode};
use parse::{matches_to_action, CliAction};

const DEFAULT_DIR: &str = ".jstore";

fn main() {
    init_logging();

    let matches = build_cli().get_matches();

    let mode = if matches.get_flag("json") {
        OutputMode::Json
    } else if matches.get_flag("raw") {
        OutputMode::Raw
    } else {
        OutputMode::Human
    };

    let action = match matches_to_action(&matches) {
        Ok(action) => action,
        Err(e) => {
            eprintln!("{}", format_message_error(&e, mode));
            process::exit(2);
        }
    };

    let dir = matches
        .get_one::<String>("dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DIR));
    let config_path = matches.get_one::<String>("config").map(PathBuf::from);

    let result = match action {
        CliAction::Init => run_init(&dir, config_path.as_deref()),
        action => open_store(&dir, config_path.as_deref()).and_then(|store| execute(&store, action)),
    };

    match result {
        Ok(output) => {
            let formatted = format_output(&output, mode);
            if !formatted.is_empty() {
                println!("{}", formatted);
            }
        }
        Err(e) => {
            eprintln!("{}", format_error(&e, mode));
            process::exit(1);
        }
    }
}

fn init_logging() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn resolve_config(dir: &Path, explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| dir.join(CONFIG_FILE_NAME))
}

fn run_init(dir: &Path, explicit: Option<&Path>) -> jstore::Result<Output> {
    std::fs::create_dir_all(dir)?;
    let path = resolve_config(dir, explicit);
    if path.exists() {
        return Ok(Output::Text(format!(
            "Config already exists at {}",
            path.display()
        )));
    }
    StoreConfig::write_default_if_missing(&path)?;
    Ok(Output::Text(format!(
        "Wrote default config to {}",
        path.display()
    )))
}

fn open_store(dir: &Path, explicit: Option<&Path>) -> jstore::Result<Store> {
    std::fs::create_dir_all(dir)?;
    let path = resolve_config(dir, explicit);
    if explicit.is_none() {
        StoreConfig::write_default_if_missing(&path)?;
    }
    let config = StoreConfig::from_file(&path)?;
    let storage = FileStorage::open(dir)?.with_sync_writes(config.sync_writes);
    Store::from_config(storage, &config, Value::Object(Default::default()))
}

fn execute(store: &Store, action: CliAction) -> jstore::Result<Output> {
    let done = |response: Option<Value>| response.map(Output::Value).unwrap_or(Output::Unit);
    match action {
        CliAction::Get { path, options } => store.get(path, options.as_ref()).map(Output::Value),
        CliAction::Set { path, value } => store.set(path, value).map(done),
        CliAction::Remove { path } => store.remove(path).map(done),
        CliAction::Add { path, value, index } => store.add(path, value, index).map(done),
        CliAction::Exists { path } => Ok(Output::Bool(store.exists(path))),
        CliAction::Post { path, value } => store.post(path, value).map(done),
        CliAction::Reset => store.reset().map(done),
        CliAction::Init => Err(jstore::Error::InvalidOperation(
            "init runs before a store is opened".to_string(),
        )),
    }
}
