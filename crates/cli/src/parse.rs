//! ArgMatches → CliAction conversion.
//!
//! Translates clap's parsed arguments into one store operation, or into
//! `Init`, which only touches the config file.

use clap::ArgMatches;
use jstore::{DocPath, QueryOptions, Value};

use crate::value::{parse_value, parse_where};

/// The result of parsing the command line.
#[derive(Debug)]
pub enum CliAction {
    Get {
        path: DocPath,
        options: Option<QueryOptions>,
    },
    Set {
        path: DocPath,
        value: Value,
    },
    Remove {
        path: DocPath,
    },
    Add {
        path: DocPath,
        value: Value,
        index: Option<usize>,
    },
    Exists {
        path: DocPath,
    },
    Post {
        path: DocPath,
        value: Value,
    },
    Reset,
    Init,
}

/// Convert top-level matches into an action.
pub fn matches_to_action(matches: &ArgMatches) -> Result<CliAction, String> {
    let (name, sub) = matches
        .subcommand()
        .ok_or_else(|| "No command given".to_string())?;

    match name {
        "get" => Ok(CliAction::Get {
            path: path_of(sub)?,
            options: query_options(sub)?,
        }),
        "set" => Ok(CliAction::Set {
            path: path_of(sub)?,
            value: value_of(sub)?,
        }),
        "remove" => Ok(CliAction::Remove {
            path: path_of(sub)?,
        }),
        "add" => Ok(CliAction::Add {
            path: path_of(sub)?,
            value: value_of(sub)?,
            index: sub.get_one::<usize>("index").copied(),
        }),
        "exists" => Ok(CliAction::Exists {
            path: path_of(sub)?,
        }),
        "post" => Ok(CliAction::Post {
            path: path_of(sub)?,
            value: value_of(sub)?,
        }),
        "reset" => Ok(CliAction::Reset),
        "init" => Ok(CliAction::Init),
        other => Err(format!("Unknown command '{}'", other)),
    }
}

fn path_of(matches: &ArgMatches) -> Result<DocPath, String> {
    matches
        .get_one::<String>("path")
        .map(|p| DocPath::parse(p))
        .ok_or_else(|| "Missing PATH".to_string())
}

fn value_of(matches: &ArgMatches) -> Result<Value, String> {
    matches
        .get_one::<String>("value")
        .map(|v| parse_value(v))
        .ok_or_else(|| "Missing VALUE".to_string())
}

/// Collect query flags; `None` when no flag was given.
fn query_options(matches: &ArgMatches) -> Result<Option<QueryOptions>, String> {
    let mut options = QueryOptions::new();

    let filters: Vec<(String, Value)> = matches
        .get_many::<String>("where")
        .into_iter()
        .flatten()
        .map(|w| parse_where(w))
        .collect::<Result<_, _>>()?;
    if !filters.is_empty() {
        options = options.filter(move |item, _| {
            filters
                .iter()
                .all(|(field, expected)| item.get(field) == Some(expected))
        });
    }
    if let Some(field) = matches.get_one::<String>("order-by") {
        options = options.order_by(field.clone());
    }
    if matches.get_flag("asc") {
        options = options.asc();
    }
    if matches.get_flag("desc") {
        options = options.desc();
    }
    if let Some(n) = matches.get_one::<i64>("limit") {
        options = options.limit(*n);
    }

    Ok(if options.is_empty() {
        None
    } else {
        Some(options)
    })
}
