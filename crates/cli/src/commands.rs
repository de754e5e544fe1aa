//! Clap command tree definition.
//!
//! One subcommand per store operation, plus `init` for the data directory.

use clap::{Arg, ArgAction, Command};

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("jstore")
        .about("Path-addressable JSON document store")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("dir")
                .long("dir")
                .short('d')
                .value_name("DIR")
                .help("Data directory (default: .jstore)")
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .help("Config file (default: <DIR>/jstore.toml)")
                .global(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("JSON output mode")
                .action(ArgAction::SetTrue)
                .conflicts_with("raw")
                .global(true),
        )
        .arg(
            Arg::new("raw")
                .long("raw")
                .help("Raw output mode (compact JSON, no prefixes)")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(build_get())
        .subcommand(build_set())
        .subcommand(build_remove())
        .subcommand(build_add())
        .subcommand(build_exists())
        .subcommand(build_post())
        .subcommand(build_reset())
        .subcommand(build_init())
}

fn path_arg() -> Arg {
    Arg::new("path")
        .required(true)
        .value_name("PATH")
        .help("Slash-delimited document path ('/' for the root)")
}

fn value_arg() -> Arg {
    Arg::new("value")
        .required(true)
        .value_name("VALUE")
        .help("JSON value (bare words are taken as strings)")
}

fn build_get() -> Command {
    Command::new("get")
        .about("Read the value at a path")
        .arg(path_arg())
        .arg(
            Arg::new("order-by")
                .long("order-by")
                .value_name("FIELD")
                .help("Sort elements by a property"),
        )
        .arg(
            Arg::new("asc")
                .long("asc")
                .action(ArgAction::SetTrue)
                .help("Sort elements ascending by value"),
        )
        .arg(
            Arg::new("desc")
                .long("desc")
                .action(ArgAction::SetTrue)
                .help("Sort descending (by value, or by --order-by)"),
        )
        .arg(
            Arg::new("limit")
                .long("limit")
                .value_name("N")
                .allow_negative_numbers(true)
                .value_parser(clap::value_parser!(i64))
                .help("Keep at most N elements"),
        )
        .arg(
            Arg::new("where")
                .long("where")
                .value_name("FIELD=VALUE")
                .action(ArgAction::Append)
                .help("Keep elements whose FIELD equals VALUE (repeatable)"),
        )
}

fn build_set() -> Command {
    Command::new("set")
        .about("Write a value at a path, creating missing parents")
        .arg(path_arg())
        .arg(value_arg())
}

fn build_remove() -> Command {
    Command::new("remove")
        .visible_alias("rm")
        .about("Delete the value at a path")
        .arg(path_arg())
}

fn build_add() -> Command {
    Command::new("add")
        .about("Insert a value into the sequence at a path")
        .arg(path_arg())
        .arg(value_arg())
        .arg(
            Arg::new("index")
                .long("index")
                .short('i')
                .value_name("N")
                .value_parser(clap::value_parser!(usize))
                .help("Insert position (default: append)"),
        )
}

fn build_exists() -> Command {
    Command::new("exists")
        .about("Check whether a path resolves")
        .arg(path_arg())
}

fn build_post() -> Command {
    Command::new("post")
        .about("Write a value at a path that must not exist yet")
        .arg(path_arg())
        .arg(value_arg())
}

fn build_reset() -> Command {
    Command::new("reset").about("Restore the document to its defaults")
}

fn build_init() -> Command {
    Command::new("init").about("Write a default config file into the data directory")
}
