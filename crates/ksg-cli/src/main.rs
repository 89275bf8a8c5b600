use anyhow::Context;
use clap::{value_parser, Arg, Command};
use ksg_cli::{init_tracing, AppConfig, Clock, Exit, Terminal};
use ksg_form::FormSession;
use ksg_store::CsvStore;
use std::io::{self, Write};
use std::path::PathBuf;

fn cli() -> Command {
    Command::new("ksg")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Project Ksheersagar survey intake")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .default_value("ksg.toml")
                .value_parser(value_parser!(PathBuf))
                .help("Path to the TOML configuration file"),
        )
        .arg(
            Arg::new("store")
                .long("store")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Override the record store path"),
        )
        .subcommand(Command::new("survey").about("Run an interactive survey session"))
        .subcommand(
            Command::new("export")
                .about("Write all stored responses as CSV")
                .arg(
                    Arg::new("out")
                        .long("out")
                        .value_parser(value_parser!(PathBuf))
                        .help("Output file (defaults to the configured export file name)"),
                ),
        )
        .subcommand(
            Command::new("tail")
                .about("Print the most recent stored responses")
                .arg(
                    Arg::new("rows")
                        .short('n')
                        .long("rows")
                        .value_parser(value_parser!(usize))
                        .help("Number of rows (defaults to the configured preview size)"),
                ),
        )
}

fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();

    let config_path = matches
        .get_one::<PathBuf>("config")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("ksg.toml"));
    let mut config = AppConfig::load(&config_path)?;
    if let Some(store) = matches.get_one::<PathBuf>("store") {
        config.store.path = store.clone();
    }
    init_tracing(&config.log_filter);
    tracing::debug!(config = ?config, "configuration loaded");

    let store = CsvStore::new(config.store.clone());

    match matches.subcommand() {
        Some(("survey", _)) => {
            let stdin = io::stdin();
            let mut terminal = Terminal::new(stdin.lock(), io::stdout(), Clock::system());
            loop {
                let mut session = FormSession::new();
                match terminal.run(&mut session, &store)? {
                    // A declined consent ends this interview only.
                    Exit::Terminated => continue,
                    Exit::Quit | Exit::EndOfInput => break,
                }
            }
        }
        Some(("export", args)) => {
            let out = args
                .get_one::<PathBuf>("out")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(store.export_file_name()));
            let bytes = store.export_bytes().context("reading record store")?;
            std::fs::write(&out, &bytes)
                .with_context(|| format!("writing {}", out.display()))?;
            println!("Wrote {} bytes to {}", bytes.len(), out.display());
        }
        Some(("tail", args)) => {
            let rows = args
                .get_one::<usize>("rows")
                .copied()
                .unwrap_or(store.tail_rows());
            let tail = store.tail(rows).context("reading record store")?;
            if tail.is_empty() {
                println!("No responses stored yet.");
            } else {
                io::stdout().write_all(&tail.to_csv_bytes()?)?;
            }
        }
        _ => unreachable!("subcommand_required"),
    }
    Ok(())
}
