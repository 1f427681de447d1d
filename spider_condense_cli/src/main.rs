extern crate env_logger;
extern crate serde_json;
extern crate spider_condense;

pub mod options;

use clap::Parser;
use options::Cli;
use spider_condense::{CondenseConfig, Condenser};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Load the config file if any, then apply the flag overrides.
fn build_config(cli: &Cli) -> spider_condense::Result<CondenseConfig> {
    let mut config = match cli.config {
        Some(ref path) => CondenseConfig::from_json(&std::fs::read_to_string(path)?)?,
        _ => CondenseConfig::default(),
    };

    if let Some(min_repeat) = cli.min_repeat {
        config.min_repeat_count = min_repeat;
    }
    if cli.no_dedupe {
        config.dedupe = false;
    }
    if cli.keep_generated {
        config.filter_generated = false;
    }
    if cli.max_url_length.is_some() {
        config.max_url_length = cli.max_url_length;
    }
    if cli.max_text_length.is_some() {
        config.max_text_length = cli.max_text_length;
    }
    if let Some(marker) = cli.marker {
        config.marker = marker.into();
    }

    Ok(config)
}

/// Read the input file, or standard input for none or "-".
fn read_input(input: &Option<PathBuf>) -> std::io::Result<String> {
    let mut bytes = Vec::new();

    match input {
        Some(path) if path != Path::new("-") => {
            std::fs::File::open(path)?.read_to_end(&mut bytes)?;
        }
        _ => {
            std::io::stdin().read_to_end(&mut bytes)?;
        }
    }

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn run(cli: Cli) -> spider_condense::Result<()> {
    let condenser = Condenser::new(build_config(&cli)?)?;
    log::debug!("config: {:?}", condenser.config());

    let html = read_input(&cli.input)?;
    let condensed = condenser.condense(&html)?;

    match cli.output {
        Some(ref path) => std::fs::write(path, condensed.html.as_bytes())?,
        _ => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(condensed.html.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }

    if cli.stats {
        eprintln!("{}", serde_json::to_string_pretty(&condensed.stats)?);
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.verbose {
        use env_logger::Env;
        let env = Env::default()
            .filter_or("RUST_LOG", "info")
            .write_style_or("RUST_LOG_STYLE", "always");

        env_logger::init_from_env(env);
    }

    match run(cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("condense: {}", e);
            ExitCode::FAILURE
        }
    }
}
