//! ariatabs command line host
//!
//! Loads a page, lets the tab list controller set it up, optionally replays
//! user events against it, and prints the markup or a JSON report.

mod args;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::io::Read;
use std::path::Path;

use ariatabs_core::{Config, GroupSnapshot, InitReport, Page};

use args::{Args, Command, EventSpec, InputArgs, Output};

#[derive(Debug, Serialize)]
struct Report<'a> {
    init: &'a InitReport,
    focused: Option<String>,
    groups: Vec<GroupSnapshot>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.resolve_config()?;
    ariatabs_core::init_logging_with(&config.log_level);

    match &args.command {
        Command::Render(input) => {
            let page = load_page(input, &config)?;
            println!("{}", page.html());
        }
        Command::Inspect(input) => {
            let page = load_page(input, &config)?;
            print_report(&page)?;
        }
        Command::Replay {
            input,
            events,
            output,
        } => {
            let page = load_page(input, &config)?;
            for spec in events {
                replay(&page, spec)?;
            }
            match output {
                Output::Html => println!("{}", page.html()),
                Output::Json => print_report(&page)?,
            }
        }
    }

    Ok(())
}

fn load_page(input: &InputArgs, config: &Config) -> Result<Page> {
    let markup = read_input(&input.file)?;
    let page = if input.fragment {
        Page::load(&markup, config.tabs.clone())
    } else {
        Page::load_document(&markup, config.tabs.clone())
    };

    let report = page.report();
    tracing::info!(
        file = %input.file.display(),
        groups = report.groups,
        tabs = report.tabs,
        discarded = report.discarded,
        "Page loaded"
    );
    Ok(page)
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut markup = String::new();
        std::io::stdin()
            .read_to_string(&mut markup)
            .context("failed to read markup from stdin")?;
        return Ok(markup);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn replay(page: &Page, spec: &EventSpec) -> Result<()> {
    let event = match spec {
        EventSpec::Click(id) => page.click(id)?,
        EventSpec::Hover(id) => page.hover(id)?,
        EventSpec::Key(id, key) => page.key_down(id, key.clone())?,
    };
    tracing::debug!(
        event = ?spec,
        default_prevented = event.default_prevented(),
        "Event replayed"
    );
    Ok(())
}

fn print_report(page: &Page) -> Result<()> {
    let report = Report {
        init: page.report(),
        focused: page.focused_id(),
        groups: page.snapshot(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
