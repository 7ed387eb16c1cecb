use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

use ariatabs_core::{Config, Key};

#[derive(Parser, Debug)]
#[command(name = "ariatabs")]
#[command(about = "Turn marked-up link lists into accessible ARIA tab interfaces")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (default: ./ariatabs.json when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Class marking tab list containers
    #[arg(long, global = true, value_name = "CLASS")]
    pub tab_list_class: Option<String>,

    /// Class marking the initially selected tab
    #[arg(long, global = true, value_name = "CLASS")]
    pub on_class: Option<String>,

    /// Class enabling hover-to-activate on a container
    #[arg(long, global = true, value_name = "CLASS")]
    pub hoverable_class: Option<String>,

    /// Log level (error, warn, info, debug, trace); RUST_LOG takes priority
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize tab lists and print the annotated markup
    Render(InputArgs),

    /// Initialize tab lists and print a JSON report of every group
    Inspect(InputArgs),

    /// Initialize tab lists, dispatch events, and print the result
    Replay {
        #[command(flatten)]
        input: InputArgs,

        /// Event to dispatch: click:<id>, hover:<id> or key:<id>:<key>, where
        /// <key> is a key name or a numeric key code
        #[arg(long = "event", short = 'e', value_name = "SPEC", required = true)]
        events: Vec<EventSpec>,

        /// What to print after the events ran
        #[arg(long, value_enum, default_value_t = Output::Html)]
        output: Output,
    },
}

#[derive(clap::Args, Debug)]
pub struct InputArgs {
    /// HTML file to read ("-" for stdin)
    pub file: PathBuf,

    /// Treat the input as a fragment instead of a full document
    #[arg(long)]
    pub fragment: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Output {
    Html,
    Json,
}

/// An event addressed by element `id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventSpec {
    Click(String),
    Hover(String),
    Key(String, Key),
}

impl FromStr for EventSpec {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (kind, rest) = s
            .split_once(':')
            .ok_or_else(|| anyhow!("expected <kind>:<id>, got {:?}", s))?;
        if rest.is_empty() {
            bail!("missing element id in {:?}", s);
        }

        match kind {
            "click" => Ok(EventSpec::Click(rest.to_string())),
            "hover" => Ok(EventSpec::Hover(rest.to_string())),
            "key" => {
                let (id, key) = rest
                    .split_once(':')
                    .ok_or_else(|| anyhow!("expected key:<id>:<key>, got {:?}", s))?;
                if id.is_empty() {
                    bail!("missing element id in {:?}", s);
                }
                let key = match key.parse::<u32>() {
                    Ok(code) => Key::from_key_code(code),
                    Err(_) => key.parse()?,
                };
                Ok(EventSpec::Key(id.to_string(), key))
            }
            other => bail!("unknown event kind {:?}", other),
        }
    }
}

impl Args {
    /// Configuration file merged with command line overrides
    pub fn resolve_config(&self) -> Result<Config> {
        let path = self.config.clone().unwrap_or_else(Config::default_path);
        if self.config.is_some() && !path.exists() {
            bail!("config file not found: {}", path.display());
        }

        let mut config = Config::load(&path)?;
        if let Some(class) = &self.tab_list_class {
            config.tabs = config.tabs.with_tab_list_class(class);
        }
        if let Some(class) = &self.on_class {
            config.tabs = config.tabs.with_on_class(class);
        }
        if let Some(class) = &self.hoverable_class {
            config.tabs = config.tabs.with_hoverable_class(class);
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        config.tabs = config.tabs.normalized();
        config.validate()?;
        Ok(config)
    }
}
