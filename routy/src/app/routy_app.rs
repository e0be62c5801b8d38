use super::RoutyOperation;
use crate::{config::RoutyConfig, model::RoutyError};
use clap::Parser;

/// command line tool for traffic-aware travel time prediction and delivery
/// route planning
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct RoutyApp {
    #[command(subcommand)]
    pub op: RoutyOperation,
    /// .toml or .json configuration file, defaults to the bundled configuration
    #[arg(long)]
    pub configuration_file: Option<String>,
}

impl RoutyApp {
    pub fn run(&self) -> Result<String, RoutyError> {
        let conf = RoutyConfig::load(self.configuration_file.as_ref())?;
        self.op.run(&conf)
    }
}
