use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "auto-apply")]
#[command(about = "Search and apply to jobs with an LLM agent using your resume and job preferences", long_about = None)]
pub struct Args {
    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    pub config: PathBuf,

    /// Folder holding secrets.yaml, work_preferences.yaml and plain_text_resume.yaml
    #[arg(short, long, value_name = "DIR", default_value = "data_folder")]
    pub data_folder: PathBuf,

    /// Overrides the agent step limit from the configuration file
    #[arg(short, long, value_name = "STEPS")]
    pub max_steps: Option<usize>,

    /// Sets the logger's verbosity level
    #[arg(short, long, value_name = "VERBOSITY", default_value_t = LevelFilter::Info)]
    pub verbosity: LevelFilter,
}
