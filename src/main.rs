mod actions;
mod browser;
mod chat;
mod latex;
mod models;
mod utils;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use eyre::Result;
use log::{debug, error, info};

use crate::actions::{ActionContext, ActionRegistry};
use crate::chat::agent::{AgentOutcome, JOB_SEARCH_TASK, JobSearchAgent};
use crate::chat::gemini::GeminiClient;
use crate::chat::tailor::Tailor;
use crate::latex::facade::LatexFacade;
use crate::models::resume::Resume;
use crate::utils::cli::Args;
use crate::utils::config::{Config, config};
use crate::utils::files::{FileManager, FileManagerError};
use crate::utils::log::Logger;
use crate::utils::validator::{ConfigError, ConfigValidator};

const API_KEY_ENV: &str = "LLM_API_KEY";

#[tokio::main]
async fn main() {
    let args = Args::parse();
    Logger::init(args.verbosity);

    info!(
        "starting auto-apply {}",
        format!("v{}", env!("CARGO_PKG_VERSION")).magenta()
    );

    if let Err(e) = run(args).await {
        report(&e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let config: Config = config(args.config)?;

    let paths = FileManager::validate_data_folder(&args.data_folder)?;
    info!("data folder validated: {}", args.data_folder.display());

    let validated = ConfigValidator::validate_config(&paths.work_preferences)?;
    let secret = ConfigValidator::validate_secrets(&paths.secrets)?;
    let api_key = resolve_api_key(std::env::var(API_KEY_ENV).ok(), secret);

    let uploads = FileManager::get_uploads(&paths.plain_text_resume)?;
    debug!("uploads: {:?}", uploads);

    let resume = Resume::load(&paths.plain_text_resume)?;
    let preferences = validated.into_preferences()?;
    info!(
        "loaded resume for {} and preferences for {} position(s)",
        resume
            .personal_information
            .as_ref()
            .map(|p| p.full_name())
            .unwrap_or_default(),
        preferences.positions.len()
    );

    let client = GeminiClient::new(api_key, &config.llm);
    let facade = LatexFacade::new(Tailor::new(client.clone()));

    let ctx = ActionContext::new(
        resume,
        preferences,
        paths.output,
        config.agent.jobs_file.clone(),
        Arc::new(facade),
    );
    let registry = ActionRegistry::with_default_actions();
    debug!("registered actions: {:?}", registry.names().collect::<Vec<_>>());

    let max_steps = args.max_steps.unwrap_or(config.agent.max_steps);
    let agent = JobSearchAgent::new(client, max_steps);

    match agent.run(JOB_SEARCH_TASK, &registry, &ctx).await? {
        AgentOutcome::Done { steps, summary } => {
            println!(
                "{} {}",
                format!("finished in {} steps:", steps).green(),
                summary
            );
        }
        AgentOutcome::StepLimit { steps } => {
            println!(
                "{}",
                format!("stopped after {} steps without finishing", steps).yellow()
            );
        }
    }

    Ok(())
}

/// A non-blank `LLM_API_KEY` wins over the key from `secrets.yaml`.
fn resolve_api_key(env_key: Option<String>, secret: String) -> String {
    match env_key {
        Some(key) if !key.trim().is_empty() => {
            debug!("using API key from {}", API_KEY_ENV);
            key
        }
        _ => secret,
    }
}

const CONFIG_HINT: &str = "Refer to the configuration guide for troubleshooting: \
     https://github.com/feder-cr/Auto_Jobs_Applier_AIHawk?tab=readme-ov-file#configuration";

/// Message and hint for the errors the user can fix, `None` for the rest.
fn diagnosis(e: &eyre::Report) -> Option<(String, &'static str)> {
    if let Some(ce) = e.downcast_ref::<ConfigError>() {
        return Some((format!("Configuration error: {}", ce), CONFIG_HINT));
    }

    match e.downcast_ref::<FileManagerError>()? {
        fe @ FileManagerError::OutputFolder { .. } => Some((
            format!("I/O error: {}", fe),
            "Check that the data folder is writable.",
        )),
        fe => Some((
            format!("File not found: {}", fe),
            "Ensure all required files are present in the data folder.",
        )),
    }
}

fn report(e: &eyre::Report) {
    match diagnosis(e) {
        Some((message, hint)) => {
            error!("{}", message);
            error!("{}", hint);
        }
        None => {
            error!("An unexpected error occurred: {:#}", e);
            debug!("{:?}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn demo(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("demos/data_folder")
            .join(name)
    }

    #[test]
    fn environment_key_overrides_the_secret_unless_blank() {
        let secret = || "from-secrets".to_string();

        assert_eq!(resolve_api_key(Some("from-env".into()), secret()), "from-env");
        assert_eq!(resolve_api_key(Some("   ".into()), secret()), "from-secrets");
        assert_eq!(resolve_api_key(None, secret()), "from-secrets");
    }

    #[test]
    fn output_folder_failures_are_not_reported_as_missing_files() {
        let io = eyre::Report::new(FileManagerError::OutputFolder {
            path: PathBuf::from("data_folder/output"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        });
        let (message, hint) = diagnosis(&io).unwrap();
        assert!(message.starts_with("I/O error: failed to create output folder"));
        assert!(hint.contains("writable"));

        let missing = eyre::Report::new(FileManagerError::MissingFiles(vec!["secrets.yaml".into()]));
        let (message, _) = diagnosis(&missing).unwrap();
        assert_eq!(message, "File not found: Missing files in data folder: secrets.yaml");

        assert!(diagnosis(&eyre::eyre!("boom")).is_none());
    }

    #[test]
    fn demo_data_folder_loads() {
        let preferences = ConfigValidator::validate_config(&demo("work_preferences.yaml"))
            .unwrap()
            .into_preferences()
            .unwrap();
        assert_eq!(preferences.distance, 50);
        assert_eq!(preferences.location_blacklist, Vec::<String>::new());

        let key = ConfigValidator::validate_secrets(&demo("secrets.yaml")).unwrap();
        assert_eq!(key, "your-gemini-api-key");

        let resume = Resume::load(&demo("plain_text_resume.yaml")).unwrap();
        assert!(resume.to_plain_text().contains("- German: Native"));
    }
}
