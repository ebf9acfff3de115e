use std::fs::OpenOptions;

use async_trait::async_trait;
use csv::WriterBuilder;
use eyre::{Result, WrapErr};
use log::info;
use serde_json::{Value, json};

use super::registry::{Action, NoParams};
use super::{ActionContext, ActionResult};
use crate::models::job::Job;

/// JSON schema of [`Job`] as the agent fills it in.
pub fn job_parameters() -> Value {
    json!({
        "type": "object",
        "properties": {
            "role": { "type": "string" },
            "company": { "type": "string" },
            "location": { "type": "string" },
            "salary": { "type": "string" },
            "link": { "type": "string", "description": "URL of the job posting" },
            "description": { "type": "string" },
            "responsibilities": { "type": "string" },
            "apply_method": { "type": "string" },
            "summarize_job_description": { "type": "string" },
            "recruiter_link": { "type": "string" },
            "fit_score": {
                "type": "number",
                "description": "How well the job fits the applicant profile, 0 to 10"
            }
        },
        "required": ["fit_score"]
    })
}

pub struct SaveJobs;

#[async_trait]
impl Action for SaveJobs {
    type Params = Job;

    const NAME: &'static str = "save_jobs";
    const DESCRIPTION: &'static str =
        "Save jobs to file - with a score how well it fits to my profile";

    fn parameters() -> Value {
        job_parameters()
    }

    async fn run(&self, ctx: &ActionContext, job: Job) -> Result<ActionResult> {
        let path = ctx.jobs_file.clone();

        tokio::task::spawn_blocking(move || -> Result<()> {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .wrap_err_with(|| format!("failed to open {}", path.display()))?;

            let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
            writer.write_record(job.csv_record())?;
            writer.flush()?;
            Ok(())
        })
        .await??;

        info!("saved job to {}", ctx.jobs_file.display());
        Ok(ActionResult::content("Saved job to file"))
    }
}

pub struct ReadJobs;

#[async_trait]
impl Action for ReadJobs {
    type Params = NoParams;

    const NAME: &'static str = "read_jobs";
    const DESCRIPTION: &'static str = "Read jobs from file";

    async fn run(&self, ctx: &ActionContext, _: NoParams) -> Result<ActionResult> {
        let jobs = tokio::fs::read_to_string(&ctx.jobs_file)
            .await
            .wrap_err_with(|| format!("failed to read {}", ctx.jobs_file.display()))?;

        info!("read jobs file with {} characters", jobs.len());
        Ok(ActionResult::content(jobs))
    }
}
