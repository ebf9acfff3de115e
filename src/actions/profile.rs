use async_trait::async_trait;
use eyre::Result;
use log::info;

use super::registry::{Action, NoParams};
use super::{ActionContext, ActionResult};

pub struct ReadCv;

#[async_trait]
impl Action for ReadCv {
    type Params = NoParams;

    const NAME: &'static str = "read_cv";
    const DESCRIPTION: &'static str = "Read my cv for context to fill forms";

    async fn run(&self, ctx: &ActionContext, _: NoParams) -> Result<ActionResult> {
        let resume = ctx.resume.to_plain_text();

        info!("read cv with {} characters", resume.len());
        Ok(ActionResult::memory(resume))
    }
}

pub struct ReadJobPreferences;

#[async_trait]
impl Action for ReadJobPreferences {
    type Params = NoParams;

    const NAME: &'static str = "read_job_preferences";
    const DESCRIPTION: &'static str = "Read my job preferences to find jobs";

    async fn run(&self, ctx: &ActionContext, _: NoParams) -> Result<ActionResult> {
        let preferences = ctx.preferences.to_plain_text();

        info!("read job preferences with {} characters", preferences.len());
        Ok(ActionResult::memory(preferences))
    }
}
