use std::collections::BTreeMap;

use async_trait::async_trait;
use eyre::Result;
use log::{debug, info};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::documents::{CreateCoverLetter, CreateTailoredResume};
use super::jobs::{ReadJobs, SaveJobs};
use super::profile::{ReadCv, ReadJobPreferences};
use super::upload::UploadCv;
use super::{ActionContext, ActionError, ActionResult};

/// Parameters of actions that take none.
#[derive(Debug, Default, Deserialize)]
pub struct NoParams {}

/// A named operation the agent can invoke, with typed parameters.
#[async_trait]
pub trait Action: Send + Sync + 'static {
    type Params: DeserializeOwned + Send;

    const NAME: &'static str;
    const DESCRIPTION: &'static str;

    /// JSON schema of [`Action::Params`], shown to the model.
    fn parameters() -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn run(&self, ctx: &ActionContext, params: Self::Params) -> Result<ActionResult>;
}

#[async_trait]
trait ErasedAction: Send + Sync {
    async fn invoke(&self, ctx: &ActionContext, params: Value) -> Result<ActionResult>;
}

struct Registered<A>(A);

#[async_trait]
impl<A: Action> ErasedAction for Registered<A> {
    async fn invoke(&self, ctx: &ActionContext, params: Value) -> Result<ActionResult> {
        let params = if params.is_null() { json!({}) } else { params };

        let params = serde_json::from_value::<A::Params>(params).map_err(|source| {
            ActionError::InvalidParams {
                action: A::NAME.to_string(),
                source,
            }
        })?;

        self.0.run(ctx, params).await
    }
}

struct ActionEntry {
    description: &'static str,
    parameters: Value,
    handler: Box<dyn ErasedAction>,
}

#[derive(Default)]
pub struct ActionRegistry {
    actions: BTreeMap<&'static str, ActionEntry>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every action the job search agent is allowed to use.
    pub fn with_default_actions() -> Self {
        let mut registry = Self::new();
        registry
            .register(SaveJobs)
            .register(ReadJobs)
            .register(ReadCv)
            .register(ReadJobPreferences)
            .register(UploadCv)
            .register(CreateTailoredResume)
            .register(CreateCoverLetter);
        registry
    }

    pub fn register<A: Action>(&mut self, action: A) -> &mut Self {
        debug!("registering action '{}'", A::NAME);
        self.actions.insert(
            A::NAME,
            ActionEntry {
                description: A::DESCRIPTION,
                parameters: A::parameters(),
                handler: Box::new(Registered(action)),
            },
        );
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.actions.keys().copied()
    }

    /// Catalog of actions as JSON, in name order.
    pub fn catalog(&self) -> Value {
        Value::Array(
            self.actions
                .iter()
                .map(|(name, entry)| {
                    json!({
                        "name": name,
                        "description": entry.description,
                        "parameters": entry.parameters,
                    })
                })
                .collect(),
        )
    }

    /// Looks up `name`, validates `params` against its parameter type and runs it.
    pub async fn invoke(
        &self,
        ctx: &ActionContext,
        name: &str,
        params: Value,
    ) -> Result<ActionResult> {
        let entry = self
            .actions
            .get(name)
            .ok_or_else(|| ActionError::UnknownAction(name.to_string()))?;

        info!("running action '{}'", name);
        entry.handler.invoke(ctx, params).await
    }
}
