use async_trait::async_trait;
use colored::Colorize;
use eyre::Result;
use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::{Value, json};

use super::gemini::GeminiClient;
use crate::actions::{ActionContext, ActionRegistry, ActionResult};
use crate::utils::misc::fill_template;

pub const JOB_SEARCH_TASK: &str = include_str!("task_prompt.txt");
const AGENT_PROMPT: &str = include_str!("agent_prompt.txt");

/// Action name the model uses to end the run.
pub const DONE_ACTION: &str = "done";

/// Longest outcome kept verbatim in the step history.
const MAX_OUTCOME_CHARS: usize = 2000;

/// Unreadable model answers tolerated in a row before the run is aborted.
const DEFAULT_MAX_FAILURES: usize = 3;

/// History entry name for a step whose answer could not be read.
const INVALID_ANSWER: &str = "invalid_answer";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AgentStep {
    #[serde(default)]
    pub thought: String,
    pub action: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    pub step: usize,
    pub action: String,
    pub params: Value,
    pub outcome: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AgentOutcome {
    Done { steps: usize, summary: String },
    StepLimit { steps: usize },
}

/// Source of the next step, given the fully rendered prompt.
#[async_trait]
pub trait Planner: Send + Sync {
    async fn next_step(&self, prompt: &str) -> Result<AgentStep>;
}

#[async_trait]
impl Planner for GeminiClient {
    async fn next_step(&self, prompt: &str) -> Result<AgentStep> {
        self.generate_json(None, prompt, step_schema(), 0.0).await
    }
}

fn step_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "thought": { "type": "string" },
            "action": { "type": "string" },
            "params": { "type": "object" }
        },
        "required": ["thought", "action"]
    })
}

pub struct JobSearchAgent {
    planner: Box<dyn Planner>,
    max_steps: usize,
    max_failures: usize,
}

impl JobSearchAgent {
    pub fn new(planner: impl Planner + 'static, max_steps: usize) -> Self {
        Self {
            planner: Box::new(planner),
            max_steps,
            max_failures: DEFAULT_MAX_FAILURES,
        }
    }

    pub fn with_max_failures(mut self, max_failures: usize) -> Self {
        self.max_failures = max_failures.max(1);
        self
    }

    pub async fn run(
        &self,
        task: &str,
        registry: &ActionRegistry,
        ctx: &ActionContext,
    ) -> Result<AgentOutcome> {
        info!("starting agent run (max steps: {})", self.max_steps);

        let actions = serde_json::to_string_pretty(&registry.catalog())?;
        let mut memory: Vec<String> = Vec::new();
        let mut history: Vec<StepRecord> = Vec::new();
        let mut failures = 0;

        for step in 1..=self.max_steps {
            let prompt = build_prompt(task, &actions, &memory, &history, step, self.max_steps);
            let next = match self.planner.next_step(&prompt).await {
                Ok(next) => {
                    failures = 0;
                    next
                }
                Err(e) => {
                    failures += 1;
                    warn!(
                        "could not read the model answer ({}/{}): {:#}",
                        failures, self.max_failures, e
                    );
                    if failures >= self.max_failures {
                        return Err(e.wrap_err(format!(
                            "model answer unreadable {} times in a row",
                            failures
                        )));
                    }

                    history.push(StepRecord {
                        step,
                        action: INVALID_ANSWER.to_string(),
                        params: Value::Null,
                        outcome: format!("Error: {:#}. Answer with a single JSON object.", e),
                    });
                    continue;
                }
            };

            if !next.thought.is_empty() {
                info!("{} {}", format!("[step {}]", step).cyan(), next.thought);
            }

            if next.action == DONE_ACTION {
                let summary = next
                    .params
                    .get("summary")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                info!("agent finished after {} steps", step);
                return Ok(AgentOutcome::Done {
                    steps: step,
                    summary,
                });
            }

            let outcome = match registry.invoke(ctx, &next.action, next.params.clone()).await {
                Ok(result) => {
                    if result.include_in_memory
                        && let Some(content) = &result.extracted_content
                    {
                        memory.push(content.clone());
                    }
                    summarize_result(&result)
                }
                Err(e) => {
                    warn!("action '{}' failed: {:#}", next.action, e);
                    format!("Error: {:#}", e)
                }
            };
            debug!("step {} outcome: {}", step, outcome);

            history.push(StepRecord {
                step,
                action: next.action,
                params: next.params,
                outcome,
            });
        }

        warn!("agent stopped after reaching {} steps", self.max_steps);
        Ok(AgentOutcome::StepLimit {
            steps: self.max_steps,
        })
    }
}

pub fn build_prompt(
    task: &str,
    actions: &str,
    memory: &[String],
    history: &[StepRecord],
    step: usize,
    max_steps: usize,
) -> String {
    let memory = if memory.is_empty() {
        "None".to_string()
    } else {
        memory.join("\n\n")
    };

    let history = if history.is_empty() {
        "None".to_string()
    } else {
        history
            .iter()
            .map(|record| {
                format!(
                    "{}. {}({}) -> {}",
                    record.step, record.action, record.params, record.outcome
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    fill_template(
        AGENT_PROMPT,
        &[
            ("task", task.trim()),
            ("actions", actions),
            ("memory", &memory),
            ("history", &history),
            ("step", &step.to_string()),
            ("max_steps", &max_steps.to_string()),
        ],
    )
}

/// One-line outcome of an action as the model sees it in the history.
pub fn summarize_result(result: &ActionResult) -> String {
    if let Some(error) = &result.error {
        return format!("Error: {}", error);
    }

    match &result.extracted_content {
        Some(_) if result.include_in_memory => "Stored in memory".to_string(),
        Some(content) if content.chars().count() > MAX_OUTCOME_CHARS => {
            let head = content.chars().take(MAX_OUTCOME_CHARS).collect::<String>();
            format!("{}... (truncated)", head)
        }
        Some(content) => content.clone(),
        None => "OK".to_string(),
    }
}
