use eyre::Result;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::gemini::GeminiClient;
use crate::models::job::Job;
use crate::models::resume::Resume;
use crate::utils::misc::fill_template;

const SYSTEM_PROMPT: &str = include_str!("system_prompt.txt");
const RESUME_PROMPT: &str = include_str!("resume_prompt.txt");
const COVER_LETTER_PROMPT: &str = include_str!("cover_letter_prompt.txt");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailoredResume {
    pub summary: String,
    pub skills_by_category: Vec<SkillCategory>,
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub location: String,
    pub date: String,
    #[serde(default)]
    pub accomplishments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub company: String,
    pub position: String,
    pub location: String,
    pub date: String,
    pub accomplishments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillCategory {
    pub category: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub title: String,
    pub link: Option<String>,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailoredCoverLetter {
    pub greeting: String,
    pub paragraphs: Vec<String>,
    pub closing: String,
}

/// Asks the model for job-specific resume and cover letter content.
#[derive(Clone)]
pub struct Tailor {
    client: GeminiClient,
}

impl Tailor {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    pub async fn resume(&self, resume: &Resume, job: &Job) -> Result<TailoredResume> {
        info!("generating tailored resume content for {} at {}", job.role, job.company);

        let output: TailoredResume = self
            .client
            .generate_json(Some(SYSTEM_PROMPT), &resume_prompt(resume, job), resume_schema(), 0.7)
            .await?;

        debug!("tailored resume: {:#?}", output);
        Ok(output)
    }

    pub async fn cover_letter(&self, resume: &Resume, job: &Job) -> Result<TailoredCoverLetter> {
        info!("generating cover letter content for {} at {}", job.role, job.company);

        let output: TailoredCoverLetter = self
            .client
            .generate_json(
                Some(SYSTEM_PROMPT),
                &cover_letter_prompt(resume, job),
                cover_letter_schema(),
                0.8,
            )
            .await?;

        debug!("cover letter: {:#?}", output);
        Ok(output)
    }
}

fn candidate_name(resume: &Resume) -> String {
    let name = resume
        .personal_information
        .as_ref()
        .map(|info| info.full_name())
        .unwrap_or_default();

    if name.is_empty() { "the applicant".to_string() } else { name }
}

pub fn resume_prompt(resume: &Resume, job: &Job) -> String {
    fill_template(
        RESUME_PROMPT,
        &[
            ("candidate_name", &candidate_name(resume)),
            ("job_information", &job.formatted_job_information()),
            ("resume", &resume.to_plain_text()),
        ],
    )
}

pub fn cover_letter_prompt(resume: &Resume, job: &Job) -> String {
    let company = if job.company.is_empty() { "the company" } else { &job.company };

    fill_template(
        COVER_LETTER_PROMPT,
        &[
            ("candidate_name", &candidate_name(resume)),
            ("job_information", &job.formatted_job_information()),
            ("resume", &resume.to_plain_text()),
            ("company", company),
        ],
    )
}

fn string_list() -> Value {
    json!({ "type": "array", "items": { "type": "string" } })
}

fn resume_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "summary": { "type": "string" },
            "skills_by_category": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "category": {
                            "type": "string",
                            "description": "Technical skill category (e.g., Back-end, Front-end)"
                        },
                        "items": string_list()
                    },
                    "required": ["category", "items"]
                }
            },
            "experience": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "company": { "type": "string" },
                        "position": { "type": "string" },
                        "location": { "type": "string" },
                        "date": { "type": "string" },
                        "accomplishments": string_list()
                    },
                    "required": ["company", "position", "location", "date", "accomplishments"]
                }
            },
            "projects": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "title": {
                            "type": "string",
                            "description": "Project name in format: 'Project Name (Technology)'"
                        },
                        "link": { "type": "string" },
                        "items": string_list()
                    },
                    "required": ["title", "items"]
                }
            },
            "education": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "institution": { "type": "string" },
                        "degree": { "type": "string" },
                        "location": { "type": "string" },
                        "date": { "type": "string" },
                        "accomplishments": string_list()
                    },
                    "required": ["institution", "degree", "location", "date"]
                }
            }
        },
        "required": ["summary", "skills_by_category", "experience", "projects", "education"]
    })
}

fn cover_letter_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "greeting": { "type": "string" },
            "paragraphs": string_list(),
            "closing": { "type": "string" }
        },
        "required": ["greeting", "paragraphs", "closing"]
    })
}
