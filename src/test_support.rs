use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use eyre::{Result, eyre};

use crate::actions::ActionContext;
use crate::browser::{BrowserContext, DomElement, ElementHandle};
use crate::latex::facade::{DocumentFacade, DocumentKind, RenderedDocument};
use crate::models::job::Job;
use crate::models::preferences::{DateFilter, ExperienceLevel, JobPreferences, JobTypes};
use crate::models::resume::Resume;

pub const SAMPLE_RESUME: &str = r#"
personal_information:
  name: Jane
  surname: Doe
  country: Germany
  city: Berlin
  phone_prefix: "+49"
  phone: "301234567"
  email: jane.doe@example.com
  github: https://github.com/janedoe
  linkedin: https://www.linkedin.com/in/janedoe
experience_details:
  - position: Backend Engineer
    company: Acme
    employment_period: 2020 - Present
    location: Berlin
    key_responsibilities:
      - responsibility: Built the routing service
    skills_acquired:
      - Rust
projects:
  - name: ferris-cli
    description: Terminal tooling
    link: https://github.com/janedoe/ferris-cli
languages:
  - language: English
    proficiency: Fluent
"#;

pub fn sample_resume() -> Resume {
    Resume::from_yaml_str(SAMPLE_RESUME).unwrap()
}

pub fn sample_preferences() -> JobPreferences {
    JobPreferences {
        remote: true,
        hybrid: false,
        onsite: false,
        experience_level: ExperienceLevel {
            internship: false,
            entry: true,
            associate: true,
            mid_senior_level: false,
            director: false,
            executive: false,
        },
        job_types: JobTypes {
            full_time: true,
            contract: true,
            part_time: false,
            temporary: false,
            internship: false,
            other: false,
            volunteer: false,
        },
        date: DateFilter {
            all_time: false,
            month: true,
            week: false,
            hours_24: false,
        },
        positions: vec!["Rust Engineer".into(), "Platform Engineer".into()],
        locations: vec!["Berlin".into()],
        apply_once_at_company: true,
        distance: 25,
        company_blacklist: vec!["Initech".into()],
        title_blacklist: Vec::new(),
        location_blacklist: Vec::new(),
    }
}

pub fn sample_job() -> Job {
    Job {
        role: "Rust Engineer".into(),
        company: "Acme".into(),
        location: Some("Berlin".into()),
        salary: None,
        link: "https://www.linkedin.com/jobs/view/42".into(),
        description: "Build the routing platform.".into(),
        responsibilities: "Own services end to end.".into(),
        apply_method: None,
        summarize_job_description: String::new(),
        recruiter_link: None,
        fit_score: 8.5,
    }
}

pub fn sample_context(dir: &Path) -> ActionContext {
    let facade = Arc::new(FakeFacade::new(BASE64_STANDARD.encode(b"%PDF"), "acme_rust_engineer"));
    sample_context_with(dir, facade)
}

pub fn sample_context_with(dir: &Path, facade: Arc<FakeFacade>) -> ActionContext {
    let output = dir.join("output");
    std::fs::create_dir_all(&output).unwrap();

    ActionContext::new(
        sample_resume(),
        sample_preferences(),
        output,
        dir.join("jobs.csv"),
        facade,
    )
}

/// Returns a fixed payload and records which documents were requested.
pub struct FakeFacade {
    pdf_base64: String,
    suggested_name: String,
    calls: Mutex<Vec<DocumentKind>>,
}

impl FakeFacade {
    pub fn new(pdf_base64: impl Into<String>, suggested_name: &str) -> Self {
        Self {
            pdf_base64: pdf_base64.into(),
            suggested_name: suggested_name.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<DocumentKind> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentFacade for FakeFacade {
    async fn render(&self, kind: DocumentKind, _: &Resume, _: &Job) -> Result<RenderedDocument> {
        self.calls.lock().unwrap().push(kind);
        Ok(RenderedDocument {
            pdf_base64: self.pdf_base64.clone(),
            suggested_name: self.suggested_name.clone(),
        })
    }
}

/// In-memory page whose file inputs record what was uploaded.
pub struct FakeBrowser {
    elements: Vec<DomElement>,
    failing: bool,
    uploads: Arc<Mutex<Vec<PathBuf>>>,
}

impl FakeBrowser {
    pub fn new(elements: Vec<DomElement>) -> Self {
        Self {
            elements,
            failing: false,
            uploads: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn uploads(&self) -> Vec<PathBuf> {
        self.uploads.lock().unwrap().clone()
    }
}

struct FakeHandle {
    failing: bool,
    uploads: Arc<Mutex<Vec<PathBuf>>>,
}

#[async_trait]
impl ElementHandle for FakeHandle {
    async fn set_input_files(&self, path: &Path) -> Result<()> {
        if self.failing {
            return Err(eyre!("element detached"));
        }
        self.uploads.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}

#[async_trait]
impl BrowserContext for FakeBrowser {
    async fn dom_element(&self, index: usize) -> Result<Option<DomElement>> {
        Ok(self.elements.iter().find(|e| e.index == index).cloned())
    }

    async fn locate(&self, element: &DomElement) -> Result<Option<Box<dyn ElementHandle>>> {
        if !element.is_file_input() {
            return Ok(None);
        }

        Ok(Some(Box::new(FakeHandle {
            failing: self.failing,
            uploads: self.uploads.clone(),
        })))
    }
}
