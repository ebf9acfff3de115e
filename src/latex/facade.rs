use std::fmt;

use async_trait::async_trait;
use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use chrono::Local;
use eyre::{Result, eyre};
use log::{debug, info};
use tectonic::latex_to_pdf;

use crate::chat::tailor::Tailor;
use crate::latex::assembler::LatexAssembler;
use crate::models::job::Job;
use crate::models::resume::Resume;
use crate::utils::misc::slugify;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Resume,
    CoverLetter,
}

impl DocumentKind {
    pub fn file_name(self) -> &'static str {
        match self {
            DocumentKind::Resume => "resume_tailored.pdf",
            DocumentKind::CoverLetter => "cover_letter_tailored.pdf",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            DocumentKind::Resume => "Resume",
            DocumentKind::CoverLetter => "Cover letter",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DocumentKind::Resume => "resume",
            DocumentKind::CoverLetter => "cover letter",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub pdf_base64: String,
    /// Folder name the document should be stored under.
    pub suggested_name: String,
}

/// Turns the applicant resume plus a job into a tailored PDF.
#[async_trait]
pub trait DocumentFacade: Send + Sync {
    async fn render(&self, kind: DocumentKind, resume: &Resume, job: &Job) -> Result<RenderedDocument>;
}

pub struct LatexFacade {
    tailor: Tailor,
}

impl LatexFacade {
    pub fn new(tailor: Tailor) -> Self {
        Self { tailor }
    }
}

#[async_trait]
impl DocumentFacade for LatexFacade {
    async fn render(&self, kind: DocumentKind, resume: &Resume, job: &Job) -> Result<RenderedDocument> {
        let assembler = LatexAssembler::new(resume);

        let latex = match kind {
            DocumentKind::Resume => {
                let content = self.tailor.resume(resume, job).await?;
                assembler.resume(&content)
            }
            DocumentKind::CoverLetter => {
                let content = self.tailor.cover_letter(resume, job).await?;
                assembler.cover_letter(&content, job)
            }
        };
        debug!("assembled {} LaTeX ({} chars)", kind, latex.len());

        info!("compiling LaTeX to PDF");
        let pdf = tokio::task::spawn_blocking(move || latex_to_pdf(latex))
            .await?
            .map_err(|e| {
                debug!("tectonic error details: {:#?}", e);
                eyre!("failed to compile LaTeX document: {}", e.description())
            })?;
        info!("LaTeX compilation successful");

        Ok(RenderedDocument {
            pdf_base64: BASE64_STANDARD.encode(pdf),
            suggested_name: suggested_name(job),
        })
    }
}

/// `<company>_<role>` slug, or a timestamp when the job carries neither.
pub fn suggested_name(job: &Job) -> String {
    let slug = slugify(&format!("{} {}", job.company, job.role));
    if slug.is_empty() {
        format!("job_{}", Local::now().format("%Y%m%d_%H%M%S"))
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_job;

    #[test]
    fn suggested_name_uses_company_and_role() {
        assert_eq!(suggested_name(&sample_job()), "acme_rust_engineer");
    }

    #[test]
    fn suggested_name_falls_back_to_timestamp() {
        let mut job = sample_job();
        job.company.clear();
        job.role = "???".to_string();
        assert!(suggested_name(&job).starts_with("job_"));
    }

    #[test]
    fn kinds_map_to_distinct_files() {
        assert_eq!(DocumentKind::Resume.file_name(), "resume_tailored.pdf");
        assert_eq!(DocumentKind::CoverLetter.file_name(), "cover_letter_tailored.pdf");
        assert_eq!(DocumentKind::CoverLetter.to_string(), "cover letter");
    }
}
