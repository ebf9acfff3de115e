use async_trait::async_trait;
use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use colored::Colorize;
use eyre::{Result, WrapErr};
use log::{error, info};
use serde_json::Value;

use super::jobs::job_parameters;
use super::registry::Action;
use super::{ActionContext, ActionResult};
use crate::latex::facade::DocumentKind;
use crate::models::job::Job;
use crate::utils::misc::slugify;

/// Renders a tailored document for `job` through the facade and writes it to
/// `<output>/<suggested name>/<kind file name>`, refreshing
/// `<output>/<kind file name>` with the same bytes.
pub async fn create_document(ctx: &ActionContext, kind: DocumentKind, job: &Job) -> Result<ActionResult> {
    info!("generating a tailored {} for {} at {}", kind, job.role, job.company);

    let rendered = ctx
        .facade
        .render(kind, &ctx.resume, job)
        .await
        .inspect_err(|e| error!("an error occurred while creating the {}: {:#}", kind, e))?;

    let pdf = BASE64_STANDARD
        .decode(rendered.pdf_base64.trim())
        .inspect_err(|e| error!("error decoding base64: {}", e))
        .wrap_err_with(|| format!("facade returned an invalid {} payload", kind))?;

    let folder = match slugify(&rendered.suggested_name) {
        name if name.is_empty() => "untitled".to_string(),
        name => name,
    };
    let output_dir = ctx.output_folder.join(folder);

    tokio::fs::create_dir_all(&output_dir)
        .await
        .inspect_err(|e| error!("error creating output directory: {}", e))
        .wrap_err_with(|| format!("failed to create {}", output_dir.display()))?;
    info!("output folder ready: {}", output_dir.display());

    let output_path = output_dir.join(kind.file_name());
    tokio::fs::write(&output_path, &pdf)
        .await
        .inspect_err(|e| error!("error writing file: {}", e))
        .wrap_err_with(|| format!("failed to write {}", output_path.display()))?;

    // The copy at the output root is the one submitted by `upload_cv`.
    let current_path = ctx.output_folder.join(kind.file_name());
    tokio::fs::write(&current_path, &pdf)
        .await
        .inspect_err(|e| error!("error writing file: {}", e))
        .wrap_err_with(|| format!("failed to write {}", current_path.display()))?;

    let msg = format!("{} saved in: {}", kind.title(), output_path.display());
    println!("{}", msg.green());
    info!("{}", msg);

    Ok(ActionResult::content(msg))
}

pub struct CreateTailoredResume;

#[async_trait]
impl Action for CreateTailoredResume {
    type Params = Job;

    const NAME: &'static str = "create_resume_pdf_job_tailored";
    const DESCRIPTION: &'static str = "Create tailored CV based on job descriptions";

    fn parameters() -> Value {
        job_parameters()
    }

    async fn run(&self, ctx: &ActionContext, job: Job) -> Result<ActionResult> {
        create_document(ctx, DocumentKind::Resume, &job).await
    }
}

pub struct CreateCoverLetter;

#[async_trait]
impl Action for CreateCoverLetter {
    type Params = Job;

    const NAME: &'static str = "create_cover_letter";
    const DESCRIPTION: &'static str = "Create tailored cover letter based on job descriptions";

    fn parameters() -> Value {
        job_parameters()
    }

    async fn run(&self, ctx: &ActionContext, job: Job) -> Result<ActionResult> {
        create_document(ctx, DocumentKind::CoverLetter, &job).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeFacade, sample_context_with, sample_job};
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn writes_the_decoded_pdf_under_the_suggested_folder() {
        let dir = TempDir::new().unwrap();
        let facade = Arc::new(FakeFacade::new(BASE64_STANDARD.encode(b"%PDF-1.5 resume"), "acme_rust_engineer"));
        let ctx = sample_context_with(dir.path(), facade.clone());

        let result = CreateTailoredResume.run(&ctx, sample_job()).await.unwrap();
        let path = ctx.output_folder.join("acme_rust_engineer").join("resume_tailored.pdf");
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.5 resume");
        assert!(result.extracted_content.unwrap().contains("resume_tailored.pdf"));
        assert_eq!(facade.calls(), vec![DocumentKind::Resume]);
    }

    #[tokio::test]
    async fn newest_resume_replaces_the_one_at_the_output_root() {
        let dir = TempDir::new().unwrap();
        let first = Arc::new(FakeFacade::new(BASE64_STANDARD.encode(b"%PDF acme"), "acme_rust_engineer"));
        let ctx = sample_context_with(dir.path(), first);
        CreateTailoredResume.run(&ctx, sample_job()).await.unwrap();

        let second = Arc::new(FakeFacade::new(BASE64_STANDARD.encode(b"%PDF globex"), "globex_rust_engineer"));
        let ctx = sample_context_with(dir.path(), second);
        let mut job = sample_job();
        job.company = "Globex".into();
        CreateTailoredResume.run(&ctx, job).await.unwrap();

        let root = ctx.output_folder.join("resume_tailored.pdf");
        assert_eq!(std::fs::read(&root).unwrap(), b"%PDF globex");
        assert_eq!(crate::actions::upload::current_resume(&ctx.output_folder), root);
        assert_eq!(
            std::fs::read(ctx.output_folder.join("acme_rust_engineer").join("resume_tailored.pdf")).unwrap(),
            b"%PDF acme"
        );
    }

    #[tokio::test]
    async fn cover_letter_uses_its_own_file_name() {
        let dir = TempDir::new().unwrap();
        let facade = Arc::new(FakeFacade::new(BASE64_STANDARD.encode(b"%PDF letter"), "acme_rust_engineer"));
        let ctx = sample_context_with(dir.path(), facade.clone());

        CreateCoverLetter.run(&ctx, sample_job()).await.unwrap();
        let path = ctx.output_folder.join("acme_rust_engineer").join("cover_letter_tailored.pdf");
        assert_eq!(std::fs::read(path).unwrap(), b"%PDF letter");
        assert_eq!(facade.calls(), vec![DocumentKind::CoverLetter]);
    }

    #[tokio::test]
    async fn invalid_base64_fails_the_action() {
        let dir = TempDir::new().unwrap();
        let facade = Arc::new(FakeFacade::new("not base64!!", "acme"));
        let ctx = sample_context_with(dir.path(), facade);

        let err = CreateTailoredResume.run(&ctx, sample_job()).await.unwrap_err();
        assert!(err.downcast_ref::<base64::DecodeError>().is_some());
        assert!(!ctx.output_folder.join("acme").exists());
    }

    #[tokio::test]
    async fn suggested_names_cannot_escape_the_output_folder() {
        let dir = TempDir::new().unwrap();
        let facade = Arc::new(FakeFacade::new(BASE64_STANDARD.encode(b"%PDF"), "../../etc"));
        let ctx = sample_context_with(dir.path(), facade);

        CreateTailoredResume.run(&ctx, sample_job()).await.unwrap();
        assert!(ctx.output_folder.join("etc").join("resume_tailored.pdf").exists());
    }
}
