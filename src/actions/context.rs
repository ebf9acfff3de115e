use std::path::PathBuf;
use std::sync::Arc;

use crate::browser::BrowserContext;
use crate::latex::facade::DocumentFacade;
use crate::models::preferences::JobPreferences;
use crate::models::resume::Resume;

/// Everything an action may read. Built once at startup, then shared
/// read-only across every step of the run.
pub struct ActionContext {
    pub resume: Resume,
    pub preferences: JobPreferences,
    pub output_folder: PathBuf,
    pub jobs_file: PathBuf,
    pub facade: Arc<dyn DocumentFacade>,
    pub browser: Option<Arc<dyn BrowserContext>>,
}

impl ActionContext {
    pub fn new(
        resume: Resume,
        preferences: JobPreferences,
        output_folder: PathBuf,
        jobs_file: PathBuf,
        facade: Arc<dyn DocumentFacade>,
    ) -> Self {
        Self {
            resume,
            preferences,
            output_folder,
            jobs_file,
            facade,
            browser: None,
        }
    }

    pub fn with_browser(mut self, browser: Arc<dyn BrowserContext>) -> Self {
        self.browser = Some(browser);
        self
    }
}
