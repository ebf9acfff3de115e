use std::path::{Path, PathBuf};

use async_trait::async_trait;
use eyre::Result;
use log::{debug, info};
use serde::Deserialize;
use serde_json::{Value, json};

use super::registry::Action;
use super::{ActionContext, ActionResult};
use crate::latex::facade::DocumentKind;

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    pub index: usize,
}

pub struct UploadCv;

#[async_trait]
impl Action for UploadCv {
    type Params = UploadParams;

    const NAME: &'static str = "upload_cv";
    const DESCRIPTION: &'static str = "Upload cv to element - call this function to upload if element is not found, try with different index of the same upload element";

    fn parameters() -> Value {
        json!({
            "type": "object",
            "properties": {
                "index": {
                    "type": "integer",
                    "description": "Highlight index of the upload element on the current page"
                }
            },
            "required": ["index"]
        })
    }

    async fn run(&self, ctx: &ActionContext, params: UploadParams) -> Result<ActionResult> {
        let index = params.index;
        info!("uploading file to index {}", index);

        let Some(browser) = &ctx.browser else {
            return Ok(ActionResult::error("No browser session is attached"));
        };

        let path = current_resume(&ctx.output_folder);

        let dom_element = match browser.dom_element(index).await {
            Ok(Some(element)) => element,
            Ok(None) => return Ok(ActionResult::error(format!("No element found at index {}", index))),
            Err(e) => {
                debug!("failed to read element at index {}: {:#}", index, e);
                return Ok(ActionResult::error(format!("No element found at index {}", index)));
            }
        };

        let Some(upload_element) = dom_element.file_upload_element() else {
            info!("no file upload element found at index {}", index);
            return Ok(ActionResult::error(format!(
                "No file upload element found at index {}",
                index
            )));
        };

        let handle = match browser.locate(upload_element).await {
            Ok(Some(handle)) => handle,
            Ok(None) | Err(_) => {
                info!("no file upload element found at index {}", index);
                return Ok(ActionResult::error(format!(
                    "No file upload element found at index {}",
                    index
                )));
            }
        };

        match handle.set_input_files(&path).await {
            Ok(()) => {
                let msg = format!("Successfully uploaded file to index {}", index);
                info!("{} ({})", msg, path.display());
                Ok(ActionResult::content(msg))
            }
            Err(e) => {
                debug!("error in set_input_files: {:#}", e);
                Ok(ActionResult::error(format!("Failed to upload file to index {}", index)))
            }
        }
    }
}

/// Where the resume for the current application lives. Every tailored
/// resume is also written here, so this is always the latest one.
pub fn current_resume(output: &Path) -> PathBuf {
    output.join(DocumentKind::Resume.file_name())
}
