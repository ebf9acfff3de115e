//! Seam to the browser automation layer. The agent runtime owns the real
//! session; actions only see these traits.

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use eyre::Result;

/// Snapshot of an element in the current page, addressed by the highlight
/// index the agent sees.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomElement {
    pub index: usize,
    pub tag_name: String,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<DomElement>,
}

impl DomElement {
    pub fn is_file_input(&self) -> bool {
        self.tag_name.eq_ignore_ascii_case("input")
            && self
                .attributes
                .get("type")
                .is_some_and(|kind| kind.eq_ignore_ascii_case("file"))
    }

    /// The element itself when it is a file input, otherwise the first file
    /// input among its descendants (depth first).
    pub fn file_upload_element(&self) -> Option<&DomElement> {
        if self.is_file_input() {
            return Some(self);
        }

        self.children
            .iter()
            .find_map(DomElement::file_upload_element)
    }
}

#[async_trait]
pub trait ElementHandle: Send + Sync {
    async fn set_input_files(&self, path: &Path) -> Result<()>;
}

#[async_trait]
pub trait BrowserContext: Send + Sync {
    async fn dom_element(&self, index: usize) -> Result<Option<DomElement>>;

    async fn locate(&self, element: &DomElement) -> Result<Option<Box<dyn ElementHandle>>>;
}
