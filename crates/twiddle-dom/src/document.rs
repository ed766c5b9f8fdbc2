#![forbid(unsafe_code)]

use crate::element::Element;

/// Element factory.
#[derive(Debug, Clone, Copy, Default)]
pub struct Document;

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    #[must_use]
    pub fn create_element(&self, tag: &str) -> Element {
        Element::new(tag)
    }
}
