//! JSON exporter: the render descriptors as consumed by a canvas component.

use log::debug;

use crate::{
    export::{Error, Exporter},
    render::RenderModel,
};

/// Serializes a [`RenderModel`] to JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json {
    pretty: bool,
}

impl Json {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indent the output for human readers.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Exporter for Json {
    fn render(&self, model: &RenderModel) -> Result<String, Error> {
        let document = if self.pretty {
            serde_json::to_string_pretty(model)
        } else {
            serde_json::to_string(model)
        }
        .map_err(Error::Serialize)?;

        debug!(bytes = document.len(); "JSON document rendered");
        Ok(document)
    }
}
