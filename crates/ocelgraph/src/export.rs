//! Exporters for rendered object graphs.
//!
//! An [`Exporter`] turns a [`RenderModel`] into a document: [`json::Json`]
//! emits the descriptors for a canvas component, [`svg::Svg`] draws a
//! static picture.

pub mod json;
pub mod svg;

use std::{fs, path::Path};

use log::{error, info};

use crate::render::RenderModel;

/// A single exporter trait that works for every output format.
pub trait Exporter {
    /// Renders the model into a document string.
    fn render(&self, model: &RenderModel) -> Result<String, Error>;

    /// Renders the model and writes the document to `path`.
    fn write(&self, model: &RenderModel, path: &Path) -> Result<(), Error> {
        let document = self.render(model)?;

        info!(path:? = path; "Writing output file");
        if let Err(err) = fs::write(path, document) {
            error!(path:? = path, err:err; "Failed to write output file");
            return Err(Error::Io(err));
        }
        Ok(())
    }
}

#[derive(Debug)]
pub enum Error {
    Render(String),
    Serialize(serde_json::Error),
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Serialize(err) => write!(f, "Serialization error: {err}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Serialize(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}
