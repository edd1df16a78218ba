//! Graph view state.
//!
//! A [`GraphView`] is what a viewer shows at any moment: nothing yet, a
//! laid-out graph, or an explanation of why the graph is unavailable. It is
//! recomputed wholesale whenever a new summary arrives.

use log::{info, warn};

use ocelgraph_core::summary::ObjectGraphSummary;

use crate::{ObjectGraphBuilder, render::RenderModel};

/// The state of an object graph view.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum GraphView {
    /// No summary has been provided.
    #[default]
    NoData,
    /// The summary was laid out successfully.
    LaidOut(RenderModel),
    /// Building or laying out the summary failed.
    Unavailable(String),
}

impl GraphView {
    /// Recomputes the view from `summary`.
    ///
    /// Without a summary the view returns to [`GraphView::NoData`]. Any
    /// failure is captured as [`GraphView::Unavailable`] with the error
    /// message, so refreshing never fails.
    pub fn refresh(&mut self, builder: &ObjectGraphBuilder, summary: Option<&ObjectGraphSummary>) {
        *self = match summary {
            None => Self::NoData,
            Some(summary) => match builder.render(summary) {
                Ok(model) => {
                    info!(
                        nodes = model.nodes().len(),
                        edges = model.edges().len();
                        "Graph view refreshed"
                    );
                    Self::LaidOut(model)
                }
                Err(err) => {
                    warn!(err:err; "Graph view unavailable");
                    Self::Unavailable(err.to_string())
                }
            },
        };
    }

    /// Returns the render model when the view is laid out.
    pub fn model(&self) -> Option<&RenderModel> {
        match self {
            Self::LaidOut(model) => Some(model),
            _ => None,
        }
    }

    pub fn is_laid_out(&self) -> bool {
        matches!(self, Self::LaidOut(_))
    }
}
