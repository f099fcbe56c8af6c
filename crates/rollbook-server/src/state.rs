use std::sync::Arc;

use rollbook_core::{NodeClient, ReportRenderer};

/// Shared handler context. Cheap to clone; everything inside is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub node: Arc<NodeClient>,
    pub renderer: Arc<dyn ReportRenderer>,
}

impl AppState {
    pub fn new(node: Arc<NodeClient>, renderer: Arc<dyn ReportRenderer>) -> Self {
        Self { node, renderer }
    }
}
