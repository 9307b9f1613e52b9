use std::sync::Arc;

use crate::analysis::report::ReportAssembler;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Catalog, compiled matcher, ranker and recommendation table — built once
    /// in `main`, read-only afterwards, so no locking is needed.
    pub analyzer: Arc<ReportAssembler>,
    pub config: Config,
}
