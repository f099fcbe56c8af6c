use axum::{routing::get, Router};

use crate::state::AppState;

use crate::api::v1::handlers::{health::health, reports::student_report};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/students/{id}/report", get(student_report))
}
