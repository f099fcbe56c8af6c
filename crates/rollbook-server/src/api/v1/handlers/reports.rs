use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use tracing::{error, info};

use crate::{error::AppError, state::AppState};

const MAX_STUDENT_ID_LENGTH: usize = 64;

fn is_valid_student_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_STUDENT_ID_LENGTH
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// GET /api/v1/students/{id}/report
pub async fn student_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    if !is_valid_student_id(&id) {
        return Err(AppError::bad_request("INVALID_STUDENT_ID", "invalid student id"));
    }

    let student = state.node.get_student(&id).await?;

    // printpdf is CPU-bound; keep it off the async workers.
    let renderer = Arc::clone(&state.renderer);
    let bytes = tokio::task::spawn_blocking(move || renderer.render(&student))
        .await
        .map_err(|e| {
            error!(error = %e, "Report rendering task failed");
            AppError::Internal
        })??;

    info!(student_id = %id, bytes = bytes.len(), "Serving student report");

    let disposition = format!(
        "attachment; filename=student_{}.{}",
        id,
        state.renderer.extension()
    );
    Ok((
        [
            (header::CONTENT_TYPE, state.renderer.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}
