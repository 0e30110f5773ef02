//! Password generation endpoint.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::{info, warn};

use qrpg_core::{GenerationReport, GenerationRequest};
use qrpg_hal::{JobId, JobObserver, JobStatus, RecordingObserver};

use crate::dto::GenerateRequest;
use crate::error::{ApiError, RunFailure};
use crate::state::AppState;

/// Mirrors run progress into the server log and keeps it for the response.
#[derive(Default)]
struct LogObserver {
    record: RecordingObserver,
}

impl JobObserver for LogObserver {
    fn on_status(&self, job_id: &JobId, status: &JobStatus) {
        info!(job_id = %job_id, status = %status, "job status");
        self.record.on_status(job_id, status);
    }

    fn on_message(&self, message: &str) {
        info!("{message}");
        self.record.on_message(message);
    }
}

/// POST /api/generate - Run one generation and return the report.
///
/// A failed run answers with the error and the status messages seen so far.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerationReport>, RunFailure> {
    let Json(body) = payload.map_err(ApiError::from)?;
    let request = GenerationRequest::try_from(body).map_err(ApiError::from)?;

    let observer = LogObserver::default();
    match state.generator.generate(&request, &observer).await {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            warn!(backend = %request.backend, "generation failed: {e}");
            Err(RunFailure {
                error: e.into(),
                messages: observer.record.take(),
            })
        }
    }
}
