use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::{debug, error, info};

use jobs_common::metrics::{report_accepted_posting, report_rejected_posting, report_store_fault};
use jobs_common::normalize::normalize;
use jobs_common::posting::{NewPosting, Submission, ValidationError};
use jobs_common::store::{SharedStore, StoreError};

#[derive(Error, Debug)]
pub enum IngestError {
    #[error(transparent)]
    InvalidSubmission(#[from] ValidationError),
    #[error("job posting store is unavailable")]
    StoreUnavailable,
    #[error("job posting store did not answer in time, the posting may have been stored")]
    StoreTimeout,
    #[error("job posting could not be stored")]
    StoreFailed,
}

impl From<StoreError> for IngestError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::TimeoutError(_) => IngestError::StoreTimeout,
            err if err.is_unavailable() => IngestError::StoreUnavailable,
            _ => IngestError::StoreFailed,
        }
    }
}

impl IntoResponse for IngestError {
    fn into_response(self) -> Response {
        match self {
            IngestError::InvalidSubmission(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            IngestError::StoreUnavailable | IngestError::StoreTimeout => {
                (StatusCode::SERVICE_UNAVAILABLE, self.to_string())
            }
            IngestError::StoreFailed => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        }
        .into_response()
    }
}

pub async fn post_posting(
    State(store): State<SharedStore>,
    Json(submission): Json<Submission>,
) -> Result<StatusCode, IngestError> {
    debug!(
        source_link = %submission.source_link,
        description_len = submission.description.len(),
        "received submission"
    );

    submission.validate().map_err(rejected)?;

    let description = normalize(&submission.description);
    let posting = NewPosting::new(submission.source_link, description).map_err(rejected)?;

    let start_time = Instant::now();

    let result = store.insert(posting).await;

    let elapsed_time = start_time.elapsed().as_secs_f64();
    metrics::histogram!("jobs_api_insert").record(elapsed_time);

    match result {
        Ok(id) => {
            info!(%id, "stored job posting");
            report_accepted_posting();
            Ok(StatusCode::ACCEPTED)
        }
        Err(err) => {
            error!("failed to store job posting: {}", err);
            report_store_fault(err.kind());
            Err(err.into())
        }
    }
}

fn rejected(err: ValidationError) -> IngestError {
    debug!("rejected submission: {}", err);
    report_rejected_posting(err.reason());
    err.into()
}
