//! Handler error type and its HTTP mapping.
//!
//! | variant             | status | body                                   |
//! |---------------------|--------|----------------------------------------|
//! | `InvalidId`         | 400    | text/plain "Invalid id: -1"            |
//! | `NotFound`          | 404    | text/plain "Could not find Order: 7"   |
//! | `InvalidTransition` | 405    | problem+json "Method not allowed"      |
//! | `Store`             | 500    | problem+json, cause logged only        |

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use crm_schemas::{Entity, TransitionError};
use tracing::error;

use crate::api_types::{Problem, PROBLEM_JSON};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid id: {0}")]
    InvalidId(i64),

    #[error("Could not find {entity}: {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl ApiError {
    /// Ids are store-assigned from 1 upward; a replace may not mint a
    /// negative one.
    pub fn check_id(id: i64) -> Result<i64, Self> {
        if id < 0 {
            Err(ApiError::InvalidId(id))
        } else {
            Ok(id)
        }
    }

    pub fn not_found<E: Entity>(id: i64) -> Self {
        ApiError::NotFound {
            entity: E::NAME,
            id,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidId(_) => (StatusCode::BAD_REQUEST, self.to_string()).into_response(),
            ApiError::NotFound { .. } => (StatusCode::NOT_FOUND, self.to_string()).into_response(),
            ApiError::InvalidTransition(err) => problem(
                StatusCode::METHOD_NOT_ALLOWED,
                Problem::new("Method not allowed", err.to_string()),
            ),
            ApiError::Store(err) => {
                // Cause stays server-side.
                error!(error = %format!("{err:#}"), "store failure");
                problem(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Problem::new(
                        "Internal Server Error",
                        "The request could not be completed",
                    ),
                )
            }
        }
    }
}

fn problem(status: StatusCode, body: Problem) -> Response {
    (status, [(header::CONTENT_TYPE, PROBLEM_JSON)], Json(body)).into_response()
}
