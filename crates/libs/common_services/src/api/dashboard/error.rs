use crate::api::error_response;
use crate::database::DbError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use color_eyre::eyre;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("internal error")]
    Internal(#[from] eyre::Report),
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        match self {
            Self::Database(e) => {
                error!("Dashboard -> Database query failed: {e}");
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred.",
                    None,
                )
            }
            Self::Internal(e) => {
                error!("Dashboard -> Internal error: {e:?}");
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected internal error occurred.",
                    None,
                )
            }
        }
    }
}

impl From<DbError> for DashboardError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Sqlx(sql_err) => Self::Database(sql_err),
            DbError::SerdeJson(err) => Self::Internal(eyre::Report::new(err)),
        }
    }
}
