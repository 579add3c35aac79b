use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use festago_core::error::{CoreError, ErrorKind, TicketError};
use festago_core::ledger::LedgerError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Implements [`IntoResponse`] to produce consistent
/// `{ "error": message, "code": CODE }` bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A generic domain error from `festago_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A ticketing rule violation.
    #[error(transparent)]
    Ticket(#[from] TicketError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Ticket(e) => AppError::Ticket(e),
            LedgerError::TicketNotFound(id) => AppError::Core(CoreError::NotFound {
                entity: "Ticket",
                id,
            }),
            LedgerError::Storage(e) => AppError::InternalError(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
            },

            AppError::Ticket(err) => classify_ticket_error(err),

            AppError::Database(err) => classify_sqlx_error(err),

            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Map a ticketing rule violation to a status and its stable code.
///
/// Invariant breaches (`ErrorKind::Internal`) are logged and sanitised.
fn classify_ticket_error(err: &TicketError) -> (StatusCode, &'static str, String) {
    let status = match err.kind() {
        ErrorKind::Validation
        | ErrorKind::StageStarted
        | ErrorKind::CodeExpired
        | ErrorKind::CodeInvalid => StatusCode::BAD_REQUEST,
        ErrorKind::SoldOut | ErrorKind::DoubleEntry => StatusCode::CONFLICT,
        ErrorKind::NotOwner => StatusCode::FORBIDDEN,
        ErrorKind::Internal => {
            tracing::error!(error = %err, code = err.code(), "Ticket invariant violated");
            return internal();
        }
    };
    (status, err.code(), err.to_string())
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}
