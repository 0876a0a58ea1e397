// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Certledger Contributors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::reconcile::{IssueError, VerifyError};
use crate::storage::StoreError;

/// HTTP-level error carrying a status code and a client-facing message.
///
/// Every failure surfaces to the client as `{"success": false, "message": ...}`;
/// no error propagates past the handler layer.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            success: false,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(what) => ApiError::not_found(format!("{what} not found.")),
            StoreError::AlreadyExists(what) => ApiError::conflict(format!("{what} already exists.")),
            other => ApiError::internal(format!("Storage failure: {other}")),
        }
    }
}

impl From<IssueError> for ApiError {
    fn from(e: IssueError) -> Self {
        match e {
            IssueError::UnknownStudent(id) => ApiError::not_found(format!(
                "Student with ID {id} must be registered first via the 'Create Student Account' page."
            )),
            other => ApiError::internal(format!("Failed to issue certificate. Details: {other}")),
        }
    }
}

impl From<VerifyError> for ApiError {
    fn from(e: VerifyError) -> Self {
        match e {
            VerifyError::MalformedToken(_) => ApiError::bad_request(
                "Invalid certificate hash format. Must be a 0x-prefixed bytes32 hex string (66 characters long).",
            ),
            VerifyError::Chain(other) => ApiError::internal(format!(
                "Failed to verify hash. Check network connection or server logs. ({other})"
            )),
        }
    }
}
