// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Certledger Contributors

//! Student endpoints: login and certificate retrieval.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    credentials,
    error::ApiError,
    models::{CertificateListResponse, CertificateView, LoginRequest, LoginResponse, StudentProfile},
    state::AppState,
    storage::StoreError,
};

/// Per-call credential check. No session token is issued; the caller keeps
/// client-side state.
#[utoipa::path(
    post,
    path = "/api/student/login",
    tag = "Student",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credential accepted", body = LoginResponse),
        (status = 400, description = "Missing roll number or password"),
        (status = 401, description = "Credential mismatch"),
        (status = 404, description = "Unknown roll number")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let roll_number = request.roll_number.as_str().trim();
    if roll_number.is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request(
            "Roll Number and Password are required.",
        ));
    }

    let student = state.store.get_student(roll_number).map_err(|e| match e {
        StoreError::NotFound(_) => {
            ApiError::not_found("Invalid Roll Number or account not found.")
        }
        other => ApiError::internal(format!("An internal error occurred during login. ({other})")),
    })?;

    let matched = credentials::verify_password(&request.password, &student.credential_hash)
        .map_err(|e| ApiError::internal(format!("Stored credential unreadable: {e}")))?;
    if !matched {
        return Err(ApiError::unauthorized("Invalid Roll Number or password."));
    }

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful.".to_string(),
        roll_number: student.roll_number,
        student_name: student.student_name,
    }))
}

/// Profile plus certificates, newest first.
#[utoipa::path(
    get,
    path = "/api/student/certificates/{roll_number}",
    tag = "Student",
    params(
        ("roll_number" = String, Path, description = "Roll number of the student")
    ),
    responses(
        (status = 200, description = "Profile and certificate list", body = CertificateListResponse),
        (status = 404, description = "Unknown roll number")
    )
)]
pub async fn certificates(
    State(state): State<AppState>,
    Path(roll_number): Path<String>,
) -> Result<Json<CertificateListResponse>, ApiError> {
    let (student, certs) = state
        .store
        .list_certificates(&roll_number)
        .map_err(|e| match e {
            StoreError::NotFound(_) => ApiError::not_found("Student roll number not found."),
            other => ApiError::internal(format!("Failed to retrieve certificates. ({other})")),
        })?;

    Ok(Json(CertificateListResponse {
        success: true,
        profile: StudentProfile::from(&student),
        certificates: certs
            .iter()
            .map(|c| CertificateView::joined(c, &student))
            .collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateStudentRequest, RollNumber};
    use crate::state::test_state;
    use axum::http::StatusCode;

    async fn register(state: &AppState, roll: &str, password: &str) {
        crate::api::admin::create_student_account(
            State(state.clone()),
            Json(CreateStudentRequest {
                roll_number: RollNumber::from(roll),
                mail_id: format!("{roll}@example.edu"),
                password: password.into(),
                student_name: "Asha".into(),
                student_class: None,
                department: Some("CSE".into()),
                year_of_pass: Some(2026),
                percentage: None,
            }),
        )
        .await
        .expect("registration succeeds");
    }

    fn login_request(roll: &str, password: &str) -> LoginRequest {
        LoginRequest {
            roll_number: RollNumber::from(roll),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn login_with_correct_credential() {
        let (state, _registry, _dir) = test_state();
        register(&state, "R100", "pw123").await;

        let Json(response) = login(State(state), Json(login_request("R100", "pw123")))
            .await
            .expect("login succeeds");

        assert!(response.success);
        assert_eq!(response.student_name, "Asha");
        assert_eq!(response.roll_number, "R100");
    }

    #[tokio::test]
    async fn login_with_wrong_credential_is_unauthorized() {
        let (state, _registry, _dir) = test_state();
        register(&state, "R100", "pw123").await;

        let error = login(State(state), Json(login_request("R100", "wrong")))
            .await
            .expect_err("wrong password rejected");
        assert_eq!(error.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn login_with_unknown_roll_is_not_found() {
        let (state, _registry, _dir) = test_state();

        let error = login(State(state), Json(login_request("R404", "pw123")))
            .await
            .expect_err("unknown roll rejected");
        assert_eq!(error.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn login_with_missing_fields_is_bad_request() {
        let (state, _registry, _dir) = test_state();

        let error = login(State(state), Json(login_request("", "pw123")))
            .await
            .expect_err("empty roll rejected");
        assert_eq!(error.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn certificates_for_unknown_roll_is_not_found() {
        let (state, _registry, _dir) = test_state();

        let error = certificates(State(state), Path("R404".to_string()))
            .await
            .expect_err("unknown roll rejected");
        assert_eq!(error.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn certificates_returns_profile_and_empty_list() {
        let (state, _registry, _dir) = test_state();
        register(&state, "R100", "pw123").await;

        let Json(response) = certificates(State(state), Path("R100".to_string()))
            .await
            .expect("listing succeeds");

        assert!(response.success);
        assert_eq!(response.profile.name, "Asha");
        assert!(response.certificates.is_empty());
    }
}
