// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Certledger Contributors

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{
        AllRecordsResponse, CertificateListResponse, CertificateSummary, CertificateView,
        ChainDetailsView, CreateStudentRequest, HealthResponse, IssueCertificateResponse,
        LoginRequest, LoginResponse, MessageResponse, StudentProfile, StudentRecordView,
        VerifyHashRequest, VerifyHashResponse, VerifyMetadataView,
    },
    state::AppState,
};

pub mod admin;
pub mod health;
pub mod student;
pub mod verifier;

pub fn router(state: AppState) -> Router {
    let public_root = state.files.public_root().to_path_buf();

    let api_routes = Router::new()
        .route(
            "/admin/create-student-account",
            post(admin::create_student_account),
        )
        .route("/admin/issue-certificate", post(admin::issue_certificate))
        .route("/admin/all-records", get(admin::all_records))
        .route("/student/login", post(student::login))
        .route(
            "/student/certificates/{roll_number}",
            get(student::certificates),
        )
        .route("/verifier/verify-hash", post(verifier::verify_hash))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health::health))
        .nest_service("/files", ServeDir::new(public_root))
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        admin::create_student_account,
        admin::issue_certificate,
        admin::all_records,
        student::login,
        student::certificates,
        verifier::verify_hash,
        health::health
    ),
    components(
        schemas(
            CreateStudentRequest,
            MessageResponse,
            IssueCertificateResponse,
            AllRecordsResponse,
            StudentRecordView,
            CertificateSummary,
            LoginRequest,
            LoginResponse,
            StudentProfile,
            CertificateView,
            CertificateListResponse,
            VerifyHashRequest,
            VerifyHashResponse,
            ChainDetailsView,
            VerifyMetadataView,
            HealthResponse
        )
    ),
    tags(
        (name = "Admin", description = "Account creation and certificate issuance"),
        (name = "Student", description = "Login and certificate retrieval"),
        (name = "Verifier", description = "Certificate hash verification"),
        (name = "Health", description = "Liveness probe")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_state;

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let (state, _registry, _dir) = test_state();
        let app = router(state);
        // Ensure the router can be converted into a service without panicking.
        let _ = app.into_make_service();
    }
}
