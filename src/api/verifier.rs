// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Certledger Contributors

//! Public verifier endpoint.

use axum::{extract::State, Json};

use crate::{
    error::ApiError,
    models::{VerifyHashRequest, VerifyHashResponse},
    reconcile,
    state::AppState,
};

/// Verify a certificate hash against the registry contract and enrich the
/// result with off-chain metadata when available.
#[utoipa::path(
    post,
    path = "/api/verifier/verify-hash",
    tag = "Verifier",
    request_body = VerifyHashRequest,
    responses(
        (status = 200, description = "Classification with chain fields", body = VerifyHashResponse),
        (status = 400, description = "Malformed hash token"),
        (status = 500, description = "Registry unreachable")
    )
)]
pub async fn verify_hash(
    State(state): State<AppState>,
    Json(request): Json<VerifyHashRequest>,
) -> Result<Json<VerifyHashResponse>, ApiError> {
    let outcome = reconcile::verify_hash(
        &state.store,
        &*state.registry,
        &request.certificate_hash,
    )
    .await?;

    Ok(Json(VerifyHashResponse::from(outcome)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_state;
    use axum::http::StatusCode;

    const ISSUED_HASH: &str =
        "0xba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    fn request(token: &str) -> VerifyHashRequest {
        VerifyHashRequest {
            certificate_hash: token.to_string(),
        }
    }

    #[tokio::test]
    async fn malformed_token_is_bad_request() {
        let (state, registry, _dir) = test_state();

        let error = verify_hash(State(state), Json(request("0x1234")))
            .await
            .expect_err("short token rejected");
        assert_eq!(error.status, StatusCode::BAD_REQUEST);
        // Validation failed before any chain call.
        assert_eq!(registry.query_count(), 0);
    }

    #[tokio::test]
    async fn unissued_hash_reports_invalid() {
        let (state, _registry, _dir) = test_state();

        let Json(response) = verify_hash(State(state), Json(request(ISSUED_HASH)))
            .await
            .expect("verification runs");

        assert!(response.success);
        assert_eq!(response.status, "INVALID");
        assert!(response.metadata.is_none());
    }

    #[tokio::test]
    async fn issued_hash_reports_valid_with_metadata() {
        let (state, registry, _dir) = test_state();
        registry.seed(ISSUED_HASH, "R100");

        let student = crate::storage::StudentRecord {
            roll_number: "R100".into(),
            mail_id: "asha@example.edu".into(),
            credential_hash: "pbkdf2-sha256$100000$c2FsdA==$aGFzaA==".into(),
            student_name: "Asha".into(),
            student_class: None,
            department: Some("CSE".into()),
            year_of_pass: Some(2026),
            percentage: None,
        };
        state.store.create_student(&student).unwrap();
        state
            .store
            .append_certificate(
                &student,
                &crate::storage::CertificateRecord {
                    roll_number: "R100".into(),
                    certificate_hash: ISSUED_HASH.into(),
                    pdf_file_path: "/files/certificates/doc.pdf".into(),
                    photo_file_path: "/files/imgs/photo.png".into(),
                    qr_code_path: "/files/imgs/qrcodes/q.png".into(),
                    chain_tx_hash: "0xfeed".into(),
                    issued_at: chrono::Utc::now(),
                },
            )
            .unwrap();

        let Json(response) = verify_hash(State(state), Json(request(ISSUED_HASH)))
            .await
            .expect("verification runs");

        assert_eq!(response.status, "VALID");
        assert_eq!(response.blockchain_details.student_id, "R100");
        let metadata = response.metadata.expect("metadata block present");
        assert_eq!(metadata.student_name.as_deref(), Some("Asha"));
    }
}
