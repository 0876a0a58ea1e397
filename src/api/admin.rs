// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Certledger Contributors

//! Admin endpoints: account creation, certificate issuance, full listing.

use std::io::Write;

use axum::{
    extract::{
        multipart::{Field, Multipart},
        State,
    },
    Json,
};

use crate::{
    credentials,
    error::ApiError,
    files::{CleanupGuard, StoredFile},
    models::{
        AllRecordsResponse, CreateStudentRequest, IssueCertificateResponse, MessageResponse,
        StudentRecordView,
    },
    reconcile,
    state::AppState,
    storage::{StoreError, StudentRecord},
};

/// Multipart field carrying the PDF certificate.
const DOCUMENT_FIELD: &str = "document";
/// Multipart field carrying the student photo.
const PHOTO_FIELD: &str = "photo";
/// Multipart field carrying the owning roll number.
const STUDENT_ID_FIELD: &str = "studentId";

/// Create a student account in both persistence backends.
#[utoipa::path(
    post,
    path = "/api/admin/create-student-account",
    tag = "Admin",
    request_body = CreateStudentRequest,
    responses(
        (status = 200, description = "Account created", body = MessageResponse),
        (status = 400, description = "Missing required fields"),
        (status = 409, description = "Roll number already registered"),
        (status = 500, description = "Both persistence backends failed")
    )
)]
pub async fn create_student_account(
    State(state): State<AppState>,
    Json(request): Json<CreateStudentRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let roll_number = request.roll_number.as_str().trim();
    if roll_number.is_empty()
        || request.mail_id.trim().is_empty()
        || request.password.is_empty()
        || request.student_name.trim().is_empty()
    {
        return Err(ApiError::bad_request(
            "Missing required fields: Roll Number, Email, Password, or Student Name.",
        ));
    }

    let credential_hash = credentials::hash_password(&request.password)
        .map_err(|e| ApiError::internal(format!("Failed to hash credential: {e}")))?;

    let student = StudentRecord {
        roll_number: roll_number.to_string(),
        mail_id: request.mail_id,
        credential_hash,
        student_name: request.student_name,
        student_class: request.student_class,
        department: request.department,
        year_of_pass: request.year_of_pass,
        percentage: request.percentage,
    };

    state.store.create_student(&student).map_err(|e| match e {
        StoreError::AlreadyExists(_) => ApiError::conflict(format!(
            "Student with Roll Number {roll_number} already exists."
        )),
        other => ApiError::internal(format!(
            "Failed to create student account due to a server error. ({other})"
        )),
    })?;

    tracing::info!(roll = roll_number, "student account created");
    Ok(Json(MessageResponse {
        success: true,
        message: format!("Student {roll_number} account created successfully."),
    }))
}

/// Issue a certificate: hash, register on chain, render QR, persist.
#[utoipa::path(
    post,
    path = "/api/admin/issue-certificate",
    tag = "Admin",
    request_body(
        content = String,
        content_type = "multipart/form-data",
        description = "Fields: `document` (PDF), `photo` (image), `studentId`"
    ),
    responses(
        (status = 200, description = "Certificate issued and confirmed", body = IssueCertificateResponse),
        (status = 400, description = "Missing file or studentId"),
        (status = 404, description = "Unknown student"),
        (status = 500, description = "Chain or storage failure")
    )
)]
pub async fn issue_certificate(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<IssueCertificateResponse>, ApiError> {
    let mut document: Option<StoredFile> = None;
    let mut photo: Option<StoredFile> = None;
    let mut student_id: Option<String> = None;

    // Sweeps whatever was spooled if validation below bails out.
    let mut spooled = CleanupGuard::new();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart payload: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            DOCUMENT_FIELD => {
                let original = field.file_name().unwrap_or("certificate.pdf").to_string();
                let target = state.files.document_target(&original);
                spool_field(&mut field, &target).await?;
                spooled.track(&target.disk_path);
                document = Some(target);
            }
            PHOTO_FIELD => {
                let original = field.file_name().unwrap_or("photo.png").to_string();
                let target = state.files.photo_target(&original);
                spool_field(&mut field, &target).await?;
                spooled.track(&target.disk_path);
                photo = Some(target);
            }
            STUDENT_ID_FIELD => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Unreadable studentId: {e}")))?;
                student_id = Some(value);
            }
            _ => {}
        }
    }

    let (Some(document), Some(photo)) = (document, photo) else {
        return Err(ApiError::bad_request(
            "Both PDF certificate and student photo must be uploaded.",
        ));
    };
    let Some(student_id) = student_id.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
    else {
        return Err(ApiError::bad_request("studentId is required."));
    };

    // From here the reconciler owns artifact cleanup.
    spooled.disarm();

    let outcome = reconcile::issue_certificate(
        &*state.store,
        &*state.registry,
        &state.files,
        &student_id,
        document,
        photo,
    )
    .await?;

    Ok(Json(IssueCertificateResponse {
        success: true,
        message: "Certificate issued and blockchain transaction confirmed.".to_string(),
        hash: outcome.certificate_hash,
        tx_hash: outcome.tx_hash,
        qr_code_path: outcome.qr_code_path,
    }))
}

/// Stream one multipart file field to its spool target.
async fn spool_field(field: &mut Field<'_>, target: &StoredFile) -> Result<(), ApiError> {
    let mut file = std::fs::File::create(&target.disk_path)
        .map_err(|e| ApiError::internal(format!("Failed to store upload: {e}")))?;

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| ApiError::bad_request(format!("Upload interrupted: {e}")))?
    {
        file.write_all(&chunk)
            .map_err(|e| ApiError::internal(format!("Failed to store upload: {e}")))?;
    }
    Ok(())
}

/// Every student with nested certificates, credential hashes omitted.
#[utoipa::path(
    get,
    path = "/api/admin/all-records",
    tag = "Admin",
    responses(
        (status = 200, description = "All student records", body = AllRecordsResponse),
        (status = 500, description = "Both persistence backends failed")
    )
)]
pub async fn all_records(
    State(state): State<AppState>,
) -> Result<Json<AllRecordsResponse>, ApiError> {
    let records = state
        .store
        .list_all_students()
        .map_err(|e| ApiError::internal(format!("Failed to retrieve records from the server. ({e})")))?;

    Ok(Json(AllRecordsResponse {
        success: true,
        records: records.iter().map(StudentRecordView::from).collect(),
    }))
}
