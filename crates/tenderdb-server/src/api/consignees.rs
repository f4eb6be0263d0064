//! Consignee CSV import and template download.

use axum::{
    body::Bytes,
    extract::multipart::{Multipart, MultipartError, MultipartRejection},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use tenderdb_core::{generate_template, import_locations, ImportResult, TEMPLATE_FILENAME};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse};

const FILE_FIELD: &str = "file";

fn map_multipart_error(req_id: &str, error: &MultipartError) -> ApiError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::new(req_id, "payload_too_large", "uploaded file is too large");
    }
    ApiError::new(req_id, "bad_request", error.body_text())
}

/// Pull the bytes of the `file` part, ignoring any other parts.
async fn read_file_field(req_id: &str, mut multipart: Multipart) -> Result<Option<Bytes>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| map_multipart_error(req_id, &e))?
    {
        if field.name() == Some(FILE_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| map_multipart_error(req_id, &e))?;
            return Ok(Some(bytes));
        }
    }
    Ok(None)
}

/// POST /api/v1/consignees/import: parse an uploaded CSV into locations.
///
/// Nothing is persisted; the client reviews the result and submits it with
/// an installation request.
pub(super) async fn import_consignees(
    Extension(req_id): Extension<RequestId>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ApiResponse<ImportResult>>, ApiError> {
    let rid = &req_id.0;

    let multipart = multipart.map_err(|e| ApiError::new(rid, "bad_request", e.body_text()))?;
    let Some(file) = read_file_field(rid, multipart).await? else {
        return Err(ApiError::new(rid, "bad_request", "No file uploaded"));
    };

    let result = import_locations(&file).map_err(|e| {
        tracing::warn!(error = %e, bytes = file.len(), "consignee import rejected");
        ApiError::new(rid, "bad_request", format!("Error parsing CSV file: {e}"))
    })?;

    tracing::info!(
        locations = result.locations.len(),
        warnings = result.warning_count(),
        "consignee file imported"
    );

    Ok(Json(ApiResponse::new(req_id.0, result)))
}

/// GET /api/v1/consignees/template
pub(super) async fn download_template() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={TEMPLATE_FILENAME}"),
            ),
        ],
        generate_template(),
    )
}
