//! Tender handlers: installation requests and tender listings.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tenderdb_core::{validate_installation_request, AccessoriesPending, InstallationRequest};
use tenderdb_db::{ConsigneeRow, TenderRow, TenderWithConsignees};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState};

// ---------------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(super) struct TenderItem {
    pub id: Uuid,
    pub tender_number: String,
    pub authority_type: String,
    pub po_date: NaiveDate,
    pub contract_date: NaiveDate,
    pub equipment_name: String,
    pub equipment_specification: Option<serde_json::Value>,
    pub warranty_period: Option<i32>,
    pub lead_time_to_deliver: i32,
    pub lead_time_to_install: i32,
    pub remarks: Option<String>,
    pub has_accessories: bool,
    pub accessories: Vec<String>,
    pub accessories_pending: bool,
    pub status: String,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub consignees: Vec<ConsigneeItem>,
}

#[derive(Debug, Serialize)]
pub(super) struct ConsigneeItem {
    pub id: Uuid,
    pub sr_no: String,
    pub district_name: String,
    pub block_name: String,
    pub facility_name: String,
    pub facility_type: Option<String>,
    pub contact_person: Option<String>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub pincode: Option<String>,
    pub consignment_status: String,
    pub accessories_pending: AccessoriesPending,
}

impl From<ConsigneeRow> for ConsigneeItem {
    fn from(row: ConsigneeRow) -> Self {
        Self {
            id: row.id,
            sr_no: row.sr_no,
            district_name: row.district_name,
            block_name: row.block_name,
            facility_name: row.facility_name,
            facility_type: row.facility_type,
            contact_person: row.contact_person,
            contact_number: row.contact_number,
            email: row.email,
            address: row.address,
            pincode: row.pincode,
            consignment_status: row.consignment_status,
            accessories_pending: row.accessories_pending.0,
        }
    }
}

impl From<TenderWithConsignees> for TenderItem {
    fn from(TenderWithConsignees { tender, consignees }: TenderWithConsignees) -> Self {
        let TenderRow {
            id,
            tender_number,
            authority_type,
            po_date,
            contract_date,
            equipment_name,
            equipment_specification,
            warranty_period,
            lead_time_to_deliver,
            lead_time_to_install,
            remarks,
            has_accessories,
            accessories,
            accessories_pending,
            status,
            created_by,
            created_at,
            updated_at,
        } = tender;

        Self {
            id,
            tender_number,
            authority_type,
            po_date,
            contract_date,
            equipment_name,
            equipment_specification,
            warranty_period,
            lead_time_to_deliver,
            lead_time_to_install,
            remarks,
            has_accessories,
            accessories,
            accessories_pending,
            status,
            created_by,
            created_at,
            updated_at,
            consignees: consignees.into_iter().map(ConsigneeItem::from).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/tenders: create a tender and its consignees.
pub(super) async fn create_installation_request(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<InstallationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<TenderItem>>), ApiError> {
    let Json(request) =
        body.map_err(|e| ApiError::new(req_id.0.clone(), "bad_request", e.body_text()))?;

    let new_tender = validate_installation_request(request, None)
        .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.to_string()))?;

    let created = tenderdb_db::create_tender(&state.pool, &new_tender)
        .await
        .map_err(|e| {
            if e.is_unique_violation() {
                ApiError::new(
                    req_id.0.clone(),
                    "conflict",
                    format!(
                        "a tender with number '{}' already exists",
                        new_tender.tender_number
                    ),
                )
            } else {
                map_db_error(req_id.0.clone(), &e)
            }
        })?;

    tracing::info!(
        tender_id = %created.tender.id,
        tender_number = %created.tender.tender_number,
        consignees = created.consignees.len(),
        "installation request created"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(req_id.0, TenderItem::from(created))),
    ))
}

/// GET /api/v1/tenders: every tender, newest first.
pub(super) async fn list_tenders(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<TenderItem>>>, ApiError> {
    let tenders = tenderdb_db::list_tenders_with_consignees(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = tenders.into_iter().map(TenderItem::from).collect();
    Ok(Json(ApiResponse::new(req_id.0, data)))
}

/// GET /api/v1/tenders/{id}
pub(super) async fn get_tender(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<TenderItem>>, ApiError> {
    let tender_id = Uuid::parse_str(&id).map_err(|_| {
        ApiError::new(
            req_id.0.clone(),
            "bad_request",
            format!("'{id}' is not a valid tender id"),
        )
    })?;

    let tender = tenderdb_db::get_tender_with_consignees(&state.pool, tender_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "not_found",
                format!("tender {tender_id} not found"),
            )
        })?;

    Ok(Json(ApiResponse::new(req_id.0, TenderItem::from(tender))))
}
