//! Row types for the `tenders` and `consignees` tables.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::types::Json;
use tenderdb_core::AccessoriesPending;
use uuid::Uuid;

/// A row from the `tenders` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TenderRow {
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
}

/// A row from the `consignees` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ConsigneeRow {
    pub id: Uuid,
    pub tender_id: Uuid,
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
    pub accessories_pending: Json<AccessoriesPending>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A tender together with its consignees, ordered by serial number.
#[derive(Debug, Clone)]
pub struct TenderWithConsignees {
    pub tender: TenderRow,
    pub consignees: Vec<ConsigneeRow>,
}

pub(super) const TENDER_COLUMNS: &str = "id, tender_number, authority_type, po_date, contract_date, \
     equipment_name, equipment_specification, warranty_period, \
     lead_time_to_deliver, lead_time_to_install, remarks, \
     has_accessories, accessories, accessories_pending, status, \
     created_by, created_at, updated_at";

pub(super) const CONSIGNEE_COLUMNS: &str = "id, tender_id, sr_no, district_name, block_name, \
     facility_name, facility_type, contact_person, contact_number, \
     email, address, pincode, consignment_status, accessories_pending, \
     created_at, updated_at";
