//! Installation requests: the payload that creates a tender and its consignees.
//!
//! Validation is pure and collects every violation so a client can fix the
//! whole form in one round-trip.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::consignees::LocationRecord;

/// Status assigned to every newly created tender.
pub const TENDER_STATUS_DRAFT: &str = "Draft";

/// Status assigned to every newly created consignee.
pub const CONSIGNMENT_STATUS_PROCESSING: &str = "Processing";

const MAX_TENDER_NUMBER_LEN: usize = 100;

#[derive(Debug, Clone, Deserialize)]
pub struct InstallationRequest {
    pub tender_number: String,
    pub authority_type: String,
    /// `YYYY-MM-DD`; used for both the PO and the contract date.
    pub po_contract_date: String,
    pub equipment: String,
    pub lead_time_to_deliver: i32,
    pub lead_time_to_install: i32,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub has_accessories: bool,
    #[serde(default)]
    pub selected_accessories: Option<Vec<String>>,
    #[serde(default)]
    pub locations: Option<Vec<LocationRecord>>,
}

/// Per-consignee snapshot of the accessories still to be delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessoriesPending {
    pub status: bool,
    pub count: usize,
    pub items: Vec<String>,
}

/// A validated tender ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTender {
    pub tender_number: String,
    pub authority_type: String,
    pub po_date: NaiveDate,
    pub contract_date: NaiveDate,
    pub equipment_name: String,
    pub lead_time_to_deliver: i32,
    pub lead_time_to_install: i32,
    pub remarks: Option<String>,
    pub has_accessories: bool,
    pub accessories: Vec<String>,
    pub accessories_pending: bool,
    pub status: String,
    pub created_by: Option<Uuid>,
    pub consignees: Vec<NewConsignee>,
}

/// A validated consignee belonging to a [`NewTender`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewConsignee {
    pub sr_no: String,
    pub district_name: String,
    pub block_name: String,
    pub facility_name: String,
    pub contact_person: Option<String>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub consignment_status: String,
    pub accessories_pending: AccessoriesPending,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} {message}")]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

/// Every problem found in one installation request, joined with `; `.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", join_violations(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Default)]
struct Violations(Vec<FieldViolation>);

impl Violations {
    fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldViolation {
            field: field.into(),
            message: message.into(),
        });
    }

    fn require(&mut self, field: &str, value: &str) {
        if value.is_empty() {
            self.push(field, "is required");
        }
    }
}

/// Validate an installation request and derive the rows to insert.
///
/// Consignee serial numbers are reassigned from position, so whatever the
/// client echoes back from the CSV import is ignored.
///
/// # Errors
///
/// Returns [`ValidationError`] listing every invalid field.
pub fn validate_installation_request(
    request: InstallationRequest,
    created_by: Option<Uuid>,
) -> Result<NewTender, ValidationError> {
    let mut violations = Violations::default();

    let tender_number = request.tender_number.trim().to_owned();
    violations.require("tender_number", &tender_number);
    if tender_number.chars().count() > MAX_TENDER_NUMBER_LEN {
        violations.push(
            "tender_number",
            format!("must be at most {MAX_TENDER_NUMBER_LEN} characters"),
        );
    }

    let authority_type = request.authority_type.trim().to_owned();
    violations.require("authority_type", &authority_type);

    let equipment_name = request.equipment.trim().to_owned();
    violations.require("equipment", &equipment_name);

    let po_date = match NaiveDate::parse_from_str(request.po_contract_date.trim(), "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            violations.push("po_contract_date", "must be a date in YYYY-MM-DD format");
            None
        }
    };

    if request.lead_time_to_deliver < 0 {
        violations.push("lead_time_to_deliver", "must not be negative");
    }
    if request.lead_time_to_install < 0 {
        violations.push("lead_time_to_install", "must not be negative");
    }

    let accessories: Vec<String> = request
        .selected_accessories
        .unwrap_or_default()
        .into_iter()
        .map(|a| a.trim().to_owned())
        .filter(|a| !a.is_empty())
        .collect();
    let accessories_pending = request.has_accessories && !accessories.is_empty();

    let locations = request.locations.unwrap_or_default();
    let mut consignees = Vec::with_capacity(locations.len());
    for (index, location) in locations.into_iter().enumerate() {
        let prefix = format!("locations[{index}]");
        let district_name = location.district_name.trim().to_owned();
        let block_name = location.block_name.trim().to_owned();
        let facility_name = location.facility_name.trim().to_owned();
        violations.require(&format!("{prefix}.districtName"), &district_name);
        violations.require(&format!("{prefix}.blockName"), &block_name);
        violations.require(&format!("{prefix}.facilityName"), &facility_name);

        consignees.push(NewConsignee {
            sr_no: (index + 1).to_string(),
            district_name,
            block_name,
            facility_name,
            contact_person: non_empty(&location.contact_name),
            contact_number: non_empty(&location.contact_phone),
            email: non_empty(&location.contact_email),
            consignment_status: CONSIGNMENT_STATUS_PROCESSING.to_owned(),
            accessories_pending: AccessoriesPending {
                status: accessories_pending,
                count: accessories.len(),
                items: accessories.clone(),
            },
        });
    }

    let Some(po_date) = po_date else {
        return Err(ValidationError {
            violations: violations.0,
        });
    };
    if !violations.0.is_empty() {
        return Err(ValidationError {
            violations: violations.0,
        });
    }

    Ok(NewTender {
        tender_number,
        authority_type,
        po_date,
        contract_date: po_date,
        equipment_name,
        lead_time_to_deliver: request.lead_time_to_deliver,
        lead_time_to_install: request.lead_time_to_install,
        remarks: request.remarks.as_deref().and_then(non_empty),
        has_accessories: request.has_accessories,
        accessories,
        accessories_pending,
        status: TENDER_STATUS_DRAFT.to_owned(),
        created_by,
        consignees,
    })
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}
