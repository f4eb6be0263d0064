//! Write operations for tenders and their consignees.

use sqlx::{types::Json, PgConnection, PgPool};
use tenderdb_core::{NewConsignee, NewTender};
use uuid::Uuid;

use super::types::{
    ConsigneeRow, TenderRow, TenderWithConsignees, CONSIGNEE_COLUMNS, TENDER_COLUMNS,
};
use crate::DbError;

/// Insert a tender and all of its consignees in one transaction.
///
/// Either every row is written or none is: any failure (including a
/// duplicate `tender_number`) rolls the whole request back.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement fails. Callers can detect a
/// duplicate tender number with [`DbError::is_unique_violation`].
pub async fn create_tender(
    pool: &PgPool,
    new_tender: &NewTender,
) -> Result<TenderWithConsignees, DbError> {
    let mut tx = pool.begin().await?;

    let tender = sqlx::query_as::<_, TenderRow>(&format!(
        "INSERT INTO tenders \
             (tender_number, authority_type, po_date, contract_date, equipment_name, \
              lead_time_to_deliver, lead_time_to_install, remarks, has_accessories, \
              accessories, accessories_pending, status, created_by) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
         RETURNING {TENDER_COLUMNS}"
    ))
    .bind(&new_tender.tender_number)
    .bind(&new_tender.authority_type)
    .bind(new_tender.po_date)
    .bind(new_tender.contract_date)
    .bind(&new_tender.equipment_name)
    .bind(new_tender.lead_time_to_deliver)
    .bind(new_tender.lead_time_to_install)
    .bind(&new_tender.remarks)
    .bind(new_tender.has_accessories)
    .bind(&new_tender.accessories)
    .bind(new_tender.accessories_pending)
    .bind(&new_tender.status)
    .bind(new_tender.created_by)
    .fetch_one(&mut *tx)
    .await?;

    let mut consignees = Vec::with_capacity(new_tender.consignees.len());
    for consignee in &new_tender.consignees {
        consignees.push(insert_consignee(&mut *tx, tender.id, consignee).await?);
    }

    tx.commit().await?;
    Ok(TenderWithConsignees { tender, consignees })
}

async fn insert_consignee(
    conn: &mut PgConnection,
    tender_id: Uuid,
    consignee: &NewConsignee,
) -> Result<ConsigneeRow, DbError> {
    let row = sqlx::query_as::<_, ConsigneeRow>(&format!(
        "INSERT INTO consignees \
             (tender_id, sr_no, district_name, block_name, facility_name, \
              contact_person, contact_number, email, consignment_status, accessories_pending) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         RETURNING {CONSIGNEE_COLUMNS}"
    ))
    .bind(tender_id)
    .bind(&consignee.sr_no)
    .bind(&consignee.district_name)
    .bind(&consignee.block_name)
    .bind(&consignee.facility_name)
    .bind(&consignee.contact_person)
    .bind(&consignee.contact_number)
    .bind(&consignee.email)
    .bind(&consignee.consignment_status)
    .bind(Json(&consignee.accessories_pending))
    .fetch_one(conn)
    .await?;
    Ok(row)
}
