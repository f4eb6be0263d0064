//! Read operations for tenders and their consignees.

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use super::types::{
    ConsigneeRow, TenderRow, TenderWithConsignees, CONSIGNEE_COLUMNS, TENDER_COLUMNS,
};
use crate::DbError;

// Serial numbers are text; ordering by length first keeps "2" ahead of "10".
const CONSIGNEE_ORDER: &str = "ORDER BY tender_id, length(sr_no), sr_no";

/// List every tender, newest first, each with its consignees.
///
/// Runs two queries regardless of the number of tenders: one for the tenders
/// and one for all of their consignees.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if either query fails.
pub async fn list_tenders_with_consignees(
    pool: &PgPool,
) -> Result<Vec<TenderWithConsignees>, DbError> {
    let tenders = sqlx::query_as::<_, TenderRow>(&format!(
        "SELECT {TENDER_COLUMNS} FROM tenders ORDER BY created_at DESC, id"
    ))
    .fetch_all(pool)
    .await?;

    if tenders.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = tenders.iter().map(|t| t.id).collect();
    let consignees = sqlx::query_as::<_, ConsigneeRow>(&format!(
        "SELECT {CONSIGNEE_COLUMNS} FROM consignees \
         WHERE tender_id = ANY($1) {CONSIGNEE_ORDER}"
    ))
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let mut by_tender: HashMap<Uuid, Vec<ConsigneeRow>> = HashMap::new();
    for consignee in consignees {
        by_tender
            .entry(consignee.tender_id)
            .or_default()
            .push(consignee);
    }

    Ok(tenders
        .into_iter()
        .map(|tender| {
            let consignees = by_tender.remove(&tender.id).unwrap_or_default();
            TenderWithConsignees { tender, consignees }
        })
        .collect())
}

/// Fetch a single tender by id with its consignees.
///
/// Returns `Ok(None)` when no tender has that id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if a query fails.
pub async fn get_tender_with_consignees(
    pool: &PgPool,
    tender_id: Uuid,
) -> Result<Option<TenderWithConsignees>, DbError> {
    let tender = sqlx::query_as::<_, TenderRow>(&format!(
        "SELECT {TENDER_COLUMNS} FROM tenders WHERE id = $1"
    ))
    .bind(tender_id)
    .fetch_optional(pool)
    .await?;

    let Some(tender) = tender else {
        return Ok(None);
    };

    let consignees = list_consignees_for_tender(pool, tender.id).await?;
    Ok(Some(TenderWithConsignees { tender, consignees }))
}

/// List the consignees of one tender in serial-number order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_consignees_for_tender(
    pool: &PgPool,
    tender_id: Uuid,
) -> Result<Vec<ConsigneeRow>, DbError> {
    let rows = sqlx::query_as::<_, ConsigneeRow>(&format!(
        "SELECT {CONSIGNEE_COLUMNS} FROM consignees WHERE tender_id = $1 {CONSIGNEE_ORDER}"
    ))
    .bind(tender_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
