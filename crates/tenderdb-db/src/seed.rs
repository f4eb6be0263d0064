use sqlx::{PgConnection, PgPool};
use tenderdb_core::{UserRole, CONSIGNMENT_STATUS_PROCESSING, DEFAULT_USERS, TENDER_STATUS_DRAFT};
use uuid::Uuid;

use crate::{users::upsert_user, DbError};

/// Counts of rows touched by [`seed_database`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub tenders: usize,
    /// Consignees actually inserted; reruns insert none.
    pub consignees: u64,
}

struct SampleTender {
    tender_number: &'static str,
    authority_type: &'static str,
    po_date: (i32, u32, u32),
    contract_date: (i32, u32, u32),
    lead_time_to_install: i32,
    lead_time_to_deliver: i32,
    equipment_name: &'static str,
    model: &'static str,
    manufacturer: &'static str,
    features: &'static [&'static str],
    warranty_period: i32,
}

const SAMPLE_TENDERS: &[SampleTender] = &[SampleTender {
    tender_number: "TENDER/2024/001",
    authority_type: "UPMSCL",
    po_date: (2024, 3, 1),
    contract_date: (2024, 2, 15),
    lead_time_to_install: 30,
    lead_time_to_deliver: 15,
    equipment_name: "X-Ray Machine",
    model: "XR-2000",
    manufacturer: "Medical Systems Inc",
    features: &["Digital imaging", "Cloud storage"],
    warranty_period: 24,
}];

struct SampleConsignee {
    district_name: &'static str,
    block_name: &'static str,
    facility_name: &'static str,
    facility_type: &'static str,
    contact_person: &'static str,
    contact_number: &'static str,
    email: &'static str,
    address: &'static str,
    pincode: &'static str,
}

const SAMPLE_CONSIGNEES: &[SampleConsignee] = &[SampleConsignee {
    district_name: "Sample District",
    block_name: "Sample Block",
    facility_name: "District Hospital",
    facility_type: "Hospital",
    contact_person: "John Doe",
    contact_number: "9876543210",
    email: "hospital@example.com",
    address: "Sample Address",
    pincode: "123456",
}];

/// Seed default users and sample tender data.
///
/// Steps run in order inside a single transaction: users, then tenders
/// (created by the admin user), then one set of sample consignees per
/// tender. Every step is idempotent, so rerunning the seed only refreshes
/// existing rows. If any step fails the whole seed is rolled back.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement fails, or
/// [`DbError::InvalidSeedData`] if the built-in sample data is inconsistent.
pub async fn seed_database(pool: &PgPool) -> Result<SeedSummary, DbError> {
    let mut tx = pool.begin().await?;

    let admin_id = seed_users(&mut *tx).await?;
    let tender_ids = seed_tenders(&mut *tx, admin_id).await?;
    let consignees = seed_consignees(&mut *tx, &tender_ids).await?;

    tx.commit().await?;

    Ok(SeedSummary {
        users: DEFAULT_USERS.len(),
        tenders: tender_ids.len(),
        consignees,
    })
}

/// Upsert the default users and return the admin's id.
async fn seed_users(conn: &mut PgConnection) -> Result<Uuid, DbError> {
    let mut admin_id = None;
    for user in &DEFAULT_USERS {
        let id = upsert_user(&mut *conn, user).await?;
        if user.role == UserRole::Admin {
            admin_id = Some(id);
        }
    }
    admin_id.ok_or_else(|| DbError::InvalidSeedData("default users contain no admin".to_string()))
}

async fn seed_tenders(conn: &mut PgConnection, created_by: Uuid) -> Result<Vec<Uuid>, DbError> {
    let mut ids = Vec::with_capacity(SAMPLE_TENDERS.len());

    for sample in SAMPLE_TENDERS {
        let specification = serde_json::json!({
            "model": sample.model,
            "manufacturer": sample.manufacturer,
            "features": sample.features,
        });

        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO tenders \
                 (tender_number, authority_type, po_date, contract_date, equipment_name, \
                  equipment_specification, warranty_period, lead_time_to_deliver, \
                  lead_time_to_install, status, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             ON CONFLICT (tender_number) DO UPDATE SET \
                 authority_type = EXCLUDED.authority_type, \
                 po_date = EXCLUDED.po_date, \
                 contract_date = EXCLUDED.contract_date, \
                 equipment_name = EXCLUDED.equipment_name, \
                 equipment_specification = EXCLUDED.equipment_specification, \
                 warranty_period = EXCLUDED.warranty_period, \
                 lead_time_to_deliver = EXCLUDED.lead_time_to_deliver, \
                 lead_time_to_install = EXCLUDED.lead_time_to_install, \
                 updated_at = NOW() \
             RETURNING id",
        )
        .bind(sample.tender_number)
        .bind(sample.authority_type)
        .bind(date(sample.po_date)?)
        .bind(date(sample.contract_date)?)
        .bind(sample.equipment_name)
        .bind(&specification)
        .bind(sample.warranty_period)
        .bind(sample.lead_time_to_deliver)
        .bind(sample.lead_time_to_install)
        .bind(TENDER_STATUS_DRAFT)
        .bind(created_by)
        .fetch_one(&mut *conn)
        .await?;

        ids.push(id);
    }

    Ok(ids)
}

/// Insert the sample consignees for each tender, skipping facilities the
/// tender already has.
async fn seed_consignees(conn: &mut PgConnection, tender_ids: &[Uuid]) -> Result<u64, DbError> {
    let mut inserted = 0u64;

    for &tender_id in tender_ids {
        for sample in SAMPLE_CONSIGNEES {
            let sr_no = format!("SR{}", rand::random_range(0..1000_u32));
            let result = sqlx::query(
                "INSERT INTO consignees \
                     (tender_id, sr_no, district_name, block_name, facility_name, facility_type, \
                      contact_person, contact_number, email, address, pincode, consignment_status) \
                 SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12 \
                 WHERE NOT EXISTS ( \
                     SELECT 1 FROM consignees WHERE tender_id = $1 AND facility_name = $5 \
                 )",
            )
            .bind(tender_id)
            .bind(&sr_no)
            .bind(sample.district_name)
            .bind(sample.block_name)
            .bind(sample.facility_name)
            .bind(sample.facility_type)
            .bind(sample.contact_person)
            .bind(sample.contact_number)
            .bind(sample.email)
            .bind(sample.address)
            .bind(sample.pincode)
            .bind(CONSIGNMENT_STATUS_PROCESSING)
            .execute(&mut *conn)
            .await?;

            inserted += result.rows_affected();
        }
    }

    Ok(inserted)
}

fn date((year, month, day): (i32, u32, u32)) -> Result<chrono::NaiveDate, DbError> {
    chrono::NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| DbError::InvalidSeedData(format!("invalid date {year}-{month}-{day}")))
}
