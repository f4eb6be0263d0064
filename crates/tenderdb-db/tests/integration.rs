//! Offline unit tests for tenderdb-db pool configuration and row types.
//! These tests do not require a live database connection.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use chrono::{NaiveDate, Utc};
use sqlx::types::Json;
use tenderdb_core::{AccessoriesPending, AppConfig, Environment};
use tenderdb_db::{ConsigneeRow, DbError, PoolConfig, SeedSummary, TenderRow};
use uuid::Uuid;

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        db_idle_timeout_secs: 11,
        max_upload_bytes: 1024,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
    assert_eq!(pool_config.idle_timeout_secs, 11);
}

/// Compile-time smoke test: confirm that [`TenderRow`] has all expected
/// fields with the correct types. No database required.
#[test]
fn tender_row_has_expected_fields() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date");
    let row = TenderRow {
        id: Uuid::new_v4(),
        tender_number: "TENDER/2024/001".to_string(),
        authority_type: "UPMSCL".to_string(),
        po_date: date,
        contract_date: date,
        equipment_name: "X-Ray Machine".to_string(),
        equipment_specification: None,
        warranty_period: Some(24),
        lead_time_to_deliver: 15,
        lead_time_to_install: 30,
        remarks: None,
        has_accessories: false,
        accessories: vec![],
        accessories_pending: false,
        status: "Draft".to_string(),
        created_by: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    assert_eq!(row.tender_number, "TENDER/2024/001");
    assert_eq!(row.warranty_period, Some(24));
    assert!(row.accessories.is_empty());
}

#[test]
fn consignee_row_wraps_accessories_pending_json() {
    let row = ConsigneeRow {
        id: Uuid::new_v4(),
        tender_id: Uuid::new_v4(),
        sr_no: "1".to_string(),
        district_name: "Lucknow".to_string(),
        block_name: "Chinhat".to_string(),
        facility_name: "CHC Chinhat".to_string(),
        facility_type: None,
        contact_person: None,
        contact_number: None,
        email: None,
        address: None,
        pincode: None,
        consignment_status: "Processing".to_string(),
        accessories_pending: Json(AccessoriesPending {
            status: true,
            count: 2,
            items: vec!["Lead apron".to_string(), "Cassette".to_string()],
        }),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    assert_eq!(row.accessories_pending.0.count, 2);
    assert!(row.accessories_pending.status);
}

#[test]
fn seed_summary_defaults_to_zero() {
    assert_eq!(
        SeedSummary::default(),
        SeedSummary {
            users: 0,
            tenders: 0,
            consignees: 0
        }
    );
}

#[test]
fn db_error_messages_are_descriptive() {
    assert_eq!(
        DbError::InvalidSeedData("bad date".to_string()).to_string(),
        "invalid seed data: bad date"
    );
}
