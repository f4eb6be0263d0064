//! Database operations for the `tenders` and `consignees` tables.

mod read;
mod types;
mod write;

pub use read::{get_tender_with_consignees, list_consignees_for_tender, list_tenders_with_consignees};
pub use types::{ConsigneeRow, TenderRow, TenderWithConsignees};
pub use write::create_tender;
