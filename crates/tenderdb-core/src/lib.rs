pub mod app_config;
pub mod config;
pub mod consignees;
pub mod installation;
pub mod users;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use consignees::{
    generate_template, import_locations, ImportResult, LocationRecord, ParseError,
    CONSIGNEE_TEMPLATE, TEMPLATE_FILENAME,
};
pub use installation::{
    validate_installation_request, AccessoriesPending, InstallationRequest, NewConsignee,
    NewTender, ValidationError, CONSIGNMENT_STATUS_PROCESSING, TENDER_STATUS_DRAFT,
};
pub use users::{UserRole, UserSeed, DEFAULT_USERS};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid user role: {0}")]
    InvalidRole(String),
}
