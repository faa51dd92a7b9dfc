//! Registrar core utilities
//!
//! Resolves the API permissions a user effectively holds on a program
//! (direct, organization-level and global grants, filtered by what the
//! program supports) and imports/exports CSV records with header
//! normalization and row validation.

pub mod config;
pub mod error;
pub mod permission;
pub mod records;
pub mod store;

pub use config::{ConfigLoader, PermissionMappingEntry, PermissionSettings, RegistrarConfig};
pub use error::{Error, Result};
pub use permission::{
    APIPermission, GroupId, ObjectKey, ObjectKind, Organization, PermissionMapping,
    PermissionObject, PermissionResolver, Program, User,
};
pub use records::{
    load_records_from_csv, load_records_from_uploaded_csv, serialize_to_csv, CsvItem, Record,
    UploadedFile,
};
pub use store::{AuthorizationStore, InMemoryAuthorizationStore};
