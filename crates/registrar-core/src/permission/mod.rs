//! Permission resolution module

pub mod mapping;
pub mod models;
pub mod resolver;

pub use mapping::PermissionMapping;
pub use models::{
    APIPermission, GroupId, ObjectKey, ObjectKind, Organization, PermissionObject, Program, User,
};
pub use resolver::PermissionResolver;
