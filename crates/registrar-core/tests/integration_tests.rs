//! Integration tests for permission resolution and CSV record handling

use std::collections::HashSet;
use std::io::Cursor;
use std::sync::Arc;

use registrar_core::{
    load_records_from_csv, load_records_from_uploaded_csv, serialize_to_csv, APIPermission,
    AuthorizationStore, ConfigLoader, Error, GroupId, InMemoryAuthorizationStore, Organization,
    PermissionMapping, PermissionObject, PermissionResolver, Program, User,
};
use serde_json::json;

#[test]
fn test_program_permissions_via_organization_group_and_role() {
    // Setup: one organization with two programs, one of them not enrolling
    let store = Arc::new(InMemoryAuthorizationStore::new());
    let org = Organization::new("stem-u", "STEM University");
    let enrolling = Program::new("data-science", org.clone(), true);
    let closed = Program::new("legacy-physics", org.clone(), false);

    let admin = User::new("org_admin");
    store.link_organization_group(GroupId(10), org.clone());
    store.add_group_membership(&admin, GroupId(10));
    store.add_group_membership(&admin, GroupId(11));
    for perm in [
        "core.organization_read_metadata",
        "core.organization_read_enrollments",
        "core.organization_write_enrollments",
    ] {
        store.grant_object(&admin, org.object_key(), perm);
    }

    let resolver = PermissionResolver::with_default_mapping(store.clone());

    // Organization membership comes through the organization group only
    assert_eq!(resolver.get_user_organizations(&admin), HashSet::from([org]));

    // Enrolling program gets everything granted on the organization
    assert_eq!(
        resolver.get_effective_user_program_api_permissions(&admin, &enrolling),
        HashSet::from([
            APIPermission::ReadMetadata,
            APIPermission::ReadEnrollments,
            APIPermission::WriteEnrollments,
        ])
    );

    // Closed program keeps only metadata
    assert_eq!(
        resolver.get_effective_user_program_api_permissions(&admin, &closed),
        HashSet::from([APIPermission::ReadMetadata])
    );

    // The non-enrollment-aware call still reports enrollment permissions
    assert!(resolver
        .get_user_api_permissions(&admin, Some(&closed.managing_organization))
        .contains(&APIPermission::WriteEnrollments));
}

#[test]
fn test_global_role_applies_to_every_program() {
    let store = InMemoryAuthorizationStore::new();
    let staff = User::new("support_staff");
    store.grant_global(&staff, "core.program_read_reports");
    store.grant_global(&staff, "core.program_read_enrollments");

    let resolver = PermissionResolver::with_default_mapping(store);

    for (key, enabled) in [("alpha", true), ("beta", false)] {
        let program = Program::new(key, Organization::new("org", "Org"), enabled);
        let perms = resolver.get_effective_user_program_api_permissions(&staff, &program);

        assert!(perms.contains(&APIPermission::ReadReports));
        assert_eq!(perms.contains(&APIPermission::ReadEnrollments), enabled);
    }
}

#[test]
fn test_configured_mapping_drives_resolution() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("registrar.toml");
    std::fs::write(
        &path,
        r#"
[permissions]
include_defaults = false
enrollment_permissions = []

[[permissions.mappings]]
db_permission = "legacy.enroll"
api_permission = "api_write_enrollments"
"#,
    )
    .unwrap();

    let config = ConfigLoader::with_path(&path)
        .env_prefix("REGISTRAR_INTEGRATION_TEST")
        .load()
        .unwrap();

    let store = InMemoryAuthorizationStore::new();
    let user = User::new("legacy");
    store.grant_global(&user, "legacy.enroll");
    store.grant_global(&user, "core.organization_read_metadata");

    let resolver = PermissionResolver::new(store, config.permission_mapping());
    let program = Program::new("p", Organization::new("o", "O"), false);

    // Empty enrollment set: nothing is filtered even with enrollment disabled
    assert_eq!(
        resolver.get_effective_user_program_api_permissions(&user, &program),
        HashSet::from([APIPermission::WriteEnrollments])
    );
}

#[test]
fn test_custom_store_implementation() {
    // A store that fails every organization-group lookup
    struct FlatStore;

    impl AuthorizationStore for FlatStore {
        fn object_permissions(&self, _user: &User, _object: &registrar_core::ObjectKey) -> Vec<String> {
            vec!["core.program_read_metadata".to_string()]
        }

        fn global_permissions(&self, _user: &User) -> Vec<String> {
            Vec::new()
        }

        fn user_groups(&self, _user: &User) -> Vec<GroupId> {
            vec![GroupId(1), GroupId(2)]
        }

        fn organization_for_group(&self, _group: GroupId) -> Option<Organization> {
            None
        }
    }

    let resolver = PermissionResolver::new(FlatStore, Arc::new(PermissionMapping::default()));
    let user = User::new("u");
    let program = Program::new("p", Organization::new("o", "O"), true);

    assert!(resolver.get_user_organizations(&user).is_empty());
    assert_eq!(
        resolver.get_effective_user_program_api_permissions(&user, &program),
        HashSet::from([APIPermission::ReadMetadata])
    );
}

#[test]
fn test_enrollment_export_and_reimport() {
    let enrollments = vec![
        json!({"student_key": "s-1", "status": "enrolled", "account_exists": true}),
        json!({"student_key": "s-2", "status": "pending", "account_exists": false, "note": "x"}),
    ];
    let fields = ["student_key", "status", "account_exists"];

    let text = serialize_to_csv(&enrollments, &fields, true).unwrap();
    assert_eq!(
        text,
        "student_key,status,account_exists\r\ns-1,enrolled,True\r\ns-2,pending,False\r\n"
    );

    let records = load_records_from_csv(&text, &fields, &[]).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["student_key"], "s-1");
    assert_eq!(records[0]["account_exists"], "True");
    assert_eq!(records[1]["status"], "pending");
}

#[test]
fn test_spreadsheet_upload_with_messy_headers() {
    let upload = "\u{feff} Student_Key , STATUS ,Comments\r\n s-1 ,enrolled, hi \r\ns-2, pending ,\r\n";
    let mut file = Cursor::new(upload.as_bytes().to_vec());

    let records =
        load_records_from_uploaded_csv(&mut file, &["student_key", "status"], &[]).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["student_key"], "s-1");
    assert_eq!(records[1]["status"], "pending");
    assert!(records.iter().all(|r| !r.contains_key("comments")));
}

#[test]
fn test_upload_errors_are_distinguishable() {
    let mut missing = Cursor::new(b"student_key\ns-1\n".to_vec());
    let err = load_records_from_uploaded_csv(&mut missing, &["student_key", "status"], &[])
        .unwrap_err();
    assert!(err.is_validation());

    let mut binary = Cursor::new(vec![0xc3, 0x28]);
    let err = load_records_from_uploaded_csv(&mut binary, &["student_key"], &[]).unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
}
