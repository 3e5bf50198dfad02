use can::{Ability, Error, Format, load, load_strict};
use std::io::Write;
use std::path::PathBuf;

fn testdata(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/testdata")
        .join(name)
}

#[test]
fn open_yaml_file() {
    let roles = load(testdata("rbac.yml")).unwrap();

    let admin = roles.get("admin").expect("admin role");
    let users = admin.get("users").expect("users permission");
    assert!(users.grants(Ability::All));
    assert_eq!(users.resource.as_deref(), Some("User"));
}

#[test]
fn every_format_loads_the_same_roles() {
    let yaml = load(testdata("rbac.yml")).unwrap();
    let toml = load(testdata("rbac.toml")).unwrap();
    let json = load(testdata("rbac.json")).unwrap();

    assert_eq!(yaml, toml);
    assert_eq!(yaml, json);
    assert_eq!(yaml.role_names(), vec!["admin", "user"]);
}

#[test]
fn route_keys_are_compiled_from_file() {
    let roles = load(testdata("rbac.yml")).unwrap();
    let user = roles.get("user").unwrap();

    assert_eq!(
        user.permission_names(),
        vec!["comments", "comments_mine", "index", "posts", "users"]
    );
    assert_eq!(user.get("comments"), user.get("comments_mine"));
}

#[test]
fn strict_load_rejects_misspelt_ability() {
    let err = load_strict(testdata("rbac.yml")).expect_err("`manage` is not an ability");
    assert!(matches!(err, Error::UnknownAbility { ref value, .. } if value == "manage"));
}

#[test]
fn strict_load_accepts_clean_file() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(file, "user:\n  users:\n    abilities: [read]\n    routes: [me]").unwrap();

    let roles = load_strict(file.path()).unwrap();
    assert!(roles.get("user").unwrap().contains("users_me"));
}

#[test]
fn decode_failure_is_not_a_partial_result() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[admin.users]\nabilities = [\"all\"]\n[user.users\n").unwrap();

    assert!(matches!(load(file.path()), Err(Error::Toml(_))));
}

#[test]
fn unknown_extension_is_rejected_before_reading() {
    let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
    assert!(matches!(load(file.path()), Err(Error::UnsupportedFormat(_))));
}

#[test]
fn missing_file_surfaces_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load(dir.path().join("rbac.yml")).expect_err("missing file");
    assert!(matches!(err, Error::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound));
}

#[test]
fn reader_and_file_agree() {
    let file = std::fs::File::open(testdata("rbac.json")).unwrap();
    let from_reader = can::loader::from_reader(file, Format::Json).unwrap();
    assert_eq!(from_reader, load(testdata("rbac.json")).unwrap());
}
