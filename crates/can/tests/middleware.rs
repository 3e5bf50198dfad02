//! End-to-end checks the way request middleware would run them.

use can::{Ability, Context, Roles, can, classify, compare};
use std::path::PathBuf;
use std::sync::Arc;

fn roles() -> Roles {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/testdata/rbac.yml");
    can::load(path).unwrap()
}

fn authorize(
    roles: &Roles,
    role: &str,
    method: &str,
    path: &str,
    params: &[&str],
    owner: bool,
) -> bool {
    let ctx = Context::new().with_value("role", role);
    let request = classify(method, path, params);
    let predicate = compare(owner, true);
    can(
        &ctx,
        roles.get(role),
        &request.permission,
        request.ability,
        Some(&predicate),
    )
}

#[test]
fn admin_can_do_everything_on_users() {
    let roles = roles();
    for method in ["GET", "POST", "PUT", "PATCH", "DELETE"] {
        assert!(authorize(&roles, "admin", method, "/v1/users/42", &["42"], false));
    }
}

#[test]
fn unknown_method_passes_only_sentinel_grants() {
    let roles = roles();
    // `All` still short-circuits: the request never reaches the predicate.
    assert!(authorize(&roles, "admin", "TRACE", "/v1/users", &[], true));
    // Without a sentinel grant, `None` never passes.
    assert!(!authorize(&roles, "user", "TRACE", "/v1/users", &[], true));
}

#[test]
fn user_reads_only_their_own_records() {
    let roles = roles();
    assert!(authorize(&roles, "user", "GET", "/v1/users/7", &["7"], true));
    assert!(!authorize(&roles, "user", "GET", "/v1/users/7", &["7"], false));
    assert!(!authorize(&roles, "user", "DELETE", "/v1/users/7", &["7"], true));
}

#[test]
fn route_variant_answers_like_base() {
    let roles = roles();
    assert!(authorize(&roles, "user", "PUT", "/v1/comments/mine", &[], true));
    assert!(authorize(&roles, "user", "PUT", "/v1/comments/3", &["3"], true));
    assert!(!authorize(&roles, "user", "DELETE", "/v1/comments/mine", &[], true));
}

#[test]
fn index_is_skipped_for_user() {
    let roles = roles();
    assert!(authorize(&roles, "user", "GET", "/", &[], false));
    assert!(authorize(&roles, "user", "DELETE", "/v1/", &[], false));
}

#[test]
fn unknown_role_and_permission_are_denied() {
    let roles = roles();
    assert!(!authorize(&roles, "guest", "GET", "/v1/users", &[], true));
    assert!(!authorize(&roles, "user", "GET", "/v1/invoices", &[], true));
}

#[test]
fn misspelt_ability_fails_closed() {
    let roles = roles();
    let posts = roles.get("user").unwrap().get("posts").unwrap();
    assert!(posts.grants(Ability::None));
    assert!(authorize(&roles, "user", "GET", "/posts", &[], true));
    assert!(!authorize(&roles, "user", "PUT", "/posts", &[], true));
}

#[test]
fn roles_are_shared_across_threads() {
    let roles = Arc::new(roles());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let roles = Arc::clone(&roles);
            std::thread::spawn(move || {
                let id = i.to_string();
                let path = format!("/v1/users/{id}");
                authorize(&roles, "user", "GET", &path, &[id.as_str()], true)
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
