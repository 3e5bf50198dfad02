//! Derive a permission name and an ability from an HTTP request.
//!
//! These helpers know nothing about roles. Middleware calls [`classify`]
//! (or the two functions separately) and hands the result to
//! [`crate::can`].

use crate::Ability;

/// Permission name used for the root path.
pub const INDEX: &str = "index";

/// The `(permission, ability)` pair derived from a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestClass {
    pub permission: String,
    pub ability: Ability,
}

/// Map an HTTP method onto an ability using REST conventions.
///
/// `OPTIONS` maps to [`Ability::Skip`] so preflight requests pass; unknown
/// methods map to [`Ability::None`].
pub fn ability_from_method(method: &str) -> Ability {
    match method {
        "GET" => Ability::Read,
        "POST" => Ability::Create,
        "PUT" | "PATCH" => Ability::Update,
        "DELETE" => Ability::Delete,
        "OPTIONS" => Ability::Skip,
        _ => Ability::None,
    }
}

/// Flatten a request path into a permission name.
///
/// The root path is [`INDEX`]. A leading version segment (`/v1`, `/v2`, ...)
/// is dropped, every router-captured parameter value is cut out, and the
/// remaining segments are joined with `_`:
///
/// ```rust
/// use can::permission_from_path;
///
/// assert_eq!(permission_from_path("/v1/users/42/comments", ["42"]), "users_comments");
/// assert_eq!(permission_from_path("/", [""; 0]), "index");
/// ```
pub fn permission_from_path<I, S>(path: &str, params: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let path = path
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    if path.is_empty() || path == "/" {
        return INDEX.to_string();
    }

    let mut path = strip_version(path).to_string();
    for value in params {
        let value = value.as_ref();
        if value.is_empty() {
            continue;
        }
        path = path.replace(value, "");
    }

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return INDEX.to_string();
    }
    segments.join("_")
}

/// Derive both halves of a check from a request.
pub fn classify<I, S>(method: &str, path: &str, params: I) -> RequestClass
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    RequestClass {
        permission: permission_from_path(path, params),
        ability: ability_from_method(method),
    }
}

fn strip_version(path: &str) -> &str {
    let Some(rest) = path.strip_prefix("/v") else {
        return path;
    };
    let end = rest.find('/').unwrap_or(rest.len());
    let (version, tail) = rest.split_at(end);
    if !version.is_empty() && version.bytes().all(|b| b.is_ascii_digit()) {
        tail
    } else {
        path
    }
}
