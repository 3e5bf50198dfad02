//! Role-based access control decisions for request-handling code.
//!
//! This crate answers one question: may this role exercise this ability on
//! this permission, given an optional request-specific predicate? Roles are
//! declared in a config file, compiled once at startup into [`Roles`], and
//! consulted synchronously on every request.
//!
//! # Core Concepts
//!
//! ## Ability
//!
//! An [`Ability`] is an abstract operation: `Read`, `Create`, `Update` or
//! `Delete`. Two control sentinels grant more: `All` allows every concrete
//! ability, `Skip` bypasses the check entirely. `None` is the denial
//! sentinel and what unknown names parse to.
//!
//! ## Permission, Role, Roles
//!
//! A [`Permission`] is a set of abilities plus an optional resource tag. A
//! [`Role`] maps permission names to permissions, and [`Roles`] maps role
//! names to roles.
//!
//! ## Route fan-out
//!
//! A permission declared with `routes` compiles to one extra key per route
//! (`users` with route `42` also answers to `users_42`). See [`config`].
//!
//! # Example
//!
//! ```rust
//! use can::{Ability, Context, Format, can, classify};
//!
//! let roles = can::loader::from_str(
//!     r#"
//! user:
//!   users:
//!     abilities: [read]
//!   comments:
//!     abilities: [read, update]
//!     routes: [mine]
//! "#,
//!     Format::Yaml,
//! )?;
//!
//! let ctx = Context::new();
//! let request = classify("GET", "/v1/users/42", ["42"]);
//! assert_eq!(request.permission, "users");
//! assert_eq!(request.ability, Ability::Read);
//!
//! let owns_record = || true;
//! assert!(can(
//!     &ctx,
//!     roles.get("user"),
//!     &request.permission,
//!     request.ability,
//!     Some(&owns_record),
//! ));
//! assert!(!can(&ctx, roles.get("user"), "users", Ability::Delete, Some(&owns_record)));
//! # Ok::<(), can::Error>(())
//! ```
//!
//! # Re-exports
//!
//! - [`Ability`] — ability vocabulary
//! - [`Permission`], [`Role`], [`Roles`] — compiled model
//! - [`DiskPermission`], [`DiskRole`], [`DiskRoles`] — config model
//! - [`can`], [`can_with`], [`Decider`], [`Context`], [`compare`] — decisions
//! - [`ability_from_method`], [`permission_from_path`], [`classify`] — request helpers
//! - [`Error`], [`Result`] — error handling

mod ability;
pub mod config;
mod engine;
mod error;
pub mod loader;
mod model;
mod request;

pub use ability::Ability;
pub use config::{DiskPermission, DiskRole, DiskRoles, compile, compile_strict};
pub use engine::{
    Compare, Context, Decider, DefaultDecider, FnDecider, can, can_with, compare, decider_fn,
};
pub use error::{Error, Result};
pub use loader::{Format, load, load_strict};
pub use model::{Permission, Role, Roles};
pub use request::{INDEX, RequestClass, ability_from_method, classify, permission_from_path};
