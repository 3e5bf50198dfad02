//! The authorization decision.
//!
//! [`can`] looks the permission up in a role, applies the `All`/`Skip`
//! short-circuits and otherwise defers to the caller's predicate. Every
//! miss is a denial; nothing here returns an error.

use crate::{Ability, Role};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{Span, trace};

/// Caller-supplied predicate for request-specific checks, such as "does
/// this comment belong to the caller".
pub type Compare<'a> = Option<&'a dyn Fn() -> bool>;

/// Request-scoped data passed through to predicates and custom deciders.
///
/// The built-in engine only enters the span; it never checks the
/// cancellation token. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct Context {
    span: Span,
    cancellation: CancellationToken,
    values: Arc<BTreeMap<String, String>>,
}

impl Context {
    /// A context tied to the current tracing span.
    pub fn new() -> Self {
        Self {
            span: Span::current(),
            cancellation: CancellationToken::new(),
            values: Arc::default(),
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Attach a request value, e.g. the caller's user id.
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.values).insert(key.into(), value.into());
        self
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

/// Decide whether `role` may exercise `ability` on `permission`.
///
/// - No role, or no such permission in the role: `false`.
/// - The permission holds `All` or `Skip`: `true`, whatever the requested
///   ability and predicate.
/// - The permission holds the requested concrete ability: the predicate's
///   result, or `false` when there is no predicate.
/// - Anything else: `false`.
///
/// # Example
/// ```rust
/// use can::{Ability, Context, Permission, Role, can, compare};
///
/// let role: Role = [("users", Permission::new([Ability::Read]))].into_iter().collect();
/// let ctx = Context::new();
///
/// let owner = compare(7, 7);
/// assert!(can(&ctx, Some(&role), "users", Ability::Read, Some(&owner)));
/// assert!(!can(&ctx, Some(&role), "users", Ability::Delete, Some(&owner)));
/// assert!(!can(&ctx, Some(&role), "users", Ability::Read, None));
/// ```
pub fn can(
    ctx: &Context,
    role: Option<&Role>,
    permission: &str,
    ability: Ability,
    compare: Compare<'_>,
) -> bool {
    let _entered = ctx.span().enter();
    let (allowed, reason) = evaluate(role, permission, ability, compare);
    trace!(permission, %ability, allowed, reason, "authorization decision");
    allowed
}

fn evaluate(
    role: Option<&Role>,
    permission: &str,
    ability: Ability,
    compare: Compare<'_>,
) -> (bool, &'static str) {
    let Some(role) = role else {
        return (false, "no role");
    };
    let Some(granted) = role.get(permission) else {
        return (false, "unknown permission");
    };

    let all = granted.grants(Ability::All);
    let skip = granted.grants(Ability::Skip);
    let exact = granted.grants(ability);
    if !all && !skip && !exact {
        return (false, "ability not granted");
    }

    if all || skip {
        return (true, "granted by sentinel");
    }

    // Only an exact grant is left. `None` lands here if a config carried an
    // unknown ability name; it is never authorized.
    if !ability.is_concrete() {
        return (false, "sentinel requested");
    }

    match compare {
        Some(compare) => (compare(), "predicate"),
        None => (false, "no predicate"),
    }
}

/// A decision function with the same contract as [`can`].
///
/// Implement this to replace the built-in engine wholesale, e.g. to ask a
/// remote service. Call sites go through [`can_with`] and stay unchanged.
pub trait Decider: Send + Sync {
    fn decide(
        &self,
        ctx: &Context,
        role: Option<&Role>,
        permission: &str,
        ability: Ability,
        compare: Compare<'_>,
    ) -> bool;
}

/// The built-in engine as a [`Decider`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDecider;

impl Decider for DefaultDecider {
    fn decide(
        &self,
        ctx: &Context,
        role: Option<&Role>,
        permission: &str,
        ability: Ability,
        compare: Compare<'_>,
    ) -> bool {
        can(ctx, role, permission, ability, compare)
    }
}

/// A [`Decider`] backed by a closure. Build one with [`decider_fn`].
#[derive(Clone, Copy)]
pub struct FnDecider<F>(F);

impl<F> std::fmt::Debug for FnDecider<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnDecider")
    }
}

/// Wrap a closure as a [`Decider`].
pub fn decider_fn<F>(f: F) -> FnDecider<F>
where
    F: Fn(&Context, Option<&Role>, &str, Ability, Compare<'_>) -> bool + Send + Sync,
{
    FnDecider(f)
}

impl<F> Decider for FnDecider<F>
where
    F: Fn(&Context, Option<&Role>, &str, Ability, Compare<'_>) -> bool + Send + Sync,
{
    fn decide(
        &self,
        ctx: &Context,
        role: Option<&Role>,
        permission: &str,
        ability: Ability,
        compare: Compare<'_>,
    ) -> bool {
        (self.0)(ctx, role, permission, ability, compare)
    }
}

/// Decide through `decider` instead of the built-in engine.
pub fn can_with<D: Decider + ?Sized>(
    decider: &D,
    ctx: &Context,
    role: Option<&Role>,
    permission: &str,
    ability: Ability,
    compare: Compare<'_>,
) -> bool {
    decider.decide(ctx, role, permission, ability, compare)
}

/// Build a predicate from an equality check.
///
/// The comparison runs once, when the predicate is built.
pub fn compare<A, B>(left: A, right: B) -> impl Fn() -> bool + Send + Sync
where
    A: PartialEq<B>,
{
    let result = left == right;
    move || result
}
