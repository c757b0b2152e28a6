//! Access decision for anonymous callers.
//!
//! # Data Flow
//! ```text
//! dispatch invocation
//!     → DispatchContext::enter (depth + 1)
//!     → nested? stop, root already decided
//!     → anonymous? no → Allow
//!     → referrer.rs OR request.rs
//!     → allowed? → Allow
//!     → API request? → status 403
//!     → redirect configured? → Redirect
//!     → Denied
//! ```
//!
//! # Design Decisions
//! - Dispatch depth is request-scoped state carried with the request, never
//!   a process-wide counter
//! - The 403 status and the redirect are independent: a rejected API
//!   request with a redirect configured gets both

use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use url::Url;

use super::error::AccessError;
use super::params::ParamSet;
use super::referrer::is_referrer_allowed;
use super::request::is_request_allowed;
use super::rules::AccessRules;

/// Evaluation progress of one root request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationState {
    NotEvaluated,
    Evaluating,
    Resolved,
}

impl EvaluationState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::NotEvaluated,
            1 => Self::Evaluating,
            _ => Self::Resolved,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            Self::NotEvaluated => 0,
            Self::Evaluating => 1,
            Self::Resolved => 2,
        }
    }
}

/// Nested-invocation tracking for one external request.
///
/// Cloning shares the counter, so internal sub-dispatches that carry a clone
/// see the root's depth. A fresh context starts at zero.
#[derive(Debug, Clone, Default)]
pub struct DispatchContext {
    inner: Arc<DispatchInner>,
}

#[derive(Debug, Default)]
struct DispatchInner {
    depth: AtomicU32,
    state: AtomicU8,
}

impl DispatchContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a dispatch invocation and return the new depth.
    pub fn enter(&self) -> u32 {
        self.inner.depth.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn depth(&self) -> u32 {
        self.inner.depth.load(Ordering::SeqCst)
    }

    /// True while only the root invocation has been seen.
    pub fn is_root(&self) -> bool {
        self.depth() == 1
    }

    pub fn state(&self) -> EvaluationState {
        EvaluationState::from_u8(self.inner.state.load(Ordering::SeqCst))
    }

    fn set_state(&self, state: EvaluationState) {
        self.inner.state.store(state.as_u8(), Ordering::SeqCst);
    }
}

/// What the evaluated request looks like to the decision.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Parameters of the request's own query string.
    pub params: ParamSet,
    /// Raw `Referer` header, if any.
    pub referrer: Option<String>,
    /// Whether the caller has no authenticated identity.
    pub anonymous: bool,
    /// Whether the root request targets the platform API.
    pub root_is_api: bool,
}

/// Final outcome for a root request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect(Url),
    Denied(AccessError),
}

/// A decision plus the response status side effect applied before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub decision: Decision,
    /// `Some(403)` when a rejected request was an API request.
    pub status: Option<StatusCode>,
}

impl Verdict {
    pub fn allow() -> Self {
        Self {
            decision: Decision::Allow,
            status: None,
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.decision == Decision::Allow
    }

    /// Short label for logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self.decision {
            Decision::Allow => "allow",
            Decision::Redirect(_) => "redirect",
            Decision::Denied(_) => "denied",
        }
    }
}

/// Whether a request's parameters address the platform API rather than
/// its UI.
pub fn is_api_request(params: &ParamSet) -> bool {
    params.get("module") == Some("API")
        && matches!(params.get("action"), None | Some("") | Some("index"))
}

/// Returns true if an anonymous request may proceed: a same-host referrer
/// matching an allowed referrer, or its own parameters matching an
/// allowed request.
pub fn is_allowed(rules: &AccessRules, ctx: &RequestContext) -> bool {
    is_referrer_allowed(
        ctx.referrer.as_deref(),
        &rules.platform_host,
        &rules.allowed_referrers,
    ) || is_request_allowed(&ctx.params, &rules.allowed_requests)
}

/// Decide a root request.
pub fn decide(rules: &AccessRules, ctx: &RequestContext) -> Verdict {
    if !ctx.anonymous || is_allowed(rules, ctx) {
        return Verdict::allow();
    }

    let status = ctx.root_is_api.then_some(StatusCode::FORBIDDEN);

    let decision = match &rules.redirect_unallowed_to {
        Some(target) => Decision::Redirect(target.clone()),
        None => Decision::Denied(AccessError::LoginRequired),
    };

    Verdict { decision, status }
}

/// Handle one dispatch invocation.
///
/// Returns `None` for nested invocations; only the root one builds the
/// request context and decides.
pub fn on_dispatch<F>(dispatch: &DispatchContext, rules: &AccessRules, context: F) -> Option<Verdict>
where
    F: FnOnce() -> RequestContext,
{
    let depth = dispatch.enter();
    if depth != 1 {
        tracing::trace!(depth, "Nested dispatch, access already decided");
        return None;
    }

    dispatch.set_state(EvaluationState::Evaluating);
    let ctx = context();
    let verdict = decide(rules, &ctx);
    dispatch.set_state(EvaluationState::Resolved);

    if verdict.is_allowed() {
        tracing::debug!(anonymous = ctx.anonymous, "Request allowed");
    } else {
        tracing::info!(
            outcome = verdict.outcome(),
            api = ctx.root_is_api,
            status = ?verdict.status,
            "Anonymous request rejected"
        );
    }

    Some(verdict)
}
