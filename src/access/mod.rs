//! Anonymous access control subsystem.
//!
//! # Data Flow
//! ```text
//! [access] config table
//!     → normalize.rs (trim, dedup, decode)
//!     → rules.rs (AccessRules snapshot, built-ins merged)
//!
//! Per request:
//!     → decision.rs (root invocation only)
//!         → referrer.rs (same-host referrer query vs allowed referrers)
//!         → request.rs (request query vs allowed requests)
//!         → matcher.rs (OR of AND over patterns)
//!     → Verdict (allow / redirect / denied, optional 403)
//! ```
//!
//! # Design Decisions
//! - Patterns are flat key/value equality sets, no wildcards or regex
//! - Evaluation is pure and synchronous
//! - Malformed configuration or referrers degrade, never fail

pub mod decision;
pub mod error;
pub mod matcher;
pub mod normalize;
pub mod params;
pub mod pattern;
pub mod referrer;
pub mod request;
pub mod rules;

pub use decision::{decide, on_dispatch, Decision, DispatchContext, RequestContext, Verdict};
pub use error::AccessError;
pub use params::ParamSet;
pub use pattern::{Pattern, PatternList};
pub use rules::AccessRules;
