//! Anonymous access gate for a multi-tenant web analytics platform.
//!
//! Decides, per request, whether an unauthenticated caller may reach the
//! platform: its query parameters or its same-host referrer must satisfy a
//! configured allow-list entry. Rejected callers are redirected or denied.

pub mod access;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::schema::GateConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
