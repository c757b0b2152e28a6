//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, timeout)
//!     → middleware/access_control.rs (anonymous caller gate)
//!         → auth.rs (who is calling?)
//!         → access::decision (allow / redirect / deny)
//!         → response.rs (rejection responses)
//!     → server.rs forward_handler (upstream platform)
//!     → Send to client
//! ```

pub mod auth;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use auth::{Authenticator, HeaderAuthenticator};
pub use request::{MakeRequestUuid, RequestIdExt, X_REQUEST_ID};
pub use server::{AppState, GateSnapshot, HttpServer};
