//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GateConfig (validated, immutable)
//!     → AccessRules snapshot shared via ArcSwap
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → atomic swap of the snapshot
//!     → next request sees the new rules
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Allow-list fields are leniently typed: wrong shapes degrade to empty

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use schema::GateConfig;
pub use schema::AccessConfig;
