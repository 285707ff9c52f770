//! Permission group files
//!
//! Parses a small line-oriented format describing permission groups and their
//! members, and exposes an in-memory store to query and edit them.
//!
//! ## File Format
//!
//! ```text
//! >> VIP > vip+special
//! Alice
//! Bob
//! // comments start with two slashes
//! >> STAFF > staff
//! Carol
//! ```
//!
//! - `>> <name> > <perm>+<perm>...` starts a group
//! - every other non-blank, non-comment line is a member of the current group
//!
//! ## Example
//!
//! ```
//! use permgroup::PermissionStore;
//!
//! let mut store = PermissionStore::from_text(">> VIP > vip+special\nAlice\nBob\n");
//! assert_eq!(store.players_in_group("VIP")?, ["Alice", "Bob"]);
//! assert!(store.add_player("Dave", "VIP")?);
//! assert_eq!(store.players_with_permissions(["special"])?.len(), 3);
//! # Ok::<(), permgroup::StoreError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod store;

// Re-export main types
pub use config::{AppConfig, load_config};
pub use error::{AppError, Result, StoreError, StoreResult};
pub use model::{Group, GroupMap};
pub use parser::{ParseReport, ParseWarning, ParseWarningKind, parse, parse_with_report};
pub use store::{PermissionStore, StoreState};
