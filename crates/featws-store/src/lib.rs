//! SQL persistence for rulesheet metadata
//!
//! Stores the relational half of a rulesheet: identity, name,
//! description, and slug. Rule content never lands here — the remote
//! repository is the single source of truth for it.
//!
//! Filters on the list/count surface are whitelisted to known columns and
//! bound as parameters, so caller-supplied filter strings never reach SQL
//! as text.

pub mod error;
pub mod filter;
pub mod model;
pub mod store;

pub use error::{Error, Result};
pub use filter::{Page, RulesheetFilter};
pub use model::{NewRulesheet, RulesheetRow};
pub use store::RulesheetStore;
