//! Company users and the role directory used for ticket assignment.
//!
//! Users are reference data here: this feature only exposes the lookup the
//! ticket resolver needs (users of a company holding a role, newest first).

pub mod models;
pub mod repositories;

pub use repositories::PgUserDirectory;
