//! Dashboard visibility and permission rules.
//!
//! Everything here is a pure function of its inputs. Handlers resolve the
//! actor and the stored dashboard, call into this module, and persist only
//! what it returns.

pub mod catalog;
pub mod decision;
mod error;
pub mod gate;
pub mod ownership;
pub mod validator;

pub use catalog::{Permission, PermissionSet, Visibility};
pub use decision::{
    evaluate, evaluate_update, DashboardWriteDecision, DashboardWriteRequest,
    NormalizedDashboard,
};
pub use error::AccessError;
pub use gate::{Actor, DashboardGuard, DashboardOperation};
