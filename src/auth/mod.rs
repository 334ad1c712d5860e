//! Role model, permission grants, session registry, and request extractors.

pub mod extract;
pub mod permissions;
pub mod roles;
pub mod session;

pub use extract::{CurrentUser, MaybeUser};
pub use roles::RoleTag;
pub use session::{AuthSession, SessionService};
