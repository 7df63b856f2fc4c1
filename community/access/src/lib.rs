#![forbid(unsafe_code)]

//! Advisory authorization for the community services.
//!
//! The auth service is the real enforcement point. The predicates here mirror
//! its rules so clients can hide actions a user is not allowed to take.

pub mod guard;
pub mod jwt;
pub mod permission;
pub mod refresh;
pub mod resource;
pub mod role;
pub mod session;
pub mod user;

pub use guard::AuthError;
pub use permission::{Action, Permissions};
pub use resource::{Alert, HelpRequest, HelpResponse, OwnedResource, OwnerRef, ResourceKind};
pub use role::Role;
pub use user::User;

#[cfg(test)]
mod tests;
