use std::fmt;

use crate::resource::{OwnedResource, OwnerRef, ResourceKind};
use crate::role::Role;
use crate::user::User;

/// Something a user can attempt on an owned resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
	Edit,
	Delete,
	/// Accept or decline a response. Targets the request the response was
	/// made to.
	AcceptResponse,
}

impl Action {
	pub const ALL: [Action; 3] = [Action::Edit, Action::Delete, Action::AcceptResponse];

	pub const fn as_str(&self) -> &'static str {
		match self {
			Action::Edit => "edit",
			Action::Delete => "delete",
			Action::AcceptResponse => "accept_response",
		}
	}

	pub const fn applies_to(&self, kind: ResourceKind) -> bool {
		match (self, kind) {
			(Action::Edit | Action::Delete, ResourceKind::Alert | ResourceKind::Request | ResourceKind::Response) => true,
			(Action::AcceptResponse, ResourceKind::Request) => true,
			(Action::AcceptResponse, ResourceKind::Alert | ResourceKind::Response) => false,
		}
	}
}

impl fmt::Display for Action {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Whether `role` may perform `action` on a resource of `kind` that someone
/// else owns. Owners are handled before this table is consulted.
///
/// This table must stay identical to the auth service. Requests are owner
/// only for edits, unlike alerts and responses.
pub const fn role_allows(role: Role, kind: ResourceKind, action: Action) -> bool {
	match (action, kind) {
		(Action::Edit, ResourceKind::Alert | ResourceKind::Response) => role.is_elevated(),
		(Action::Edit, ResourceKind::Request) => false,
		(Action::Delete, ResourceKind::Alert | ResourceKind::Request | ResourceKind::Response) => role.is_moderator(),
		(Action::AcceptResponse, ResourceKind::Alert | ResourceKind::Request | ResourceKind::Response) => false,
	}
}

/// The generic entry point. An absent user is never allowed anything.
pub fn is_allowed(user: Option<&User>, resource: &impl OwnedResource, action: Action) -> bool {
	let kind = resource.kind();

	let Some(user) = user else {
		tracing::trace!(%kind, %action, "permission denied: no user");
		return false;
	};

	if !action.applies_to(kind) {
		tracing::trace!(user_id = %user.id, %kind, %action, "permission denied: action does not apply");
		return false;
	}

	if user.owns(resource.owner_id()) {
		return true;
	}

	let allowed = role_allows(user.role, kind, action);
	if !allowed {
		tracing::trace!(user_id = %user.id, role = user.role.as_str(), %kind, %action, "permission denied");
	}

	allowed
}

pub fn can_edit(user: Option<&User>, resource: &impl OwnedResource) -> bool {
	is_allowed(user, resource, Action::Edit)
}

pub fn can_delete(user: Option<&User>, resource: &impl OwnedResource) -> bool {
	is_allowed(user, resource, Action::Delete)
}

pub fn can_edit_alert(user: Option<&User>, alert_user_id: &str) -> bool {
	can_edit(user, &OwnerRef::new(ResourceKind::Alert, alert_user_id))
}

pub fn can_delete_alert(user: Option<&User>, alert_user_id: &str) -> bool {
	can_delete(user, &OwnerRef::new(ResourceKind::Alert, alert_user_id))
}

pub fn can_edit_request(user: Option<&User>, request_user_id: &str) -> bool {
	can_edit(user, &OwnerRef::new(ResourceKind::Request, request_user_id))
}

pub fn can_delete_request(user: Option<&User>, request_user_id: &str) -> bool {
	can_delete(user, &OwnerRef::new(ResourceKind::Request, request_user_id))
}

pub fn can_edit_response(user: Option<&User>, response_user_id: &str) -> bool {
	can_edit(user, &OwnerRef::new(ResourceKind::Response, response_user_id))
}

pub fn can_delete_response(user: Option<&User>, response_user_id: &str) -> bool {
	can_delete(user, &OwnerRef::new(ResourceKind::Response, response_user_id))
}

/// Only the owner of the request can accept or decline responses to it.
pub fn can_accept_response(user: Option<&User>, request_user_id: &str) -> bool {
	is_allowed(
		user,
		&OwnerRef::new(ResourceKind::Request, request_user_id),
		Action::AcceptResponse,
	)
}

/// Pedestrian analytics are open to admins and premium accounts.
pub fn can_access_pedestrian_analytics(user: Option<&User>) -> bool {
	let allowed = user.is_some_and(|user| user.role == Role::Admin || user.is_premium);
	if !allowed {
		tracing::trace!(user_id = user.map(|u| u.id.as_str()), "pedestrian analytics denied");
	}

	allowed
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PermissionError {
	#[error("not logged in")]
	NotLoggedIn,
	#[error("missing permission: {kind}:{action}")]
	Missing { kind: ResourceKind, action: Action },
}

/// Like [`is_allowed`], for callers that want to bail out with `?`.
pub fn check(user: Option<&User>, resource: &impl OwnedResource, action: Action) -> Result<(), PermissionError> {
	if user.is_none() {
		tracing::trace!(kind = %resource.kind(), %action, "permission denied: no user");
		return Err(PermissionError::NotLoggedIn);
	}

	if is_allowed(user, resource, action) {
		Ok(())
	} else {
		Err(PermissionError::Missing {
			kind: resource.kind(),
			action,
		})
	}
}

/// Every decision for one `(user, resource)` pair, as shown next to a
/// record in the UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Permissions {
	pub edit: bool,
	pub delete: bool,
	pub accept_response: bool,
}

impl Permissions {
	pub fn evaluate(user: Option<&User>, resource: &impl OwnedResource) -> Self {
		Self {
			edit: is_allowed(user, resource, Action::Edit),
			delete: is_allowed(user, resource, Action::Delete),
			accept_response: is_allowed(user, resource, Action::AcceptResponse),
		}
	}

	pub const fn get(&self, action: Action) -> bool {
		match action {
			Action::Edit => self.edit,
			Action::Delete => self.delete,
			Action::AcceptResponse => self.accept_response,
		}
	}
}
