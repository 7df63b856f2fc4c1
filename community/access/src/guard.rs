use crate::permission::can_access_pedestrian_analytics;
use crate::role::Role;
use crate::user::User;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
	#[error("not logged in")]
	NotLoggedIn,
	#[error("invalid token")]
	InvalidToken,
	#[error("session expired")]
	SessionExpired,
	#[error("access denied, required roles: {}", role_list(.required))]
	Forbidden { required: Vec<Role> },
	#[error("this feature requires a premium subscription or the admin role")]
	PremiumRequired,
}

fn role_list(roles: &[Role]) -> String {
	roles.iter().map(Role::as_str).collect::<Vec<_>>().join(", ")
}

pub fn require_user(user: Option<&User>) -> Result<&User, AuthError> {
	user.ok_or(AuthError::NotLoggedIn)
}

pub fn require_role<'a>(user: Option<&'a User>, allowed: &[Role]) -> Result<&'a User, AuthError> {
	let user = require_user(user)?;

	if allowed.contains(&user.role) {
		Ok(user)
	} else {
		tracing::debug!(user_id = %user.id, role = user.role.as_str(), required = %role_list(allowed), "role check failed");
		Err(AuthError::Forbidden {
			required: allowed.to_vec(),
		})
	}
}

pub fn require_moderator(user: Option<&User>) -> Result<&User, AuthError> {
	require_role(user, &[Role::Moderator, Role::Admin])
}

pub fn require_admin(user: Option<&User>) -> Result<&User, AuthError> {
	require_role(user, &[Role::Admin])
}

pub fn require_premium_analytics(user: Option<&User>) -> Result<&User, AuthError> {
	let user = require_user(user)?;

	if can_access_pedestrian_analytics(Some(user)) {
		Ok(user)
	} else {
		Err(AuthError::PremiumRequired)
	}
}
