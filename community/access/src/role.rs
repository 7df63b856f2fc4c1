use std::fmt;
use std::str::FromStr;

/// An account privilege level, as stored by the auth service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
	#[default]
	User,
	TrustedUser,
	Moderator,
	Representative,
	BusinessOwner,
	Admin,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl Role {
	pub const ALL: [Role; 6] = [
		Role::User,
		Role::TrustedUser,
		Role::Moderator,
		Role::Representative,
		Role::BusinessOwner,
		Role::Admin,
	];

	/// The name used on the wire and in persisted sessions.
	pub const fn as_str(&self) -> &'static str {
		match self {
			Role::User => "user",
			Role::TrustedUser => "trusted_user",
			Role::Moderator => "moderator",
			Role::Representative => "representative",
			Role::BusinessOwner => "business_owner",
			Role::Admin => "admin",
		}
	}

	pub const fn display_name(&self) -> &'static str {
		match self {
			Role::User => "User",
			Role::TrustedUser => "Trusted User",
			Role::Moderator => "Moderator",
			Role::Representative => "Representative",
			Role::BusinessOwner => "Business Owner",
			Role::Admin => "Admin",
		}
	}

	/// Elevated roles may edit alerts and responses they do not own.
	pub const fn is_elevated(&self) -> bool {
		match self {
			Role::User => false,
			Role::TrustedUser | Role::Moderator | Role::Representative | Role::BusinessOwner | Role::Admin => true,
		}
	}

	/// Moderating roles may delete any alert, request or response.
	pub const fn is_moderator(&self) -> bool {
		match self {
			Role::Moderator | Role::Admin => true,
			Role::User | Role::TrustedUser | Role::Representative | Role::BusinessOwner => false,
		}
	}
}

impl fmt::Display for Role {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.display_name())
	}
}

impl FromStr for Role {
	type Err = UnknownRole;

	/// Accepts the wire name as well as the display name, ignoring case and
	/// treating spaces and dashes like underscores.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let normalized = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");

		Role::ALL
			.into_iter()
			.find(|role| role.as_str() == normalized)
			.ok_or_else(|| UnknownRole(s.to_string()))
	}
}
