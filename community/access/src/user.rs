use crate::role::Role;

/// The cached copy of the signed in account. The auth service owns the
/// record, this is only what the session remembers about it.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct User {
	/// The unique identifier of the user.
	pub id: String,
	/// The privilege level of the user.
	#[serde(default)]
	pub role: Role,
	/// Premium accounts can use pedestrian analytics.
	#[serde(default)]
	pub is_premium: bool,
	/// Contact details prefilled into new alerts.
	#[serde(flatten)]
	pub contact: ContactDefaults,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ContactDefaults {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub phone: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub other_contact: Option<String>,
}

impl User {
	pub fn new(id: impl Into<String>, role: Role) -> Self {
		Self {
			id: id.into(),
			role,
			..Default::default()
		}
	}

	pub fn with_premium(mut self, is_premium: bool) -> Self {
		self.is_premium = is_premium;
		self
	}

	/// Whether this user created a record tagged with `owner_id`. An empty id
	/// never owns anything.
	pub fn owns(&self, owner_id: &str) -> bool {
		!self.id.is_empty() && self.id == owner_id
	}
}
