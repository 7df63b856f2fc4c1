use std::fmt;

/// The kinds of user generated records that carry an owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
	/// A CityPulse incident report.
	Alert,
	/// A Helpboard request for help.
	Request,
	/// An offer to help with a Helpboard request.
	Response,
}

impl ResourceKind {
	pub const ALL: [ResourceKind; 3] = [ResourceKind::Alert, ResourceKind::Request, ResourceKind::Response];

	pub const fn as_str(&self) -> &'static str {
		match self {
			ResourceKind::Alert => "alert",
			ResourceKind::Request => "request",
			ResourceKind::Response => "response",
		}
	}
}

impl fmt::Display for ResourceKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

pub trait OwnedResource {
	fn kind(&self) -> ResourceKind;

	/// The id of the user who created the record.
	fn owner_id(&self) -> &str;
}

/// A resource known only by its kind and owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerRef<'a> {
	pub kind: ResourceKind,
	pub owner_id: &'a str,
}

impl<'a> OwnerRef<'a> {
	pub const fn new(kind: ResourceKind, owner_id: &'a str) -> Self {
		Self { kind, owner_id }
	}
}

impl OwnedResource for OwnerRef<'_> {
	fn kind(&self) -> ResourceKind {
		self.kind
	}

	fn owner_id(&self) -> &str {
		self.owner_id
	}
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Alert {
	pub id: String,
	pub user_id: String,
	pub title: String,
	#[serde(default)]
	pub category: String,
	#[serde(default)]
	pub priority: String,
}

impl OwnedResource for Alert {
	fn kind(&self) -> ResourceKind {
		ResourceKind::Alert
	}

	fn owner_id(&self) -> &str {
		&self.user_id
	}
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HelpRequest {
	pub id: String,
	pub user_id: String,
	pub title: String,
	#[serde(default = "default_request_status")]
	pub status: String,
}

fn default_request_status() -> String {
	"open".to_string()
}

impl Default for HelpRequest {
	fn default() -> Self {
		Self {
			id: String::new(),
			user_id: String::new(),
			title: String::new(),
			status: default_request_status(),
		}
	}
}

impl OwnedResource for HelpRequest {
	fn kind(&self) -> ResourceKind {
		ResourceKind::Request
	}

	fn owner_id(&self) -> &str {
		&self.user_id
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
	#[default]
	Pending,
	Accepted,
	Declined,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HelpResponse {
	pub id: String,
	pub request_id: String,
	pub responder_id: String,
	#[serde(default)]
	pub message: String,
	#[serde(default)]
	pub status: ResponseStatus,
}

impl OwnedResource for HelpResponse {
	fn kind(&self) -> ResourceKind {
		ResourceKind::Response
	}

	fn owner_id(&self) -> &str {
		&self.responder_id
	}
}
