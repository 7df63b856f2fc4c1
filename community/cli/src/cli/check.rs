use anyhow::Context;
use community_access::permission::{can_access_pedestrian_analytics, Permissions};
use community_access::{OwnerRef, ResourceKind, Role, User};

use super::{Cli, Invokable, Kind};
use crate::invoker::Invoker;

#[derive(Debug, clap::Args)]
pub struct Check {
	/// The role of the acting user
	#[clap(long, default_value = "user")]
	pub role: Role,

	/// The id of the acting user, leave out to check as a signed out visitor
	#[clap(long)]
	pub user_id: Option<String>,

	/// Whether the acting user has a premium subscription
	#[clap(long)]
	pub premium: bool,

	/// The kind of resource
	#[clap(long, value_enum)]
	pub kind: Kind,

	/// The id of the user who owns the resource
	#[clap(long)]
	pub owner_id: String,
}

#[derive(Debug, serde::Serialize)]
pub struct Decision {
	pub user_id: Option<String>,
	pub role: Option<Role>,
	pub kind: ResourceKind,
	pub owner_id: String,
	#[serde(flatten)]
	pub permissions: Permissions,
	pub pedestrian_analytics: bool,
}

impl Check {
	fn user(&self) -> Option<User> {
		self.user_id
			.as_ref()
			.map(|id| User::new(id.clone(), self.role).with_premium(self.premium))
	}

	pub fn decide(&self) -> Decision {
		let user = self.user();
		let kind = ResourceKind::from(self.kind);
		let resource = OwnerRef::new(kind, &self.owner_id);

		Decision {
			user_id: user.as_ref().map(|u| u.id.clone()),
			role: user.as_ref().map(|u| u.role),
			kind,
			owner_id: self.owner_id.clone(),
			permissions: Permissions::evaluate(user.as_ref(), &resource),
			pedestrian_analytics: can_access_pedestrian_analytics(user.as_ref()),
		}
	}
}

#[async_trait::async_trait]
impl Invokable for Check {
	async fn invoke(&self, invoker: &Invoker, _: &Cli) -> anyhow::Result<()> {
		let decision = self.decide();

		tracing::debug!(?decision, "evaluated permissions");

		invoker.display(&decision).context("failed to display decision")?;

		Ok(())
	}
}
