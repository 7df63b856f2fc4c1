use anyhow::Context;
use community_access::permission::role_allows;
use community_access::{Action, ResourceKind, Role};

use super::{Cli, Invokable};
use crate::invoker::Invoker;

#[derive(Debug, clap::Args)]
pub struct Matrix {
	/// Only show rows for this role
	#[clap(long)]
	pub role: Option<Role>,
}

#[derive(Debug, PartialEq, Eq, serde::Serialize)]
pub struct Rule {
	pub role: Role,
	pub kind: ResourceKind,
	pub action: Action,
	pub allowed: bool,
}

impl Matrix {
	pub fn rules(&self) -> Vec<Rule> {
		let mut rules = Vec::new();

		for role in Role::ALL.into_iter().filter(|r| self.role.map_or(true, |only| only == *r)) {
			for kind in ResourceKind::ALL {
				for action in Action::ALL.into_iter().filter(|a| a.applies_to(kind)) {
					rules.push(Rule {
						role,
						kind,
						action,
						allowed: role_allows(role, kind, action),
					});
				}
			}
		}

		rules
	}
}

#[async_trait::async_trait]
impl Invokable for Matrix {
	async fn invoke(&self, invoker: &Invoker, _: &Cli) -> anyhow::Result<()> {
		invoker.display_array(&self.rules()).context("failed to display matrix")?;

		Ok(())
	}
}
