use anyhow::Context;
use chrono::{DateTime, Utc};
use community_access::jwt::{AccessToken, JwtConfig};

use super::{Cli, Invokable};
use crate::invoker::Invoker;

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
	/// Issue a signed access token
	Issue(Issue),

	/// Verify an access token and print its claims
	Verify(Verify),
}

#[async_trait::async_trait]
impl Invokable for Commands {
	async fn invoke(&self, invoker: &Invoker, args: &Cli) -> anyhow::Result<()> {
		match self {
			Self::Issue(cmd) => cmd.invoke(invoker, args).await,
			Self::Verify(cmd) => cmd.invoke(invoker, args).await,
		}
	}
}

#[derive(Debug, serde::Serialize)]
pub struct TokenInfo {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub token: Option<String>,
	pub user_id: String,
	pub issued_at: DateTime<Utc>,
	pub expires_at: Option<DateTime<Utc>>,
}

impl TokenInfo {
	fn new(claims: AccessToken, token: Option<String>) -> Self {
		Self {
			token,
			user_id: claims.user_id,
			issued_at: claims.issued_at,
			expires_at: claims.expiration,
		}
	}
}

#[derive(Debug, clap::Args)]
pub struct Issue {
	/// The user the token is for
	#[clap(long)]
	pub user_id: String,

	/// Lifetime in minutes, defaults to the configured lifetime
	#[clap(long)]
	pub expires_min: Option<i64>,
}

impl Issue {
	pub fn issue(&self, config: &JwtConfig) -> anyhow::Result<TokenInfo> {
		anyhow::ensure!(!self.user_id.is_empty(), "user id must not be empty");

		let config = JwtConfig {
			expires_min: self.expires_min.unwrap_or(config.expires_min),
			..config.clone()
		};

		let claims = AccessToken::new(self.user_id.clone(), &config).context("token lifetime is out of range")?;
		let token = claims.serialize(&config).context("failed to sign access token")?;

		Ok(TokenInfo::new(claims, Some(token)))
	}
}

#[async_trait::async_trait]
impl Invokable for Issue {
	async fn invoke(&self, invoker: &Invoker, _: &Cli) -> anyhow::Result<()> {
		let info = self.issue(&invoker.config().jwt)?;

		tracing::info!(user_id = %info.user_id, "issued access token");

		invoker.display(&info)
	}
}

#[derive(Debug, clap::Args)]
pub struct Verify {
	/// The access token to verify
	pub token: String,
}

impl Verify {
	pub fn verify(&self, config: &JwtConfig) -> anyhow::Result<TokenInfo> {
		let claims = AccessToken::verify(config, &self.token).context("invalid or expired access token")?;

		Ok(TokenInfo::new(claims, None))
	}
}

#[async_trait::async_trait]
impl Invokable for Verify {
	async fn invoke(&self, invoker: &Invoker, _: &Cli) -> anyhow::Result<()> {
		invoker.display(&self.verify(&invoker.config().jwt)?)
	}
}
