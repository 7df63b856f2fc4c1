use anyhow::Context;
use community_access::jwt::{AccessToken, JwtConfig};
use community_access::session::{Preferences, SessionData, TrackingPermission};
use community_access::{Role, User};

use super::{Cli, Invokable};
use crate::invoker::Invoker;

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
	/// Show the stored session
	Show(Show),

	/// Sign in with an access token
	Login(Login),

	/// Forget the signed in user, keeping preferences
	Logout(Logout),

	/// Change the stored preferences
	Preferences(SetPreferences),
}

#[async_trait::async_trait]
impl Invokable for Commands {
	async fn invoke(&self, invoker: &Invoker, args: &Cli) -> anyhow::Result<()> {
		match self {
			Self::Show(cmd) => cmd.invoke(invoker, args).await,
			Self::Login(cmd) => cmd.invoke(invoker, args).await,
			Self::Logout(cmd) => cmd.invoke(invoker, args).await,
			Self::Preferences(cmd) => cmd.invoke(invoker, args).await,
		}
	}
}

/// The session as shown to the user. The token itself is never printed.
#[derive(Debug, serde::Serialize)]
pub struct SessionSummary {
	pub logged_in: bool,
	pub user: Option<User>,
	pub token_expires_at: Option<chrono::DateTime<chrono::Utc>>,
	#[serde(flatten)]
	pub preferences: Preferences,
}

impl SessionSummary {
	pub fn new(data: SessionData, jwt: &JwtConfig) -> Self {
		let token = data.access_token.as_deref().and_then(|token| AccessToken::verify(jwt, token));

		Self {
			logged_in: data.access_token.is_some() && data.user.is_some(),
			user: data.user,
			token_expires_at: token.and_then(|token| token.expiration),
			preferences: data.preferences,
		}
	}
}

#[derive(Debug, clap::Args)]
pub struct Show {}

#[async_trait::async_trait]
impl Invokable for Show {
	async fn invoke(&self, invoker: &Invoker, _: &Cli) -> anyhow::Result<()> {
		let session = invoker.session().await?;

		invoker.display(&SessionSummary::new(session.snapshot().await, &invoker.config().jwt))
	}
}

#[derive(Debug, clap::Args)]
pub struct Login {
	/// A signed access token, see `token issue`
	#[clap(long)]
	pub token: String,

	/// The role of the user
	#[clap(long, default_value = "user")]
	pub role: Role,

	/// Whether the user has a premium subscription
	#[clap(long)]
	pub premium: bool,
}

impl Login {
	pub fn user(&self, jwt: &JwtConfig) -> anyhow::Result<User> {
		let claims = AccessToken::verify(jwt, &self.token).context("invalid or expired access token")?;

		Ok(User::new(claims.user_id, self.role).with_premium(self.premium))
	}
}

#[async_trait::async_trait]
impl Invokable for Login {
	async fn invoke(&self, invoker: &Invoker, _: &Cli) -> anyhow::Result<()> {
		let user = self.user(&invoker.config().jwt)?;
		let session = invoker.session().await?;

		session
			.login(self.token.clone(), user)
			.await
			.context("failed to save session")?;

		invoker.display(&SessionSummary::new(session.snapshot().await, &invoker.config().jwt))
	}
}

#[derive(Debug, clap::Args)]
pub struct Logout {}

#[async_trait::async_trait]
impl Invokable for Logout {
	async fn invoke(&self, invoker: &Invoker, _: &Cli) -> anyhow::Result<()> {
		let session = invoker.session().await?;

		session.logout().await.context("failed to save session")?;

		invoker.display(&SessionSummary::new(session.snapshot().await, &invoker.config().jwt))
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Tracking {
	Unset,
	Granted,
	Denied,
}

impl From<Tracking> for TrackingPermission {
	fn from(value: Tracking) -> Self {
		match value {
			Tracking::Unset => Self::Unset,
			Tracking::Granted => Self::Granted,
			Tracking::Denied => Self::Denied,
		}
	}
}

#[derive(Debug, clap::Args)]
pub struct SetPreferences {
	/// Turn accessibility mode on or off
	#[clap(long)]
	pub accessibility_mode: Option<bool>,

	/// Pedestrian tracking consent
	#[clap(long, value_enum)]
	pub pedestrian_tracking: Option<Tracking>,
}

impl SetPreferences {
	pub fn apply(&self, mut preferences: Preferences) -> Preferences {
		if let Some(mode) = self.accessibility_mode {
			preferences.accessibility_mode = mode;
		}

		if let Some(tracking) = self.pedestrian_tracking {
			preferences.pedestrian_tracking_permission = tracking.into();
		}

		preferences
	}
}

#[async_trait::async_trait]
impl Invokable for SetPreferences {
	async fn invoke(&self, invoker: &Invoker, _: &Cli) -> anyhow::Result<()> {
		let session = invoker.session().await?;

		let preferences = self.apply(session.preferences().await);
		session
			.set_preferences(preferences)
			.await
			.context("failed to save session")?;

		invoker.display(&preferences)
	}
}
