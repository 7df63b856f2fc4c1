use std::path::PathBuf;

use common::config::LoggingConfig;
use community_access::jwt::JwtConfig;

/// Environment variables use this prefix, e.g. `COMMUNITY_JWT__SECRET`.
pub const ENV_PREFIX: &str = "COMMUNITY";

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct AppConfig {
	/// The logging config
	pub logging: LoggingConfig,

	/// Access token signing config
	pub jwt: JwtConfig,

	/// Where the local session is kept
	pub session: SessionConfig,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct SessionConfig {
	/// Path of the JSON session file
	pub path: PathBuf,
}

impl Default for SessionConfig {
	fn default() -> Self {
		Self {
			path: PathBuf::from(".community/session.json"),
		}
	}
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			logging: LoggingConfig {
				level: "warn".to_string(),
				..Default::default()
			},
			jwt: JwtConfig::default(),
			session: SessionConfig::default(),
		}
	}
}

impl AppConfig {
	pub fn parse(files: &[String]) -> anyhow::Result<Self> {
		common::config::parse(files, ENV_PREFIX)
	}
}
