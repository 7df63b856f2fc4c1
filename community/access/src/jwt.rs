use chrono::{DateTime, TimeZone, Utc};
use hmac::{Hmac, Mac};
use jwt::{Claims, Header, RegisteredClaims, SignWithKey, Token, VerifyWithKey};
use sha2::Sha256;

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct JwtConfig {
	/// HS256 signing secret
	pub secret: String,

	/// Issuer written to and required from every token
	pub issuer: String,

	/// Access token lifetime in minutes
	pub expires_min: i64,
}

impl Default for JwtConfig {
	fn default() -> Self {
		Self {
			secret: "community".to_string(),
			issuer: "community-auth".to_string(),
			expires_min: 30,
		}
	}
}

/// The payload of an access token. The user id travels in `sub`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
	pub user_id: String,
	pub issued_at: DateTime<Utc>,
	pub expiration: Option<DateTime<Utc>>,
}

fn from_timestamp(secs: u64) -> Option<DateTime<Utc>> {
	Utc.timestamp_opt(i64::try_from(secs).ok()?, 0).single()
}

fn now() -> DateTime<Utc> {
	// Tokens carry whole seconds.
	Utc.timestamp_opt(Utc::now().timestamp(), 0).single().unwrap_or_else(Utc::now)
}

impl AccessToken {
	/// `None` when the configured lifetime does not fit a timestamp.
	pub fn new(user_id: impl Into<String>, config: &JwtConfig) -> Option<Self> {
		let issued_at = now();
		let lifetime = chrono::Duration::try_minutes(config.expires_min)?;

		Some(Self {
			user_id: user_id.into(),
			issued_at,
			expiration: Some(issued_at.checked_add_signed(lifetime)?),
		})
	}

	pub fn is_expired(&self) -> bool {
		self.expiration.is_some_and(|exp| exp < Utc::now())
	}

	fn to_claims(&self) -> Claims {
		Claims {
			registered: RegisteredClaims {
				issuer: None,
				subject: Some(self.user_id.clone()),
				audience: None,
				expiration: self.expiration.map(|x| x.timestamp() as u64),
				not_before: None,
				issued_at: Some(self.issued_at.timestamp() as u64),
				json_web_token_id: None,
			},
			private: Default::default(),
		}
	}

	fn from_claims(claims: &Claims) -> Option<Self> {
		Some(Self {
			user_id: claims.registered.subject.clone().filter(|sub| !sub.is_empty())?,
			issued_at: from_timestamp(claims.registered.issued_at?)?,
			expiration: claims.registered.expiration.and_then(from_timestamp),
		})
	}

	pub fn serialize(&self, config: &JwtConfig) -> Option<String> {
		let key = Hmac::<Sha256>::new_from_slice(config.secret.as_bytes()).ok()?;
		let mut claims = self.to_claims();

		claims.registered.issuer = Some(config.issuer.clone());

		claims.sign_with_key(&key).ok()
	}

	pub fn verify(config: &JwtConfig, token: &str) -> Option<Self> {
		let key = Hmac::<Sha256>::new_from_slice(config.secret.as_bytes()).ok()?;
		let token: Token<Header, Claims, _> = token.verify_with_key(&key).ok()?;

		let claims = token.claims();

		if claims.registered.issuer.as_ref() != Some(&config.issuer) {
			return None;
		}

		let token = Self::from_claims(claims)?;

		if token.issued_at > Utc::now() {
			return None;
		}

		let nbf = claims.registered.not_before.and_then(from_timestamp);
		if nbf.is_some_and(|nbf| nbf > Utc::now()) {
			return None;
		}

		if token.is_expired() {
			return None;
		}

		Some(token)
	}
}
