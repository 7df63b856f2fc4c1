use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::permission::Permissions;
use crate::resource::OwnedResource;
use crate::user::User;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingPermission {
	#[default]
	Unset,
	Granted,
	Denied,
}

/// UI preferences. They survive a logout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Preferences {
	#[serde(rename = "accessibilityMode", default)]
	pub accessibility_mode: bool,
	#[serde(default)]
	pub pedestrian_tracking_permission: TrackingPermission,
}

/// Everything a session persists, keyed the same way the web clients key
/// their local storage.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SessionData {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub access_token: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user: Option<User>,
	#[serde(flatten)]
	pub preferences: Preferences,
}

#[derive(thiserror::Error, Debug)]
pub enum SessionError {
	#[error("failed to access session store: {0}")]
	Io(#[from] std::io::Error),
	#[error("failed to decode session: {0}")]
	Json(#[from] serde_json::Error),
}

#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
	async fn load(&self) -> Result<SessionData, SessionError>;

	async fn save(&self, data: &SessionData) -> Result<(), SessionError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore(RwLock<SessionData>);

impl MemoryStore {
	pub fn new(data: SessionData) -> Self {
		Self(RwLock::new(data))
	}
}

#[async_trait::async_trait]
impl SessionStore for MemoryStore {
	async fn load(&self) -> Result<SessionData, SessionError> {
		Ok(self.0.read().await.clone())
	}

	async fn save(&self, data: &SessionData) -> Result<(), SessionError> {
		*self.0.write().await = data.clone();
		Ok(())
	}
}

/// Keeps the session as a JSON document on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
	path: PathBuf,
}

impl FileStore {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn path(&self) -> &std::path::Path {
		&self.path
	}
}

#[async_trait::async_trait]
impl SessionStore for FileStore {
	async fn load(&self) -> Result<SessionData, SessionError> {
		match tokio::fs::read(&self.path).await {
			Ok(contents) => Ok(serde_json::from_slice(&contents)?),
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(SessionData::default()),
			Err(err) => Err(err.into()),
		}
	}

	async fn save(&self, data: &SessionData) -> Result<(), SessionError> {
		if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
			tokio::fs::create_dir_all(parent).await?;
		}

		tokio::fs::write(&self.path, serde_json::to_vec_pretty(data)?).await?;
		Ok(())
	}
}

/// The signed in state of one client. Clones share the same state, and every
/// change is written through to the store.
#[derive(Clone)]
pub struct Session {
	data: Arc<RwLock<SessionData>>,
	store: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for Session {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Session").finish_non_exhaustive()
	}
}

impl Session {
	pub async fn start(store: impl SessionStore + 'static) -> Result<Self, SessionError> {
		let data = store.load().await?;

		tracing::debug!(
			logged_in = data.access_token.is_some(),
			user_id = data.user.as_ref().map(|u| u.id.as_str()),
			"session started"
		);

		Ok(Self {
			data: Arc::new(RwLock::new(data)),
			store: Arc::new(store),
		})
	}

	/// Changes are only kept in memory once the store accepted them.
	async fn update(&self, f: impl FnOnce(&mut SessionData)) -> Result<(), SessionError> {
		let mut guard = self.data.write().await;

		let mut next = guard.clone();
		f(&mut next);
		self.store.save(&next).await?;

		*guard = next;
		Ok(())
	}

	pub async fn login(&self, access_token: String, user: User) -> Result<(), SessionError> {
		tracing::info!(user_id = %user.id, role = user.role.as_str(), "logged in");

		self.update(|data| {
			data.access_token = Some(access_token);
			data.user = Some(user);
		})
		.await
	}

	pub async fn logout(&self) -> Result<(), SessionError> {
		tracing::info!("logged out");

		self.update(|data| {
			data.access_token = None;
			data.user = None;
		})
		.await
	}

	pub async fn set_access_token(&self, access_token: String) -> Result<(), SessionError> {
		self.update(|data| data.access_token = Some(access_token)).await
	}

	pub async fn set_preferences(&self, preferences: Preferences) -> Result<(), SessionError> {
		self.update(|data| data.preferences = preferences).await
	}

	pub async fn user(&self) -> Option<User> {
		self.data.read().await.user.clone()
	}

	pub async fn access_token(&self) -> Option<String> {
		self.data.read().await.access_token.clone()
	}

	pub async fn preferences(&self) -> Preferences {
		self.data.read().await.preferences
	}

	pub async fn is_logged_in(&self) -> bool {
		let guard = self.data.read().await;
		guard.access_token.is_some() && guard.user.is_some()
	}

	pub async fn snapshot(&self) -> SessionData {
		self.data.read().await.clone()
	}

	pub async fn permissions_for(&self, resource: &impl OwnedResource) -> Permissions {
		let guard = self.data.read().await;
		Permissions::evaluate(guard.user.as_ref(), resource)
	}
}
