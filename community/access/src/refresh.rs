use std::future::Future;

use crate::guard::AuthError;
use crate::session::{Session, SessionError};

/// How a single authenticated call failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallError<E> {
	/// The server answered 401.
	Unauthorized,
	Failed(E),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("token refresh failed: {0}")]
pub struct RefreshError(pub String);

/// Exchanges a rejected access token for a fresh one.
#[async_trait::async_trait]
pub trait TokenRefresher: Send + Sync {
	async fn refresh(&self, current: &str) -> Result<String, RefreshError>;
}

#[derive(thiserror::Error, Debug)]
pub enum RequestError<E> {
	#[error(transparent)]
	Auth(#[from] AuthError),
	#[error(transparent)]
	Session(#[from] SessionError),
	#[error("request failed: {0}")]
	Failed(E),
}

/// The caller is told the session expired even if the store could not record
/// the logout.
async fn force_logout(session: &Session) {
	if let Err(err) = session.logout().await {
		tracing::error!(error = %err, "failed to persist forced logout");
	}
}

/// Runs `call` with the session's access token. A 401 triggers exactly one
/// refresh and one retry; if either fails the session is logged out.
pub async fn with_token_refresh<T, E, F, Fut, R>(session: &Session, refresher: &R, mut call: F) -> Result<T, RequestError<E>>
where
	F: FnMut(String) -> Fut,
	Fut: Future<Output = Result<T, CallError<E>>>,
	R: TokenRefresher + ?Sized,
{
	let token = session.access_token().await.ok_or(AuthError::NotLoggedIn)?;

	match call(token.clone()).await {
		Ok(value) => return Ok(value),
		Err(CallError::Failed(err)) => return Err(RequestError::Failed(err)),
		Err(CallError::Unauthorized) => {}
	}

	tracing::debug!("access token rejected, refreshing");

	let token = match refresher.refresh(&token).await {
		Ok(token) => token,
		Err(err) => {
			tracing::warn!(error = %err, "token refresh failed, logging out");
			force_logout(session).await;
			return Err(AuthError::SessionExpired.into());
		}
	};

	session.set_access_token(token.clone()).await?;

	match call(token).await {
		Ok(value) => Ok(value),
		Err(CallError::Failed(err)) => Err(RequestError::Failed(err)),
		Err(CallError::Unauthorized) => {
			tracing::warn!("refreshed access token rejected, logging out");
			force_logout(session).await;
			Err(AuthError::SessionExpired.into())
		}
	}
}
