// ── Session lifecycle ──
//
// An authenticated session against one appliance. `Session::scoped` is the
// normal entry point: it logs in, runs the body, and logs out whether the
// body succeeded or not.

use secrecy::SecretString;
use tracing::{debug, warn};

use ip360_api::{EntityClass, Ip360Client, ScanParams, SessionToken, Value, name_query};

use crate::config::ApplianceConfig;
use crate::error::CoreError;
use crate::model::EntityRef;

/// A logged-in connection to an appliance.
pub struct Session {
    client: Ip360Client,
    token: SessionToken,
}

impl Session {
    /// Build a client from `config` and log in.
    pub async fn open(config: &ApplianceConfig) -> Result<Self, CoreError> {
        let client = Ip360Client::new(config.url.clone(), &config.transport())?;
        Self::login(client, &config.username, &config.password).await
    }

    /// Log in with an existing client.
    ///
    /// A fault on `login` is reported as an authentication failure; any
    /// other error passes through its usual mapping.
    pub async fn login(
        client: Ip360Client,
        username: &str,
        password: &SecretString,
    ) -> Result<Self, CoreError> {
        let token = client.login(username, password).await.map_err(|e| match e {
            fault @ ip360_api::Error::Fault { .. } => CoreError::AuthenticationFailed {
                message: fault.to_string(),
            },
            other => CoreError::from(other),
        })?;
        debug!("session opened");
        Ok(Self { client, token })
    }

    /// Open a session, run `body`, then close the session.
    ///
    /// Logout happens on both the success and the error path of `body`.
    pub async fn scoped<T>(
        config: &ApplianceConfig,
        body: impl AsyncFnOnce(&Session) -> Result<T, CoreError>,
    ) -> Result<T, CoreError> {
        let session = Self::open(config).await?;
        let result = body(&session).await;
        session.close().await;
        result
    }

    /// Best-effort logout. Failures are logged, never returned.
    pub async fn close(self) {
        if let Err(e) = self.client.logout(&self.token).await {
            warn!(error = %e, "logout failed (non-fatal)");
        } else {
            debug!("session closed");
        }
    }

    /// All objects of `kind` whose name equals `name`, in server order.
    pub async fn search(&self, kind: EntityClass, name: &str) -> Result<Vec<Value>, CoreError> {
        Ok(self
            .client
            .search(&self.token, kind, &name_query(name))
            .await?)
    }

    /// Resolve `name` to the first matching object of `kind`.
    pub async fn resolve(&self, kind: EntityClass, name: &str) -> Result<EntityRef, CoreError> {
        let matches = self.search(kind, name).await?;
        let first = matches.first().ok_or_else(|| CoreError::NotFound {
            kind,
            query: name_query(name),
        })?;
        let entity = EntityRef::from_value(kind, first);
        debug!(%kind, name, id = %entity.id, matches = matches.len(), "resolved");
        Ok(entity)
    }

    /// Start a scan on a resolved Device Profiler.
    pub async fn start_scan(
        &self,
        device_profiler: &EntityRef,
        params: &ScanParams,
    ) -> Result<Value, CoreError> {
        Ok(self
            .client
            .start_scan(&self.token, &device_profiler.id, params)
            .await?)
    }
}
