// Session authentication
//
// `login(version, flags, user, pass)` returns an opaque session token that
// is passed as the first argument of every subsequent `call`. `logout`
// invalidates it server-side.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::client::Ip360Client;
use crate::error::Error;
use crate::xmlrpc::{MethodCall, Value};

/// API version tag sent with every login.
pub const API_VERSION: i32 = 2;

/// Login flags; the appliance defines no flags we need.
pub const LOGIN_FLAGS: i32 = 0;

/// Opaque session token returned by `login`.
///
/// Kept as the raw XML-RPC value and echoed back verbatim. `Debug` is
/// redacted since the token grants full API access until logout.
#[derive(Clone, PartialEq)]
pub struct SessionToken(Value);

impl SessionToken {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(****)")
    }
}

impl Ip360Client {
    /// Authenticate and open a session.
    ///
    /// A rejected login comes back from the appliance as an XML-RPC fault,
    /// which is returned unchanged; callers decide how to present it.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<SessionToken, Error> {
        debug!(username, "logging in at {}", self.endpoint());

        let token = self
            .execute(MethodCall::new(
                "login",
                vec![
                    Value::from(API_VERSION),
                    Value::from(LOGIN_FLAGS),
                    Value::from(username),
                    Value::from(password.expose_secret()),
                ],
            ))
            .await?;

        debug!("login successful");
        Ok(SessionToken::new(token))
    }

    /// End the session.
    pub async fn logout(&self, session: &SessionToken) -> Result<(), Error> {
        debug!("logging out at {}", self.endpoint());

        let _reply = self
            .execute(MethodCall::new("logout", vec![session.as_value().clone()]))
            .await?;

        debug!("logout complete");
        Ok(())
    }
}
