// IP360 XML-RPC client
//
// Wraps `reqwest::Client` with XML-RPC request encoding and response
// decoding. The appliance exposes a flat method namespace (`login`,
// `logout`, `call`); session, search and scan helpers are implemented as
// inherent methods in separate files to keep this module focused on
// transport mechanics.

use reqwest::header::CONTENT_TYPE;
use tracing::{debug, trace};
use url::Url;

use crate::auth::SessionToken;
use crate::error::Error;
use crate::transport::TransportConfig;
use crate::xmlrpc::{MethodCall, Value, decode_response};

/// Raw XML-RPC client for an IP360 appliance's management API.
///
/// Every method is a single POST of a `<methodCall>` document to the
/// configured endpoint. Non-200 replies become [`Error::Protocol`] and
/// `<fault>` replies become [`Error::Fault`].
pub struct Ip360Client {
    http: reqwest::Client,
    endpoint: Url,
}

impl Ip360Client {
    /// Create a client for the XML-RPC endpoint (e.g. `https://ip360.example.com/api2xmlrpc`).
    pub fn new(endpoint: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, endpoint })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, endpoint: Url) -> Self {
        Self { http, endpoint }
    }

    /// The XML-RPC endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Invoke the generic `call(session, target, method, params)` entry point.
    ///
    /// `target` is either a class name (`class.DP`) or an object identifier
    /// returned by a previous call (`DP.1`).
    pub async fn call(
        &self,
        session: &SessionToken,
        target: &str,
        method: &str,
        params: Value,
    ) -> Result<Value, Error> {
        debug!(target, method, "call");
        self.execute(MethodCall::new(
            "call",
            vec![
                session.as_value().clone(),
                Value::from(target),
                Value::from(method),
                params,
            ],
        ))
        .await
    }

    /// POST one method call and decode the reply.
    pub(crate) async fn execute(&self, call: MethodCall) -> Result<Value, Error> {
        trace!(method = %call.method, "POST {}", self.endpoint);

        let resp = self
            .http
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "text/xml")
            .body(call.to_xml())
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(Error::Protocol {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_owned(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        decode_response(&body)
    }
}
