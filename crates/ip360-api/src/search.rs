// Entity search
//
// The appliance resolves configuration objects by query: each class exposes
// a `search` method taking `{query: "<expr>"}` and returning an array of
// object identifiers in server order.

use strum::{Display, EnumIter};
use tracing::debug;

use crate::auth::SessionToken;
use crate::client::Ip360Client;
use crate::error::Error;
use crate::xmlrpc::Value;

/// Server-side classes a scan invocation resolves by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum EntityClass {
    #[strum(to_string = "Device Profiler")]
    DeviceProfiler,
    #[strum(to_string = "Scan Profile")]
    ScanProfile,
    #[strum(to_string = "Network")]
    Network,
}

impl EntityClass {
    /// The `call` target for this class's static methods.
    pub fn class_name(self) -> &'static str {
        match self {
            Self::DeviceProfiler => "class.DP",
            Self::ScanProfile => "class.ScanProfile",
            Self::Network => "class.Network",
        }
    }
}

/// Name-equality query expression: `name = '<value>'`.
///
/// The value is inserted verbatim; the appliance's query language has no
/// documented escape for embedded quotes.
pub fn name_query(name: &str) -> String {
    format!("name = '{name}'")
}

impl Ip360Client {
    /// Run `<class>.search({query})` and return the matches in server order.
    ///
    /// An empty array is a valid reply; deciding whether that is an error is
    /// left to the caller.
    pub async fn search(
        &self,
        session: &SessionToken,
        class: EntityClass,
        query: &str,
    ) -> Result<Vec<Value>, Error> {
        debug!(class = class.class_name(), query, "searching");

        let reply = self
            .call(
                session,
                class.class_name(),
                "search",
                Value::structure([("query", Value::from(query))]),
            )
            .await?;

        reply
            .into_array()
            .map_err(|other| Error::UnexpectedResponse {
                method: format!("{}.search", class.class_name()),
                message: format!("expected array, got {}", other.type_name()),
            })
    }
}
