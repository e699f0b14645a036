// XML-RPC value model and wire codec.

pub mod codec;
pub mod value;

pub use codec::{MethodCall, decode_response, encode_fault, encode_response};
pub use value::Value;
