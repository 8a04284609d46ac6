//! Line oriented JSON encoding.
//!
//! Each message encodes to a single line with no trailing newline. Newlines
//! inside documents are escaped by JSON, so framing a stream on `\n` is safe.

use crate::error::Result;
use crate::message::{Request, Response};

pub fn encode_request(request: &Request) -> Result<String> {
    Ok(serde_json::to_string(request)?)
}

pub fn decode_request(line: &str) -> Result<Request> {
    Ok(serde_json::from_str(line.trim_end())?)
}

pub fn encode_response(response: &Response) -> Result<String> {
    Ok(serde_json::to_string(response)?)
}

pub fn decode_response(line: &str) -> Result<Response> {
    Ok(serde_json::from_str(line.trim_end())?)
}
