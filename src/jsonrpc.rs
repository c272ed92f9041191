//! JSON RPC 2.0 envelopes and transport-agnostic call plumbing.

use crate::method::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{
    future::Future,
    sync::atomic::{self, AtomicU32},
};
use thiserror::Error;

/// Executes a JSON RPC call with the provided roundtrip implementation.
///
/// The roundtrip receives the serialized request and returns the raw response
/// body. Transport failures are reported through its own error type.
pub fn call<M, F, E>(method: M, params: M::Params, roundtrip: F) -> Result<M::Result, E>
where
    M: Method + Serialize,
    F: FnOnce(String) -> Result<String, E>,
    E: From<ResponseError> + From<serde_json::Error>,
{
    let request = request(method, params)?;
    let body = roundtrip(request)?;
    response::<M, E>(body)
}

/// Executes a JSON RPC call with the provided `async` roundtrip implementation.
pub async fn call_async<M, F, Fut, E>(
    method: M,
    params: M::Params,
    roundtrip: F,
) -> Result<M::Result, E>
where
    M: Method + Serialize,
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<String, E>>,
    E: From<ResponseError> + From<serde_json::Error>,
{
    let request = request(method, params)?;
    let body = roundtrip(request).await?;
    response::<M, E>(body)
}

fn request<M>(method: M, params: M::Params) -> Result<String, serde_json::Error>
where
    M: Method + Serialize,
{
    let id = Id::next();
    tracing::debug!(method = %method.name(), id = id.0, "JSON RPC request");
    serde_json::to_string(&Request {
        jsonrpc: Version::V2,
        method,
        params,
        id,
    })
}

/// Classifies a response body and extracts its `result`.
///
/// A body that is not JSON is [`ResponseError::BadJson`], JSON without a
/// `result` member is [`ResponseError::BadResponse`]. A `null` result is a
/// valid result; whether it decodes depends on the method's result type.
fn response<M, E>(body: String) -> Result<M::Result, E>
where
    M: Method,
    E: From<ResponseError> + From<serde_json::Error>,
{
    let mut response = match serde_json::from_str::<Value>(&body) {
        Ok(response) => response,
        Err(source) => return Err(ResponseError::BadJson { body, source }.into()),
    };
    let result = match response
        .as_object_mut()
        .and_then(|response| response.remove("result"))
    {
        Some(result) => result,
        None => return Err(ResponseError::BadResponse(response).into()),
    };
    Ok(M::deserialize_result(result)?)
}

/// JSON RPC supported version.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub enum Version {
    /// Version 2.0 of the JSON RPC specification.
    #[serde(rename = "2.0")]
    V2,
}

/// Request ID.
///
/// Note that `u32` is used so that it always fits in a `f64`. IDs are handed
/// out by a process-wide counter and are never strings.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, Eq, Hash, PartialEq)]
#[serde(transparent)]
pub struct Id(pub u32);

impl Id {
    fn next() -> Self {
        static ID: AtomicU32 = AtomicU32::new(0);
        Self(ID.fetch_add(1, atomic::Ordering::Relaxed))
    }
}

/// A request object.
#[derive(Debug, Deserialize, Serialize)]
pub struct Request<M>
where
    M: Method,
{
    pub jsonrpc: Version,
    pub method: M,
    #[serde(
        deserialize_with = "M::deserialize_params",
        serialize_with = "M::serialize_params"
    )]
    pub params: M::Params,
    pub id: Id,
}

/// A response that could not be turned into a result.
#[derive(Debug, Error)]
pub enum ResponseError {
    /// The body is not valid JSON.
    #[error("invalid JSON response body: {source}")]
    BadJson {
        body: String,
        #[source]
        source: serde_json::Error,
    },
    /// The body is JSON but has no `result` member.
    #[error("JSON RPC response without result: {0}")]
    BadResponse(Value),
}

impl ResponseError {
    /// Returns the JSON RPC error object carried by a bad response, if any.
    pub fn rpc_error(&self) -> Option<Error> {
        match self {
            Self::BadResponse(response) => {
                Error::deserialize(response.get("error")?).ok()
            }
            Self::BadJson { .. } => None,
        }
    }
}

/// An RPC error that may be produced on a response.
#[derive(Clone, Debug, Deserialize, Error, Serialize)]
#[error("{code}: {message}")]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default)]
    pub data: Value,
}

/// An error code.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
#[serde(from = "i32", into = "i32")]
pub enum ErrorCode {
    #[error("parse error")]
    ParseError,
    #[error("invalid request")]
    InvalidRequest,
    #[error("method not found")]
    MethodNotFound,
    #[error("invalid params")]
    InvalidParams,
    #[error("internal error")]
    InternalError,
    #[error("server error ({0})")]
    ServerError(i32),
    #[error("reserved ({0})")]
    Reserved(i32),
    #[error("{0}")]
    Other(i32),
}

impl From<i32> for ErrorCode {
    fn from(code: i32) -> Self {
        #[allow(clippy::match_overlapping_arm)]
        match code {
            -32700 => Self::ParseError,
            -32600 => Self::InvalidRequest,
            -32601 => Self::MethodNotFound,
            -32602 => Self::InvalidParams,
            -32603 => Self::InternalError,
            -32099..=-32000 => Self::ServerError(code),
            -32768..=-32000 => Self::Reserved(code),
            _ => Self::Other(code),
        }
    }
}

impl From<ErrorCode> for i32 {
    fn from(code: ErrorCode) -> Self {
        match code {
            ErrorCode::ParseError => -32700,
            ErrorCode::InvalidRequest => -32600,
            ErrorCode::MethodNotFound => -32601,
            ErrorCode::InvalidParams => -32602,
            ErrorCode::InternalError => -32603,
            ErrorCode::ServerError(code) => code,
            ErrorCode::Reserved(code) => code,
            ErrorCode::Other(code) => code,
        }
    }
}
