//! HTTP JSON RPC client implemented with curl.

use crate::{
    abi::{self, ParamType, Token},
    compilers::{self, Compilers},
    config::{Configuration, Endpoint},
    contract::{self, TransactionOptions},
    eth,
    jsonrpc::{self, ResponseError},
    method::Method,
    types::{Address, BlockSpec, Digest, Empty, Value, U256},
};
pub use curl;
use curl::easy::{Easy, List};
use serde::Serialize;
use std::{cell::RefCell, env, io::Read, string::FromUtf8Error};
use thiserror::Error;

/// A blocking Ethereum RPC HTTP client.
pub struct Client {
    handle: RefCell<Easy>,
    config: Configuration,
    compilers: Compilers,
}

impl Client {
    /// Creates a new JSON RPC HTTP client for the specified URL with the
    /// default HTTP client.
    pub fn new(url: impl AsRef<str>) -> Result<Self, Error> {
        let mut handle = Easy::new();
        handle.url(url.as_ref())?;
        handle.post(true)?;
        handle.http_headers({
            let mut list = List::new();
            list.append("Content-Type: application/json")?;
            list
        })?;
        Ok(Self::with_handle(handle))
    }

    /// Creates a new JSON RPC HTTP client for the specified curl [`curl::easy::Easy`]
    /// handle instance.
    ///
    /// This method assumes that the `url`, `POST` method and JSON content type
    /// header have been set.
    pub fn with_handle(handle: Easy) -> Self {
        Self {
            handle: RefCell::new(handle),
            config: Configuration::default(),
            compilers: Compilers::default(),
        }
    }

    /// Creates a new JSON RPC HTTP client for a node endpoint.
    pub fn for_endpoint(endpoint: &Endpoint) -> Result<Self, Error> {
        Self::new(endpoint.url())
    }

    /// Creates a new JSON RPC HTTP client from the environment. This method
    /// uses the `ETHRPC` environment variable. This is useful for testing.
    ///
    /// # Panics
    ///
    /// This method panics if the environment variable is not present, or if it
    /// is not a valid HTTP url.
    pub fn from_env() -> Self {
        Self::new(env::var("ETHRPC").expect("missing ETHRPC environment variable"))
            .expect("invalid ETHRPC URL")
    }

    /// Sets the transport configuration.
    pub fn with_configuration(mut self, config: Configuration) -> Self {
        self.config = config;
        self
    }

    /// Sets the compilers used for deploying contracts from source.
    pub fn with_compilers(mut self, compilers: Compilers) -> Self {
        self.compilers = compilers;
        self
    }

    /// The registered compilers.
    pub fn compilers(&self) -> &Compilers {
        &self.compilers
    }

    fn roundtrip(&self, request: String) -> Result<String, Error> {
        let mut handle = self.handle.try_borrow_mut().map_err(|_| Error::Busy)?;
        handle.post_field_size(request.len() as u64)?;

        let response = self
            .config
            .retry(|| perform(&mut handle, request.as_bytes()), is_connect)
            .map_err(|err| {
                if is_connect(&err) {
                    Error::Connection(err)
                } else {
                    Error::Http(err)
                }
            })?;

        let status = handle.response_code()?;
        tracing::debug!(status, "JSON RPC response");
        let response = String::from_utf8(response)?;
        if !(200..300).contains(&status) {
            return Err(Error::Status(status, response));
        }

        Ok(response)
    }

    /// Executes a JSON RPC call.
    pub fn call<M>(&self, method: M, params: M::Params) -> Result<M::Result, Error>
    where
        M: Method + Serialize,
    {
        jsonrpc::call(method, params, |request| self.roundtrip(request))
    }

    /// Executes a JSON RPC call with empty parameters.
    pub fn exec<M>(&self, method: M) -> Result<M::Result, Error>
    where
        M: Method<Params = Empty> + Serialize,
    {
        jsonrpc::call(method, Empty, |request| self.roundtrip(request))
    }

    /// The first account managed by the node.
    pub fn default_account(&self) -> Result<Address, Error> {
        self.exec(eth::Accounts)?
            .into_iter()
            .next()
            .ok_or(Error::NoAccounts)
    }

    fn sender(&self, from: Option<Address>) -> Result<Address, Error> {
        from.map_or_else(|| self.default_account(), Ok)
    }

    /// Sends wei from one account to another, returning the transaction hash.
    pub fn transfer(&self, from: Option<Address>, to: Address, amount: U256) -> Result<Digest, Error> {
        let from = self.sender(from)?;
        self.call(eth::SendTransaction, (contract::transfer(from, to, amount),))
    }

    /// Deploys compiled contract code, returning the transaction hash.
    pub fn create_contract(
        &self,
        from: Option<Address>,
        code: Vec<u8>,
        gas: Option<U256>,
        constructor: Option<(&str, &[Token])>,
    ) -> Result<Digest, Error> {
        let from = self.sender(from)?;
        let request = contract::deployment(from, code, gas, constructor)?;
        self.call(eth::SendTransaction, (request,))
    }

    /// Compiles contract source with a registered compiler and deploys it.
    pub fn create_contract_from_source(
        &self,
        language: &str,
        source: &str,
        from: Option<Address>,
        gas: Option<U256>,
    ) -> Result<Digest, Error> {
        let code = self.compilers.compile(language, source)?;
        self.create_contract(from, code, gas, None)
    }

    /// The address of the contract created by a transaction.
    pub fn get_contract_address(&self, transaction: Digest) -> Result<Option<Address>, Error> {
        let receipt = self.call(eth::GetTransactionReceipt, (transaction,))?;
        Ok(contract::contract_address(receipt))
    }

    /// Calls a contract function without creating a transaction and decodes
    /// its output.
    pub fn call_function(
        &self,
        address: Address,
        signature: &str,
        args: &[Token],
        result_types: &[ParamType],
        block: BlockSpec,
    ) -> Result<Vec<Token>, Error> {
        let call = contract::call(address, signature, args)?;
        let output = self.call(eth::Call, (call, block))?;
        Ok(contract::decode_output(result_types, &output)?)
    }

    /// Calls a contract function with a transaction, returning its hash.
    pub fn send_function(
        &self,
        from: Option<Address>,
        address: Address,
        signature: &str,
        args: &[Token],
        options: TransactionOptions,
    ) -> Result<Digest, Error> {
        let from = self.sender(from)?;
        let request = contract::transaction(from, address, signature, args, options)?;
        self.call(eth::SendTransaction, (request,))
    }
}

fn perform(handle: &mut Easy, mut request: &[u8]) -> Result<Vec<u8>, curl::Error> {
    let mut response = Vec::new();
    {
        let mut transfer = handle.transfer();
        transfer.read_function(|chunk| Ok(request.read(chunk).unwrap_or(0)))?;
        transfer.write_function(|chunk| {
            response.extend_from_slice(chunk);
            Ok(chunk.len())
        })?;
        transfer.perform()?;
    }
    Ok(response)
}

fn is_connect(err: &curl::Error) -> bool {
    err.is_couldnt_connect() || err.is_couldnt_resolve_host()
}

/// An error code.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unable to connect to node: {0}")]
    Connection(#[source] curl::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] curl::Error),
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] FromUtf8Error),
    #[error("HTTP {0} error: {1}")]
    Status(u32, String),
    #[error("invalid JSON response body: {source}")]
    BadJson {
        body: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("JSON RPC response without result: {0}")]
    BadResponse(Value),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Abi(#[from] abi::Error),
    #[error(transparent)]
    Compiler(#[from] compilers::Error),
    #[error("the node does not manage any accounts")]
    NoAccounts,
    #[error("curl handle is already in use")]
    Busy,
}

impl Error {
    /// Returns the JSON RPC error object the node responded with, if any.
    pub fn rpc_error(&self) -> Option<jsonrpc::Error> {
        match self {
            Self::BadResponse(response) => {
                ResponseError::BadResponse(response.clone()).rpc_error()
            }
            _ => None,
        }
    }
}

impl From<ResponseError> for Error {
    fn from(err: ResponseError) -> Self {
        match err {
            ResponseError::BadJson { body, source } => Self::BadJson { body, source },
            ResponseError::BadResponse(response) => Self::BadResponse(response),
        }
    }
}
