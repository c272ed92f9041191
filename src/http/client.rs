//! Ethereum JSON RPC HTTP client.

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
use reqwest::{header, StatusCode, Url};
use serde::Serialize;
use std::env;
use thiserror::Error;

/// An Ethereum JSON RPC HTTP client.
pub struct Client {
    client: reqwest::Client,
    url: Url,
    config: Configuration,
    compilers: Compilers,
}

impl Client {
    /// Creates a new JSON RPC HTTP client for the specified URL with the
    /// default HTTP client.
    pub fn new(url: Url) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    /// Creates a new JSON RPC HTTP client for the specified client instance and
    /// URL.
    pub fn with_client(client: reqwest::Client, url: Url) -> Self {
        Self {
            client,
            url,
            config: Configuration::default(),
            compilers: Compilers::default(),
        }
    }

    /// Creates a new JSON RPC HTTP client for a node endpoint.
    pub fn for_endpoint(endpoint: &Endpoint) -> Result<Self, Error> {
        let url = endpoint.url();
        let url = url.parse().map_err(|_| Error::InvalidUrl(url))?;
        Ok(Self::new(url))
    }

    /// Creates a new JSON RPC HTTP client from the environment. This method
    /// uses the `ETHRPC` environment variable. This is useful for testing.
    ///
    /// # Panics
    ///
    /// This method panics if the environment variable is not present, or if it
    /// is not a valid HTTP url.
    pub fn from_env() -> Self {
        Self::new(
            env::var("ETHRPC")
                .expect("missing ETHRPC environment variable")
                .parse()
                .expect("invalid ETHRPC URL"),
        )
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

    /// The URL requests are posted to.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The registered compilers.
    pub fn compilers(&self) -> &Compilers {
        &self.compilers
    }

    async fn roundtrip(&self, request: String) -> Result<String, Error> {
        let response = self
            .config
            .retry_async(
                || {
                    self.client
                        .post(self.url.clone())
                        .header(header::CONTENT_TYPE, "application/json")
                        .body(request.clone())
                        .send()
                },
                reqwest::Error::is_connect,
            )
            .await
            .map_err(|err| {
                if err.is_connect() {
                    Error::Connection(err)
                } else {
                    Error::Http(err)
                }
            })?;

        let status = response.status();
        tracing::debug!(%status, "JSON RPC response");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Status(status, body));
        }

        Ok(response.text().await?)
    }

    /// Executes a JSON RPC call.
    ///
    /// Any method can be called by name with raw JSON parameters:
    ///
    /// ```no_run
    /// # async fn run(client: ethjsonrpc::http::Client) -> Result<(), ethjsonrpc::http::Error> {
    /// let chain_id = client.call("eth_chainId", serde_json::json!([])).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn call<M>(&self, method: M, params: M::Params) -> Result<M::Result, Error>
    where
        M: Method + Serialize,
    {
        jsonrpc::call_async(method, params, |request| self.roundtrip(request)).await
    }

    /// Executes a JSON RPC call with no parameters.
    pub async fn call_np<M>(&self, method: M) -> Result<M::Result, Error>
    where
        M: Method<Params = Empty> + Serialize,
    {
        jsonrpc::call_async(method, Empty, |request| self.roundtrip(request)).await
    }

    /// The first account managed by the node.
    pub async fn default_account(&self) -> Result<Address, Error> {
        self.call_np(eth::Accounts)
            .await?
            .into_iter()
            .next()
            .ok_or(Error::NoAccounts)
    }

    async fn sender(&self, from: Option<Address>) -> Result<Address, Error> {
        match from {
            Some(from) => Ok(from),
            None => self.default_account().await,
        }
    }

    /// Sends wei from one account to another, returning the transaction hash.
    pub async fn transfer(
        &self,
        from: Option<Address>,
        to: Address,
        amount: U256,
    ) -> Result<Digest, Error> {
        let from = self.sender(from).await?;
        self.call(eth::SendTransaction, (contract::transfer(from, to, amount),))
            .await
    }

    /// Deploys compiled contract code, returning the transaction hash.
    pub async fn create_contract(
        &self,
        from: Option<Address>,
        code: Vec<u8>,
        gas: Option<U256>,
        constructor: Option<(&str, &[Token])>,
    ) -> Result<Digest, Error> {
        let from = self.sender(from).await?;
        let request = contract::deployment(from, code, gas, constructor)?;
        self.call(eth::SendTransaction, (request,)).await
    }

    /// Compiles contract source with a registered compiler and deploys it.
    pub async fn create_contract_from_source(
        &self,
        language: &str,
        source: &str,
        from: Option<Address>,
        gas: Option<U256>,
    ) -> Result<Digest, Error> {
        let code = self.compilers.compile(language, source)?;
        self.create_contract(from, code, gas, None).await
    }

    /// The address of the contract created by a transaction, `None` when the
    /// transaction is not mined yet or did not create a contract.
    pub async fn get_contract_address(&self, transaction: Digest) -> Result<Option<Address>, Error> {
        let receipt = self
            .call(eth::GetTransactionReceipt, (transaction,))
            .await?;
        Ok(contract::contract_address(receipt))
    }

    /// Calls a contract function without creating a transaction and decodes
    /// its output.
    pub async fn call_function(
        &self,
        address: Address,
        signature: &str,
        args: &[Token],
        result_types: &[ParamType],
        block: BlockSpec,
    ) -> Result<Vec<Token>, Error> {
        let call = contract::call(address, signature, args)?;
        let output = self.call(eth::Call, (call, block)).await?;
        Ok(contract::decode_output(result_types, &output)?)
    }

    /// Calls a contract function with a transaction, returning its hash.
    pub async fn send_function(
        &self,
        from: Option<Address>,
        address: Address,
        signature: &str,
        args: &[Token],
        options: TransactionOptions,
    ) -> Result<Digest, Error> {
        let from = self.sender(from).await?;
        let request = contract::transaction(from, address, signature, args, options)?;
        self.call(eth::SendTransaction, (request,)).await
    }
}

/// An error code.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unable to connect to node: {0}")]
    Connection(#[source] reqwest::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {0} error: {1}")]
    Status(StatusCode, String),
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
    #[error("invalid URL {0:?}")]
    InvalidUrl(String),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Configuration,
        jsonrpc::ErrorCode,
        net,
        types::{BlockTag, Hydrated},
        web3,
    };
    use ethprim::address;
    use hex_literal::hex;
    use serde_json::json;
    use std::time::Duration;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::{TcpListener, TcpStream},
        task::JoinHandle,
    };

    /// A recorded HTTP request.
    struct Recorded {
        headers: String,
        body: Value,
    }

    /// Serves the canned `(status, body)` responses one connection at a time
    /// and returns the requests it received.
    async fn serve(responses: Vec<(u16, String)>) -> (Client, JoinHandle<Vec<Recorded>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let server = tokio::spawn(async move {
            let mut requests = Vec::new();
            for (status, body) in responses {
                let (mut stream, _) = listener.accept().await.unwrap();
                requests.push(read_request(&mut stream).await);
                let response = format!(
                    "HTTP/1.1 {status} Status\r\n\
                     Content-Type: application/json\r\n\
                     Content-Length: {}\r\n\
                     Connection: close\r\n\
                     \r\n\
                     {body}",
                    body.len(),
                );
                stream.write_all(response.as_bytes()).await.unwrap();
                stream.shutdown().await.unwrap();
            }
            requests
        });
        (Client::new(url.parse().unwrap()), server)
    }

    async fn read_request(stream: &mut TcpStream) -> Recorded {
        let mut buffer = Vec::new();
        let mut chunk = [0; 4096];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before the request was read");
            buffer.extend_from_slice(&chunk[..n]);

            let Some(end) = buffer.windows(4).position(|window| window == b"\r\n\r\n") else {
                continue;
            };
            let headers = String::from_utf8_lossy(&buffer[..end]).to_lowercase();
            let len = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .map(|len| len.trim().parse::<usize>().unwrap())
                .unwrap_or(0);
            let body = &buffer[end + 4..];
            if body.len() >= len {
                return Recorded {
                    body: serde_json::from_slice(&body[..len]).unwrap(),
                    headers,
                };
            }
        }
    }

    fn ok(result: Value) -> (u16, String) {
        (200, json!({ "jsonrpc": "2.0", "id": 0, "result": result }).to_string())
    }

    #[tokio::test]
    async fn posts_json_rpc_envelopes() {
        let (client, server) = serve(vec![ok(json!("Geth/v1.13.0"))]).await;
        let version = client.call_np(web3::ClientVersion).await.unwrap();
        assert_eq!(version, "Geth/v1.13.0");

        let requests = server.await.unwrap();
        assert!(requests[0].headers.starts_with("post / http/1.1"));
        assert!(requests[0]
            .headers
            .lines()
            .any(|line| line == "content-type: application/json"));
        let body = &requests[0].body;
        assert_eq!(body["jsonrpc"], "2.0");
        assert_eq!(body["method"], "web3_clientVersion");
        assert_eq!(body["params"], json!([]));
        assert!(body["id"].is_u64());
    }

    #[tokio::test]
    async fn typed_and_untyped_calls() {
        let (client, server) = serve(vec![
            ok(json!("1337")),
            ok(json!(null)),
            ok(json!({ "number": "0x1" })),
        ])
        .await;

        assert_eq!(client.call_np(net::Version).await.unwrap(), U256::new(1337));
        assert_eq!(
            client
                .call(eth::GetBlockByNumber, (BlockSpec::from(1_u64), Hydrated::No))
                .await
                .unwrap(),
            None
        );
        assert_eq!(
            client
                .call("eth_getBlockByNumber", json!(["pending", true]))
                .await
                .unwrap(),
            json!({ "number": "0x1" })
        );

        let requests = server.await.unwrap();
        assert_eq!(requests[1].body["params"], json!(["0x1", false]));
        assert_eq!(requests[2].body["params"], json!(["pending", true]));
    }

    #[tokio::test]
    async fn bad_status_codes() {
        let (client, _server) = serve(vec![(503, "unavailable".to_owned())]).await;
        let err = client.call_np(eth::BlockNumber).await.unwrap_err();
        match err {
            Error::Status(status, body) => {
                assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
                assert_eq!(body, "unavailable");
            }
            err => panic!("unexpected error {err:?}"),
        }
    }

    #[tokio::test]
    async fn bad_json() {
        let (client, _server) = serve(vec![(200, "not json".to_owned())]).await;
        let err = client.call_np(eth::BlockNumber).await.unwrap_err();
        assert!(matches!(err, Error::BadJson { body, .. } if body == "not json"));
    }

    #[tokio::test]
    async fn bad_responses() {
        let (client, _server) = serve(vec![(
            200,
            json!({
                "jsonrpc": "2.0",
                "id": 0,
                "error": { "code": -32000, "message": "insufficient funds" },
            })
            .to_string(),
        )])
        .await;
        let err = client.call_np(eth::BlockNumber).await.unwrap_err();
        assert!(matches!(err, Error::BadResponse(_)));
        let rpc = err.rpc_error().unwrap();
        assert_eq!(rpc.code, ErrorCode::ServerError(-32000));
        assert_eq!(rpc.message, "insufficient funds");
    }

    #[tokio::test]
    async fn unreachable_nodes() {
        let url = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            format!("http://{}", listener.local_addr().unwrap())
        };
        let client = Client::new(url.parse().unwrap()).with_configuration(Configuration {
            max_retries: 2,
            retry_delay: Duration::from_millis(1),
        });
        let err = client.call_np(eth::BlockNumber).await.unwrap_err();
        assert!(matches!(err, Error::Connection(_)));
    }

    #[tokio::test]
    async fn bad_status_with_truncated_body() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            read_request(&mut stream).await;
            stream
                .write_all(
                    b"HTTP/1.1 502 Bad Gateway\r\n\
                      Content-Length: 100\r\n\
                      Connection: close\r\n\
                      \r\n\
                      upstr",
                )
                .await
                .unwrap();
            stream.shutdown().await.unwrap();
        });

        let client = Client::new(url.parse().unwrap());
        let err = client.call_np(eth::BlockNumber).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Status(status, body) if status == StatusCode::BAD_GATEWAY && body.is_empty()
        ));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn endpoints() {
        let client = Client::for_endpoint(&Endpoint::default()).unwrap();
        assert_eq!(client.url().as_str(), "http://localhost:8545/");
        assert!(matches!(
            Client::for_endpoint(&Endpoint::new("bad host", 1)),
            Err(Error::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn call_function_decodes_output() {
        let (client, server) = serve(vec![ok(json!(
            "0x00000000000000000000000000000000000000000000000000000000000003e8"
        ))])
        .await;
        let token = address!("0x0000000000000000000000000000000000000002");
        let balance = client
            .call_function(
                token,
                "balanceOf(address)",
                &[Token::Address(address!("0x0000000000000000000000000000000000000001"))],
                &[ParamType::Uint(256)],
                BlockTag::Latest.into(),
            )
            .await
            .unwrap();
        assert_eq!(balance, [Token::Uint(U256::new(1000))]);

        let requests = server.await.unwrap();
        assert_eq!(
            requests[0].body["params"],
            json!([
                {
                    "to": "0x0000000000000000000000000000000000000002",
                    "data": "0x70a082310000000000000000000000000000000000000000000000000000000000000001",
                },
                "latest",
            ])
        );
    }

    #[tokio::test]
    async fn send_function_defaults_to_first_account() {
        let hash = "0x27191ea9e8228c98bc4418fa60843540937b0c615b2db5e828756800f533f8cd";
        let (client, server) = serve(vec![
            ok(json!([
                "0x0000000000000000000000000000000000000001",
                "0x0000000000000000000000000000000000000003",
            ])),
            ok(json!(hash)),
        ])
        .await;
        let result = client
            .send_function(
                None,
                address!("0x0000000000000000000000000000000000000002"),
                "set(uint256)",
                &[Token::Uint(U256::new(7))],
                TransactionOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(
            result,
            Digest(hex!("27191ea9e8228c98bc4418fa60843540937b0c615b2db5e828756800f533f8cd"))
        );

        let requests = server.await.unwrap();
        assert_eq!(requests[0].body["method"], "eth_accounts");
        assert_eq!(requests[1].body["method"], "eth_sendTransaction");
        let transaction = &requests[1].body["params"][0];
        assert_eq!(transaction["from"], "0x0000000000000000000000000000000000000001");
        assert_eq!(transaction["to"], "0x0000000000000000000000000000000000000002");
        assert_eq!(transaction["gas"], "0x15f90");
        assert_eq!(transaction["gasPrice"], "0xba43b7400");
        assert!(transaction.get("value").is_none());
    }

    #[tokio::test]
    async fn no_accounts() {
        let (client, _server) = serve(vec![ok(json!([]))]).await;
        let err = client
            .transfer(None, address!("0x0000000000000000000000000000000000000002"), U256::new(1))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NoAccounts));
    }

    #[tokio::test]
    async fn deploy_from_source() {
        let hash = "0x27191ea9e8228c98bc4418fa60843540937b0c615b2db5e828756800f533f8cd";
        let (client, server) = serve(vec![ok(json!(hash))]).await;
        let client = client.with_compilers(
            Compilers::new().with("hex", |source: &str| {
                crate::serialization::decode_hex(source).map_err(Into::into)
            }),
        );

        let from = address!("0x0000000000000000000000000000000000000001");
        client
            .create_contract_from_source("hex", "0x6080", Some(from), Some(U256::new(100_000)))
            .await
            .unwrap();
        let err = client
            .create_contract_from_source("solidity", "contract C {}", Some(from), None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Compiler(compilers::Error::Missing(language)) if language == "solidity"
        ));

        let requests = server.await.unwrap();
        assert_eq!(
            requests[0].body["params"],
            json!([{
                "from": "0x0000000000000000000000000000000000000001",
                "gas": "0x186a0",
                "data": "0x6080",
            }])
        );
    }

    #[tokio::test]
    async fn contract_addresses() {
        let (client, _server) = serve(vec![ok(json!({
            "transactionHash": "0x27191ea9e8228c98bc4418fa60843540937b0c615b2db5e828756800f533f8cd",
            "contractAddress": "0x0000000000000000000000000000000000000004",
        }))])
        .await;
        let address = client
            .get_contract_address(Digest(hex!(
                "27191ea9e8228c98bc4418fa60843540937b0c615b2db5e828756800f533f8cd"
            )))
            .await
            .unwrap();
        assert_eq!(
            address,
            Some(address!("0x0000000000000000000000000000000000000004"))
        );
    }

    #[tokio::test]
    #[ignore]
    async fn node_client_version() {
        let client = Client::from_env();
        let version = client.call_np(web3::ClientVersion).await.unwrap();
        println!("{version}");
    }
}
