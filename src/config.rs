//! Node endpoint and transport configuration.

use std::{
    fmt::{self, Display, Formatter},
    thread,
    time::Duration,
};

/// Default JSON RPC port of Geth, Parity and most other nodes.
pub const DEFAULT_RPC_PORT: u16 = 8545;

/// Default JSON RPC port of pyethapp.
pub const PYETHAPP_DEFAULT_RPC_PORT: u16 = 4000;

/// The location of a node's JSON RPC server.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    /// Connect over HTTPS instead of plain HTTP.
    pub tls: bool,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            tls: false,
        }
    }

    /// Use HTTPS for this endpoint.
    pub fn with_tls(mut self) -> Self {
        self.tls = true;
        self
    }

    /// The URL requests are posted to.
    pub fn url(&self) -> String {
        self.to_string()
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::new("localhost", DEFAULT_RPC_PORT)
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let scheme = if self.tls { "https" } else { "http" };
        write!(f, "{scheme}://{}:{}", self.host, self.port)
    }
}

/// Transport behaviour shared by the clients.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Configuration {
    /// How many times a request is retried when the node cannot be reached.
    /// Requests that reached the node are never retried.
    pub max_retries: u32,
    /// Pause between connection attempts.
    pub retry_delay: Duration,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::ZERO,
        }
    }
}

impl Configuration {
    /// Runs `attempt`, retrying it while it fails with a connection error.
    /// Returns the first success, the first other error, or the last
    /// connection error once `max_retries` retries are used up.
    #[cfg_attr(not(feature = "curl"), allow(dead_code))]
    pub(crate) fn retry<T, E>(
        &self,
        mut attempt: impl FnMut() -> Result<T, E>,
        is_connect: impl Fn(&E) -> bool,
    ) -> Result<T, E>
    where
        E: Display,
    {
        let mut retries = 0;
        loop {
            match attempt() {
                Err(err) if is_connect(&err) && retries < self.max_retries => {
                    retries += 1;
                    tracing::warn!(attempt = retries, %err, "connection failed, retrying");
                    if !self.retry_delay.is_zero() {
                        thread::sleep(self.retry_delay);
                    }
                }
                result => return result,
            }
        }
    }

    /// Async version of [`Configuration::retry`].
    #[cfg(feature = "http")]
    pub(crate) async fn retry_async<T, E, F, Fut>(
        &self,
        mut attempt: F,
        is_connect: impl Fn(&E) -> bool,
    ) -> Result<T, E>
    where
        E: Display,
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
    {
        let mut retries = 0;
        loop {
            match attempt().await {
                Err(err) if is_connect(&err) && retries < self.max_retries => {
                    retries += 1;
                    tracing::warn!(attempt = retries, %err, "connection failed, retrying");
                    if !self.retry_delay.is_zero() {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
                result => return result,
            }
        }
    }
}
