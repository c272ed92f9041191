//! Asynchronous HTTP transport based on `reqwest`.

mod client;

pub use self::client::{Client, Error};
pub use reqwest;
