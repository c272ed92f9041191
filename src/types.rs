//! Ethereum RPC types.

use crate::{debug, serialization};
use ethprim::AsU256 as _;
use serde::{
    de::{self, Deserializer},
    ser::Serializer,
    Deserialize, Serialize,
};
use std::{
    borrow::Cow,
    fmt::{self, Debug, Display, Formatter},
    ops::Deref,
    str::FromStr,
};
use thiserror::Error;

pub use ethprim::{Address, Digest, I256, U256};
pub use serde_json::Value;

/// Empty JSON RPC parameters.
#[derive(Clone, Copy, Debug, Default)]
pub struct Empty;

impl Serialize for Empty {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        [(); 0].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Empty {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        <[(); 0]>::deserialize(deserializer)?;
        Ok(Empty)
    }
}

/// Arbitrary binary data, encoded as a `0x` prefixed hex string.
#[derive(Clone, Default, Eq, Hash, PartialEq)]
pub struct Bytes(pub Vec<u8>);

impl Debug for Bytes {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_tuple("Bytes").field(&debug::Hex(&self.0)).finish()
    }
}

impl Display for Bytes {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        Display::fmt(&debug::Hex(&self.0), f)
    }
}

impl Deref for Bytes {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Bytes {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<Bytes> for Vec<u8> {
    fn from(bytes: Bytes) -> Self {
        bytes.0
    }
}

impl Serialize for Bytes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serialization::bytes::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Bytes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serialization::bytes::deserialize(deserializer).map(Self)
    }
}

/// Block number or tag.
///
/// Only the tags `earliest`, `latest` and `pending` and `0x` prefixed hex
/// block numbers are accepted; anything else is rejected when the value is
/// constructed and never forwarded to the node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BlockSpec {
    /// Block by number.
    Number(U256),
    /// Block by tag.
    Tag(BlockTag),
}

impl Default for BlockSpec {
    fn default() -> Self {
        Self::Tag(Default::default())
    }
}

impl From<U256> for BlockSpec {
    fn from(number: U256) -> Self {
        Self::Number(number)
    }
}

impl From<u64> for BlockSpec {
    fn from(number: u64) -> Self {
        number.as_u256().into()
    }
}

impl From<BlockTag> for BlockSpec {
    fn from(tag: BlockTag) -> Self {
        Self::Tag(tag)
    }
}

impl FromStr for BlockSpec {
    type Err = InvalidBlockSpec;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(digits) = s.strip_prefix("0x") {
            return U256::from_str_radix(digits, 16)
                .map(Self::Number)
                .map_err(|_| InvalidBlockSpec(s.to_owned()));
        }
        s.parse().map(Self::Tag)
    }
}

impl Display for BlockSpec {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{number:#x}"),
            Self::Tag(tag) => Display::fmt(tag, f),
        }
    }
}

impl Serialize for BlockSpec {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Number(number) => number.serialize(serializer),
            Self::Tag(tag) => tag.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for BlockSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Cow::<str>::deserialize(deserializer)?
            .parse()
            .map_err(de::Error::custom)
    }
}

/// Block tag.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockTag {
    /// The lowest numbered block the client has available.
    Earliest,
    /// The most recent block in the canonical chain observed by the client.
    #[default]
    Latest,
    /// A sample next block built by the client on top of [`BlockTag::Latest`]
    /// and containing the set of transactions usually taken from local mempool.
    Pending,
}

impl BlockTag {
    /// Returns the tag as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Earliest => "earliest",
            Self::Latest => "latest",
            Self::Pending => "pending",
        }
    }
}

impl Display for BlockTag {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockTag {
    type Err = InvalidBlockSpec;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "earliest" => Ok(Self::Earliest),
            "latest" => Ok(Self::Latest),
            "pending" => Ok(Self::Pending),
            _ => Err(InvalidBlockSpec(s.to_owned())),
        }
    }
}

/// A block selector string that is neither a known tag nor a hex number.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("invalid block selector {0:?}, expected 'earliest', 'latest', 'pending' or a hex number")]
pub struct InvalidBlockSpec(pub String);

/// A log, block, or transaction filter identifier.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct FilterId(U256);

impl FilterId {
    /// Creates a filter from a raw ID. The caller must make sure that this is a
    /// valid ID, otherwise filter ID RPC methods will fail.
    pub fn from_raw(value: U256) -> Self {
        Self(value)
    }

    /// Gets the raw underlying ID for the filter.
    pub fn into_raw(self) -> U256 {
        self.0
    }
}

/// Whether block transactions should be hydrated.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Hydrated {
    /// Only fetch transaction hashes for blocks.
    No,
    /// Fetch full transaction data for blocks.
    #[default]
    Yes,
}

impl Serialize for Hydrated {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bool(matches!(self, Self::Yes))
    }
}

impl<'de> Deserialize<'de> for Hydrated {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match bool::deserialize(deserializer)? {
            true => Self::Yes,
            false => Self::No,
        })
    }
}

/// A proof-of-work nonce, as submitted with `eth_submitWork`.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct BlockNonce(pub [u8; 8]);

impl Debug for BlockNonce {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_tuple("BlockNonce")
            .field(&debug::Hex(&self.0))
            .finish()
    }
}

impl Serialize for BlockNonce {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serialization::bytearray::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for BlockNonce {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serialization::bytearray::deserialize(deserializer).map(Self)
    }
}

/// A message call object for `eth_call` and `eth_estimateGas`.
#[derive(Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionCall {
    /// The account the call is made from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    /// The call recipient.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    /// Gas provided for the call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<U256>,
    /// Gas price used for the call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<U256>,
    /// Value sent with the call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    /// Call data.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serialization::option_bytes"
    )]
    pub data: Option<Vec<u8>>,
}

impl Debug for TransactionCall {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("TransactionCall")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("gas", &self.gas)
            .field("gas_price", &self.gas_price)
            .field("value", &self.value)
            .field("data", &debug::OptionHex(self.data.as_deref()))
            .finish()
    }
}

/// A transaction for the node to sign and submit with `eth_sendTransaction`.
#[derive(Clone, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    /// The sending account, which must be managed by the node.
    pub from: Address,
    /// The recipient; absent for contract deployments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    /// Gas limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<U256>,
    /// Gas price in wei.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<U256>,
    /// Value transferred in wei.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    /// Call data or contract init code.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serialization::option_bytes"
    )]
    pub data: Option<Vec<u8>>,
    /// Explicit nonce, overriding the node's pending nonce.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<U256>,
}

impl TransactionRequest {
    /// Creates an empty transaction request from the specified account.
    pub fn new(from: Address) -> Self {
        Self {
            from,
            to: None,
            gas: None,
            gas_price: None,
            value: None,
            data: None,
            nonce: None,
        }
    }
}

impl Debug for TransactionRequest {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("TransactionRequest")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("gas", &self.gas)
            .field("gas_price", &self.gas_price)
            .field("value", &self.value)
            .field("data", &debug::OptionHex(self.data.as_deref()))
            .field("nonce", &self.nonce)
            .finish()
    }
}

/// Syncing progress.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncingProgress {
    /// Starting block.
    pub starting_block: U256,
    /// Current block.
    pub current_block: U256,
    /// Highest block.
    pub highest_block: U256,
}

/// Syncing status.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SyncingStatus {
    /// Syncing is in progress.
    Syncing(SyncingProgress),
    /// Not syncing.
    NotSyncing,
}

impl Serialize for SyncingStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Syncing(progress) => progress.serialize(serializer),
            Self::NotSyncing => serializer.serialize_bool(false),
        }
    }
}

impl<'de> Deserialize<'de> for SyncingStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Inner {
            Syncing(SyncingProgress),
            Flag(bool),
        }

        match Inner::deserialize(deserializer)? {
            Inner::Syncing(progress) => Ok(Self::Syncing(progress)),
            Inner::Flag(false) => Ok(Self::NotSyncing),
            Inner::Flag(true) => Err(de::Error::custom("unexpected `true` syncing status")),
        }
    }
}

/// A value used for filtering logs.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum LogFilterValue<T> {
    /// A filter that accepts all values.
    #[default]
    Any,
    /// A filter that only accepts a single value.
    Exact(T),
    /// A filter that accepts any one of the specified values.
    OneOf(Vec<T>),
}

impl<T> LogFilterValue<T> {
    /// Returns `true` if the filter accepts all values.
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }
}

impl<T> Serialize for LogFilterValue<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Any => serializer.serialize_unit(),
            Self::Exact(value) => value.serialize(serializer),
            Self::OneOf(values) => values.serialize(serializer),
        }
    }
}

impl<'de, T> Deserialize<'de> for LogFilterValue<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Inner<T> {
            Exact(T),
            OneOf(Vec<T>),
        }

        Ok(match Option::<Inner<T>>::deserialize(deserializer)? {
            None => Self::Any,
            Some(Inner::Exact(value)) => Self::Exact(value),
            Some(Inner::OneOf(values)) => Self::OneOf(values),
        })
    }
}

/// A filter for querying logs from a node.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogFilter {
    /// First block of the range, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_block: Option<BlockSpec>,
    /// Last block of the range, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_block: Option<BlockSpec>,
    /// The contract addresses to fetch logs for.
    #[serde(default, skip_serializing_if = "LogFilterValue::is_any")]
    pub address: LogFilterValue<Address>,
    /// The log topics to filter for, by position.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<LogFilterValue<Digest>>,
}

/// A transaction receipt.
///
/// Only the commonly used fields are typed; everything else the node returns
/// is kept in `extra`.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    /// The transaction hash.
    pub transaction_hash: Digest,
    /// The index of the transaction in its block.
    #[serde(default)]
    pub transaction_index: Option<U256>,
    /// The hash of the block containing the transaction.
    #[serde(default)]
    pub block_hash: Option<Digest>,
    /// The number of the block containing the transaction.
    #[serde(default)]
    pub block_number: Option<U256>,
    /// The sender.
    #[serde(default)]
    pub from: Option<Address>,
    /// The recipient, `None` for contract deployments.
    #[serde(default)]
    pub to: Option<Address>,
    /// The address of the contract created by the transaction, if any.
    #[serde(default)]
    pub contract_address: Option<Address>,
    /// Gas used by this transaction alone.
    #[serde(default)]
    pub gas_used: Option<U256>,
    /// Total gas used in the block up to and including this transaction.
    #[serde(default)]
    pub cumulative_gas_used: Option<U256>,
    /// Execution status, `1` for success and `0` for failure.
    #[serde(default)]
    pub status: Option<U256>,
    /// Logs emitted by the transaction.
    #[serde(default)]
    pub logs: Vec<Value>,
    /// Remaining receipt fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// A Whisper message to post with `shh_post`.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct WhisperPost {
    /// The identity of the sender.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Bytes>,
    /// The identity of the receiver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Bytes>,
    /// Message topics.
    pub topics: Vec<Bytes>,
    /// The message payload.
    pub payload: Bytes,
    /// The priority of the message.
    pub priority: U256,
    /// Time to live in seconds.
    pub ttl: U256,
}

/// A Whisper message filter for `shh_newFilter`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct WhisperFilter {
    /// Only receive messages addressed to this identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Bytes>,
    /// Message topics to match.
    pub topics: Vec<Bytes>,
}

/// A Parity `trace_filter` query.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceFilter {
    /// First block to trace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_block: Option<BlockSpec>,
    /// Last block to trace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_block: Option<BlockSpec>,
    /// Only include traces sent from these addresses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_address: Option<Vec<Address>>,
    /// Only include traces sent to these addresses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_address: Option<Vec<Address>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethprim::address;
    use serde_json::json;

    #[test]
    fn block_spec_accepts_tags_and_numbers() {
        assert_eq!(
            "earliest".parse::<BlockSpec>().unwrap(),
            BlockSpec::Tag(BlockTag::Earliest)
        );
        assert_eq!(
            "pending".parse::<BlockSpec>().unwrap(),
            BlockSpec::Tag(BlockTag::Pending)
        );
        assert_eq!(
            "0x2a".parse::<BlockSpec>().unwrap(),
            BlockSpec::Number(42_u64.as_u256())
        );
        assert_eq!(BlockSpec::default(), BlockSpec::Tag(BlockTag::Latest));
    }

    #[test]
    fn block_spec_rejects_unknown_selectors() {
        for invalid in ["safe", "finalized", "Latest", "42", "0x", "0xzz", ""] {
            assert_eq!(
                invalid.parse::<BlockSpec>(),
                Err(InvalidBlockSpec(invalid.to_owned())),
                "{invalid:?} should be rejected",
            );
        }
        assert!(serde_json::from_value::<BlockSpec>(json!("safe")).is_err());
    }

    #[test]
    fn block_spec_serialization() {
        assert_eq!(
            serde_json::to_value(BlockSpec::from(BlockTag::Pending)).unwrap(),
            json!("pending")
        );
        assert_eq!(
            serde_json::to_value(BlockSpec::from(150_000_u64)).unwrap(),
            json!("0x249f0")
        );
        assert_eq!(BlockSpec::from(255_u64).to_string(), "0xff");
        assert_eq!(
            serde_json::from_value::<BlockSpec>(json!("0x249f0")).unwrap(),
            BlockSpec::from(150_000_u64)
        );
    }

    #[test]
    fn transaction_call_skips_missing_fields() {
        let call = TransactionCall {
            to: Some(address!("0x0000000000000000000000000000000000000001")),
            data: Some(vec![0x18, 0x16, 0x0d, 0xdd]),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&call).unwrap(),
            json!({
                "to": "0x0000000000000000000000000000000000000001",
                "data": "0x18160ddd",
            })
        );
    }

    #[test]
    fn transaction_request_uses_hex_quantities() {
        let request = TransactionRequest {
            gas: Some(90_000_u64.as_u256()),
            value: Some(1_u64.as_u256()),
            ..TransactionRequest::new(address!("0x0000000000000000000000000000000000000002"))
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "from": "0x0000000000000000000000000000000000000002",
                "gas": "0x15f90",
                "value": "0x1",
            })
        );
    }

    #[test]
    fn syncing_status() {
        assert_eq!(
            serde_json::from_value::<SyncingStatus>(json!(false)).unwrap(),
            SyncingStatus::NotSyncing
        );
        assert_eq!(
            serde_json::from_value::<SyncingStatus>(json!({
                "startingBlock": "0x0",
                "currentBlock": "0x10",
                "highestBlock": "0x20",
            }))
            .unwrap(),
            SyncingStatus::Syncing(SyncingProgress {
                starting_block: 0_u64.as_u256(),
                current_block: 16_u64.as_u256(),
                highest_block: 32_u64.as_u256(),
            })
        );
        assert!(serde_json::from_value::<SyncingStatus>(json!(true)).is_err());
    }

    #[test]
    fn log_filter_serialization() {
        let filter = LogFilter {
            from_block: Some(BlockTag::Earliest.into()),
            address: LogFilterValue::Exact(address!(
                "0x0000000000000000000000000000000000000003"
            )),
            topics: vec![LogFilterValue::Any, LogFilterValue::OneOf(vec![])],
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({
                "fromBlock": "earliest",
                "address": "0x0000000000000000000000000000000000000003",
                "topics": [null, []],
            })
        );
    }

    #[test]
    fn receipt_keeps_unknown_fields() {
        let receipt = serde_json::from_value::<TransactionReceipt>(json!({
            "transactionHash": "0x27191ea9e8228c98bc4418fa60843540937b0c615b2db5e828756800f533f8cd",
            "contractAddress": "0x0000000000000000000000000000000000000004",
            "status": "0x1",
            "logsBloom": "0x00",
        }))
        .unwrap();
        assert_eq!(
            receipt.contract_address,
            Some(address!("0x0000000000000000000000000000000000000004"))
        );
        assert_eq!(receipt.status, Some(1_u64.as_u256()));
        assert_eq!(receipt.extra["logsBloom"], json!("0x00"));
        assert!(receipt.logs.is_empty());
    }

    #[test]
    fn bytes_are_hex_strings() {
        let bytes = Bytes(vec![0xde, 0xad]);
        assert_eq!(serde_json::to_value(&bytes).unwrap(), json!("0xdead"));
        assert_eq!(format!("{bytes:?}"), "Bytes(0xdead)");
        assert_eq!(
            serde_json::from_value::<Bytes>(json!("0xbeef")).unwrap(),
            Bytes(vec![0xbe, 0xef])
        );
    }
}
