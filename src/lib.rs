//! An Ethereum JSON RPC client with ABI call data helpers.
//!
//! Node methods are declared as typed tables (see [`eth`], [`net`], [`web3`],
//! [`db`], [`shh`] and [`trace`]) and executed over a transport: the async
//! [`http`] client (default feature) or the blocking [`curl`] client. The
//! [`abi`] module encodes contract function calls and decodes their results.
//!
//! Documentation for the APIs can be found here:
//! <https://ethereum.org/en/developers/docs/apis/json-rpc/>

pub mod abi;
pub mod compilers;
pub mod config;
pub mod contract;
#[cfg(feature = "curl")]
pub mod curl;
#[cfg(feature = "http")]
pub mod http;
pub mod jsonrpc;
#[macro_use]
pub mod method;
mod debug;
mod serialization;
pub mod types;
pub mod units;

use self::types::*;

module! {
    /// The `web3` namespace.
    pub mod web3 {
        /// Returns the current client version.
        pub struct ClientVersion as "web3_clientVersion"
            Empty => String;

        /// Returns the Keccak-256 of the given data.
        pub struct Sha3 as "web3_sha3"
            (Bytes,) => Digest;
    }
}

module! {
    /// The `net` namespace.
    pub mod net {
        /// Returns the current network ID.
        pub struct Version as "net_version"
            Empty => U256 [ethprim::num::serde::decimal];

        /// Returns `true` if the client is actively listening for network
        /// connections.
        pub struct Listening as "net_listening"
            Empty => bool;

        /// Returns the number of peers currently connected to the client.
        pub struct PeerCount as "net_peerCount"
            Empty => U256;
    }
}

module! {
    /// The `eth` namespace.
    pub mod eth {
        /// Returns the current Ethereum protocol version.
        pub struct ProtocolVersion as "eth_protocolVersion"
            Empty => Value;

        /// Returns an object with data about the sync status or false.
        pub struct Syncing as "eth_syncing"
            Empty => SyncingStatus;

        /// Returns the client coinbase address.
        pub struct Coinbase as "eth_coinbase"
            Empty => Address;

        /// Returns `true` if the client is actively mining new blocks.
        pub struct Mining as "eth_mining"
            Empty => bool;

        /// Returns the number of hashes per second the node is mining with.
        pub struct Hashrate as "eth_hashrate"
            Empty => U256;

        /// Returns the current price per gas in wei.
        pub struct GasPrice as "eth_gasPrice"
            Empty => U256;

        /// Returns a list of addresses owned by client.
        pub struct Accounts as "eth_accounts"
            Empty => Vec<Address>;

        /// Returns the number of most recent block.
        pub struct BlockNumber as "eth_blockNumber"
            Empty => U256;

        /// Returns the balance of the account of given address.
        pub struct GetBalance as "eth_getBalance"
            (Address, BlockSpec) => U256;

        /// Returns the value from a storage position at a given address.
        pub struct GetStorageAt as "eth_getStorageAt"
            (Address, U256, BlockSpec) => [u8; 32] [serialization::bytearray];

        /// Returns the number of transactions sent from an address.
        pub struct GetTransactionCount as "eth_getTransactionCount"
            (Address, BlockSpec) => U256;

        /// Returns the number of transactions in a block from a block matching
        /// the given block hash.
        pub struct GetBlockTransactionCountByHash as "eth_getBlockTransactionCountByHash"
            (Digest,) => Option<U256>;

        /// Returns the number of transactions in a block matching the given
        /// block number.
        pub struct GetBlockTransactionCountByNumber as "eth_getBlockTransactionCountByNumber"
            (BlockSpec,) => Option<U256>;

        /// Returns the number of uncles in a block from a block matching the
        /// given block hash.
        pub struct GetUncleCountByBlockHash as "eth_getUncleCountByBlockHash"
            (Digest,) => Option<U256>;

        /// Returns the number of uncles in a block from a block matching the
        /// given block number.
        pub struct GetUncleCountByBlockNumber as "eth_getUncleCountByBlockNumber"
            (BlockSpec,) => Option<U256>;

        /// Returns code at a given address.
        pub struct GetCode as "eth_getCode"
            (Address, BlockSpec) => Vec<u8> [serialization::bytes];

        /// Signs data with the given account, which must be unlocked.
        pub struct Sign as "eth_sign"
            (Address, Bytes) => Bytes;

        /// Creates a new message call transaction or a contract creation.
        pub struct SendTransaction as "eth_sendTransaction"
            (TransactionRequest,) => Digest;

        /// Submits an already signed transaction.
        pub struct SendRawTransaction as "eth_sendRawTransaction"
            (Bytes,) => Digest;

        /// Executes a new message call immediately without creating a
        /// transaction on the block chain.
        pub struct Call as "eth_call"
            (TransactionCall, BlockSpec) => Vec<u8> [serialization::bytes];

        /// Generates and returns an estimate of how much gas is necessary to
        /// allow the transaction to complete.
        pub struct EstimateGas as "eth_estimateGas"
            (TransactionCall, BlockSpec) => U256;

        /// Returns information about a block by hash.
        pub struct GetBlockByHash as "eth_getBlockByHash"
            (Digest, Hydrated) => Option<Value>;

        /// Returns information about a block by number.
        pub struct GetBlockByNumber as "eth_getBlockByNumber"
            (BlockSpec, Hydrated) => Option<Value>;

        /// Returns the information about a transaction requested by transaction
        /// hash.
        pub struct GetTransactionByHash as "eth_getTransactionByHash"
            (Digest,) => Option<Value>;

        /// Returns information about a transaction by block hash and
        /// transaction index position.
        pub struct GetTransactionByBlockHashAndIndex as "eth_getTransactionByBlockHashAndIndex"
            (Digest, U256) => Option<Value>;

        /// Returns information about a transaction by block number and
        /// transaction index position.
        pub struct GetTransactionByBlockNumberAndIndex as "eth_getTransactionByBlockNumberAndIndex"
            (BlockSpec, U256) => Option<Value>;

        /// Returns the receipt of a transaction by transaction hash.
        pub struct GetTransactionReceipt as "eth_getTransactionReceipt"
            (Digest,) => Option<TransactionReceipt>;

        /// Returns information about an uncle of a block by hash and uncle
        /// index position.
        pub struct GetUncleByBlockHashAndIndex as "eth_getUncleByBlockHashAndIndex"
            (Digest, U256) => Option<Value>;

        /// Returns information about an uncle of a block by number and uncle
        /// index position.
        pub struct GetUncleByBlockNumberAndIndex as "eth_getUncleByBlockNumberAndIndex"
            (BlockSpec, U256) => Option<Value>;

        /// Returns a list of available compilers in the client.
        pub struct GetCompilers as "eth_getCompilers"
            Empty => Vec<String>;

        /// Returns compiled Solidity code.
        pub struct CompileSolidity as "eth_compileSolidity"
            (String,) => Value;

        /// Returns compiled LLL code.
        pub struct CompileLll as "eth_compileLLL"
            (String,) => Value;

        /// Returns compiled Serpent code.
        pub struct CompileSerpent as "eth_compileSerpent"
            (String,) => Value;

        /// Install a log filter in the server, allowing for later polling.
        pub struct NewFilter as "eth_newFilter"
            (LogFilter,) => FilterId;

        /// Creates a filter in the node to notify when a new block arrives.
        pub struct NewBlockFilter as "eth_newBlockFilter"
            Empty => FilterId;

        /// Creates a filter in the node to notify when new pending
        /// transactions arrive.
        pub struct NewPendingTransactionFilter as "eth_newPendingTransactionFilter"
            Empty => FilterId;

        /// Uninstalls a filter with given id.
        pub struct UninstallFilter as "eth_uninstallFilter"
            (FilterId,) => bool;

        /// Polling method for a filter, which returns an array of logs, block
        /// hashes, or transaction hashes which occurred since last poll.
        pub struct GetFilterChanges as "eth_getFilterChanges"
            (FilterId,) => Vec<Value>;

        /// Returns an array of all logs matching the filter with the given ID.
        pub struct GetFilterLogs as "eth_getFilterLogs"
            (FilterId,) => Vec<Value>;

        /// Returns an array of all logs matching the specified filter.
        pub struct GetLogs as "eth_getLogs"
            (LogFilter,) => Vec<Value>;

        /// Returns the hash of the current block, the seed hash, and the
        /// boundary condition to be met.
        pub struct GetWork as "eth_getWork"
            Empty => Vec<Bytes>;

        /// Submits a proof-of-work solution.
        pub struct SubmitWork as "eth_submitWork"
            (BlockNonce, Digest, Digest) => bool;

        /// Submits the mining hashrate of a miner identified by a random ID.
        pub struct SubmitHashrate as "eth_submitHashrate"
            (U256, Digest) => bool;
    }
}

module! {
    /// The deprecated `db` namespace for the node's local database.
    pub mod db {
        /// Stores a string in the local database.
        pub struct PutString as "db_putString"
            (String, String, String) => bool;

        /// Returns a string from the local database.
        pub struct GetString as "db_getString"
            (String, String) => String;

        /// Stores binary data in the local database.
        pub struct PutHex as "db_putHex"
            (String, String, Bytes) => bool;

        /// Returns binary data from the local database.
        pub struct GetHex as "db_getHex"
            (String, String) => Bytes;
    }
}

module! {
    /// The `shh` (Whisper) namespace.
    pub mod shh {
        /// Returns the current Whisper protocol version.
        pub struct Version as "shh_version"
            Empty => String;

        /// Sends a Whisper message.
        pub struct Post as "shh_post"
            (WhisperPost,) => bool;

        /// Creates a new Whisper identity in the client.
        pub struct NewIdentity as "shh_newIdentity"
            Empty => Bytes;

        /// Checks if the client holds the private keys for a given identity.
        pub struct HasIdentity as "shh_hasIdentity"
            (Bytes,) => bool;

        /// Creates a new group.
        pub struct NewGroup as "shh_newGroup"
            Empty => Bytes;

        /// Adds an identity to a group.
        pub struct AddToGroup as "shh_addToGroup"
            (Bytes,) => bool;

        /// Creates a filter to notify when the client receives a Whisper
        /// message matching the filter options.
        pub struct NewFilter as "shh_newFilter"
            (WhisperFilter,) => U256;

        /// Uninstalls a Whisper filter.
        pub struct UninstallFilter as "shh_uninstallFilter"
            (U256,) => bool;

        /// Polling method for Whisper filters.
        pub struct GetFilterChanges as "shh_getFilterChanges"
            (U256,) => Vec<Value>;

        /// Returns all messages matching a filter.
        pub struct GetMessages as "shh_getMessages"
            (U256,) => Vec<Value>;
    }
}

module! {
    /// The Parity `trace` namespace.
    pub mod trace {
        /// Returns traces matching the given filter.
        pub struct Filter as "trace_filter"
            (TraceFilter,) => Vec<Value>;

        /// Returns the trace at the given position of a transaction.
        pub struct Get as "trace_get"
            (Digest, Vec<U256>) => Option<Value>;

        /// Returns all traces of a given transaction.
        pub struct Transaction as "trace_transaction"
            (Digest,) => Vec<Value>;

        /// Returns traces created at a given block.
        pub struct Block as "trace_block"
            (BlockSpec,) => Vec<Value>;
    }
}
