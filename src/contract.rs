//! Builders for contract calls, transactions and deployments.
//!
//! These produce the [`TransactionCall`] and [`TransactionRequest`] values the
//! transports send with `eth_call` and `eth_sendTransaction`, so both clients
//! share the same defaults and encoding.

use crate::{
    abi::{self, ParamType, Token},
    types::{Address, TransactionCall, TransactionReceipt, TransactionRequest, U256},
};

/// Gas provided to contract transactions when not specified.
pub const DEFAULT_GAS: U256 = U256::new(90_000);

/// Gas price for contract transactions when not specified, 50 gwei.
pub const DEFAULT_GAS_PRICE: U256 = U256::new(50 * 1_000_000_000);

/// Optional parameters of a contract transaction.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TransactionOptions {
    /// Gas limit, [`DEFAULT_GAS`] when not set.
    pub gas: Option<U256>,
    /// Gas price, [`DEFAULT_GAS_PRICE`] when not set.
    pub gas_price: Option<U256>,
    /// Value to send along with the call.
    pub value: Option<U256>,
}

/// A plain value transfer.
pub fn transfer(from: Address, to: Address, amount: U256) -> TransactionRequest {
    TransactionRequest {
        to: Some(to),
        value: Some(amount),
        ..TransactionRequest::new(from)
    }
}

/// A contract deployment. Constructor arguments are ABI encoded according to
/// the constructor signature, e.g. `constructor(uint256,address)`, and
/// appended to the code.
pub fn deployment(
    from: Address,
    mut code: Vec<u8>,
    gas: Option<U256>,
    constructor: Option<(&str, &[Token])>,
) -> Result<TransactionRequest, abi::Error> {
    if let Some((signature, args)) = constructor {
        let types = abi::parse_signature(signature)?;
        code.extend(abi::encode(&types, args)?);
    }
    Ok(TransactionRequest {
        gas,
        data: Some(code),
        ..TransactionRequest::new(from)
    })
}

/// A read-only call of a contract function.
pub fn call(address: Address, signature: &str, args: &[Token]) -> Result<TransactionCall, abi::Error> {
    Ok(TransactionCall {
        to: Some(address),
        data: Some(abi::encode_function_call(signature, args)?),
        ..Default::default()
    })
}

/// A transaction calling a contract function.
pub fn transaction(
    from: Address,
    address: Address,
    signature: &str,
    args: &[Token],
    options: TransactionOptions,
) -> Result<TransactionRequest, abi::Error> {
    Ok(TransactionRequest {
        to: Some(address),
        gas: Some(options.gas.unwrap_or(DEFAULT_GAS)),
        gas_price: Some(options.gas_price.unwrap_or(DEFAULT_GAS_PRICE)),
        value: options.value,
        data: Some(abi::encode_function_call(signature, args)?),
        ..TransactionRequest::new(from)
    })
}

/// Decodes the output of a contract call.
pub fn decode_output(result_types: &[ParamType], output: &[u8]) -> Result<Vec<Token>, abi::Error> {
    abi::decode(result_types, output)
}

/// The address of the contract created by a transaction, if the receipt is
/// available and the transaction created one.
pub fn contract_address(receipt: Option<TransactionReceipt>) -> Option<Address> {
    receipt?.contract_address
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    const ALICE: Address = Address(hex!("0000000000000000000000000000000000000001"));
    const TOKEN: Address = Address(hex!("0000000000000000000000000000000000000002"));

    #[test]
    fn transfers_carry_value() {
        let request = transfer(ALICE, TOKEN, U256::new(1_000));
        assert_eq!(request.to, Some(TOKEN));
        assert_eq!(request.value, Some(U256::new(1_000)));
        assert_eq!(request.gas, None);
        assert_eq!(request.data, None);
    }

    #[test]
    fn deployments_append_constructor_arguments() {
        let request = deployment(
            ALICE,
            hex!("6080604052").to_vec(),
            Some(U256::new(1_000_000)),
            Some(("constructor(uint256)", &[Token::Uint(U256::new(7))][..])),
        )
        .unwrap();
        assert_eq!(request.to, None);
        assert_eq!(request.gas, Some(U256::new(1_000_000)));
        assert_eq!(
            request.data.unwrap(),
            hex!(
                "6080604052"
                "0000000000000000000000000000000000000000000000000000000000000007"
            )
        );

        let request = deployment(ALICE, vec![0x60], None, None).unwrap();
        assert_eq!(request.data, Some(vec![0x60]));
        assert!(deployment(ALICE, vec![], None, Some(("constructor(uint256)", &[] as &[Token]))).is_err());
    }

    #[test]
    fn transactions_use_default_gas() {
        let request = transaction(
            ALICE,
            TOKEN,
            "transfer(address,uint256)",
            &[Token::Address(ALICE), Token::Uint(U256::new(5))],
            TransactionOptions::default(),
        )
        .unwrap();
        assert_eq!(request.from, ALICE);
        assert_eq!(request.to, Some(TOKEN));
        assert_eq!(request.gas, Some(U256::new(90_000)));
        assert_eq!(request.gas_price, Some(U256::new(50_000_000_000)));
        assert_eq!(request.value, None);
        assert_eq!(request.data.unwrap()[..4], hex!("a9059cbb"));

        let request = transaction(
            ALICE,
            TOKEN,
            "deposit()",
            &[],
            TransactionOptions {
                gas: Some(U256::new(21_000)),
                value: Some(U256::new(1)),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(request.gas, Some(U256::new(21_000)));
        assert_eq!(request.value, Some(U256::new(1)));
    }

    #[test]
    fn calls_encode_data() {
        let call = call(TOKEN, "balanceOf(address)", &[Token::Address(ALICE)]).unwrap();
        assert_eq!(call.from, None);
        assert_eq!(call.to, Some(TOKEN));
        assert_eq!(call.data.unwrap().len(), 36);
    }

    #[test]
    fn contract_addresses() {
        assert_eq!(contract_address(None), None);

        let receipt = serde_json::from_value(serde_json::json!({
            "transactionHash": "0x27191ea9e8228c98bc4418fa60843540937b0c615b2db5e828756800f533f8cd",
            "contractAddress": "0x0000000000000000000000000000000000000002",
        }))
        .unwrap();
        assert_eq!(contract_address(Some(receipt)), Some(TOKEN));

        let receipt = serde_json::from_value(serde_json::json!({
            "transactionHash": "0x27191ea9e8228c98bc4418fa60843540937b0c615b2db5e828756800f533f8cd",
            "contractAddress": null,
        }))
        .unwrap();
        assert_eq!(contract_address(Some(receipt)), None);
    }
}
