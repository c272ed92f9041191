//! Typed description of a JSON RPC method.
//!
//! Every node method is a zero-sized type implementing [`Method`], which ties
//! the wire name to its parameter and result types. The tables in the crate
//! root are generated with the [`module!`] macro. Plain strings also implement
//! [`Method`] with raw JSON parameters and results, which is the escape hatch
//! for calling any method the tables do not cover.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::borrow::Cow;

/// An Ethereum JSON RPC method.
pub trait Method {
    /// Positional parameters, serialized as a JSON array.
    type Params;
    /// The value held in the response `result` field.
    type Result;

    /// The method name sent on the wire, e.g. `eth_blockNumber`.
    fn name(&self) -> Cow<'static, str>;

    fn serialize_params<S>(params: &Self::Params, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer;
    fn deserialize_params<'de, D>(deserializer: D) -> Result<Self::Params, D::Error>
    where
        D: Deserializer<'de>;

    fn serialize_result<S>(result: &Self::Result, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer;
    fn deserialize_result<'de, D>(deserializer: D) -> Result<Self::Result, D::Error>
    where
        D: Deserializer<'de>;
}

macro_rules! impl_untyped_method {
    ($($name:ty),* $(,)?) => {$(
        impl Method for $name {
            type Params = Value;
            type Result = Value;

            fn name(&self) -> Cow<'static, str> {
                Cow::Owned(self.to_string())
            }

            fn serialize_params<S>(params: &Self::Params, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                params.serialize(serializer)
            }

            fn deserialize_params<'de, D>(deserializer: D) -> Result<Self::Params, D::Error>
            where
                D: Deserializer<'de>,
            {
                Value::deserialize(deserializer)
            }

            fn serialize_result<S>(result: &Self::Result, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                result.serialize(serializer)
            }

            fn deserialize_result<'de, D>(deserializer: D) -> Result<Self::Result, D::Error>
            where
                D: Deserializer<'de>,
            {
                Value::deserialize(deserializer)
            }
        }
    )*};
}

impl_untyped_method!(&'_ str, String, Cow<'_, str>);

/// Declares a single typed RPC method.
///
/// The parameter and result types may each be followed by a bracketed path to
/// a module with `serialize`/`deserialize` functions, used instead of the
/// type's own serde implementation:
///
/// ```ignore
/// method! {
///     /// Returns code at a given address.
///     pub struct GetCode as "eth_getCode"
///         (Address, BlockSpec) => Vec<u8> [serialization::bytes];
/// }
/// ```
#[macro_export]
macro_rules! method {
    (
        $(#[$attr:meta])*
        $vis:vis struct $type:ident as $name:literal $params:ty => $result:ty;
    ) => {
        $crate::method! {
            $(#[$attr])* $vis struct $type as $name
                $params [<$params>] => $result [<$result>];
        }
    };

    (
        $(#[$attr:meta])*
        $vis:vis struct $type:ident as $name:literal
            $params:ty => $result:ty [$($rwith:tt)*];
    ) => {
        $crate::method! {
            $(#[$attr])* $vis struct $type as $name
                $params [<$params>] => $result [$($rwith)*];
        }
    };

    (
        $(#[$attr:meta])*
        $vis:vis struct $type:ident as $name:literal
            $params:ty [$($pwith:tt)*] => $result:ty;
    ) => {
        $crate::method! {
            $(#[$attr])* $vis struct $type as $name
                $params [$($pwith)*] => $result [<$result>];
        }
    };

    (
        $(#[$attr:meta])*
        $vis:vis struct $type:ident as $name:literal
            $params:ty [$($pwith:tt)*] => $result:ty [$($rwith:tt)*];
    ) => {
        $(#[$attr])*
        #[derive(Clone, Copy, Default)]
        $vis struct $type;

        impl ::std::fmt::Debug for $type {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                write!(f, "{}({:?})", stringify!($type), $name)
            }
        }

        #[allow(unused_imports)]
        impl $crate::method::Method for $type {
            type Params = $params;
            type Result = $result;

            fn name(&self) -> ::std::borrow::Cow<'static, str> {
                ::std::borrow::Cow::Borrowed($name)
            }

            fn serialize_params<S>(params: &Self::Params, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: ::serde::Serializer,
            {
                use ::serde::Serialize as _;
                $($pwith)*::serialize(params, serializer)
            }

            fn deserialize_params<'de, D>(deserializer: D) -> Result<Self::Params, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                use ::serde::Deserialize as _;
                $($pwith)*::deserialize(deserializer)
            }

            fn serialize_result<S>(result: &Self::Result, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: ::serde::Serializer,
            {
                use ::serde::Serialize as _;
                $($rwith)*::serialize(result, serializer)
            }

            fn deserialize_result<'de, D>(deserializer: D) -> Result<Self::Result, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                use ::serde::Deserialize as _;
                $($rwith)*::deserialize(deserializer)
            }
        }

        impl ::serde::Serialize for $type {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: ::serde::Serializer,
            {
                serializer.serialize_str($name)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $type {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                let name = ::std::borrow::Cow::<str>::deserialize(deserializer)?;
                if name != $name {
                    return Err(::serde::de::Error::custom(format!(
                        "expected method {:?} but got {:?}",
                        $name, name,
                    )));
                }
                Ok(Self)
            }
        }
    };
}

/// Declares a namespace module of typed RPC methods.
#[macro_export]
macro_rules! module {
    (
        $(#[$attr:meta])*
        $vis:vis mod $mod:ident {
            $(
                $(#[$mattr:meta])*
                $mvis:vis struct $mtype:ident as $mname:literal
                    $mparams:ty $([$($mpwith:tt)*])? => $mresult:ty $([$($mrwith:tt)*])?;
            )*
        }
    ) => {
        $(#[$attr])*
        $vis mod $mod {
            #[allow(unused_imports)]
            use super::*;

            $(
                $crate::method! {
                    $(#[$mattr])* $mvis struct $mtype as $mname
                        $mparams $([$($mpwith)*])? => $mresult $([$($mrwith)*])?;
                }
            )*
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{eth, types::Empty, web3};

    #[test]
    fn typed_methods_serialize_as_their_name() {
        assert_eq!(eth::BlockNumber.name(), "eth_blockNumber");
        assert_eq!(
            serde_json::to_value(web3::ClientVersion).unwrap(),
            "web3_clientVersion",
        );
        assert_eq!(format!("{:?}", eth::GasPrice), "GasPrice(\"eth_gasPrice\")");
    }

    #[test]
    fn typed_methods_reject_other_names() {
        assert!(serde_json::from_str::<eth::BlockNumber>("\"eth_blockNumber\"").is_ok());
        assert!(serde_json::from_str::<eth::BlockNumber>("\"eth_gasPrice\"").is_err());
    }

    #[test]
    fn empty_params_are_an_empty_array() {
        let params = eth::Accounts::serialize_params(&Empty, serde_json::value::Serializer);
        assert_eq!(params.unwrap(), serde_json::json!([]));
    }

    #[test]
    fn strings_are_untyped_methods() {
        assert_eq!("eth_chainId".name(), "eth_chainId");
        assert_eq!(String::from("net_version").name(), "net_version");
    }
}
