//! Registry of contract source compilers.
//!
//! Compilers are registered explicitly by language name and handed to a
//! client; nothing is discovered from the node or the environment.

use std::{
    collections::BTreeMap,
    fmt::{self, Debug, Formatter},
};
use thiserror::Error;

/// A compiler from source code to EVM deployment bytecode.
pub type CompileFn =
    dyn Fn(&str) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>> + Send + Sync;

/// A set of compilers keyed by language name, e.g. `"solidity"`.
#[derive(Default)]
pub struct Compilers {
    compilers: BTreeMap<String, Box<CompileFn>>,
}

impl Compilers {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a compiler for a language, replacing any previous one.
    pub fn with<F>(mut self, language: impl Into<String>, compiler: F) -> Self
    where
        F: Fn(&str) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>>
            + Send
            + Sync
            + 'static,
    {
        self.insert(language, compiler);
        self
    }

    /// Registers a compiler for a language, replacing any previous one.
    pub fn insert<F>(&mut self, language: impl Into<String>, compiler: F)
    where
        F: Fn(&str) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>>
            + Send
            + Sync
            + 'static,
    {
        self.compilers.insert(language.into(), Box::new(compiler));
    }

    /// Returns the compiler registered for a language.
    pub fn get(&self, language: &str) -> Option<&CompileFn> {
        self.compilers.get(language).map(|compiler| &**compiler)
    }

    /// Returns `true` if a compiler is registered for the language.
    pub fn contains(&self, language: &str) -> bool {
        self.compilers.contains_key(language)
    }

    /// Registered language names, in sorted order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.compilers.keys().map(String::as_str)
    }

    /// Compiles source code with the compiler registered for a language.
    pub fn compile(&self, language: &str, source: &str) -> Result<Vec<u8>, Error> {
        let compiler = self
            .get(language)
            .ok_or_else(|| Error::Missing(language.to_owned()))?;
        tracing::debug!(%language, "compiling contract source");
        compiler(source).map_err(|source| Error::Failed {
            language: language.to_owned(),
            source,
        })
    }
}

impl Debug for Compilers {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_set().entries(self.languages()).finish()
    }
}

/// An error compiling contract source.
#[derive(Debug, Error)]
pub enum Error {
    /// No compiler is registered for the language.
    #[error("no compiler registered for {0:?}")]
    Missing(String),

    /// The compiler rejected the source.
    #[error("{language} compilation failed: {source}")]
    Failed {
        language: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compilers() -> Compilers {
        Compilers::new()
            .with("echo", |source: &str| Ok(source.as_bytes().to_vec()))
            .with("broken", |_: &str| Err("syntax error".into()))
    }

    #[test]
    fn lookup() {
        let compilers = compilers();
        assert!(compilers.contains("echo"));
        assert!(!compilers.contains("serpent"));
        assert!(compilers.get("broken").is_some());
        assert_eq!(compilers.languages().collect::<Vec<_>>(), ["broken", "echo"]);
        assert_eq!(format!("{compilers:?}"), r#"{"broken", "echo"}"#);
    }

    #[test]
    fn compile() {
        let compilers = compilers();
        assert_eq!(compilers.compile("echo", "\x60\x00").unwrap(), [0x60, 0x00]);
        assert!(matches!(
            compilers.compile("lll", ""),
            Err(Error::Missing(language)) if language == "lll"
        ));
        let err = compilers.compile("broken", "contract {").unwrap_err();
        assert_eq!(err.to_string(), "broken compilation failed: syntax error");
    }
}
