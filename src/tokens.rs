//! `@token` substitution for watermark lines
//!
//! Lines such as `MACHINE NAME: @machineName` are expanded once at startup.
//! Values are looked up lazily, so a line that never mentions `@osName`
//! never queries the OS release files.

use log::{debug, warn};
use once_cell::sync::{Lazy, OnceCell};
use regex::{Captures, Regex};
use std::collections::HashMap;
use sysinfo::System;

static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"@(userName|machineName|osVersion|osName)").expect("Invalid regex")
});

/// A machine detail that can be stamped into a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    UserName,
    MachineName,
    OsVersion,
    OsName,
}

impl Token {
    pub const ALL: [Token; 4] = [
        Token::UserName,
        Token::MachineName,
        Token::OsVersion,
        Token::OsName,
    ];

    /// The token as written in a line, including the `@`
    pub fn name(self) -> &'static str {
        match self {
            Token::UserName => "@userName",
            Token::MachineName => "@machineName",
            Token::OsVersion => "@osVersion",
            Token::OsName => "@osName",
        }
    }

    pub fn from_name(name: &str) -> Option<Token> {
        Token::ALL.into_iter().find(|token| token.name() == name)
    }

    fn index(self) -> usize {
        self as usize
    }

    fn lookup(self) -> Option<String> {
        match self {
            Token::UserName => std::env::var("USER")
                .or_else(|_| std::env::var("USERNAME"))
                .ok()
                .filter(|name| !name.is_empty()),
            Token::MachineName => System::host_name(),
            Token::OsVersion => System::os_version(),
            Token::OsName => System::long_os_version(),
        }
    }
}

/// Expands tokens, caching each value after its first use
#[derive(Debug, Default)]
pub struct TokenResolver {
    fixed: Option<HashMap<Token, String>>,
    cache: [OnceCell<String>; 4],
}

impl TokenResolver {
    /// Resolver backed by the running system
    pub fn system() -> Self {
        Self::default()
    }

    /// Resolver with preset values; tokens absent from `values` expand to ""
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = (Token, S)>,
        S: Into<String>,
    {
        Self {
            fixed: Some(
                values
                    .into_iter()
                    .map(|(token, value)| (token, value.into()))
                    .collect(),
            ),
            cache: Default::default(),
        }
    }

    pub fn value(&self, token: Token) -> &str {
        self.cache[token.index()].get_or_init(|| {
            let value = match &self.fixed {
                Some(values) => values.get(&token).cloned(),
                None => token.lookup(),
            };
            match value {
                Some(value) => {
                    debug!("{} = {:?}", token.name(), value);
                    value
                }
                None => {
                    warn!("No value available for {}", token.name());
                    String::new()
                }
            }
        })
    }

    /// Replace every known token in `input`
    pub fn expand(&self, input: &str) -> String {
        TOKEN_PATTERN
            .replace_all(input, |caps: &Captures| match Token::from_name(&caps[0]) {
                Some(token) => self.value(token).to_string(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    pub fn expand_all(&self, lines: &[String]) -> Vec<String> {
        lines.iter().map(|line| self.expand(line)).collect()
    }
}
