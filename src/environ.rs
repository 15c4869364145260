//! Request context passed to handlers.
//!
//! # Responsibilities
//! - Hold per-request variables as a string-keyed map
//! - Expose the conventional CGI-style keys the router reads
//! - Carry values written by the router (route captures)
//!
//! # Design Decisions
//! - Values are either text or an ordered list of strings; nothing else is needed
//!   by the router or the bundled handlers
//! - A key holding the wrong kind of value reads as absent

use std::collections::HashMap;

/// Request path, required for routing.
pub const PATH_INFO: &str = "PATH_INFO";
/// Raw query string, without the leading `?`.
pub const QUERY_STRING: &str = "QUERY_STRING";
pub const REQUEST_METHOD: &str = "REQUEST_METHOD";
pub const SCRIPT_NAME: &str = "SCRIPT_NAME";
pub const SERVER_PROTOCOL: &str = "SERVER_PROTOCOL";
pub const REMOTE_ADDR: &str = "REMOTE_ADDR";
pub const CONTENT_TYPE: &str = "CONTENT_TYPE";
pub const CONTENT_LENGTH: &str = "CONTENT_LENGTH";
/// Capturing-group results written by the router on a match.
pub const ROUTER_CAPTURES: &str = "router.captures";

/// A single request variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvValue {
    Text(String),
    List(Vec<String>),
}

impl From<String> for EnvValue {
    fn from(value: String) -> Self {
        EnvValue::Text(value)
    }
}

impl From<&str> for EnvValue {
    fn from(value: &str) -> Self {
        EnvValue::Text(value.to_string())
    }
}

impl From<Vec<String>> for EnvValue {
    fn from(value: Vec<String>) -> Self {
        EnvValue::List(value)
    }
}

/// Per-request variables handed to a [`Handler`](crate::handler::Handler).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environ {
    vars: HashMap<String, EnvValue>,
}

impl Environ {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<EnvValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a variable, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<EnvValue>) -> Option<EnvValue> {
        self.vars.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&EnvValue> {
        self.vars.get(key)
    }

    /// Text value for `key`; `None` if absent or not text.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.vars.get(key) {
            Some(EnvValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// List value for `key`; `None` if absent or not a list.
    pub fn get_list(&self, key: &str) -> Option<&[String]> {
        match self.vars.get(key) {
            Some(EnvValue::List(items)) => Some(items),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    pub fn path_info(&self) -> Option<&str> {
        self.get_str(PATH_INFO)
    }

    pub fn query_string(&self) -> Option<&str> {
        self.get_str(QUERY_STRING)
    }

    /// Captures injected by the router for the matched pattern.
    pub fn captures(&self) -> Option<&[String]> {
        self.get_list(ROUTER_CAPTURES)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EnvValue)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for Environ
where
    K: Into<String>,
    V: Into<EnvValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
