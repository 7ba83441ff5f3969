//! Request parameter binding
//!
//! Query string and form-encoded body pairs, and the `RequestParam` binder
//! that applies required/default rules to a single named parameter.

use std::collections::HashMap;

use super::{resolve, FromParam};
use crate::error::RequestError;

/// Ordered multi-map of decoded request parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Decode an `application/x-www-form-urlencoded` string
    pub fn parse(input: &str) -> Self {
        let mut params = Self::default();
        params.extend_from(input.as_bytes());
        params
    }

    /// Append the pairs decoded from `input` after the existing ones
    pub fn extend_from(&mut self, input: &[u8]) {
        self.pairs.extend(
            url::form_urlencoded::parse(input).map(|(k, v)| (k.into_owned(), v.into_owned())),
        );
    }

    /// First value for a name
    pub fn first(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// All values for a name, in request order
    pub fn all(&self, name: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == name)
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Collapse into a single-valued map keeping the first value per name
    pub fn to_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::with_capacity(self.pairs.len());
        for (k, v) in &self.pairs {
            map.entry(k.clone()).or_insert_with(|| v.clone());
        }
        map
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Binder for one named request parameter
///
/// Parameters are required unless marked optional or given a default. A
/// default also replaces an empty value.
#[derive(Debug, Clone, Copy)]
pub struct RequestParam<'a> {
    name: &'a str,
    required: bool,
    default_value: Option<&'a str>,
}

impl<'a> RequestParam<'a> {
    pub const fn new(name: &'a str) -> Self {
        Self {
            name,
            required: true,
            default_value: None,
        }
    }

    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    #[must_use]
    pub const fn default_value(mut self, value: &'a str) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Bind the parameter, `None` when it is optional and absent
    pub fn bind<T: FromParam>(&self, params: &QueryParams) -> Result<Option<T>, RequestError> {
        resolve(
            self.name,
            params.first(self.name),
            self.required,
            self.default_value,
            |name| RequestError::MissingParameter { name },
        )
    }

    /// Bind the parameter, treating absence as an error even when optional
    pub fn get<T: FromParam>(&self, params: &QueryParams) -> Result<T, RequestError> {
        self.bind(params)?
            .ok_or_else(|| RequestError::MissingParameter {
                name: self.name.to_string(),
            })
    }
}
