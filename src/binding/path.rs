//! Path template variables captured by the router

use super::{resolve, FromParam};
use crate::error::RequestError;

/// Variables captured from `{name}` segments of the matched template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathVariables {
    vars: Vec<(String, String)>,
}

impl PathVariables {
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// Binder for a single path variable; always required
#[derive(Debug, Clone, Copy)]
pub struct PathVariable<'a> {
    name: &'a str,
}

impl<'a> PathVariable<'a> {
    pub const fn new(name: &'a str) -> Self {
        Self { name }
    }

    pub fn bind<T: FromParam>(&self, vars: &PathVariables) -> Result<T, RequestError> {
        resolve(self.name, vars.get(self.name), true, None, |name| {
            RequestError::MissingPathVariable { name }
        })?
        .ok_or_else(|| RequestError::MissingPathVariable {
            name: self.name.to_string(),
        })
    }
}
