//! Transfer entity shared by the binding examples

use serde::{Deserialize, Deserializer, Serialize};

use crate::binding::QueryParams;
use crate::error::RequestError;

/// Two-field record bound from query parameters, form fields or a JSON body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelloData {
    #[serde(deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(deserialize_with = "null_as_default")]
    pub age: i32,
}

/// An explicit JSON `null` binds the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl HelloData {
    pub fn new(username: impl Into<String>, age: i32) -> Self {
        Self {
            username: username.into(),
            age,
        }
    }

    /// Bind fields from request parameters by name
    ///
    /// Fields without a matching parameter keep their default value. A
    /// present `age` that is not a 32-bit integer is a type mismatch.
    pub fn from_params(params: &QueryParams) -> Result<Self, RequestError> {
        let mut data = Self::default();

        if let Some(username) = params.first("username") {
            data.username = username.to_string();
        }
        if let Some(age) = params.first("age") {
            data.age = age.trim().parse().map_err(|_| RequestError::TypeMismatch {
                name: "age".to_string(),
                value: age.to_string(),
                target: "i32",
            })?;
        }

        Ok(data)
    }
}
