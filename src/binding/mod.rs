//! Request binding module
//!
//! Small explicit binders that read named inputs from a request and convert
//! them to typed values:
//! - query and form parameters (`RequestParam`)
//! - path template variables (`PathVariable`)
//! - headers, cookies and locale (`RequestHeader`, `CookieValue`)
//! - raw and JSON bodies (`HttpEntity`, `request_body_json`)

mod body;
mod context;
mod headers;
mod params;
mod path;

pub use body::{decode_json, request_body_json, HttpEntity, ResponseEntity};
pub use context::RequestContext;
pub use headers::{header_map, resolve_locale, CookieValue, RequestHeader};
pub use params::{QueryParams, RequestParam};
pub use path::{PathVariable, PathVariables};

use crate::error::RequestError;

/// Conversion from a raw textual input to a typed handler argument
pub trait FromParam: Sized {
    /// Type name reported in mismatch errors
    const TYPE_NAME: &'static str;

    /// Whether an empty raw value counts as absent
    const EMPTY_IS_ABSENT: bool;

    fn from_param(raw: &str) -> Option<Self>;
}

impl FromParam for String {
    const TYPE_NAME: &'static str = "String";
    const EMPTY_IS_ABSENT: bool = false;

    fn from_param(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }
}

macro_rules! impl_from_param {
    ($($ty:ty),*) => {
        $(
            impl FromParam for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);
                const EMPTY_IS_ABSENT: bool = true;

                fn from_param(raw: &str) -> Option<Self> {
                    raw.trim().parse().ok()
                }
            }
        )*
    };
}

impl_from_param!(i8, i16, i32, i64, u8, u16, u32, u64, usize, f64, bool);

/// Apply default, required and conversion rules to one raw input
fn resolve<T: FromParam>(
    name: &str,
    raw: Option<&str>,
    required: bool,
    default_value: Option<&str>,
    missing: impl FnOnce(String) -> RequestError,
) -> Result<Option<T>, RequestError> {
    let raw = match (raw, default_value) {
        (None | Some(""), Some(default)) => Some(default),
        (Some(""), None) if T::EMPTY_IS_ABSENT => None,
        (value, _) => value,
    };

    match raw {
        Some(value) => T::from_param(value)
            .map(Some)
            .ok_or_else(|| RequestError::TypeMismatch {
                name: name.to_string(),
                value: value.to_string(),
                target: T::TYPE_NAME,
            }),
        None if required => Err(missing(name.to_string())),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing(name: String) -> RequestError {
        RequestError::MissingParameter { name }
    }

    #[test]
    fn test_resolve_numbers() {
        assert_eq!(
            resolve::<i64>("id", Some(" 42 "), true, None, missing).unwrap(),
            Some(42)
        );
        assert_eq!(
            resolve::<i32>("age", None, false, None, missing).unwrap(),
            None
        );
        assert_eq!(
            resolve::<i32>("age", Some(""), false, Some("-1"), missing).unwrap(),
            Some(-1)
        );
    }

    #[test]
    fn test_resolve_bad_default_is_mismatch() {
        let err = resolve::<i32>("age", None, false, Some("x"), missing).unwrap_err();
        assert!(matches!(err, RequestError::TypeMismatch { .. }));
    }

    #[test]
    fn test_bool_param() {
        assert_eq!(bool::from_param("true"), Some(true));
        assert_eq!(bool::from_param("yes"), None);
    }
}
