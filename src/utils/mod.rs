use std::fmt;

use actix_web::{error::JsonPayloadError, web, FromRequest};
use futures_util::future::LocalBoxFuture;
use serde::Deserialize;
use serde_json::Value;

use crate::{api::error, constants::JSON_MIME};

pub enum FieldKind {
    Integer,
    Object(&'static [Field]),
}

pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
}

/// Shape a request body must have before it is deserialized. Every listed
/// field is required.
pub trait RequestSchema {
    const FIELDS: &'static [Field];
}

/// Walks `value` against `fields`, shallowest level first, and returns the
/// first violation in JSON-schema wording.
pub fn check_schema(value: &Value, fields: &[Field]) -> Result<(), String> {
    let Some(object) = value.as_object() else {
        return Err(format!("{value} is not of type 'object'"));
    };

    for field in fields {
        let Some(property) = object.get(field.name) else { continue };
        match field.kind {
            FieldKind::Integer if !(property.is_i64() || property.is_u64()) => {
                return Err(format!("{property} is not of type 'integer'"));
            }
            FieldKind::Object(_) if !property.is_object() => {
                return Err(format!("{property} is not of type 'object'"));
            }
            _ => {}
        }
    }

    if let Some(missing) = fields.iter().find(|f| !object.contains_key(f.name)) {
        return Err(format!("'{}' is a required property", missing.name));
    }

    for field in fields {
        let FieldKind::Object(nested) = field.kind else { continue };
        if let Some(property) = object.get(field.name) {
            check_schema(property, nested)?;
        }
    }

    Ok(())
}

/// Integer id taken from a request body. Integers outside the `i64` range are
/// kept as sent so they can be reported, but never match a stored row.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct RecordId(serde_json::Number);

impl RecordId {
    /// Database key, if the id can name a row at all
    pub fn key(&self) -> Option<i64> {
        self.0.as_i64()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

fn json_payload_error(err: actix_web::Error) -> error::Error {
    match err.as_error::<JsonPayloadError>() {
        Some(JsonPayloadError::ContentType) => {
            error::Error::unsupported_media_type(format!("Request must contain {JSON_MIME} data"))
        }
        Some(payload_err) => error::Error::bad_request(payload_err.to_string()),
        None => error::Error::bad_request(err.to_string()),
    }
}

pub struct ValidatedJson<T>(pub T);

impl<T> FromRequest for ValidatedJson<T>
where
    T: RequestSchema + serde::de::DeserializeOwned + 'static,
{
    type Error = error::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let fut = web::Json::<Value>::from_request(req, payload);

        Box::pin(async move {
            let value = fut.await.map_err(json_payload_error)?.into_inner();
            check_schema(&value, T::FIELDS).map_err(error::Error::unprocessable)?;
            let model: T = serde_json::from_value(value)
                .map_err(|e| error::Error::unprocessable(e.to_string()))?;
            Ok(ValidatedJson(model))
        })
    }
}

const WINDOWS_DEVICE_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3",
];

/// Reduces a client supplied name to `[A-Za-z0-9_.-]` so it can be joined to
/// the upload directory. Returns an empty string when nothing usable is left.
pub fn secure_filename(filename: &str) -> String {
    let ascii: String = filename
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(*c, '_' | '.' | '-'))
        .collect();
    let trimmed = cleaned.trim_matches(|c: char| c == '.' || c == '_');

    let stem = trimmed.split('.').next().unwrap_or_default();
    if WINDOWS_DEVICE_NAMES.iter().any(|d| d.eq_ignore_ascii_case(stem)) {
        return format!("_{trimmed}");
    }

    trimmed.to_string()
}
