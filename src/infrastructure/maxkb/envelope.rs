//! Generic `{code, message, data}` response envelope

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::DomainError;

/// Envelope code reported by the upstream on success
pub const SUCCESS_CODE: i64 = 200;

type Record = Map<String, Value>;

/// Payload carried by an envelope
#[derive(Debug, Clone, PartialEq)]
pub enum EnvelopeData {
    /// `null`, missing, or any other falsy value
    Empty,
    Records(Vec<Record>),
    Record(Record),
}

impl EnvelopeData {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    fn from_value(value: Value) -> Result<Self, DomainError> {
        match value {
            Value::Null => Ok(Self::Empty),
            Value::Bool(b) if !b => Ok(Self::Empty),
            Value::Number(ref n) if n.as_f64() == Some(0.0) => Ok(Self::Empty),
            Value::String(ref s) if s.is_empty() => Ok(Self::Empty),
            Value::Array(items) if items.is_empty() => Ok(Self::Empty),
            Value::Object(map) if map.is_empty() => Ok(Self::Empty),
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| match item {
                    Value::Object(map) => Ok(map),
                    other => Err(DomainError::decode(format!(
                        "Expected an object at data[{}], got {}",
                        index,
                        json_type(&other)
                    ))),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Records),
            Value::Object(map) => Ok(Self::Record(map)),
            other => Err(DomainError::decode(format!(
                "Unexpected envelope data: {}",
                json_type(&other)
            ))),
        }
    }
}

/// Parsed upstream response
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub code: i64,
    pub message: String,
    pub data: EnvelopeData,
}

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    code: i64,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Value,
}

impl Envelope {
    /// Parse a response body into an envelope
    pub fn from_slice(body: &[u8]) -> Result<Self, DomainError> {
        let value: Value = serde_json::from_slice(body).map_err(|e| {
            DomainError::decode(format!("Response body is not valid JSON: {}", e))
        })?;

        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, DomainError> {
        let raw: RawEnvelope = serde_json::from_value(value).map_err(|e| {
            DomainError::decode(format!("Response does not match the envelope shape: {}", e))
        })?;

        // Any other code carries no usable payload, whatever `data` holds
        let data = if raw.code == SUCCESS_CODE {
            EnvelopeData::from_value(raw.data)?
        } else {
            EnvelopeData::Empty
        };

        Ok(Self {
            code: raw.code,
            message: raw.message.unwrap_or_default(),
            data,
        })
    }

    /// Whether the envelope carries a usable payload
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE && !self.data.is_empty()
    }

    /// Decode the payload as a list of records
    ///
    /// Yields an empty list when there is no usable payload; a single-record
    /// payload becomes a one-element list.
    pub fn into_records<T: DeserializeOwned>(self) -> Result<Vec<T>, DomainError> {
        if !self.is_success() {
            return Ok(Vec::new());
        }

        let records = match self.data {
            EnvelopeData::Empty => Vec::new(),
            EnvelopeData::Records(records) => records,
            EnvelopeData::Record(record) => vec![record],
        };

        records.into_iter().map(decode_record).collect()
    }

    /// Decode the payload as a single record, taking the first one of a list
    pub fn into_record<T: DeserializeOwned>(self) -> Result<Option<T>, DomainError> {
        if !self.is_success() {
            return Ok(None);
        }

        let record = match self.data {
            EnvelopeData::Empty => None,
            EnvelopeData::Records(records) => records.into_iter().next(),
            EnvelopeData::Record(record) => Some(record),
        };

        record.map(decode_record).transpose()
    }
}

fn decode_record<T: DeserializeOwned>(record: Record) -> Result<T, DomainError> {
    serde_json::from_value(Value::Object(record))
        .map_err(|e| DomainError::decode(format!("Unexpected record shape: {}", e)))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
