use std::collections::BTreeMap;
use std::iter::FromIterator;

use dia_core::errors::{DiaError, ErrorInfo};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

fn serde_error(code: &str, err: impl ToString) -> DiaError {
    DiaError::Config(ErrorInfo::new(code, err.to_string()))
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let ordered = map
                .into_iter()
                .map(|(key, value)| (key, canonicalize(value)))
                .collect::<BTreeMap<_, _>>();
            Value::Object(Map::from_iter(ordered))
        }
        Value::Array(values) => Value::Array(values.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

/// Serializes a value into canonical JSON bytes with sorted object keys.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, DiaError> {
    let value = serde_json::to_value(value).map_err(|err| serde_error("json.serialize", err))?;
    let mut bytes = Vec::new();
    serde_json::to_writer_pretty(&mut bytes, &canonicalize(value))
        .map_err(|err| serde_error("json.write", err))?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Deserializes a YAML payload into the requested type.
pub fn from_yaml_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, DiaError> {
    serde_yaml::from_slice(data).map_err(|err| serde_error("yaml.deserialize", err))
}
