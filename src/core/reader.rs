// Field-by-field access to a JSON object with path-tagged shape errors.
use super::error::{Error, ErrorKind};
use super::path::FieldPath;
use super::records::WireRecord;
use super::sentinel::{SentinelField, decode_sentinel_list};
use super::CodecResult;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

pub struct FieldReader<'a> {
    object: &'a Map<String, Value>,
    path: FieldPath,
}

impl<'a> FieldReader<'a> {
    /// Fails with `ShapeMismatch` unless `value` is a JSON object.
    pub fn new(value: &'a Value, path: &FieldPath, record: &str) -> CodecResult<Self> {
        match value {
            Value::Object(object) => Ok(Self {
                object,
                path: path.clone(),
            }),
            other => Err(Error::new(ErrorKind::ShapeMismatch)
                .with_message(format!(
                    "expected {record} object, found {}",
                    json_type_name(other)
                ))
                .with_path(path.to_string())
                .with_value(other.clone())),
        }
    }

    pub fn path_of(&self, key: &str) -> FieldPath {
        self.path.key(key)
    }

    pub fn raw(&self, key: &str) -> Option<&'a Value> {
        self.object.get(key)
    }

    /// Missing keys decode to the type's zero value.
    pub fn scalar<T>(&self, key: &str) -> CodecResult<T>
    where
        T: DeserializeOwned + Default,
    {
        let Some(value) = self.object.get(key) else {
            return Ok(T::default());
        };
        T::deserialize(value).map_err(|err| {
            Error::new(ErrorKind::ShapeMismatch)
                .with_message(format!(
                    "field `{key}` has the wrong type ({} found)",
                    json_type_name(value)
                ))
                .with_path(self.path_of(key).to_string())
                .with_value(value.clone())
                .with_source(err)
        })
    }

    pub fn record<T>(&self, key: &str) -> CodecResult<T>
    where
        T: WireRecord + Default,
    {
        match self.object.get(key) {
            Some(value) => T::decode(value, &self.path_of(key)),
            None => Ok(T::default()),
        }
    }

    /// Plain array of records; there is no sentinel form for these keys.
    pub fn records<T>(&self, key: &str) -> CodecResult<Vec<T>>
    where
        T: WireRecord,
    {
        let path = self.path_of(key);
        match self.object.get(key) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    T::decode(item, &path.index(index)).map_err(|err| err.with_index(index))
                })
                .collect(),
            Some(other) => Err(Error::new(ErrorKind::ShapeMismatch)
                .with_message(format!(
                    "field `{key}` must be an array of {}, found {}",
                    T::NAME,
                    json_type_name(other)
                ))
                .with_path(path.to_string())
                .with_value(other.clone())),
        }
    }

    pub fn sentinel_list<T>(&self, field: SentinelField) -> CodecResult<Vec<T>>
    where
        T: WireRecord,
    {
        decode_sentinel_list(self.raw(field.key), field, &self.path_of(field.key))
    }
}

pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
