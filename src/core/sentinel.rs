//! Sentinel-coded record lists.
//!
//! Some list-valued keys in the home-mode payload are sent as a JSON array
//! when populated and as a fixed string when empty. The string differs per
//! key, so each key carries its own [`SentinelField`]. Decoding dispatches on
//! the raw value's JSON type; encoding picks the sentinel for an empty list
//! and an array otherwise. Nothing else is accepted: an unrecognized scalar
//! surfaces as `UnexpectedSentinelValue` instead of becoming an empty list.
use super::error::{Error, ErrorKind};
use super::path::FieldPath;
use super::reader::json_type_name;
use super::records::WireRecord;
use super::CodecResult;
use serde_json::Value;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SentinelField {
    pub key: &'static str,
    pub marker: &'static str,
}

impl SentinelField {
    pub const fn new(key: &'static str, marker: &'static str) -> Self {
        Self { key, marker }
    }
}

pub const CAMERAS: SentinelField = SentinelField::new("cameras", "-1");
pub const ACTION_RULES: SentinelField = SentinelField::new("actrules", "-1");
pub const IO_MODULES: SentinelField = SentinelField::new("io_modules", "");

/// A missing key decodes as an empty list.
pub fn decode_sentinel_list<T>(
    raw: Option<&Value>,
    field: SentinelField,
    path: &FieldPath,
) -> CodecResult<Vec<T>>
where
    T: WireRecord,
{
    match raw {
        None => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                T::decode(item, &path.index(index)).map_err(|err| err.with_index(index))
            })
            .collect(),
        Some(Value::String(text)) if text == field.marker => Ok(Vec::new()),
        Some(other) => Err(Error::new(ErrorKind::UnexpectedSentinelValue)
            .with_message(format!(
                "`{}` holds a {} that is neither an array nor the sentinel {:?}",
                field.key,
                json_type_name(other),
                field.marker
            ))
            .with_path(path.to_string())
            .with_value(other.clone())),
    }
}

pub fn encode_sentinel_list<T>(items: &[T], field: SentinelField) -> CodecResult<Value>
where
    T: WireRecord,
{
    if items.is_empty() {
        return Ok(Value::String(field.marker.to_string()));
    }
    items
        .iter()
        .map(T::encode)
        .collect::<CodecResult<Vec<_>>>()
        .map(Value::Array)
}

#[cfg(test)]
mod tests {
    use super::{
        ACTION_RULES, CAMERAS, IO_MODULES, SentinelField, decode_sentinel_list,
        encode_sentinel_list,
    };
    use crate::core::error::ErrorKind;
    use crate::core::path::FieldPath;
    use crate::core::records::{Camera, IoModule};
    use serde_json::{Value, json};

    fn decode_modules(raw: &Value) -> crate::core::CodecResult<Vec<IoModule>> {
        decode_sentinel_list(Some(raw), IO_MODULES, &FieldPath::root().key(IO_MODULES.key))
    }

    #[test]
    fn markers_are_configured_per_field() {
        assert_eq!(CAMERAS.marker, "-1");
        assert_eq!(ACTION_RULES.marker, "-1");
        assert_eq!(IO_MODULES.marker, "");
    }

    #[test]
    fn sentinel_decodes_to_empty_and_encodes_back() {
        let modules = decode_modules(&json!("")).expect("decode");
        assert!(modules.is_empty());
        assert_eq!(
            encode_sentinel_list(&modules, IO_MODULES).expect("encode"),
            json!("")
        );

        let cameras: Vec<Camera> =
            decode_sentinel_list(Some(&json!("-1")), CAMERAS, &FieldPath::root()).expect("decode");
        assert_eq!(
            encode_sentinel_list(&cameras, CAMERAS).expect("encode"),
            json!("-1")
        );
    }

    #[test]
    fn another_fields_marker_is_rejected() {
        let err = decode_modules(&json!("-1")).expect_err("err");
        assert_eq!(err.kind(), ErrorKind::UnexpectedSentinelValue);
        assert_eq!(err.value(), Some(&json!("-1")));
    }

    #[test]
    fn unknown_scalars_are_rejected_with_observed_value() {
        for raw in [json!("unexpected"), json!(null), json!(0), json!(false), json!({})] {
            let err = decode_modules(&raw).expect_err("err");
            assert_eq!(err.kind(), ErrorKind::UnexpectedSentinelValue);
            assert_eq!(err.path(), Some("io_modules"));
            assert_eq!(err.value(), Some(&raw));
        }
    }

    #[test]
    fn empty_array_input_still_encodes_as_sentinel() {
        let modules = decode_modules(&json!([])).expect("decode");
        assert!(modules.is_empty());
        assert_eq!(
            encode_sentinel_list(&modules, IO_MODULES).expect("encode"),
            json!("")
        );
    }

    #[test]
    fn array_elements_keep_order() {
        let raw = json!([
            {"ip": "10.0.0.1", "port": 1},
            {"ip": "10.0.0.2", "port": 2},
            {"ip": "10.0.0.3", "port": 3}
        ]);
        let modules = decode_modules(&raw).expect("decode");
        let ports: Vec<i64> = modules.iter().map(|module| module.port).collect();
        assert_eq!(ports, vec![1, 2, 3]);

        let encoded = encode_sentinel_list(&modules, IO_MODULES).expect("encode");
        let items = encoded.as_array().expect("array");
        assert_eq!(items.len(), 3);
        assert_eq!(items[2]["ip"], json!("10.0.0.3"));
    }

    #[test]
    fn element_failure_carries_index_and_field() {
        let raw = json!([{"ip": "10.0.0.1", "port": 1}, {"ip": "10.0.0.2", "port": "2"}]);
        let err = decode_modules(&raw).expect_err("err");
        assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
        assert_eq!(err.index(), Some(1));
        assert_eq!(err.path(), Some("io_modules[1].port"));
    }

    #[test]
    fn missing_key_is_an_empty_list() {
        let field = SentinelField::new("cameras", "-1");
        let cameras: Vec<Camera> =
            decode_sentinel_list(None, field, &FieldPath::root()).expect("decode");
        assert!(cameras.is_empty());
    }
}
