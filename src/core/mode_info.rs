//! Home-mode configuration snapshot (`SYNO.SurveillanceStation.HomeMode` GetInfo).
//!
//! Three keys (`cameras`, `actrules`, `io_modules`) are sentinel-coded and
//! pass through a raw `serde_json::Value` on both decode and encode; every
//! other key maps straight to its field. Decoding always builds a fresh,
//! independent value.
use super::error::{Error, ErrorKind};
use super::path::FieldPath;
use super::reader::FieldReader;
use super::records::{ActionRule, Camera, IoModule, NotifyEvent, RecScheduleAppEntry};
use super::sentinel::{ACTION_RULES, CAMERAS, IO_MODULES, encode_sentinel_list};
use super::CodecResult;
use crate::json::parse;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModeInfo {
    pub action_rules_on: bool,
    pub action_rules: Vec<ActionRule>,
    pub cameras: Vec<Camera>,
    pub custom1_det: i64,
    pub custom1_di: i64,
    pub custom2_det: i64,
    pub custom2_di: i64,
    pub dual_rec_off: bool,
    pub geo_delay_time: i64,
    pub geo_lat: f64,
    pub geo_lng: f64,
    pub geo_mobiles: Vec<String>,
    pub geo_radius: i64,
    pub io_modules: Vec<IoModule>,
    /// Microseconds since the Unix epoch.
    pub last_update_time: i64,
    pub mode_schedule: String,
    pub mode_schedule_next_time: i64,
    pub mode_schedule_on: bool,
    pub notify_events: Vec<NotifyEvent>,
    pub notify_on: bool,
    pub on: bool,
    pub onetime_disable_on: bool,
    pub onetime_disable_time: i64,
    pub onetime_enable_on: bool,
    pub onetime_enable_time: i64,
    pub reason: i64,
    pub rec_schedule_apps: Vec<RecScheduleAppEntry>,
    pub rec_schedule: String,
    pub rec_schedule_on: bool,
    pub stream_profile: String,
    pub streaming_on: bool,
    pub wifi_ssid: String,
}

/// Encode-side shape: borrowed fields plus the three sentinel-coded values.
#[derive(Serialize)]
struct ModeInfoWire<'a> {
    actrule_on: bool,
    actrules: Value,
    cameras: Value,
    custom1_det: i64,
    custom1_di: i64,
    custom2_det: i64,
    custom2_di: i64,
    dual_rec_off: bool,
    geo_delay_time: i64,
    geo_lat: f64,
    geo_lng: f64,
    geo_mobiles: &'a [String],
    geo_radius: i64,
    io_modules: Value,
    last_update_time: i64,
    mode_schedule: &'a str,
    mode_schedule_next_time: i64,
    mode_schedule_on: bool,
    notify_event_list: &'a [NotifyEvent],
    notify_on: bool,
    on: bool,
    onetime_disable_on: bool,
    onetime_disable_time: i64,
    onetime_enable_on: bool,
    onetime_enable_time: i64,
    reason: i64,
    rec_sch_custom_det_app_list: &'a [RecScheduleAppEntry],
    rec_schedule: &'a str,
    rec_schedule_on: bool,
    stream_profile: &'a str,
    streaming_on: bool,
    wifi_ssid: &'a str,
}

impl ModeInfo {
    /// Decode entry point for a response body that has already been received.
    pub fn decode(bytes: &[u8]) -> CodecResult<Self> {
        Self::decode_with_input(bytes).map(|(_, info)| info)
    }

    /// Like `decode`, but also hands back the parsed input document.
    pub fn decode_with_input(bytes: &[u8]) -> CodecResult<(Value, Self)> {
        let value: Value = parse::from_slice(bytes).map_err(|err| {
            Error::new(ErrorKind::Parse)
                .with_message("mode info payload is not valid JSON")
                .with_hint(parse::hint_for_error(&err, "mode_info"))
                .with_source(err)
        })?;
        let info = Self::from_value(&value)?;
        Ok((value, info))
    }

    pub fn from_value(value: &Value) -> CodecResult<Self> {
        Self::from_value_at(value, &FieldPath::root())
    }

    pub fn from_value_at(value: &Value, path: &FieldPath) -> CodecResult<Self> {
        let r = FieldReader::new(value, path, "ModeInfo")?;
        Ok(Self {
            action_rules_on: r.scalar("actrule_on")?,
            action_rules: r.sentinel_list(ACTION_RULES)?,
            cameras: r.sentinel_list(CAMERAS)?,
            custom1_det: r.scalar("custom1_det")?,
            custom1_di: r.scalar("custom1_di")?,
            custom2_det: r.scalar("custom2_det")?,
            custom2_di: r.scalar("custom2_di")?,
            dual_rec_off: r.scalar("dual_rec_off")?,
            geo_delay_time: r.scalar("geo_delay_time")?,
            geo_lat: r.scalar("geo_lat")?,
            geo_lng: r.scalar("geo_lng")?,
            geo_mobiles: r.scalar("geo_mobiles")?,
            geo_radius: r.scalar("geo_radius")?,
            io_modules: r.sentinel_list(IO_MODULES)?,
            last_update_time: r.scalar("last_update_time")?,
            mode_schedule: r.scalar("mode_schedule")?,
            mode_schedule_next_time: r.scalar("mode_schedule_next_time")?,
            mode_schedule_on: r.scalar("mode_schedule_on")?,
            notify_events: r.records("notify_event_list")?,
            notify_on: r.scalar("notify_on")?,
            on: r.scalar("on")?,
            onetime_disable_on: r.scalar("onetime_disable_on")?,
            onetime_disable_time: r.scalar("onetime_disable_time")?,
            onetime_enable_on: r.scalar("onetime_enable_on")?,
            onetime_enable_time: r.scalar("onetime_enable_time")?,
            reason: r.scalar("reason")?,
            rec_schedule_apps: r.records("rec_sch_custom_det_app_list")?,
            rec_schedule: r.scalar("rec_schedule")?,
            rec_schedule_on: r.scalar("rec_schedule_on")?,
            stream_profile: r.scalar("stream_profile")?,
            streaming_on: r.scalar("streaming_on")?,
            wifi_ssid: r.scalar("wifi_ssid")?,
        })
    }

    pub fn to_value(&self) -> CodecResult<Value> {
        serde_json::to_value(self.to_wire()?).map_err(encode_error)
    }

    /// Encode entry point; the bytes are ready to send as a request body.
    pub fn encode(&self) -> CodecResult<Vec<u8>> {
        serde_json::to_vec(&self.to_wire()?).map_err(encode_error)
    }

    fn to_wire(&self) -> CodecResult<ModeInfoWire<'_>> {
        // JSON has no NaN or infinity; serde_json would write them as null.
        for (key, value) in [("geo_lat", self.geo_lat), ("geo_lng", self.geo_lng)] {
            if !value.is_finite() {
                return Err(Error::new(ErrorKind::Internal)
                    .with_message(format!("field `{key}` is not a finite number ({value})"))
                    .with_path(FieldPath::root().key(key).to_string()));
            }
        }
        Ok(ModeInfoWire {
            actrule_on: self.action_rules_on,
            actrules: encode_sentinel_list(&self.action_rules, ACTION_RULES)?,
            cameras: encode_sentinel_list(&self.cameras, CAMERAS)?,
            custom1_det: self.custom1_det,
            custom1_di: self.custom1_di,
            custom2_det: self.custom2_det,
            custom2_di: self.custom2_di,
            dual_rec_off: self.dual_rec_off,
            geo_delay_time: self.geo_delay_time,
            geo_lat: self.geo_lat,
            geo_lng: self.geo_lng,
            geo_mobiles: &self.geo_mobiles,
            geo_radius: self.geo_radius,
            io_modules: encode_sentinel_list(&self.io_modules, IO_MODULES)?,
            last_update_time: self.last_update_time,
            mode_schedule: &self.mode_schedule,
            mode_schedule_next_time: self.mode_schedule_next_time,
            mode_schedule_on: self.mode_schedule_on,
            notify_event_list: &self.notify_events,
            notify_on: self.notify_on,
            on: self.on,
            onetime_disable_on: self.onetime_disable_on,
            onetime_disable_time: self.onetime_disable_time,
            onetime_enable_on: self.onetime_enable_on,
            onetime_enable_time: self.onetime_enable_time,
            reason: self.reason,
            rec_sch_custom_det_app_list: &self.rec_schedule_apps,
            rec_schedule: &self.rec_schedule,
            rec_schedule_on: self.rec_schedule_on,
            stream_profile: &self.stream_profile,
            streaming_on: self.streaming_on,
            wifi_ssid: &self.wifi_ssid,
        })
    }
}

fn encode_error(err: serde_json::Error) -> Error {
    Error::new(ErrorKind::Internal)
        .with_message("failed to encode mode info")
        .with_source(err)
}

impl Serialize for ModeInfo {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::Error as _;
        self.to_wire()
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ModeInfo {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        ModeInfo::from_value(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::ModeInfo;
    use crate::core::error::ErrorKind;
    use crate::core::json_eq::{first_difference, json_equivalent};
    use serde_json::{Value, json};

    fn empty_lists_doc() -> Value {
        json!({
            "actrule_on": false,
            "actrules": "-1",
            "cameras": "-1",
            "custom1_det": 1,
            "custom1_di": 1,
            "custom2_det": 1,
            "custom2_di": 1,
            "dual_rec_off": false,
            "geo_delay_time": 60,
            "geo_lat": 0,
            "geo_lng": 0,
            "geo_mobiles": [],
            "geo_radius": 100,
            "io_modules": "",
            "last_update_time": 1741624494295081i64,
            "mode_schedule": "000000",
            "mode_schedule_next_time": -1,
            "mode_schedule_on": true,
            "notify_event_list": [
                {"eventGroupType": 2, "eventType": 3, "filter": 0}
            ],
            "notify_on": true,
            "on": false,
            "onetime_disable_on": false,
            "onetime_disable_time": 0,
            "onetime_enable_on": false,
            "onetime_enable_time": 0,
            "reason": 1,
            "rec_sch_custom_det_app_list": [
                {"custom1_app_det": 0, "custom2_app_det": 0}
            ],
            "rec_schedule": "111111",
            "rec_schedule_on": false,
            "stream_profile": "1,1,1,1,1,1,0",
            "streaming_on": false,
            "wifi_ssid": ""
        })
    }

    #[test]
    fn sentinel_document_round_trips() {
        let input = empty_lists_doc();
        let info = ModeInfo::from_value(&input).expect("decode");
        assert!(info.cameras.is_empty());
        assert!(info.action_rules.is_empty());
        assert!(info.io_modules.is_empty());
        assert_eq!(info.last_update_time, 1741624494295081);
        assert_eq!(info.mode_schedule_next_time, -1);

        let output = info.to_value().expect("encode");
        assert_eq!(output["cameras"], json!("-1"));
        assert_eq!(output["actrules"], json!("-1"));
        assert_eq!(output["io_modules"], json!(""));
        assert_eq!(first_difference(&input, &output), None);
    }

    #[test]
    fn populated_io_modules_encode_as_array() {
        let mut input = empty_lists_doc();
        input["io_modules"] = json!([
            {"ip": "192.168.1.1", "mac": "MAC", "model": "fakemodel", "port": 0, "vendor": "Synology"}
        ]);
        let info = ModeInfo::from_value(&input).expect("decode");
        assert_eq!(info.io_modules.len(), 1);
        assert_eq!(info.io_modules[0].vendor, "Synology");
        let output = info.to_value().expect("encode");
        assert!(output["io_modules"].is_array());
        assert!(json_equivalent(&input, &output));
    }

    #[test]
    fn unexpected_sentinel_fails_whole_decode() {
        let mut input = empty_lists_doc();
        input["actrules"] = json!("unexpected");
        let err = ModeInfo::from_value(&input).expect_err("err");
        assert_eq!(err.kind(), ErrorKind::UnexpectedSentinelValue);
        assert_eq!(err.path(), Some("actrules"));
        assert_eq!(err.value(), Some(&json!("unexpected")));
    }

    #[test]
    fn scalar_type_mismatch_names_the_key() {
        let mut input = empty_lists_doc();
        input["geo_radius"] = json!("100");
        let err = ModeInfo::from_value(&input).expect_err("err");
        assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
        assert_eq!(err.path(), Some("geo_radius"));
    }

    #[test]
    fn malformed_bytes_are_parse_errors() {
        let err = ModeInfo::decode(br#"{"cameras": "-1""#).expect_err("err");
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(err.hint().unwrap_or_default().contains("eof"));
    }

    #[test]
    fn serde_impls_follow_the_codec() {
        let input = empty_lists_doc();
        let info: ModeInfo = serde_json::from_value(input.clone()).expect("deserialize");
        let output = serde_json::to_value(&info).expect("serialize");
        assert!(json_equivalent(&input, &output));

        let mut bad = input;
        bad["cameras"] = json!(null);
        let err = serde_json::from_value::<ModeInfo>(bad).expect_err("err");
        assert!(err.to_string().contains("UnexpectedSentinelValue"));
    }

    #[test]
    fn non_finite_coordinates_fail_encode() {
        for (key, value) in [
            ("geo_lat", f64::NAN),
            ("geo_lng", f64::INFINITY),
            ("geo_lat", f64::NEG_INFINITY),
        ] {
            let mut info = ModeInfo::default();
            match key {
                "geo_lat" => info.geo_lat = value,
                _ => info.geo_lng = value,
            }
            let err = info.encode().expect_err("non-finite");
            assert_eq!(err.kind(), ErrorKind::Internal);
            assert_eq!(err.path(), Some(key));
            assert!(info.to_value().is_err());
            assert!(serde_json::to_value(&info).is_err());
        }
    }

    #[test]
    fn decode_with_input_returns_parsed_document() {
        let input = empty_lists_doc();
        let bytes = serde_json::to_vec(&input).expect("bytes");
        let (value, info) = ModeInfo::decode_with_input(&bytes).expect("decode");
        assert_eq!(value, input);
        assert_eq!(info, ModeInfo::decode(&bytes).expect("decode"));

        let err = ModeInfo::decode_with_input(b"{\"on\": tru}").expect_err("err");
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(err.hint().unwrap_or_default().contains("parse category: syntax"));
    }

    #[test]
    fn decodes_are_independent() {
        let bytes = serde_json::to_vec(&empty_lists_doc()).expect("bytes");
        let mut first = ModeInfo::decode(&bytes).expect("first");
        let second = ModeInfo::decode(&bytes).expect("second");
        first.wifi_ssid.push_str("changed");
        assert_eq!(second.wifi_ssid, "");
        assert_ne!(first, second);
    }
}
