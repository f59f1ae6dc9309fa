//! Fixed-shape records carried inside Surveillance Station responses.
//!
//! Each record decodes field by field through [`FieldReader`] so a type
//! mismatch reports the exact path, and encodes through `serde` with the
//! vendor's wire names. Unknown keys are ignored on decode; every declared
//! field is emitted on encode.
use super::error::{Error, ErrorKind};
use super::path::FieldPath;
use super::reader::FieldReader;
use super::CodecResult;
use serde::Serialize;
use serde_json::Value;

pub trait WireRecord: Sized + Serialize {
    /// Record name used in shape-mismatch messages.
    const NAME: &'static str;

    fn decode(value: &Value, path: &FieldPath) -> CodecResult<Self>;

    fn encode(&self) -> CodecResult<Value> {
        serde_json::to_value(self).map_err(|err| {
            Error::new(ErrorKind::Internal)
                .with_message(format!("failed to encode {}", Self::NAME))
                .with_source(err)
        })
    }
}

/// Per-camera stream profile (`stream1`).
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stream {
    pub bitrate_ctrl: i64,
    pub constant_bitrate: String,
    pub fps: i64,
    pub quality: String,
    pub resolution: String,
}

impl WireRecord for Stream {
    const NAME: &'static str = "Stream";

    fn decode(value: &Value, path: &FieldPath) -> CodecResult<Self> {
        let r = FieldReader::new(value, path, Self::NAME)?;
        Ok(Self {
            bitrate_ctrl: r.scalar("bitrateCtrl")?,
            constant_bitrate: r.scalar("constantBitrate")?,
            fps: r.scalar("fps")?,
            quality: r.scalar("quality")?,
            resolution: r.scalar("resolution")?,
        })
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    #[serde(rename = "DINum")]
    pub di_num: i64,
    #[serde(rename = "DONum")]
    pub do_num: i64,
    pub added_time: i64,
    pub audio_codec: i64,
    pub channel: String,
    #[serde(rename = "connectionOverSSL")]
    pub connection_over_ssl: bool,
    pub ds_id: i64,
    pub ds_name: String,
    pub enable_low_profile: bool,
    pub enable_recording_keep_days: bool,
    pub enable_recording_keep_size: bool,
    #[serde(rename = "enableSRTP")]
    pub enable_srtp: bool,
    pub fov: String,
    pub high_profile_stream_no: i64,
    pub id: i64,
    pub id_on_rec_server: i64,
    pub ip: String,
    pub low_profile_stream_no: i64,
    pub mac: String,
    pub medium_profile_stream_no: i64,
    pub model: String,
    pub new_name: String,
    pub port: i64,
    pub post_record_time: i64,
    pub pre_record_time: i64,
    pub record_prefix: String,
    /// One character per half-hour slot of the week.
    pub record_schedule: String,
    pub record_time: i64,
    pub recording_keep_days: i64,
    pub recording_keep_size: String,
    pub status: i64,
    pub stream1: Stream,
    pub tv_standard: i64,
    pub user_name: String,
    pub vendor: String,
    pub video_codec: i64,
    pub video_mode: String,
}

impl WireRecord for Camera {
    const NAME: &'static str = "Camera";

    fn decode(value: &Value, path: &FieldPath) -> CodecResult<Self> {
        let r = FieldReader::new(value, path, Self::NAME)?;
        Ok(Self {
            di_num: r.scalar("DINum")?,
            do_num: r.scalar("DONum")?,
            added_time: r.scalar("addedTime")?,
            audio_codec: r.scalar("audioCodec")?,
            channel: r.scalar("channel")?,
            connection_over_ssl: r.scalar("connectionOverSSL")?,
            ds_id: r.scalar("dsId")?,
            ds_name: r.scalar("dsName")?,
            enable_low_profile: r.scalar("enableLowProfile")?,
            enable_recording_keep_days: r.scalar("enableRecordingKeepDays")?,
            enable_recording_keep_size: r.scalar("enableRecordingKeepSize")?,
            enable_srtp: r.scalar("enableSRTP")?,
            fov: r.scalar("fov")?,
            high_profile_stream_no: r.scalar("highProfileStreamNo")?,
            id: r.scalar("id")?,
            id_on_rec_server: r.scalar("idOnRecServer")?,
            ip: r.scalar("ip")?,
            low_profile_stream_no: r.scalar("lowProfileStreamNo")?,
            mac: r.scalar("mac")?,
            medium_profile_stream_no: r.scalar("mediumProfileStreamNo")?,
            model: r.scalar("model")?,
            new_name: r.scalar("newName")?,
            port: r.scalar("port")?,
            post_record_time: r.scalar("postRecordTime")?,
            pre_record_time: r.scalar("preRecordTime")?,
            record_prefix: r.scalar("recordPrefix")?,
            record_schedule: r.scalar("recordSchedule")?,
            record_time: r.scalar("recordTime")?,
            recording_keep_days: r.scalar("recordingKeepDays")?,
            recording_keep_size: r.scalar("recordingKeepSize")?,
            status: r.scalar("status")?,
            stream1: r.record("stream1")?,
            tv_standard: r.scalar("tvStandard")?,
            user_name: r.scalar("userName")?,
            vendor: r.scalar("vendor")?,
            video_codec: r.scalar("videoCodec")?,
            video_mode: r.scalar("videoMode")?,
        })
    }
}

/// `actItem` / `actRetItem` reference inside an action rule.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ActionItem {
    pub id: i64,
    pub name: String,
}

impl WireRecord for ActionItem {
    const NAME: &'static str = "ActionItem";

    fn decode(value: &Value, path: &FieldPath) -> CodecResult<Self> {
        let r = FieldReader::new(value, path, Self::NAME)?;
        Ok(Self {
            id: r.scalar("id")?,
            name: r.scalar("name")?,
        })
    }
}

/// Event-to-action automation entry.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRule {
    pub rule_type: i64,
    pub ext_url: String,
    pub act_dev_name: String,
    pub evt_dev_name: String,
    pub act_type: i64,
    pub id: i64,
    pub act_id: i64,
    pub act_schedule: String,
    pub act_dev_id: i64,
    pub act_times: i64,
    pub evt_id: i64,
    pub act_ret_item: ActionItem,
    pub status: i64,
    pub user_name: String,
    pub act_time_dur: i64,
    pub act_ds_id: i64,
    pub evt_src: i64,
    pub password: String,
    pub act_time_unit: i64,
    pub evt_ds_id: i64,
    pub name: String,
    pub act_item: ActionItem,
    pub act_src: i64,
    pub evt_dev_id: i64,
    pub evt_item: i64,
}

impl WireRecord for ActionRule {
    const NAME: &'static str = "ActionRule";

    fn decode(value: &Value, path: &FieldPath) -> CodecResult<Self> {
        let r = FieldReader::new(value, path, Self::NAME)?;
        Ok(Self {
            rule_type: r.scalar("ruleType")?,
            ext_url: r.scalar("extUrl")?,
            act_dev_name: r.scalar("actDevName")?,
            evt_dev_name: r.scalar("evtDevName")?,
            act_type: r.scalar("actType")?,
            id: r.scalar("id")?,
            act_id: r.scalar("actId")?,
            act_schedule: r.scalar("actSchedule")?,
            act_dev_id: r.scalar("actDevId")?,
            act_times: r.scalar("actTimes")?,
            evt_id: r.scalar("evtId")?,
            act_ret_item: r.record("actRetItem")?,
            status: r.scalar("status")?,
            user_name: r.scalar("userName")?,
            act_time_dur: r.scalar("actTimeDur")?,
            act_ds_id: r.scalar("actDsId")?,
            evt_src: r.scalar("evtSrc")?,
            password: r.scalar("password")?,
            act_time_unit: r.scalar("actTimeUnit")?,
            evt_ds_id: r.scalar("evtDsId")?,
            name: r.scalar("name")?,
            act_item: r.record("actItem")?,
            act_src: r.scalar("actSrc")?,
            evt_dev_id: r.scalar("evtDevId")?,
            evt_item: r.scalar("evtItem")?,
        })
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct IoModule {
    pub ip: String,
    pub mac: String,
    pub model: String,
    pub port: i64,
    pub vendor: String,
}

impl WireRecord for IoModule {
    const NAME: &'static str = "IOModule";

    fn decode(value: &Value, path: &FieldPath) -> CodecResult<Self> {
        let r = FieldReader::new(value, path, Self::NAME)?;
        Ok(Self {
            ip: r.scalar("ip")?,
            mac: r.scalar("mac")?,
            model: r.scalar("model")?,
            port: r.scalar("port")?,
            vendor: r.scalar("vendor")?,
        })
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyEvent {
    pub event_group_type: i64,
    pub event_type: i64,
    pub filter: i64,
}

impl WireRecord for NotifyEvent {
    const NAME: &'static str = "NotifyEvent";

    fn decode(value: &Value, path: &FieldPath) -> CodecResult<Self> {
        let r = FieldReader::new(value, path, Self::NAME)?;
        Ok(Self {
            event_group_type: r.scalar("eventGroupType")?,
            event_type: r.scalar("eventType")?,
            filter: r.scalar("filter")?,
        })
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct RecScheduleAppEntry {
    pub custom1_app_det: i64,
    pub custom2_app_det: i64,
}

impl WireRecord for RecScheduleAppEntry {
    const NAME: &'static str = "RecScheduleAppEntry";

    fn decode(value: &Value, path: &FieldPath) -> CodecResult<Self> {
        let r = FieldReader::new(value, path, Self::NAME)?;
        Ok(Self {
            custom1_app_det: r.scalar("custom1_app_det")?,
            custom2_app_det: r.scalar("custom2_app_det")?,
        })
    }
}
