//! Purpose: Blocking HTTP client for the Surveillance Station Web API.
//! Exports: `StationClient`.
//! Role: Thin request/response wrapper; all payload decoding goes through `core`.
//! Invariants: One request per call, issued sequentially; no retries, no pooling policy.
//! Invariants: Authenticated calls require a session id from `login`.
//! Invariants: Vendor envelopes (`success`/`data`/`error.code`) are unwrapped here.
#![allow(clippy::result_large_err)]

use crate::core::error::{Error, ErrorKind};
use crate::core::mode_info::ModeInfo;
use crate::core::path::FieldPath;
use crate::core::reader::json_type_name;
use crate::core::records::{Camera, WireRecord};
use crate::json::parse;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{DigitallySignedStruct, Error as TlsError, SignatureScheme};
use serde::Deserialize;
use serde_json::Value;
use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

pub type ApiResult<T> = Result<T, Error>;

const ENTRY_PATH: &[&str] = &["webapi", "entry.cgi"];
const LOGIN_PATH: &[&str] = &[
    "webapi",
    "SurveillanceStation",
    "ThirdParty",
    "Auth",
    "Login",
    "v1",
];
const LOGOUT_PATH: &[&str] = &[
    "webapi",
    "SurveillanceStation",
    "ThirdParty",
    "Auth",
    "Logout",
    "v1",
];
const CAMERA_API: &str = "SYNO.SurveillanceStation.Camera";
const HOME_MODE_API: &str = "SYNO.SurveillanceStation.HomeMode";

#[derive(Clone)]
pub struct StationClient {
    base_url: Url,
    agent: ureq::Agent,
    sid: Option<String>,
}

#[derive(Debug)]
struct AcceptAllServerCertVerifier;

impl ServerCertVerifier for AcceptAllServerCertVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, TlsError> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, TlsError> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, TlsError> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        rustls::crypto::aws_lc_rs::default_provider()
            .signature_verification_algorithms
            .supported_schemes()
    }
}

#[derive(Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    error: Option<VendorError>,
}

#[derive(Deserialize)]
struct VendorError {
    code: i64,
}

#[derive(Deserialize)]
struct LoginData {
    sid: String,
}

impl StationClient {
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        let base_url = normalize_base_url(base_url.into())?;
        let agent = ureq::AgentBuilder::new().build();
        Ok(Self {
            base_url,
            agent,
            sid: None,
        })
    }

    /// Reuse a session id obtained elsewhere.
    pub fn with_session(mut self, sid: impl Into<String>) -> Self {
        self.sid = Some(sid.into());
        self
    }

    pub fn with_tls_ca_file(self, path: impl AsRef<Path>) -> ApiResult<Self> {
        let path = path.as_ref();
        let cert_bytes = std::fs::read(path).map_err(|err| {
            Error::new(ErrorKind::Usage)
                .with_message("failed to read TLS CA/certificate file")
                .with_path(path.display().to_string())
                .with_source(err)
        })?;
        let mut cert_reader = Cursor::new(cert_bytes);
        let certs = rustls_pemfile::certs(&mut cert_reader)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| {
                Error::new(ErrorKind::Usage)
                    .with_message("failed to parse TLS CA/certificate file")
                    .with_path(path.display().to_string())
                    .with_source(err)
            })?;
        if certs.is_empty() {
            return Err(Error::new(ErrorKind::Usage)
                .with_message("TLS CA/certificate file contains no certificates")
                .with_path(path.display().to_string()));
        }

        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
        let mut root_store = rustls::RootCertStore::empty();
        let (added, _) = root_store.add_parsable_certificates(certs);
        if added == 0 {
            return Err(Error::new(ErrorKind::Usage)
                .with_message("TLS CA/certificate file contains no parsable certificates")
                .with_path(path.display().to_string()));
        }

        let tls_config = rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();
        let agent = ureq::builder().tls_config(Arc::new(tls_config)).build();
        Ok(self.with_agent(agent))
    }

    /// Stations ship with self-signed certificates; this accepts any server certificate.
    pub fn with_tls_skip_verify(self) -> Self {
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
        let tls_config = rustls::ClientConfig::builder()
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(AcceptAllServerCertVerifier))
            .with_no_client_auth();
        let agent = ureq::builder().tls_config(Arc::new(tls_config)).build();
        self.with_agent(agent)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn session(&self) -> Option<&str> {
        self.sid.as_deref()
    }

    pub fn login(&mut self, account: &str, passwd: &str) -> ApiResult<()> {
        let mut url = build_url(&self.base_url, LOGIN_PATH)?;
        url.query_pairs_mut()
            .append_pair("account", account)
            .append_pair("passwd", passwd);
        let data = self.call_api(&url, "login").map_err(|err| {
            if err.kind() != ErrorKind::Api {
                return err;
            }
            let rejected = Error::new(ErrorKind::Auth).with_message("login rejected");
            match err.code() {
                Some(code) => rejected.with_code(code),
                None => rejected,
            }
        })?;
        let login: LoginData = serde_json::from_value(data).map_err(|err| {
            Error::new(ErrorKind::Internal)
                .with_message("login response has no session id")
                .with_source(err)
        })?;
        info!(account, "login successful");
        self.sid = Some(login.sid);
        Ok(())
    }

    pub fn logout(&mut self) -> ApiResult<()> {
        let sid = self.require_session()?.to_string();
        let mut url = build_url(&self.base_url, LOGOUT_PATH)?;
        url.query_pairs_mut().append_pair("_sid", &sid);
        self.call_api(&url, "logout")?;
        self.sid = None;
        Ok(())
    }

    pub fn list_cameras(&self) -> ApiResult<Vec<Camera>> {
        let url = self.entry_url(CAMERA_API, "List", "9", &[])?;
        let data = self.call_api(&url, "camera list")?;
        let path = FieldPath::root().key("data").key("cameras");
        match data.get("cameras") {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    Camera::decode(item, &path.index(index)).map_err(|err| err.with_index(index))
                })
                .collect(),
            Some(other) => Err(Error::new(ErrorKind::ShapeMismatch)
                .with_message(format!(
                    "camera list must be an array, found {}",
                    json_type_name(other)
                ))
                .with_path(path.to_string())
                .with_value(other.clone())),
        }
    }

    /// Raw image bytes of the camera's current frame.
    pub fn snapshot(&self, camera_id: i64) -> ApiResult<Vec<u8>> {
        let id = camera_id.to_string();
        let url = self.entry_url(CAMERA_API, "GetSnapshot", "9", &[("id", &id)])?;
        debug!(camera_id, "requesting snapshot");
        let response = self.send(&url)?;
        if response.content_type() == "application/json" {
            let envelope = read_envelope(response)?;
            return Err(envelope_error(&envelope, "snapshot")
                .unwrap_or_else(|| {
                    Error::new(ErrorKind::Api).with_message("snapshot returned JSON instead of an image")
                })
                .with_hint(format!("camera id {camera_id}")));
        }
        let mut out = Vec::new();
        response.into_reader().read_to_end(&mut out).map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message(format!("failed to read snapshot data for camera {camera_id}"))
                .with_source(err)
        })?;
        Ok(out)
    }

    pub fn home_mode_info(&self) -> ApiResult<ModeInfo> {
        let url = self.entry_url(HOME_MODE_API, "GetInfo", "1", &[])?;
        let data = self.call_api(&url, "home mode info")?;
        ModeInfo::from_value_at(&data, &FieldPath::root().key("data"))
    }

    pub fn switch_home_mode(&self, on: bool) -> ApiResult<()> {
        let flag = if on { "true" } else { "false" };
        let url = self.entry_url(HOME_MODE_API, "Switch", "1", &[("on", flag)])?;
        self.call_api(&url, "home mode switch")?;
        info!(on, "home mode switched");
        Ok(())
    }

    fn require_session(&self) -> ApiResult<&str> {
        self.sid.as_deref().ok_or_else(|| {
            Error::new(ErrorKind::Auth)
                .with_message("no session")
                .with_hint("Call login before authenticated requests.")
        })
    }

    fn entry_url(
        &self,
        api: &str,
        method: &str,
        version: &str,
        extra: &[(&str, &str)],
    ) -> ApiResult<Url> {
        let sid = self.require_session()?;
        let mut url = build_url(&self.base_url, ENTRY_PATH)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("api", api)
                .append_pair("method", method)
                .append_pair("version", version);
            for (key, value) in extra {
                pairs.append_pair(key, value);
            }
            pairs.append_pair("_sid", sid);
        }
        Ok(url)
    }

    fn call_api(&self, url: &Url, what: &str) -> ApiResult<Value> {
        debug!(path = url.path(), what, "station request");
        let envelope = read_envelope(self.send(url)?)?;
        if let Some(err) = envelope_error(&envelope, what) {
            return Err(err);
        }
        Ok(envelope.data)
    }

    fn send(&self, url: &Url) -> ApiResult<ureq::Response> {
        match self.agent.get(url.as_str()).call() {
            Ok(resp) => Ok(resp),
            Err(ureq::Error::Status(code, _resp)) => Err(Error::new(error_kind_from_status(code))
                .with_message(format!("station error status {code}"))),
            Err(ureq::Error::Transport(err)) => Err(Error::new(ErrorKind::Io)
                .with_message("request failed")
                .with_source(err)),
        }
    }

    fn with_agent(mut self, agent: ureq::Agent) -> Self {
        self.agent = agent;
        self
    }
}

fn read_envelope(response: ureq::Response) -> ApiResult<Envelope> {
    let body = response.into_string().map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message("failed to read response body")
            .with_source(err)
    })?;
    parse::from_slice(body.as_bytes()).map_err(|err| {
        Error::new(ErrorKind::Parse)
            .with_message("invalid response json")
            .with_hint(parse::hint_for_error(&err, "station.envelope"))
            .with_source(err)
    })
}

fn envelope_error(envelope: &Envelope, what: &str) -> Option<Error> {
    if envelope.success {
        return None;
    }
    let mut err = Error::new(ErrorKind::Api).with_message(format!("{what} failed"));
    if let Some(vendor) = &envelope.error {
        err = err.with_code(vendor.code);
    }
    Some(err)
}

fn normalize_base_url(raw: String) -> ApiResult<Url> {
    let mut url = Url::parse(&raw).map_err(|err| {
        Error::new(ErrorKind::Usage)
            .with_message("invalid station base url")
            .with_source(err)
    })?;
    let scheme = url.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(Error::new(ErrorKind::Usage)
            .with_message("station base url must use http or https scheme"));
    }
    url.set_path("/");
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

fn build_url(base_url: &Url, segments: &[&str]) -> ApiResult<Url> {
    let mut url = base_url.clone();
    {
        let mut path = url.path_segments_mut().map_err(|_| {
            Error::new(ErrorKind::Usage).with_message("station base url cannot be a base")
        })?;
        path.clear();
        for segment in segments {
            path.push(segment);
        }
    }
    Ok(url)
}

fn error_kind_from_status(status: u16) -> ErrorKind {
    match status {
        401 | 403 => ErrorKind::Auth,
        400..=499 => ErrorKind::Usage,
        500..=599 => ErrorKind::Internal,
        _ => ErrorKind::Io,
    }
}
