//! Purpose: `synocam` CLI entry point.
//! Role: Binary crate root; parses args, runs commands, emits JSON on stdout.
//! Invariants: Commands emit one JSON value (or JSON lines) on stdout.
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
#![allow(clippy::result_large_err)]
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Args, Parser, Subcommand, error::ErrorKind as ClapErrorKind};
use serde_json::{Map, Value, json};
use std::error::Error as StdError;
use tracing_subscriber::EnvFilter;

mod command_dispatch;

use synocam::api::{Error, ErrorKind, ModeInfo, StationClient, to_exit_code};

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }
}

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, Error> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    Error::new(ErrorKind::Io)
                        .with_message("failed to write help")
                        .with_source(io_err)
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome { exit_code });
            }
            _ => {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message(clap_error_summary(&err))
                    .with_hint("Try `synocam --help`."));
            }
        },
    };

    command_dispatch::dispatch_command(cli.command, &cli.station, cli.pretty)
}

#[derive(Parser)]
#[command(
    name = "synocam",
    version,
    about = "Decode, re-encode, and fetch Surveillance Station camera and home-mode data",
    after_help = r#"EXAMPLES
  $ synocam decode home_mode.json
  $ synocam roundtrip < home_mode.json
  $ SYNOCAM_URL=https://nas.local:5001 synocam --insecure cameras
  $ synocam --url https://nas.local:5001 snapshot --camera 61 --out front.jpg"#,
    arg_required_else_help = true
)]
struct Cli {
    #[command(flatten)]
    station: StationArgs,
    #[arg(long, global = true, help = "Pretty-print JSON output")]
    pretty: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Clone, Debug, Default)]
struct StationArgs {
    #[arg(long, global = true, env = "SYNOCAM_URL", help = "Station base URL (http or https)")]
    url: Option<String>,
    #[arg(long, global = true, env = "SYNOCAM_ACCOUNT", help = "Account name for login")]
    account: Option<String>,
    #[arg(
        long,
        global = true,
        env = "SYNOCAM_PASSWORD",
        hide_env_values = true,
        help = "Password for login"
    )]
    password: Option<String>,
    #[arg(long, global = true, help = "Accept any TLS certificate (self-signed stations)")]
    insecure: bool,
    #[arg(long, global = true, help = "PEM file with the CA that signed the station certificate")]
    ca_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Decode a home-mode document and print a summary")]
    Decode {
        #[arg(help = "Input file (default: stdin)")]
        input: Option<PathBuf>,
    },
    #[command(about = "Decode then re-encode a home-mode document and verify equivalence")]
    Roundtrip {
        #[arg(help = "Input file (default: stdin)")]
        input: Option<PathBuf>,
    },
    #[command(about = "Log in and list cameras as JSON lines")]
    Cameras,
    #[command(about = "Log in and save a camera snapshot")]
    Snapshot {
        #[arg(long, help = "Camera id")]
        camera: i64,
        #[arg(long, help = "Output file (default: camera-<id>-<time>.jpg)")]
        out: Option<PathBuf>,
    },
    #[command(about = "Log in, optionally switch home mode, and print its settings")]
    HomeMode {
        #[arg(long, conflicts_with = "off", help = "Switch home mode on first")]
        on: bool,
        #[arg(long, help = "Switch home mode off first")]
        off: bool,
    },
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn clap_error_summary(err: &clap::Error) -> String {
    let rendered = err.to_string();
    rendered
        .lines()
        .find(|line| !line.trim().is_empty())
        .map(|line| line.trim_start_matches("error: ").trim().to_string())
        .unwrap_or_else(|| "invalid arguments".to_string())
}

fn read_input(input: Option<&Path>) -> Result<Vec<u8>, Error> {
    match input {
        Some(path) => std::fs::read(path).map_err(|err| {
            let kind = match err.kind() {
                io::ErrorKind::NotFound => ErrorKind::Usage,
                _ => ErrorKind::Io,
            };
            Error::new(kind)
                .with_message("failed to read input file")
                .with_path(path.display().to_string())
                .with_source(err)
        }),
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf).map_err(|err| {
                Error::new(ErrorKind::Io)
                    .with_message("failed to read stdin")
                    .with_source(err)
            })?;
            Ok(buf)
        }
    }
}

fn connect(station: &StationArgs) -> Result<StationClient, Error> {
    let url = station.url.as_deref().ok_or_else(|| {
        Error::new(ErrorKind::Usage)
            .with_message("station url is required")
            .with_hint("Pass --url or set SYNOCAM_URL.")
    })?;
    let account = station.account.as_deref().ok_or_else(|| {
        Error::new(ErrorKind::Usage)
            .with_message("account is required")
            .with_hint("Pass --account or set SYNOCAM_ACCOUNT.")
    })?;
    let password = station.password.as_deref().unwrap_or_default();

    let mut client = StationClient::new(url)?;
    if let Some(ca_file) = &station.ca_file {
        client = client.with_tls_ca_file(ca_file)?;
    } else if station.insecure {
        client = client.with_tls_skip_verify();
    }
    client.login(account, password)?;
    Ok(client)
}

fn mode_info_summary(info: &ModeInfo) -> Value {
    json!({
        "on": info.on,
        "cameras": info.cameras.len(),
        "action_rules": info.action_rules.len(),
        "io_modules": info.io_modules.len(),
        "notify_events": info.notify_events.len(),
        "rec_schedule_apps": info.rec_schedule_apps.len(),
        "mode_schedule_on": info.mode_schedule_on,
        "rec_schedule_on": info.rec_schedule_on,
        "last_update_time": info.last_update_time,
    })
}

fn default_snapshot_path(camera_id: i64) -> PathBuf {
    let stamp = time_now_label().unwrap_or_else(|| "now".to_string());
    PathBuf::from(format!("camera-{camera_id}-{stamp}.jpg"))
}

fn time_now_label() -> Option<String> {
    use time::format_description::well_known::Rfc3339;
    let duration = SystemTime::now().duration_since(UNIX_EPOCH).ok()?;
    let ts = time::OffsetDateTime::from_unix_timestamp(duration.as_secs() as i64).ok()?;
    // Colons are not portable in file names.
    ts.format(&Rfc3339).ok().map(|text| text.replace(':', ""))
}

fn emit_json(value: Value, pretty: bool) {
    let json = if pretty {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    }
    .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string());
    println!("{json}");
}

fn emit_error(err: &Error) {
    if io::stderr().is_terminal() {
        eprintln!("{}", error_text(err));
        return;
    }

    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::Parse => "invalid JSON".to_string(),
        ErrorKind::ShapeMismatch => "unexpected JSON shape".to_string(),
        ErrorKind::UnexpectedSentinelValue => "unexpected sentinel value".to_string(),
        ErrorKind::Auth => "authentication failed".to_string(),
        ErrorKind::Api => "station reported an error".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(path) = err.path() {
        inner.insert("path".to_string(), json!(path));
    }
    if let Some(index) = err.index() {
        inner.insert("index".to_string(), json!(index));
    }
    if let Some(value) = err.value() {
        inner.insert("value".to_string(), value.clone());
    }
    if let Some(code) = err.code() {
        inner.insert("code".to_string(), json!(code));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_text(err: &Error) -> String {
    let mut lines = vec![format!("error: {}", error_message(err))];
    if let Some(hint) = err.hint() {
        lines.push(format!("hint: {hint}"));
    }
    if let Some(path) = err.path() {
        lines.push(format!("path: {path}"));
    }
    if let Some(value) = err.value() {
        lines.push(format!("value: {value}"));
    }
    if let Some(code) = err.code() {
        lines.push(format!("code: {code}"));
    }
    for cause in error_causes(err) {
        lines.push(format!("caused by: {cause}"));
    }
    lines.join("\n")
}
