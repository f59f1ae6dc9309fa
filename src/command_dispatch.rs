//! Purpose: Hold top-level CLI command dispatch for `synocam`.
//! Exports: `dispatch_command`.
//! Role: Keep `main.rs` focused on parse/bootstrap and delegate command execution.
//! Invariants: Remote commands log in once, issue their requests in order, and never retry.

use super::*;
use synocam::api::first_difference;
use tracing::info;

pub(super) fn dispatch_command(
    command: Command,
    station: &StationArgs,
    pretty: bool,
) -> Result<RunOutcome, Error> {
    match command {
        Command::Decode { input } => {
            let bytes = read_input(input.as_deref())?;
            let info = ModeInfo::decode(&bytes)?;
            emit_json(mode_info_summary(&info), pretty);
            Ok(RunOutcome::ok())
        }
        Command::Roundtrip { input } => {
            let bytes = read_input(input.as_deref())?;
            let (original, info) = ModeInfo::decode_with_input(&bytes)?;
            let encoded = info.to_value()?;
            if let Some(path) = first_difference(&original, &encoded) {
                return Err(Error::new(ErrorKind::Internal)
                    .with_message("re-encoded document differs from input")
                    .with_path(path.to_string())
                    .with_hint(
                        "Empty arrays re-encode as the key's sentinel; other differences are codec bugs.",
                    ));
            }
            emit_json(encoded, pretty);
            Ok(RunOutcome::ok())
        }
        Command::Cameras => {
            let client = connect(station)?;
            let cameras = client.list_cameras()?;
            info!(count = cameras.len(), "cameras listed");
            for camera in &cameras {
                emit_json(
                    json!({
                        "id": camera.id,
                        "newName": camera.new_name,
                        "ip": camera.ip,
                        "model": camera.model,
                        "vendor": camera.vendor,
                        "status": camera.status,
                    }),
                    pretty,
                );
            }
            Ok(RunOutcome::ok())
        }
        Command::Snapshot { camera, out } => {
            let client = connect(station)?;
            let bytes = client.snapshot(camera)?;
            let path = out.unwrap_or_else(|| default_snapshot_path(camera));
            std::fs::write(&path, &bytes).map_err(|err| {
                Error::new(ErrorKind::Io)
                    .with_message("failed to write snapshot")
                    .with_path(path.display().to_string())
                    .with_source(err)
            })?;
            emit_json(
                json!({
                    "camera": camera,
                    "path": path.display().to_string(),
                    "bytes": bytes.len(),
                }),
                pretty,
            );
            Ok(RunOutcome::ok())
        }
        Command::HomeMode { on, off } => {
            let client = connect(station)?;
            if on || off {
                client.switch_home_mode(on)?;
            }
            let info = client.home_mode_info()?;
            emit_json(info.to_value()?, pretty);
            Ok(RunOutcome::ok())
        }
    }
}
