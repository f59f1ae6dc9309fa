//! Purpose: Public surface of the HTTP collaborator and the codec types it returns.
//! Exports: `StationClient`, codec records, `ModeInfo`, error types.
//! Role: One import path for the CLI and external callers.
//! Invariants: Transport concerns stay in `client`; payload shape stays in `core`.

mod client;

pub use crate::core::error::{Error, ErrorKind, to_exit_code};
pub use crate::core::json_eq::{first_difference, json_equivalent};
pub use crate::core::mode_info::ModeInfo;
pub use crate::core::records::{
    ActionItem, ActionRule, Camera, IoModule, NotifyEvent, RecScheduleAppEntry, Stream,
    WireRecord,
};
pub use client::{ApiResult, StationClient};
