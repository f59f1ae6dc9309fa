//! Purpose: Library crate behind the `synocam` CLI.
//! Exports: `core` (records, sentinel-coded lists, home-mode codec, errors) and `api` (HTTP client).
//! Role: Pure codec in `core`; thin blocking Surveillance Station client in `api`.
//! Invariants: Codec functions are synchronous and hold no shared state.
//! Invariants: Decoding never coerces an unknown sentinel into an empty list.
pub mod api;
pub mod core;
mod json;
