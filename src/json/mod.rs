//! Purpose: Internal JSON parsing boundary shared by the codec and the HTTP client.
//! Exports: `parse` module with decode helpers and failure categorization.
//! Role: Single seam for byte-to-`Value` parsing so callsites avoid ad hoc decode logic.
//! Invariants: Helper APIs stay small and deterministic (no hidden global state).

pub(crate) mod parse;
