// Pure codec modules: records, sentinel-coded lists, the home-mode aggregate, errors.
pub mod error;
pub mod json_eq;
pub mod mode_info;
pub mod path;
pub mod reader;
pub mod records;
pub mod sentinel;

pub type CodecResult<T> = Result<T, error::Error>;
