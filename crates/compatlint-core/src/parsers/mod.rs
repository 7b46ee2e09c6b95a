//! Format parsers for the two config files
//!
//! Both parsers only report syntax problems. Shape problems are left to the
//! typed views in [`crate::schemas`].

pub mod json;
pub mod toml_file;
