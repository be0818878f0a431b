//! Query AST decoding
//!
//! This module turns the JSON produced by a policy compiler's partial
//! evaluation API into the typed AST.

pub mod decode;

pub use decode::{parse_str, DecodeOptions, Decoder, DEFAULT_MAX_DEPTH};
