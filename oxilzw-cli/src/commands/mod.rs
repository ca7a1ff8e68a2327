//! Command implementations for OxiLZW CLI.

pub mod decode;
pub mod encode;
pub mod info;

pub use decode::cmd_decode;
pub use encode::{EncodeOptions, cmd_encode};
pub use info::cmd_info;
pub use test::cmd_test;
