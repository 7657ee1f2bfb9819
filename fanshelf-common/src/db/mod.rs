//! Database bootstrap and the key-value storage substrate

pub mod init;
pub mod kv;

pub use init::*;
