//! CLI command implementations

pub(crate) mod common;
pub(crate) mod init;
pub(crate) mod lifecycle;
pub(crate) mod migrate;
pub(crate) mod status;
pub(crate) mod validate;
