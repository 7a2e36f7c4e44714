//! CLI command implementations

pub(crate) mod apply;
pub(crate) mod new;
pub(crate) mod status;
