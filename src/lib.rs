use thiserror::Error;

pub mod backend;
pub mod frontend;
pub mod kernel;
pub mod protocol;

/// Raised when a dispatch pops the close sentinel. It is the single
/// abnormal-exit condition of the channel layer and is meant to be
/// propagated with `?` up to the owning actor's outermost loop.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("channel received the close sentinel")]
pub struct ChannelClosed;
