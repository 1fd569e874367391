mod channel;
mod dispatch;
mod envelope;
mod queue;

pub use channel::*;
pub use dispatch::*;
pub use envelope::*;
pub use queue::*;

use std::fmt::Debug;

pub trait Message: Debug + Clone + Send + 'static {}
impl<T: Debug + Clone + Send + 'static> Message for T {}

/// The closed sum of payload types a channel carries. One protocol per
/// channel; every message type travelling on the channel is a variant.
pub trait Protocol: Message {}

/// A message type belonging to the protocol `P`. `from_protocol` is the
/// dispatch-time probe: a mismatch hands the value back untouched so the
/// next arm can test it.
pub trait Payload<P: Protocol>: Message {
  fn into_protocol(self) -> P;

  fn from_protocol(protocol: P) -> Result<Self, P>;
}
