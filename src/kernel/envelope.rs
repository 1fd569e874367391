use crate::kernel::{Payload, Protocol};

/// Carrier for one message travelling through a channel queue. The close
/// sentinel lives outside the protocol sum so every dispatch observes it
/// no matter which payload types the chain registered.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<P: Protocol> {
  Payload(P),
  Close,
}

impl<P: Protocol> Envelope<P> {
  pub fn of_payload<M: Payload<P>>(msg: M) -> Self {
    Envelope::Payload(msg.into_protocol())
  }

  pub fn of_close() -> Self {
    Envelope::Close
  }

  pub fn is_close(&self) -> bool {
    matches!(self, Envelope::Close)
  }

  pub fn into_payload(self) -> Option<P> {
    match self {
      Envelope::Payload(protocol) => Some(protocol),
      Envelope::Close => None,
    }
  }
}
