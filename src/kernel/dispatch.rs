use log::debug;

use crate::kernel::{BlockingQueue, Envelope, Payload, Protocol};
use crate::ChannelClosed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
  Blocking,
  NonBlocking,
}

type Arm<'a, P, R> = Box<dyn FnMut(P) -> Result<R, P> + 'a>;

/// One pop-and-route operation, declared as a chain of typed arms and fired
/// exactly once by `execute`. Arms are tested in reverse registration order,
/// most recently appended first. The builder is consumed by value, so no arm
/// can be appended once the chain has fired.
///
/// Blocking mode keeps popping, discarding unmatched payloads, until an arm
/// matches or the close sentinel is observed. Non-blocking mode pops at most
/// one envelope; an unmatched payload is dropped, not retried later.
pub struct Dispatch<'a, P: Protocol, R = ()> {
  queue: &'a BlockingQueue<Envelope<P>>,
  mode: DispatchMode,
  arms: Vec<Arm<'a, P, R>>,
}

impl<'a, P: Protocol, R> Dispatch<'a, P, R> {
  pub(crate) fn new(queue: &'a BlockingQueue<Envelope<P>>, mode: DispatchMode) -> Self {
    Self {
      queue,
      mode,
      arms: Vec::new(),
    }
  }

  pub fn on<M, F>(mut self, handler: F) -> Self
  where
    M: Payload<P>,
    F: FnOnce(M) -> R + 'a,
  {
    let mut handler = Some(handler);
    self
      .arms
      .push(Box::new(move |protocol| match M::from_protocol(protocol) {
        Ok(msg) => {
          // execute returns after the first match, so the slot is always live
          let handler = handler.take().expect("arm fired twice");
          Ok(handler(msg))
        }
        Err(protocol) => Err(protocol),
      }));
    self
  }

  pub fn execute(mut self) -> Result<Option<R>, ChannelClosed> {
    let queue = self.queue;
    match self.mode {
      DispatchMode::Blocking => loop {
        let envelope = queue.wait_and_pop();
        if let Some(routed) = self.route(envelope)? {
          return Ok(Some(routed));
        }
      },
      DispatchMode::NonBlocking => match queue.try_pop() {
        Some(envelope) => self.route(envelope),
        None => Ok(None),
      },
    }
  }

  fn route(&mut self, envelope: Envelope<P>) -> Result<Option<R>, ChannelClosed> {
    let mut protocol = match envelope {
      Envelope::Close => return Err(ChannelClosed),
      Envelope::Payload(protocol) => protocol,
    };
    for arm in self.arms.iter_mut().rev() {
      match arm(protocol) {
        Ok(routed) => return Ok(Some(routed)),
        Err(unmatched) => protocol = unmatched,
      }
    }
    debug!("discarding unmatched message: {:?}", protocol);
    Ok(None)
  }
}
