use log::debug;

use crate::kernel::{BlockingQueue, Dispatch, DispatchMode, Envelope, Payload, Protocol};

/// Producing end of a channel. Cloning yields another handle over the same
/// queue. A detached sender (not yet wired to a receiver) swallows sends
/// silently; this supports bootstrap orderings where an actor's outgoing
/// channel is attached after construction.
#[derive(Debug, Clone)]
pub struct Sender<P: Protocol> {
  queue: Option<BlockingQueue<Envelope<P>>>,
}

impl<P: Protocol> Sender<P> {
  pub(crate) fn new(queue: BlockingQueue<Envelope<P>>) -> Self {
    Self { queue: Some(queue) }
  }

  pub fn detached() -> Self {
    Self { queue: None }
  }

  pub fn is_attached(&self) -> bool {
    self.queue.is_some()
  }

  pub fn send<M: Payload<P>>(&self, msg: M) {
    match &self.queue {
      Some(queue) => queue.push(Envelope::of_payload(msg)),
      None => debug!("dropping message sent on a detached sender: {:?}", msg),
    }
  }

  /// Enqueues the close sentinel. The channel's blocking consumer will
  /// observe it after draining everything queued ahead of it.
  pub fn close(&self) {
    match &self.queue {
      Some(queue) => queue.push(Envelope::of_close()),
      None => debug!("dropping close sent on a detached sender"),
    }
  }
}

impl<P: Protocol> Default for Sender<P> {
  fn default() -> Self {
    Self::detached()
  }
}

/// Consuming end of a channel. Construction creates the queue; `sender`
/// mints producer handles sharing it. There is deliberately no raw
/// receive operation: `dispatch` is the only way to consume, so every
/// consumption site declares the message types it is prepared to handle.
#[derive(Debug)]
pub struct Receiver<P: Protocol> {
  queue: BlockingQueue<Envelope<P>>,
}

impl<P: Protocol> Receiver<P> {
  pub fn new() -> Self {
    Self {
      queue: BlockingQueue::new(),
    }
  }

  pub fn sender(&self) -> Sender<P> {
    Sender::new(self.queue.clone())
  }

  pub fn dispatch<R>(&self, mode: DispatchMode) -> Dispatch<'_, P, R> {
    Dispatch::new(&self.queue, mode)
  }

  pub fn len(&self) -> usize {
    self.queue.len()
  }

  pub fn is_empty(&self) -> bool {
    self.queue.is_empty()
  }
}

impl<P: Protocol> Default for Receiver<P> {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::protocol::{Fault, Login, Request};

  #[test]
  fn test_detached_sender_send_and_close_are_no_ops() {
    let sender = Sender::<Request>::detached();
    assert!(!sender.is_attached());
    for _ in 0..10 {
      sender.send(Login);
      sender.send(Fault {
        message: "ignored".to_string(),
      });
    }
    sender.close();
  }

  #[test]
  fn test_detached_sender_does_not_affect_other_channels() {
    let receiver = Receiver::<Request>::new();
    let attached = receiver.sender();
    let detached = Sender::<Request>::detached();
    detached.send(Login);
    detached.close();
    attached.send(Login);
    assert_eq!(receiver.len(), 1);
  }

  #[test]
  fn test_receiver_mints_senders_over_one_queue() {
    let receiver = Receiver::<Request>::new();
    let first = receiver.sender();
    let second = receiver.sender();
    assert!(first.is_attached());
    first.send(Login);
    second.send(Login);
    second.clone().send(Login);
    assert_eq!(receiver.len(), 3);
  }
}
