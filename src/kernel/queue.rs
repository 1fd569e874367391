use std::collections::VecDeque;
use std::fmt::Debug;
use std::sync::{Arc, Condvar, Mutex};

pub trait Element: Debug + Send + 'static {}
impl<T: Debug + Send + 'static> Element for T {}

/// Unbounded FIFO shared between one consumer and any number of producers.
/// Cloning shares the underlying queue. A poisoned lock is a programming
/// error, not a recoverable condition.
#[derive(Debug)]
pub struct BlockingQueue<E: Element> {
  inner: Arc<BlockingQueueInner<E>>,
}

#[derive(Debug)]
struct BlockingQueueInner<E: Element> {
  values: Mutex<VecDeque<E>>,
  available: Condvar,
}

impl<E: Element> Clone for BlockingQueue<E> {
  fn clone(&self) -> Self {
    Self {
      inner: Arc::clone(&self.inner),
    }
  }
}

impl<E: Element> BlockingQueue<E> {
  pub fn new() -> Self {
    Self {
      inner: Arc::new(BlockingQueueInner {
        values: Mutex::new(VecDeque::new()),
        available: Condvar::new(),
      }),
    }
  }

  pub fn push(&self, value: E) {
    let mut values = self.inner.values.lock().unwrap();
    values.push_back(value);
    self.inner.available.notify_one();
  }

  pub fn try_pop(&self) -> Option<E> {
    let mut values = self.inner.values.lock().unwrap();
    values.pop_front()
  }

  /// Parks the calling thread until an element is available. Emptiness is
  /// re-checked under the lock after every wake-up, so spurious wake-ups
  /// and elements stolen by a racing pop are handled.
  pub fn wait_and_pop(&self) -> E {
    let mut values = self.inner.values.lock().unwrap();
    loop {
      match values.pop_front() {
        Some(value) => return value,
        None => values = self.inner.available.wait(values).unwrap(),
      }
    }
  }

  pub fn len(&self) -> usize {
    let values = self.inner.values.lock().unwrap();
    values.len()
  }

  pub fn is_empty(&self) -> bool {
    let values = self.inner.values.lock().unwrap();
    values.is_empty()
  }
}

impl<E: Element> Default for BlockingQueue<E> {
  fn default() -> Self {
    Self::new()
  }
}
