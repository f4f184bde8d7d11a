// ldportal/src/transport/mock.rs
//! In-memory transport for tests.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::Duration;

use crate::protocol::{Frame, Message, Source};
use crate::transport::traits::Transport;
use crate::{Error, Result};

/// Device-side handler: gets every command the host writes and returns the
/// frames the portal would answer with.
pub type Responder = Box<dyn FnMut(&Message) -> Vec<Frame> + Send>;

#[derive(Default)]
struct MockState {
    incoming: VecDeque<Frame>,
    sent: Vec<Frame>,
    responder: Option<Responder>,
    /// Testing hook: number of writes that should fail with TransportTimeout
    write_failures: usize,
    closed: bool,
}

/// Mock transport for tests. Cheap to clone; clones share the same state so
/// a test can keep a handle after giving one to a `Portal`.
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<(Mutex<MockState>, Condvar)>,
}

impl MockTransport {
    /// Mock with nothing queued and no responder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock that answers writes through `responder`.
    pub fn with_responder<F>(responder: F) -> Self
    where
        F: FnMut(&Message) -> Vec<Frame> + Send + 'static,
    {
        let mock = Self::new();
        mock.set_responder(responder);
        mock
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        // A test that panicked while holding the lock already failed
        self.inner.0.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Replace the responder.
    pub fn set_responder<F>(&self, responder: F)
    where
        F: FnMut(&Message) -> Vec<Frame> + Send + 'static,
    {
        self.state().responder = Some(Box::new(responder));
    }

    /// Stop answering writes.
    pub fn clear_responder(&self) {
        self.state().responder = None;
    }

    /// Queue a frame as if the portal had sent it.
    pub fn push_frame(&self, frame: Frame) {
        self.state().incoming.push_back(frame);
        self.inner.1.notify_all();
    }

    /// Set how many subsequent writes should fail (for tests).
    pub fn set_write_failures(&self, n: usize) {
        self.state().write_failures = n;
    }

    /// Every frame written so far, oldest first.
    pub fn sent(&self) -> Vec<Frame> {
        self.state().sent.clone()
    }

    /// Written frames decoded as host commands.
    pub fn sent_messages(&self) -> Vec<Message> {
        self.sent()
            .iter()
            .filter_map(|f| f.decode(Source::Host).ok())
            .collect()
    }

    /// Frames queued but not read yet.
    pub fn pending_incoming(&self) -> usize {
        self.state().incoming.len()
    }

    /// `true` after `close`.
    pub fn is_closed(&self) -> bool {
        self.state().closed
    }
}

impl fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.state();
        f.debug_struct("MockTransport")
            .field("incoming", &s.incoming.len())
            .field("sent", &s.sent.len())
            .field("closed", &s.closed)
            .finish()
    }
}

impl Transport for MockTransport {
    fn write_frame(&self, frame: &Frame) -> Result<()> {
        let mut s = self.state();
        if s.closed {
            return Err(Error::TransportIo("mock transport closed".into()));
        }
        if s.write_failures > 0 {
            s.write_failures -= 1;
            return Err(Error::TransportTimeout);
        }
        s.sent.push(*frame);

        let replies = match (s.responder.as_mut(), frame.decode(Source::Host)) {
            (Some(responder), Ok(msg)) => responder(&msg),
            _ => Vec::new(),
        };
        if !replies.is_empty() {
            s.incoming.extend(replies);
            self.inner.1.notify_all();
        }
        Ok(())
    }

    fn read_frame(&self, timeout: Duration) -> Result<Option<Frame>> {
        let guard = self.state();
        let (mut s, _) = self
            .inner
            .1
            .wait_timeout_while(guard, timeout, |s| s.incoming.is_empty() && !s.closed)
            .unwrap_or_else(|p| p.into_inner());
        if s.closed {
            return Ok(None);
        }
        Ok(s.incoming.pop_front())
    }

    fn close(&self) -> Result<()> {
        self.state().closed = true;
        self.inner.1.notify_all();
        Ok(())
    }
}
