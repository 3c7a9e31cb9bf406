//! Frame-callback scheduling primitive.

use std::fmt;

/// Opaque token identifying one requested frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FrameHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame#{}", self.0)
    }
}

/// Requests a callback before the next display refresh, or withdraws one.
pub trait FrameScheduler {
    /// Ask for one callback. The returned handle is delivered back to the
    /// panel when the callback fires.
    fn request_frame(&mut self) -> FrameHandle;

    /// Withdraw a callback. Cancelling a handle that already fired or was
    /// never issued has no effect.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Single-slot [`FrameScheduler`].
///
/// Holds at most one outstanding callback. The host drains it with
/// [`take_due`](Self::take_due) when the display is ready for a new frame.
/// An optional waker runs on every request, e.g. to ask the window system
/// for a redraw.
#[derive(Default)]
pub struct FrameQueue {
    next_id: u64,
    pending: Option<FrameHandle>,
    waker: Option<Box<dyn FnMut()>>,
    requested: u64,
    cancelled: u64,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_waker(waker: impl FnMut() + 'static) -> Self {
        Self {
            waker: Some(Box::new(waker)),
            ..Self::default()
        }
    }

    /// Remove and return the outstanding callback, if any.
    pub fn take_due(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of `request_frame` calls so far.
    pub fn requested_count(&self) -> u64 {
        self.requested
    }

    /// Number of `cancel_frame` calls that withdrew an outstanding callback.
    pub fn cancelled_count(&self) -> u64 {
        self.cancelled
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        self.requested += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        if let Some(waker) = self.waker.as_mut() {
            waker();
        }
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
            self.cancelled += 1;
        }
    }
}

impl fmt::Debug for FrameQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameQueue")
            .field("pending", &self.pending)
            .field("requested", &self.requested)
            .field("cancelled", &self.cancelled)
            .field("has_waker", &self.waker.is_some())
            .finish()
    }
}
