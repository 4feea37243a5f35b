//! Per-frame coalescing of pending work.
//!
//! A [`FrameScheduler`] holds at most one pending value. Scheduling while a
//! value is pending replaces it (leading edge cancelled); the frame tick takes
//! whatever is pending and fires it exactly once (trailing edge fires). N
//! schedules between two frames therefore produce one firing.

/// Coalesces scheduled values until the next frame.
#[derive(Debug)]
pub struct FrameScheduler<T> {
    pending: Option<T>,
    scheduled: u64,
    superseded: u64,
    fired: u64,
}

impl<T> Default for FrameScheduler<T> {
    fn default() -> Self {
        Self {
            pending: None,
            scheduled: 0,
            superseded: 0,
            fired: 0,
        }
    }
}

impl<T> FrameScheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `value` the pending work for the next frame. Returns `true` when
    /// an earlier pending value was dropped in its favour.
    pub fn schedule(
        &mut self,
        value: T,
    ) -> bool {
        self.scheduled += 1;
        let replaced = self.pending.replace(value).is_some();
        if replaced {
            self.superseded += 1;
        }
        replaced
    }

    /// Frame tick: takes the pending value, if any, and counts it as fired.
    pub fn on_frame(&mut self) -> Option<T> {
        let value = self.pending.take()?;
        self.fired += 1;
        Some(value)
    }

    /// Drops the pending value without firing it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn scheduled(&self) -> u64 {
        self.scheduled
    }

    pub fn superseded(&self) -> u64 {
        self.superseded
    }

    pub fn fired(&self) -> u64 {
        self.fired
    }
}
