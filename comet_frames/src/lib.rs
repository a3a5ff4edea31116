// Copyright 2025 the Comet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Comet Frames: run work a fixed number of animation frames from now.
//!
//! Layout-dependent work often has to wait for the host to finish its own
//! re-render before measuring. Instead of nesting animation-frame callbacks
//! and counting by hand, callers [`schedule`](FrameScheduler::schedule) a
//! task N frames out and call [`advance`](FrameScheduler::advance) once per
//! frame to collect whatever came due.
//!
//! - Tasks are identified by equality. Scheduling a task that is already
//!   pending replaces it and pushes its deadline out (debounce), so a burst
//!   of identical requests runs once.
//! - A rescheduled task is never deferred more than
//!   [`max_defer`](FrameScheduler::max_defer) frames past its first request,
//!   so a request stream faster than the frame rate cannot starve it.
//! - Nothing here knows about real clocks: tests drive frames explicitly.
//!
//! ## Minimal example
//!
//! ```rust
//! use comet_frames::FrameScheduler;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! enum Task {
//!     Measure,
//! }
//!
//! let mut frames = FrameScheduler::new();
//! frames.schedule(Task::Measure, 2);
//! frames.schedule(Task::Measure, 2); // coalesced with the first request
//!
//! assert!(frames.advance().is_empty());
//! assert_eq!(frames.advance().as_slice(), &[Task::Measure]);
//! assert!(frames.is_empty());
//! ```
//!
//! This crate is `no_std`.

#![no_std]

use smallvec::SmallVec;

/// Default bound on how far rescheduling can push a task past its first request.
pub const DEFAULT_MAX_DEFER: u32 = 8;

#[derive(Clone, Debug)]
struct Pending<T> {
    task: T,
    due: u64,
    latest: u64,
}

/// Frame-counted, debounced task queue.
#[derive(Clone, Debug)]
pub struct FrameScheduler<T> {
    pending: SmallVec<[Pending<T>; 4]>,
    frame: u64,
    max_defer: u32,
}

impl<T: PartialEq> Default for FrameScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> FrameScheduler<T> {
    /// Create an empty scheduler with [`DEFAULT_MAX_DEFER`].
    pub fn new() -> Self {
        Self::with_max_defer(DEFAULT_MAX_DEFER)
    }

    /// Create an empty scheduler with a custom deferral bound.
    pub fn with_max_defer(max_defer: u32) -> Self {
        Self {
            pending: SmallVec::new(),
            frame: 0,
            max_defer,
        }
    }

    /// Bound on how many frames past its first request a task may be deferred.
    pub fn max_defer(&self) -> u32 {
        self.max_defer
    }

    /// Frames advanced so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Run `task` on the `frames`-th call to [`advance`](Self::advance) from now.
    ///
    /// Zero is treated as one: nothing runs during the current frame. Returns
    /// `true` if an equal task was already pending and got replaced.
    pub fn schedule(&mut self, task: T, frames: u32) -> bool {
        let due = self.frame + u64::from(frames.max(1));
        if let Some(p) = self.pending.iter_mut().find(|p| p.task == task) {
            p.task = task;
            p.due = due.min(p.latest);
            return true;
        }
        let latest = due.max(self.frame + u64::from(self.max_defer));
        self.pending.push(Pending { task, due, latest });
        false
    }

    /// Drop a pending task. Returns `true` if it was pending.
    pub fn cancel(&mut self, task: &T) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.task != *task);
        self.pending.len() != before
    }

    /// Keep only pending tasks for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        self.pending.retain(|p| keep(&p.task));
    }

    /// Whether an equal task is pending.
    pub fn is_pending(&self, task: &T) -> bool {
        self.pending.iter().any(|p| p.task == *task)
    }

    /// Frames until `task` runs, if pending.
    pub fn frames_until(&self, task: &T) -> Option<u64> {
        self.pending
            .iter()
            .find(|p| p.task == *task)
            .map(|p| p.due - self.frame)
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Advance one frame and take every task that came due, in request order.
    pub fn advance(&mut self) -> SmallVec<[T; 4]> {
        self.frame += 1;
        let now = self.frame;
        let mut due = SmallVec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].due <= now {
                due.push(self.pending.remove(i).task);
            } else {
                i += 1;
            }
        }
        due
    }

    /// Drop every pending task.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    enum Task {
        A,
        B(u32),
    }

    #[test]
    fn fires_on_nth_frame() {
        let mut s = FrameScheduler::new();
        s.schedule(Task::A, 3);
        assert!(s.advance().is_empty());
        assert!(s.advance().is_empty());
        assert_eq!(s.advance().as_slice(), &[Task::A]);
        assert!(s.advance().is_empty());
    }

    #[test]
    fn zero_delay_runs_next_frame() {
        let mut s = FrameScheduler::new();
        s.schedule(Task::A, 0);
        assert_eq!(s.frames_until(&Task::A), Some(1));
        assert_eq!(s.advance().as_slice(), &[Task::A]);
    }

    #[test]
    fn reschedule_postpones_and_coalesces() {
        let mut s = FrameScheduler::new();
        assert!(!s.schedule(Task::A, 2));
        s.advance();
        assert!(s.schedule(Task::A, 2));
        assert_eq!(s.len(), 1);
        assert!(s.advance().is_empty());
        assert_eq!(s.advance().as_slice(), &[Task::A]);
    }

    #[test]
    fn storm_cannot_starve_a_task() {
        let mut s = FrameScheduler::with_max_defer(4);
        s.schedule(Task::A, 2);
        let mut fired_at = None;
        for frame in 1..=10 {
            // A new request arrives every frame.
            s.schedule(Task::A, 2);
            if !s.advance().is_empty() {
                fired_at = Some(frame);
                break;
            }
        }
        assert_eq!(fired_at, Some(4), "bounded by max_defer");
    }

    #[test]
    fn distinct_tasks_are_independent() {
        let mut s = FrameScheduler::new();
        s.schedule(Task::B(1), 2);
        s.schedule(Task::B(2), 1);
        s.schedule(Task::A, 2);
        assert_eq!(s.advance().as_slice(), &[Task::B(2)]);
        assert_eq!(s.advance().as_slice(), &[Task::B(1), Task::A]);
    }

    #[test]
    fn cancel_and_retain() {
        let mut s = FrameScheduler::new();
        s.schedule(Task::A, 1);
        s.schedule(Task::B(1), 1);
        s.schedule(Task::B(2), 1);

        assert!(s.cancel(&Task::A));
        assert!(!s.cancel(&Task::A));
        s.retain(|t| *t != Task::B(1));

        assert!(s.is_pending(&Task::B(2)));
        assert_eq!(s.advance().as_slice(), &[Task::B(2)]);
        assert!(s.is_empty());
    }
}
