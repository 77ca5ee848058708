// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zero-delay task queue.
//!
//! Tasks scheduled during a dispatch run only after that dispatch returns, in FIFO order.
//! Only relative order matters; there is no clock.

use alloc::collections::VecDeque;

/// FIFO queue of deferred tasks.
#[derive(Clone, Debug)]
pub struct TaskQueue<T> {
    tasks: VecDeque<T>,
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self {
            tasks: VecDeque::new(),
        }
    }
}

impl<T> TaskQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `task` to run after everything already queued.
    pub fn schedule(&mut self, task: T) {
        self.tasks.push_back(task);
    }

    /// Take the next task due.
    pub fn pop(&mut self) -> Option<T> {
        self.tasks.pop_front()
    }

    /// Number of queued tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// True if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
