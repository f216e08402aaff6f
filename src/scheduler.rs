// Copyright 2015 The coio Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Deferred task scheduling
//!
//! Reactions are never run inline. Every one of them is handed to a
//! `Schedule` implementation, which must run tasks later, one at a time and
//! in the order they were scheduled.

use std::fmt;
use std::rc::Rc;

/// A unit of deferred work
pub type Task = Box<dyn FnOnce()>;

/// "Run this later" service.
///
/// Implementations must not run `task` before `schedule` returns and must
/// preserve FIFO order between tasks.
pub trait Schedule {
    fn schedule(&self, task: Task);
}

impl<F> Schedule for F
    where F: Fn(Task)
{
    fn schedule(&self, task: Task) {
        self(task)
    }
}

/// Shared handle onto a `Schedule` implementation.
///
/// Every future carries one and hands it to the futures chained from it.
#[derive(Clone)]
pub struct Scheduler(Rc<dyn Schedule>);

impl Scheduler {
    pub fn new<S>(schedule: S) -> Scheduler
        where S: Schedule + 'static
    {
        Scheduler(Rc::new(schedule))
    }

    /// Defer `f` until the scheduler gets around to it
    #[inline]
    pub fn schedule<F>(&self, f: F)
        where F: FnOnce() + 'static
    {
        self.0.schedule(Box::new(f))
    }

    /// Whether both handles point at the same scheduler
    #[inline]
    pub fn same(&self, other: &Scheduler) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Schedule for Scheduler {
    fn schedule(&self, task: Task) {
        self.0.schedule(task)
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Scheduler {{ .. }}")
    }
}
