// Copyright 2015 The coio Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::future::{Future, Reason, State};
use crate::options::Options;
use crate::scheduler::{Schedule, Scheduler, Task};

type RunQueue = RefCell<VecDeque<Task>>;

/// Single threaded FIFO run queue for scheduled reactions
///
/// Nothing runs until the owner calls `turn`, `run` or `run_until`.
#[derive(Clone)]
pub struct EventLoop {
    queue: Rc<RunQueue>,
    opts: Rc<Options>,
}

impl EventLoop {
    /// Create a new EventLoop with default configuration
    pub fn new() -> EventLoop {
        EventLoop::with_options(Options::new())
    }

    pub fn with_options(opts: Options) -> EventLoop {
        EventLoop {
            queue: Rc::new(RefCell::new(VecDeque::new())),
            opts: Rc::new(opts),
        }
    }

    /// Get a scheduler feeding this loop.
    ///
    /// Tasks scheduled after the loop has been dropped are discarded.
    pub fn scheduler(&self) -> Scheduler {
        Scheduler::new(Feeder {
            queue: Rc::downgrade(&self.queue),
            name: self.opts.name.clone(),
        })
    }

    /// Number of tasks waiting to run
    #[inline]
    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    /// Run the oldest task, if any. Returns `false` when the queue was empty.
    pub fn turn(&self) -> bool {
        // The queue must not stay borrowed while the task runs; it will schedule more.
        let task = self.queue.borrow_mut().pop_front();

        match task {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }

    /// Run tasks until the queue is empty or the budget is used up.
    ///
    /// Returns the number of tasks that ran.
    pub fn run(&self) -> usize {
        let mut ran = 0;

        while !self.exhausted(ran) && self.turn() {
            ran += 1;
        }

        trace!("EventLoop({}): ran {} task(s), {} left", self.name(), ran, self.len());
        ran
    }

    /// Run tasks until `future` settles and return its result.
    ///
    /// Returns `None` if the loop went idle, or ran out of budget, while
    /// `future` was still pending.
    pub fn run_until<T, E>(&self, future: &Future<T, E>) -> Option<Result<T, E>>
        where T: Clone + 'static,
              E: Reason
    {
        let mut ran = 0;

        loop {
            match future.state() {
                State::Fulfilled(value) => return Some(Ok(value)),
                State::Rejected(reason) => return Some(Err(reason)),
                State::Pending => {}
            }

            if self.exhausted(ran) || !self.turn() {
                debug!("EventLoop({}): future still pending after {} task(s)",
                       self.name(),
                       ran);
                return None;
            }
            ran += 1;
        }
    }

    fn exhausted(&self, ran: usize) -> bool {
        match self.opts.budget {
            Some(budget) if ran >= budget => {
                debug!("EventLoop({}): budget of {} task(s) exhausted", self.name(), budget);
                true
            }
            _ => false,
        }
    }

    fn name(&self) -> &str {
        self.opts.name.as_ref().map(|s| &s[..]).unwrap_or("<unnamed>")
    }
}

impl Default for EventLoop {
    fn default() -> EventLoop {
        EventLoop::new()
    }
}

impl Schedule for EventLoop {
    fn schedule(&self, task: Task) {
        self.queue.borrow_mut().push_back(task);
    }
}

impl fmt::Debug for EventLoop {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.queue.try_borrow() {
            Ok(queue) => write!(f, "EventLoop {{ name: {:?}, pending: {} }}", self.opts.name, queue.len()),
            Err(..) => write!(f, "EventLoop {{ name: {:?}, <borrowed> }}", self.opts.name),
        }
    }
}

// Handed out to futures. It only holds a weak reference, so queued tasks
// keeping futures alive never keep the loop itself alive.
struct Feeder {
    queue: Weak<RunQueue>,
    name: Option<String>,
}

impl Schedule for Feeder {
    fn schedule(&self, task: Task) {
        match self.queue.upgrade() {
            Some(queue) => queue.borrow_mut().push_back(task),
            None => {
                trace!("EventLoop({}): dropped, discarding task",
                       self.name.as_ref().map(|s| &s[..]).unwrap_or("<unnamed>"))
            }
        }
    }
}
