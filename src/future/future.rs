// Copyright 2015 The coio Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;
use std::rc::Rc;

use crate::scheduler::Scheduler;
use super::{Outcome, Reason, Reject, Resolution, Resolve, State};
use super::resolution;
use super::state::Core;

/// The eventual result of an asynchronous operation.
///
/// Handles are cheap to clone and all clones observe the same settlement.
pub struct Future<T, E> {
    core: Rc<Core<T, E>>,
}

impl<T, E> Future<T, E>
    where T: Clone + 'static,
          E: Reason
{
    /// Create a future and run `executor` right away.
    ///
    /// `executor` receives the capabilities to settle the future. If it fails
    /// the future is rejected with its error, unless it was resolved already.
    pub fn new<F>(scheduler: &Scheduler, executor: F) -> Future<T, E>
        where F: FnOnce(Resolve<T, E>, Reject<T, E>) -> Result<(), E>
    {
        let core = Core::new(scheduler.clone());

        if let Err(reason) = executor(Resolve::with_core(core.clone()),
                                      Reject::with_core(core.clone())) {
            trace!("Future: executor failed");
            if core.claim() {
                core.settle(Err(reason));
            }
        }

        Future::with_core(core)
    }

    pub(crate) fn with_core(core: Rc<Core<T, E>>) -> Future<T, E> {
        Future { core: core }
    }

    pub fn with_value(scheduler: &Scheduler, result: Result<T, E>) -> Future<T, E> {
        let core = Core::new(scheduler.clone());
        core.settle(result);
        Future::with_core(core)
    }

    pub fn resolved(scheduler: &Scheduler, val: T) -> Future<T, E> {
        Self::with_value(scheduler, Ok(val))
    }

    pub fn rejected(scheduler: &Scheduler, reason: E) -> Future<T, E> {
        Self::with_value(scheduler, Err(reason))
    }

    #[inline]
    pub(crate) fn core(&self) -> &Rc<Core<T, E>> {
        &self.core
    }

    /// The scheduler this future and everything chained from it runs on
    #[inline]
    pub fn scheduler(&self) -> &Scheduler {
        self.core.scheduler()
    }

    /// Snapshot of the current state
    pub fn state(&self) -> State<T, E> {
        self.core.state()
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.core.is_pending()
    }

    #[inline]
    pub fn is_settled(&self) -> bool {
        !self.is_pending()
    }

    /// Whether both handles refer to the same future
    #[inline]
    pub fn ptr_eq(&self, other: &Future<T, E>) -> bool {
        Rc::ptr_eq(&self.core, &other.core)
    }

    /// Chain a pair of reactions and return the future depending on them.
    ///
    /// Exactly one of the reactions runs, on a later scheduler task, never
    /// inside this call. Its outcome settles the returned future: `Ok` goes
    /// through resolution, so futures and thenables are adopted, while `Err`
    /// rejects it.
    pub fn then<U, F, R>(&self, on_fulfilled: F, on_rejected: R) -> Future<U, E>
        where U: Clone + 'static,
              F: FnOnce(T) -> Outcome<U, E> + 'static,
              R: FnOnce(E) -> Outcome<U, E> + 'static
    {
        let dependent = Core::new(self.scheduler().clone());

        let (fulfilled, rejected) = (dependent.clone(), dependent.clone());
        self.core.react(Box::new(move |value: T| settle_with(&fulfilled, on_fulfilled(value))),
                        Box::new(move |reason: E| settle_with(&rejected, on_rejected(reason))));

        Future::with_core(dependent)
    }

    /// `then` with only a fulfillment reaction; rejections pass through
    pub fn and_then<U, F>(&self, on_fulfilled: F) -> Future<U, E>
        where U: Clone + 'static,
              F: FnOnce(T) -> Outcome<U, E> + 'static
    {
        self.then(on_fulfilled, |reason| Err(reason))
    }

    /// `then` with only a rejection reaction; values pass through
    pub fn catch<R>(&self, on_rejected: R) -> Future<T, E>
        where R: FnOnce(E) -> Outcome<T, E> + 'static
    {
        self.then(|value| Ok(Resolution::Value(value)), on_rejected)
    }

    /// `then` without any reaction: a dependent mirroring this future
    pub fn fork(&self) -> Future<T, E> {
        self.then(|value| Ok(Resolution::Value(value)), |reason| Err(reason))
    }
}

fn settle_with<T, E>(dependent: &Rc<Core<T, E>>, outcome: Outcome<T, E>)
    where T: Clone + 'static,
          E: Reason
{
    match outcome {
        Ok(x) => resolution::resolve(dependent, x),
        Err(reason) => {
            trace!("Future: reaction failed, rejecting dependent");
            dependent.settle(Err(reason));
        }
    }
}

impl<T, E> Clone for Future<T, E> {
    fn clone(&self) -> Future<T, E> {
        Future { core: self.core.clone() }
    }
}

impl<T, E> fmt::Debug for Future<T, E>
    where T: fmt::Debug,
          E: fmt::Debug
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Future({:?})", self.core)
    }
}
