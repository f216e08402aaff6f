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
use super::{Future, Reason, Resolution};
use super::resolution;
use super::state::Core;

/// Capability to fulfill a `Future`.
///
/// Clones share the future; whichever of `fulfill`, `resolve` or `reject`
/// comes first wins and later calls are silently ignored.
pub struct Resolve<T, E>(Rc<Core<T, E>>);

impl<T, E> Resolve<T, E>
    where T: Clone + 'static,
          E: Reason
{
    pub(crate) fn with_core(core: Rc<Core<T, E>>) -> Resolve<T, E> {
        Resolve(core)
    }

    /// Fulfill with `val` as is. Returns whether this call settled the future.
    pub fn fulfill(&self, val: T) -> bool {
        self.0.claim() && self.0.settle(Ok(val))
    }

    /// Resolve with `x`, adopting it if it is a future or a thenable.
    ///
    /// Resolving a future with itself rejects it with `ChainingCycle`. The
    /// future is locked onto `x` right away: while an adopted value is still
    /// pending, later `fulfill`, `resolve` and `reject` calls are ignored.
    ///
    /// Returns whether this call won.
    pub fn resolve(&self, x: Resolution<T, E>) -> bool {
        if !self.0.claim() {
            return false;
        }
        resolution::resolve(&self.0, x);
        true
    }
}

impl<T, E> Clone for Resolve<T, E> {
    fn clone(&self) -> Resolve<T, E> {
        Resolve(self.0.clone())
    }
}

impl<T, E> fmt::Debug for Resolve<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Resolve {{ .. }}")
    }
}

/// Capability to reject a `Future`
pub struct Reject<T, E>(Rc<Core<T, E>>);

impl<T, E> Reject<T, E>
    where T: Clone + 'static,
          E: Reason
{
    pub(crate) fn with_core(core: Rc<Core<T, E>>) -> Reject<T, E> {
        Reject(core)
    }

    /// Returns whether this call settled the future
    pub fn reject(&self, reason: E) -> bool {
        self.0.claim() && self.0.settle(Err(reason))
    }
}

impl<T, E> Clone for Reject<T, E> {
    fn clone(&self) -> Reject<T, E> {
        Reject(self.0.clone())
    }
}

impl<T, E> fmt::Debug for Reject<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Reject {{ .. }}")
    }
}

/// A pending future bundled with the capabilities to settle it from outside
#[derive(Debug)]
pub struct Deferred<T, E> {
    pub future: Future<T, E>,
    pub resolve: Resolve<T, E>,
    pub reject: Reject<T, E>,
}

impl<T, E> Deferred<T, E>
    where T: Clone + 'static,
          E: Reason
{
    pub fn new(scheduler: &Scheduler) -> Deferred<T, E> {
        let core = Core::new(scheduler.clone());
        Deferred {
            resolve: Resolve::with_core(core.clone()),
            reject: Reject::with_core(core.clone()),
            future: Future::with_core(core),
        }
    }
}
