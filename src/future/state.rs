// Copyright 2015 The coio Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::mem;
use std::rc::Rc;

use crate::scheduler::Scheduler;

/// Settlement state of a `Future`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State<T, E> {
    Pending,
    Fulfilled(T),
    Rejected(E),
}

impl<T, E> State<T, E> {
    #[inline]
    pub fn is_pending(&self) -> bool {
        match *self {
            State::Pending => true,
            _ => false,
        }
    }

    #[inline]
    pub fn is_fulfilled(&self) -> bool {
        match *self {
            State::Fulfilled(..) => true,
            _ => false,
        }
    }

    #[inline]
    pub fn is_rejected(&self) -> bool {
        match *self {
            State::Rejected(..) => true,
            _ => false,
        }
    }

    #[inline]
    pub fn is_settled(&self) -> bool {
        !self.is_pending()
    }

    /// `Some(result)` once settled
    pub fn into_result(self) -> Option<Result<T, E>> {
        match self {
            State::Pending => None,
            State::Fulfilled(value) => Some(Ok(value)),
            State::Rejected(reason) => Some(Err(reason)),
        }
    }
}

/// Continuation waiting for one branch of a settlement
pub type Reaction<V> = Box<dyn FnOnce(V)>;

struct Inner<T, E> {
    state: State<T, E>,
    // Only non-empty while pending
    on_fulfilled: Vec<Reaction<T>>,
    on_rejected: Vec<Reaction<E>>,
}

/// The shared settlement state behind a `Future` and its capabilities
pub struct Core<T, E> {
    inner: RefCell<Inner<T, E>>,
    // Set by the first outside `fulfill`, `resolve` or `reject`
    resolved: Cell<bool>,
    scheduler: Scheduler,
    abandon: fn(&mut Inner<T, E>),
}

impl<T, E> Core<T, E>
    where T: Clone + 'static,
          E: Clone + 'static
{
    pub fn new(scheduler: Scheduler) -> Rc<Core<T, E>> {
        Rc::new(Core {
            inner: RefCell::new(Inner {
                state: State::Pending,
                on_fulfilled: Vec::new(),
                on_rejected: Vec::new(),
            }),
            resolved: Cell::new(false),
            scheduler: scheduler,
            abandon: abandon::<T, E>,
        })
    }

    #[inline]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn state(&self) -> State<T, E> {
        self.inner.borrow().state.clone()
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.inner.borrow().state.is_pending()
    }

    /// Claim the right to resolve this core from outside.
    ///
    /// Only the first claim succeeds, and none does once the core settled.
    /// Internal adoption settles through `settle` and never claims.
    pub fn claim(&self) -> bool {
        if self.resolved.replace(true) {
            trace!("Core: already resolved, ignoring");
            return false;
        }
        if !self.is_pending() {
            trace!("Core: already settled, ignoring");
            return false;
        }
        true
    }

    /// Settle with `result` if still pending.
    ///
    /// Returns whether this call won. Reactions of the settled branch are
    /// handed to the scheduler in registration order, those of the other
    /// branch are dropped.
    pub fn settle(&self, result: Result<T, E>) -> bool {
        let (fulfilled, rejected) = {
            let mut guard = self.inner.borrow_mut();
            let inner = &mut *guard;

            if !inner.state.is_pending() {
                trace!("Core: already settled, ignoring {}",
                       if result.is_ok() { "fulfillment" } else { "rejection" });
                return false;
            }

            inner.state = match result {
                Ok(ref value) => State::Fulfilled(value.clone()),
                Err(ref reason) => State::Rejected(reason.clone()),
            };

            (mem::replace(&mut inner.on_fulfilled, Vec::new()),
             mem::replace(&mut inner.on_rejected, Vec::new()))
        };

        match result {
            Ok(value) => {
                trace!("Core: fulfilled, dispatching {} reaction(s)", fulfilled.len());
                drop(rejected);
                for reaction in fulfilled {
                    self.dispatch(reaction, value.clone());
                }
            }
            Err(reason) => {
                trace!("Core: rejected, dispatching {} reaction(s)", rejected.len());
                drop(fulfilled);
                for reaction in rejected {
                    self.dispatch(reaction, reason.clone());
                }
            }
        }

        true
    }

    /// Register a pair of reactions.
    ///
    /// If already settled the matching reaction is scheduled right away, but
    /// it still never runs before this call returns.
    pub fn react(&self, on_fulfilled: Reaction<T>, on_rejected: Reaction<E>) {
        let settled = {
            let mut guard = self.inner.borrow_mut();
            let inner = &mut *guard;

            match inner.state {
                State::Pending => {
                    inner.on_fulfilled.push(on_fulfilled);
                    inner.on_rejected.push(on_rejected);
                    return;
                }
                State::Fulfilled(ref value) => Ok(value.clone()),
                State::Rejected(ref reason) => Err(reason.clone()),
            }
        };

        match settled {
            Ok(value) => self.dispatch(on_fulfilled, value),
            Err(reason) => self.dispatch(on_rejected, reason),
        }
    }

    #[inline]
    fn dispatch<V>(&self, reaction: Reaction<V>, val: V)
        where V: 'static
    {
        self.scheduler.schedule(move || reaction(val));
    }
}

impl<T, E> Drop for Core<T, E> {
    fn drop(&mut self) {
        (self.abandon)(self.inner.get_mut());
    }
}

thread_local! {
    // Reaction queues of dropped cores still waiting to be dropped
    static ABANDONED: RefCell<Vec<Box<dyn Any>>> = RefCell::new(Vec::new());
    static DRAINING: Cell<bool> = Cell::new(false);
}

struct Draining;

impl Drop for Draining {
    fn drop(&mut self) {
        let _ = DRAINING.try_with(|draining| draining.set(false));
    }
}

// Every pending reaction owns the core of its dependent, so dropping a long
// unsettled chain would recurse once per link. Queues of nested cores are
// parked instead and dropped one at a time by the outermost drop.
fn abandon<T, E>(inner: &mut Inner<T, E>)
    where T: 'static,
          E: 'static
{
    if inner.on_fulfilled.is_empty() && inner.on_rejected.is_empty() {
        return;
    }

    let queues: Box<dyn Any> = Box::new((mem::replace(&mut inner.on_fulfilled, Vec::new()),
                                         mem::replace(&mut inner.on_rejected, Vec::new())));

    let nested = DRAINING.try_with(|draining| draining.replace(true));
    match nested {
        Ok(false) => {}
        Ok(true) => {
            // An outer drop is draining, hand the queues over
            let parked = ABANDONED.try_with(|abandoned| abandoned.borrow_mut().push(queues));
            if let Err(..) = parked {
                trace!("Core: thread is exiting, dropping reactions in place");
            }
            return;
        }
        // Thread local storage is gone, nothing left to do but drop in place
        Err(..) => return,
    }

    let _draining = Draining;
    drop(queues);

    loop {
        let next = ABANDONED.try_with(|abandoned| abandoned.borrow_mut().pop());
        match next {
            Ok(Some(queues)) => drop(queues),
            _ => break,
        }
    }
}

impl<T, E> fmt::Debug for Core<T, E>
    where T: fmt::Debug,
          E: fmt::Debug
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(inner) => {
                write!(f,
                       "Core {{ state: {:?}, reactions: {} }}",
                       inner.state,
                       inner.on_fulfilled.len())
            }
            Err(..) => write!(f, "Core {{ <borrowed> }}"),
        }
    }
}
