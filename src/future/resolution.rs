// Copyright 2015 The coio Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Settling a dependent future from whatever a reaction produced
//!
//! A reaction may hand back a plain value, one of our own futures or a
//! foreign awaitable. The latter two are adopted: the dependent settles the
//! same way they do. A foreign awaitable is never trusted to call back only
//! once, so every adoption is guarded by a one-shot latch.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::error::ChainingCycle;
use super::Future;
use super::Reason;
use super::state::Core;

/// What a reaction returns: the value to settle with, or `Err` to reject
pub type Outcome<T, E> = Result<Resolution<T, E>, E>;

/// Callback handed to a foreign `then` for the fulfillment branch
pub type OnValue<T, E> = Rc<dyn Fn(Resolution<T, E>)>;

/// Callback handed to a foreign `then` for the rejection branch
pub type OnError<E> = Rc<dyn Fn(E)>;

/// A foreign `then`, already bound to its receiver.
///
/// Returning `Err` means invoking it failed synchronously.
pub type ThenFn<T, E> = Box<dyn FnOnce(OnValue<T, E>, OnError<E>) -> Result<(), E>>;

/// Result of looking up the `then` member of a candidate awaitable
pub enum ThenLookup<T, E> {
    /// Not awaitable; settle with this value as is
    NotThenable(T),
    Thenable(ThenFn<T, E>),
    /// Reading the member failed
    ReadFailed(E),
}

/// Anything that may expose a callable `then`.
///
/// Implementations are free to call the callbacks they receive any number of
/// times, synchronously or later; only the first call is honoured.
pub trait Thenable<T, E> {
    fn then_method(&self) -> ThenLookup<T, E>;
}

/// Thenable whose `then` is a closure
pub struct FnThenable<F>(Rc<F>);

impl<F> FnThenable<F> {
    pub fn new(f: F) -> FnThenable<F> {
        FnThenable(Rc::new(f))
    }
}

impl<T, E, F> Thenable<T, E> for FnThenable<F>
    where T: 'static,
          E: 'static,
          F: Fn(OnValue<T, E>, OnError<E>) -> Result<(), E> + 'static
{
    fn then_method(&self) -> ThenLookup<T, E> {
        let then = self.0.clone();
        ThenLookup::Thenable(Box::new(move |on_value: OnValue<T, E>, on_error: OnError<E>| {
            (*then)(on_value, on_error)
        }))
    }
}

/// The value a dependent future is resolved with
pub enum Resolution<T, E> {
    /// Settle with the value directly
    Value(T),
    /// Adopt the state of another future
    Future(Future<T, E>),
    /// Adopt the state of a foreign awaitable
    Thenable(Rc<dyn Thenable<T, E>>),
}

impl<T, E> Resolution<T, E> {
    /// Wrap a closure acting as a foreign `then`
    pub fn thenable<F>(then: F) -> Resolution<T, E>
        where T: 'static,
              E: 'static,
              F: Fn(OnValue<T, E>, OnError<E>) -> Result<(), E> + 'static
    {
        Resolution::Thenable(Rc::new(FnThenable::new(then)))
    }
}

impl<T, E> From<T> for Resolution<T, E> {
    fn from(value: T) -> Resolution<T, E> {
        Resolution::Value(value)
    }
}

impl<T, E> From<Future<T, E>> for Resolution<T, E> {
    fn from(future: Future<T, E>) -> Resolution<T, E> {
        Resolution::Future(future)
    }
}

impl<T, E> fmt::Debug for Resolution<T, E>
    where T: fmt::Debug
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Resolution::Value(ref value) => write!(f, "Value({:?})", value),
            Resolution::Future(..) => write!(f, "Future(..)"),
            Resolution::Thenable(..) => write!(f, "Thenable(..)"),
        }
    }
}

/// Settle `dependent` from `x`.
pub fn resolve<T, E>(dependent: &Rc<Core<T, E>>, x: Resolution<T, E>)
    where T: Clone + 'static,
          E: Reason
{
    match x {
        Resolution::Value(value) => {
            dependent.settle(Ok(value));
        }
        Resolution::Future(future) => {
            if Rc::ptr_eq(future.core(), dependent) {
                debug!("Future resolved with itself, rejecting");
                dependent.settle(Err(E::from(ChainingCycle)));
                return;
            }

            // Our own futures settle once and only hold plain values
            let (fulfilled, rejected) = (dependent.clone(), dependent.clone());
            future.core().react(Box::new(move |value: T| {
                                    fulfilled.settle(Ok(value));
                                }),
                                Box::new(move |reason: E| {
                                    rejected.settle(Err(reason));
                                }));
        }
        Resolution::Thenable(thenable) => adopt(dependent, &*thenable),
    }
}

fn adopt<T, E>(dependent: &Rc<Core<T, E>>, thenable: &dyn Thenable<T, E>)
    where T: Clone + 'static,
          E: Reason
{
    let then = match thenable.then_method() {
        ThenLookup::NotThenable(value) => {
            dependent.settle(Ok(value));
            return;
        }
        ThenLookup::ReadFailed(reason) => {
            debug!("Reading then of a thenable failed, rejecting");
            dependent.settle(Err(reason));
            return;
        }
        ThenLookup::Thenable(then) => then,
    };

    let called = Rc::new(Cell::new(false));

    let on_value: OnValue<T, E> = {
        let (called, dependent) = (called.clone(), dependent.clone());
        Rc::new(move |y: Resolution<T, E>| {
            if called.replace(true) {
                trace!("Thenable fulfilled after settling, ignored");
                return;
            }
            resolve(&dependent, y);
        })
    };

    let on_error: OnError<E> = {
        let (called, dependent) = (called.clone(), dependent.clone());
        Rc::new(move |reason: E| {
            if called.replace(true) {
                trace!("Thenable rejected after settling, ignored");
                return;
            }
            dependent.settle(Err(reason));
        })
    };

    if let Err(reason) = then(on_value, on_error) {
        if called.replace(true) {
            trace!("Thenable failed after settling, ignored");
            return;
        }
        dependent.settle(Err(reason));
    }
}
