// Copyright 2015 The coio Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Combinators over many futures, built on `then` alone

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::scheduler::Scheduler;
use super::{Deferred, Future, Reason, Reject, Resolution, Resolve};

/// Settle the same way as the first of `futures` to settle.
///
/// An empty `futures` gives a future that never settles.
pub fn race<T, E, I>(scheduler: &Scheduler, futures: I) -> Future<T, E>
    where T: Clone + 'static,
          E: Reason,
          I: IntoIterator<Item = Future<T, E>>
{
    let Deferred { future, resolve, reject } = Deferred::new(scheduler);

    let mut inputs = 0;
    for input in futures {
        let (resolve, reject) = (resolve.clone(), reject.clone());
        input.then(move |value| {
                       resolve.fulfill(value);
                       Ok(Resolution::Value(()))
                   },
                   move |reason| {
                       reject.reject(reason);
                       Ok(Resolution::Value(()))
                   });
        inputs += 1;
    }

    if inputs == 0 {
        debug!("race: no inputs, result will never settle");
    }

    future
}

/// Fulfill with every value of `futures`, in input order, once all of them
/// fulfilled; reject with the first rejection observed.
///
/// All inputs are awaited at the same time. An empty `futures` fulfills with
/// an empty `Vec`.
pub fn all<T, E, I>(scheduler: &Scheduler, futures: I) -> Future<Vec<T>, E>
    where T: Clone + 'static,
          E: Reason,
          I: IntoIterator<Item = Future<T, E>>
{
    let inputs: Vec<Future<T, E>> = futures.into_iter().collect();
    let Deferred { future, resolve, reject } = Deferred::new(scheduler);

    if inputs.is_empty() {
        resolve.fulfill(Vec::new());
        return future;
    }

    let slots: Rc<RefCell<Vec<Option<T>>>> = Rc::new(RefCell::new(vec![None; inputs.len()]));
    let remaining = Rc::new(Cell::new(inputs.len()));

    for (index, input) in inputs.into_iter().enumerate() {
        let (slots, remaining) = (slots.clone(), remaining.clone());
        let (resolve, reject) = (resolve.clone(), reject.clone());

        input.then(move |value| {
                       slots.borrow_mut()[index] = Some(value);
                       remaining.set(remaining.get() - 1);
                       trace!("all: input {} fulfilled, {} remaining", index, remaining.get());

                       if remaining.get() == 0 {
                           let values: Vec<T> = slots.borrow_mut().drain(..).flatten().collect();
                           resolve.fulfill(values);
                       }
                       Ok(Resolution::Value(()))
                   },
                   move |reason| {
                       trace!("all: input {} rejected", index);
                       reject.reject(reason);
                       Ok(Resolution::Value(()))
                   });
    }

    future
}

/// Like `all`, but only starts awaiting an input once the previous one
/// fulfilled, so the latency adds up over all inputs.
///
/// Rejects with the first rejection it gets to; inputs after it are never
/// looked at.
pub fn all_sequential<T, E, I>(scheduler: &Scheduler, futures: I) -> Future<Vec<T>, E>
    where T: Clone + 'static,
          E: Reason,
          I: IntoIterator<Item = Future<T, E>>
{
    let inputs: VecDeque<Future<T, E>> = futures.into_iter().collect();
    let Deferred { future, resolve, reject } = Deferred::new(scheduler);

    let capacity = inputs.len();
    await_next(inputs, Vec::with_capacity(capacity), resolve, reject);

    future
}

fn await_next<T, E>(mut rest: VecDeque<Future<T, E>>,
                    mut values: Vec<T>,
                    resolve: Resolve<Vec<T>, E>,
                    reject: Reject<Vec<T>, E>)
    where T: Clone + 'static,
          E: Reason
{
    let next = match rest.pop_front() {
        Some(next) => next,
        None => {
            resolve.fulfill(values);
            return;
        }
    };

    let on_rejected = reject.clone();
    next.then(move |value| {
                  values.push(value);
                  await_next(rest, values, resolve, reject);
                  Ok(Resolution::Value(()))
              },
              move |reason| {
                  trace!("all_sequential: input rejected, abandoning the rest");
                  on_rejected.reject(reason);
                  Ok(Resolution::Value(()))
              });
}
