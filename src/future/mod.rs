// Copyright 2015 The coio Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Promise/A+ style futures
//!
//! A `Future` starts out pending and settles exactly once, either fulfilled
//! with a value or rejected with a reason. Reactions are chained with `then`,
//! which returns a new dependent `Future` settled by whatever the reaction
//! produced. Reactions always run on a later task of the future's `Scheduler`.
//!
//! Type parameters follow one pattern throughout the module:
//!
//! T => The value a future is fulfilled with
//! E => The reason a future is rejected with
//! U => The value of the dependent future created by `then`

mod combinators;
mod future;
mod promise;
mod resolution;
mod state;

pub use self::combinators::*;
pub use self::future::*;
pub use self::promise::*;
pub use self::resolution::{FnThenable, OnError, OnValue, Outcome, Resolution, ThenFn,
                           ThenLookup, Thenable};
pub use self::state::State;

use crate::error::ChainingCycle;
use crate::scheduler::Scheduler;

/// Requirements on rejection reasons.
///
/// Reasons are cloned for every reaction, and any chain may end up rejecting
/// with `ChainingCycle`.
pub trait Reason: Clone + From<ChainingCycle> + 'static {}

impl<E> Reason for E where E: Clone + From<ChainingCycle> + 'static {}

/// Create a pending future together with the capabilities to settle it
pub fn defer<T, E>(scheduler: &Scheduler) -> Deferred<T, E>
    where T: Clone + 'static,
          E: Reason
{
    Deferred::new(scheduler)
}
