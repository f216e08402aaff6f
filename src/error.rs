// Copyright 2015 The coio Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors produced by the library itself

use thiserror::Error;

/// A future was resolved with itself.
///
/// Every rejection reason type has to be constructible from this error, since
/// any `then` may end up returning its own dependent future.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("chaining cycle detected for future")]
pub struct ChainingCycle;

impl From<ChainingCycle> for String {
    fn from(err: ChainingCycle) -> String {
        err.to_string()
    }
}

impl From<ChainingCycle> for &'static str {
    fn from(_: ChainingCycle) -> &'static str {
        "chaining cycle detected for future"
    }
}
