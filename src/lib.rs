// The MIT License (MIT)

// Copyright (c) 2015 Y. T. Chung <zonyitoo@gmail.com>

//  Permission is hereby granted, free of charge, to any person obtaining a
//  copy of this software and associated documentation files (the "Software"),
//  to deal in the Software without restriction, including without limitation
//  the rights to use, copy, modify, merge, publish, distribute, sublicense,
//  and/or sell copies of the Software, and to permit persons to whom the
//  Software is furnished to do so, subject to the following conditions:
//
//  The above copyright notice and this permission notice shall be included in
//  all copies or substantial portions of the Software.
//
//  THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS
//  OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
//  FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
//  AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
//  LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
//  FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
//  DEALINGS IN THE SOFTWARE.

//! Promise/A+ style futures on a pluggable scheduler
//!
//! ```
//! use thenable::{EventLoop, Future, Resolution};
//!
//! let event_loop = EventLoop::new();
//! let scheduler = event_loop.scheduler();
//!
//! let answer = Future::<u32, String>::resolved(&scheduler, 20)
//!     .and_then(|v| Ok(Resolution::Value(v + 1)))
//!     .and_then(|v| Ok(Resolution::Value(v * 2)));
//!
//! assert_eq!(event_loop.run_until(&answer), Some(Ok(42)));
//! ```

#[macro_use]
extern crate log;

pub use crate::error::ChainingCycle;
pub use crate::future::{all, all_sequential, defer, race, Deferred, Future, Outcome, Reason,
                        Reject, Resolution, Resolve, State, Thenable, ThenLookup};
pub use crate::options::Options;
pub use crate::runtime::EventLoop;
pub use crate::scheduler::{Schedule, Scheduler, Task};

pub mod error;
pub mod future;
pub mod options;
pub mod runtime;
pub mod scheduler;
