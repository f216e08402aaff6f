// Copyright 2015 The coio Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Event loop options

/// Event loop options
#[derive(Debug, Clone)]
pub struct Options {
    /// Shows up in log lines of the loop
    pub name: Option<String>,
    /// Maximum number of tasks a single `run` may execute, unbounded if `None`
    pub budget: Option<usize>,
}

impl Options {
    pub fn new() -> Options {
        Options {
            name: None,
            budget: None,
        }
    }

    pub fn name(&mut self, name: String) -> &mut Options {
        self.name = Some(name);
        self
    }

    pub fn budget(&mut self, budget: usize) -> &mut Options {
        self.budget = Some(budget);
        self
    }
}

impl Default for Options {
    fn default() -> Options {
        Options::new()
    }
}
