extern crate env_logger;
extern crate rand;
extern crate thenable;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use thenable::future::{OnError, OnValue};
use thenable::{defer, ChainingCycle, EventLoop, Future, Outcome, Resolution, Scheduler, State,
               ThenLookup, Thenable};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// A thenable that answers through `callback`, possibly after nesting
fn wrapping(value: Resolution<u32, String>) -> Resolution<u32, String> {
    let slot = RefCell::new(Some(value));
    Resolution::thenable(move |on_value: OnValue<u32, String>, _: OnError<String>| {
        if let Some(value) = slot.borrow_mut().take() {
            on_value(value);
        }
        Ok(())
    })
}

#[test]
fn test_settles_at_most_once() {
    init();

    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..200 {
        let event_loop = EventLoop::new();
        let deferred = defer::<u32, String>(&event_loop.scheduler());

        let mut first = None;
        for step in 0..rng.gen_range(1..8) {
            let won = if rng.gen_bool(0.5) {
                (deferred.resolve.fulfill(step), Ok(step))
            } else {
                (deferred.reject.reject(format!("r{}", step)), Err(format!("r{}", step)))
            };

            assert_eq!(won.0, first.is_none());
            if first.is_none() {
                first = Some(won.1);
            }
        }

        assert_eq!(deferred.future.state().into_result(), first);
    }
}

#[test]
fn test_reactions_are_never_synchronous() {
    init();

    let event_loop = EventLoop::new();
    let scheduler = event_loop.scheduler();
    let deferred = defer::<u32, String>(&scheduler);
    let settled = Future::<u32, String>::resolved(&scheduler, 1);

    let marker = Rc::new(Cell::new(false));
    let observed = Rc::new(RefCell::new(Vec::new()));

    for future in &[deferred.future.clone(), settled.clone()] {
        let (marker, observed) = (marker.clone(), observed.clone());
        future.and_then(move |_| {
            observed.borrow_mut().push(marker.get());
            Ok(Resolution::Value(()))
        });
    }

    // Settling must not run the pending future's reaction either
    deferred.resolve.fulfill(2);
    assert!(observed.borrow().is_empty());

    marker.set(true);
    event_loop.run();
    assert_eq!(*observed.borrow(), vec![true, true]);
}

#[test]
fn test_reactions_of_one_future_run_in_order() {
    init();

    let event_loop = EventLoop::new();
    let deferred = defer::<u32, String>(&event_loop.scheduler());
    let order = Rc::new(RefCell::new(Vec::new()));

    for i in 0..5 {
        let order = order.clone();
        deferred.future.and_then(move |v| {
            order.borrow_mut().push(v + i);
            Ok(Resolution::Value(()))
        });
    }

    deferred.resolve.fulfill(10);
    event_loop.run();
    assert_eq!(*order.borrow(), vec![10, 11, 12, 13, 14]);
}

#[test]
fn test_returning_own_dependent_is_a_cycle() {
    init();

    let event_loop = EventLoop::new();
    let slot: Rc<RefCell<Option<Future<u32, String>>>> = Rc::new(RefCell::new(None));

    let dependent = {
        let slot = slot.clone();
        Future::<u32, String>::resolved(&event_loop.scheduler(), 1).and_then(move |_| {
            let own = slot.borrow().clone();
            match own {
                Some(own) => Ok(Resolution::Future(own)),
                None => Err("dependent missing".to_owned()),
            }
        })
    };
    *slot.borrow_mut() = Some(dependent.clone());

    assert_eq!(event_loop.run_until(&dependent),
               Some(Err(ChainingCycle.to_string())));
}

#[test]
fn test_nested_thenables_unwrap() {
    init();

    let event_loop = EventLoop::new();
    let future = Future::<u32, String>::resolved(&event_loop.scheduler(), 0)
        .and_then(|_| Ok(wrapping(wrapping(Resolution::Value(42)))));

    assert_eq!(event_loop.run_until(&future), Some(Ok(42)));
}

#[test]
fn test_thenable_calling_back_twice() {
    init();

    let event_loop = EventLoop::new();
    let future = Future::<u32, String>::resolved(&event_loop.scheduler(), 0).and_then(|_| {
        Ok(Resolution::thenable(|on_value: OnValue<u32, String>, on_error: OnError<String>| {
            on_value(Resolution::Value(1));
            on_value(Resolution::Value(2));
            on_error("3".to_owned());
            Ok(())
        }))
    });

    assert_eq!(event_loop.run_until(&future), Some(Ok(1)));
}

#[test]
fn test_thenable_calling_back_later() {
    init();

    let event_loop = EventLoop::new();
    let scheduler = event_loop.scheduler();

    let later = scheduler.clone();
    let future = Future::<u32, String>::resolved(&scheduler, 0).and_then(move |_| {
        Ok(Resolution::thenable(move |on_value: OnValue<u32, String>, on_error: OnError<String>| {
            later.schedule(move || on_value(Resolution::Value(7)));
            // Runs after the fulfillment above and must not override it
            later.schedule(move || on_error("late".to_owned()));
            Ok(())
        }))
    });

    assert_eq!(event_loop.run_until(&future), Some(Ok(7)));
    event_loop.run();
    assert_eq!(future.state(), State::Fulfilled(7));
}

struct Getter {
    calls: Rc<Cell<usize>>,
}

impl Thenable<u32, String> for Getter {
    fn then_method(&self) -> ThenLookup<u32, String> {
        self.calls.set(self.calls.get() + 1);
        ThenLookup::ReadFailed("getter".to_owned())
    }
}

#[test]
fn test_then_member_is_read_once() {
    init();

    let event_loop = EventLoop::new();
    let calls = Rc::new(Cell::new(0));
    let getter = Rc::new(Getter { calls: calls.clone() });

    let future = Future::<u32, String>::resolved(&event_loop.scheduler(), 0)
        .and_then(move |_| Ok(Resolution::Thenable(getter)));

    assert_eq!(event_loop.run_until(&future), Some(Err("getter".to_owned())));
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_adopting_a_pending_future() {
    init();

    let event_loop = EventLoop::new();
    let scheduler = event_loop.scheduler();
    let inner = defer::<u32, String>(&scheduler);

    let adopted = inner.future.clone();
    let outer = Future::<u32, String>::resolved(&scheduler, 0)
        .and_then(move |_| Ok(Resolution::Future(adopted)));

    event_loop.run();
    assert!(outer.is_pending());

    inner.reject.reject("inner".to_owned());
    assert_eq!(event_loop.run_until(&outer), Some(Err("inner".to_owned())));
}

#[test]
fn test_catch_on_fulfilled_passes_value_through() {
    init();

    let event_loop = EventLoop::new();
    let handled = Rc::new(Cell::new(false));

    let flag = handled.clone();
    let future = Future::<u32, String>::resolved(&event_loop.scheduler(), 5).catch(move |reason| {
        flag.set(true);
        Err(reason)
    });

    assert_eq!(event_loop.run_until(&future), Some(Ok(5)));
    assert!(!handled.get());
}

#[test]
fn test_rejection_without_handler_propagates_down_the_chain() {
    init();

    let event_loop = EventLoop::new();
    let future = Future::<u32, &'static str>::rejected(&event_loop.scheduler(), "deep")
        .and_then(|v| Ok(Resolution::Value(v + 1)))
        .and_then(|v| Ok(Resolution::Value(v * 2)))
        .fork();

    assert_eq!(event_loop.run_until(&future), Some(Err("deep")));
}

#[test]
fn test_executor_capabilities_outlive_the_executor() {
    init();

    let event_loop = EventLoop::new();
    let scheduler = event_loop.scheduler();
    let stash = Rc::new(RefCell::new(None));

    let future = {
        let stash = stash.clone();
        Future::<u32, String>::new(&scheduler, move |resolve, _| {
            *stash.borrow_mut() = Some(resolve);
            Ok(())
        })
    };

    let chained = future.and_then(|v| -> Outcome<u32, String> { Ok(Resolution::Value(v * 3)) });
    event_loop.run();
    assert!(chained.is_pending());

    if let Some(resolve) = stash.borrow_mut().take() {
        resolve.fulfill(3);
    }
    assert_eq!(event_loop.run_until(&chained), Some(Ok(9)));
}

#[test]
fn test_custom_scheduler() {
    init();

    // Manual flush fake
    let queue = Rc::new(RefCell::new(Vec::new()));
    let scheduler = {
        let queue = queue.clone();
        Scheduler::new(move |task: thenable::Task| queue.borrow_mut().push(task))
    };

    let future = Future::<u32, String>::resolved(&scheduler, 2)
        .and_then(|v| Ok(Resolution::Value(v + 2)));
    assert!(future.is_pending());

    while !queue.borrow().is_empty() {
        let tasks: Vec<thenable::Task> = queue.borrow_mut().drain(..).collect();
        for task in tasks {
            task();
        }
    }
    assert_eq!(future.state(), State::Fulfilled(4));
}

#[test]
fn test_dropping_a_long_pending_chain() {
    init();

    let event_loop = EventLoop::new();
    let deferred = defer::<u32, String>(&event_loop.scheduler());
    let marker = Rc::new(());

    let mut future = deferred.future.clone();
    for _ in 0..100_000 {
        let marker = marker.clone();
        future = future.and_then(move |v| {
            let _ = &marker;
            Ok(Resolution::Value(v + 1))
        });
    }

    drop(future);
    drop(deferred);
    assert_eq!(Rc::strong_count(&marker), 1);
    assert!(event_loop.is_empty());
}

#[test]
fn test_first_resolve_locks_the_future() {
    init();

    let event_loop = EventLoop::new();
    let scheduler = event_loop.scheduler();
    let outer = defer::<u32, String>(&scheduler);
    let inner = defer::<u32, String>(&scheduler);

    assert!(outer.resolve.resolve(Resolution::Future(inner.future.clone())));
    assert!(!outer.resolve.fulfill(5));
    inner.resolve.fulfill(9);

    assert_eq!(event_loop.run_until(&outer.future), Some(Ok(9)));
}
