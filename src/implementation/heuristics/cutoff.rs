// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! This module provides the implementation of various cutoff heuristics that can
//! be used to stop the dynamic program or the reduction loop early.

use std::{sync::{Arc, atomic::{AtomicBool, Ordering}}, time::{Duration, Instant}};

use crate::Cutoff;

/// _This is the default cutoff heuristic._ It imposes that the search goes
/// until its normal termination before to stop.
#[derive(Debug, Default, Copy, Clone)]
pub struct NoCutoff;
impl Cutoff for NoCutoff {
    fn must_stop(&self) -> bool {false}
}
/// This cutoff allows one to specify a maximum time budget to solve the problem.
/// Once the time budget is elapsed, the optimization stops and the best solution
/// that has been found (so far) is returned.
///
/// # Note
/// The deadline is simply compared against the clock each time the cutoff is
/// polled. Nothing runs in the background.
///
/// # Example
/// ```
/// # use steiner_dp::*;
/// use std::time::Duration;
///
/// let budget = TimeBudget::new(Duration::from_secs(10));
/// assert!(!budget.must_stop());
///
/// let expired = TimeBudget::new(Duration::ZERO);
/// assert!(expired.must_stop());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TimeBudget {
    deadline: Instant
}
impl TimeBudget {
    pub fn new(budget: Duration) -> Self {
        Self::until(Instant::now() + budget)
    }
    pub fn until(deadline: Instant) -> Self {
        TimeBudget { deadline }
    }
    /// The time that remains before the budget is elapsed
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }
}
impl Cutoff for TimeBudget {
    fn must_stop(&self) -> bool {
        Instant::now() >= self.deadline
    }
}

/// This cutoff is triggered from the outside: the host application keeps a
/// handle on the flag and raises it whenever it wants the work to stop.
///
/// # Example
/// ```
/// # use steiner_dp::*;
/// let interrupt = Interrupt::default();
/// let handle    = interrupt.handle();
/// assert!(!interrupt.must_stop());
///
/// handle.store(true, std::sync::atomic::Ordering::Relaxed);
/// assert!(interrupt.must_stop());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    stop: Arc<AtomicBool>
}
impl Interrupt {
    /// Returns a handle which can be used to raise the interrupt flag
    pub fn handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }
    /// Raises the interrupt flag
    pub fn interrupt(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}
impl Cutoff for Interrupt {
    fn must_stop(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }
}

/// This cutoff is met as soon as any of the two cutoffs it is made of is met.
/// It is typically used to combine a time budget with an interrupt flag.
#[derive(Debug, Clone)]
pub struct AnyCutoff<A: Cutoff, B: Cutoff> {
    a: A,
    b: B,
}
impl <A: Cutoff, B: Cutoff> AnyCutoff<A, B> {
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }
}
impl <A: Cutoff, B: Cutoff> Cutoff for AnyCutoff<A, B> {
    fn must_stop(&self) -> bool {
        self.a.must_stop() || self.b.must_stop()
    }
}

#[cfg(test)]
mod test_cutoff {
    use std::time::Duration;

    use crate::*;

    #[test]
    fn no_cutoff_never_stops() {
        assert!(!NoCutoff.must_stop());
    }
    #[test]
    fn an_elapsed_time_budget_must_stop() {
        let budget = TimeBudget::new(Duration::ZERO);
        assert!(budget.must_stop());
        assert_eq!(Duration::ZERO, budget.remaining());
    }
    #[test]
    fn a_generous_time_budget_does_not_stop() {
        let budget = TimeBudget::new(Duration::from_secs(3600));
        assert!(!budget.must_stop());
        assert!(budget.remaining() > Duration::from_secs(3000));
    }
    #[test]
    fn an_interrupt_stops_once_raised() {
        let interrupt = Interrupt::default();
        let clone     = interrupt.clone();
        assert!(!clone.must_stop());
        interrupt.interrupt();
        assert!(clone.must_stop());
    }
    #[test]
    fn any_cutoff_stops_when_either_part_stops() {
        let interrupt = Interrupt::default();
        let combined  = AnyCutoff::new(TimeBudget::new(Duration::from_secs(3600)), interrupt.clone());
        assert!(!combined.must_stop());
        interrupt.interrupt();
        assert!(combined.must_stop());

        let combined  = AnyCutoff::new(TimeBudget::new(Duration::ZERO), NoCutoff);
        assert!(combined.must_stop());
    }
}
