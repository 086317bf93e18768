//! Shared utilities for strategy integration tests.

use std::collections::HashMap;
use std::sync::Arc;
use balancer::load_balancer::{LoadBalancer, WeightedBackend};

/// Build a weighted pool from `(address, weight)` pairs.
#[allow(dead_code)]
pub fn pool(weights: &[(&str, i64)]) -> Vec<WeightedBackend> {
    weights
        .iter()
        .map(|(address, weight)| WeightedBackend::new(*address, *weight))
        .collect()
}

/// Count how often each address was returned; `None` is counted under "".
pub fn tally<I>(picks: I) -> HashMap<String, usize>
where
    I: IntoIterator<Item = Option<Arc<str>>>,
{
    let mut counts = HashMap::new();
    for pick in picks {
        let key = pick.map(|a| a.to_string()).unwrap_or_default();
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

/// Call `next_server` `calls` times and tally the results.
#[allow(dead_code)]
pub fn draw(lb: &dyn LoadBalancer, calls: usize) -> HashMap<String, usize> {
    tally((0..calls).map(|_| lb.next_server()))
}

/// Run `threads` OS threads that each call `next_server` `calls` times,
/// returning every thread's picks in call order.
#[allow(dead_code)]
pub fn hammer(lb: &dyn LoadBalancer, threads: usize, calls: usize) -> Vec<Vec<Option<Arc<str>>>> {
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..threads)
            .map(|_| scope.spawn(move || (0..calls).map(|_| lb.next_server()).collect::<Vec<_>>()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
}

/// Longest run of consecutive identical entries.
#[allow(dead_code)]
pub fn longest_run<T: PartialEq>(sequence: &[T]) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for (i, item) in sequence.iter().enumerate() {
        if i > 0 && sequence[i - 1] == *item {
            current += 1;
        } else {
            current = 1;
        }
        longest = longest.max(current);
    }
    longest
}
