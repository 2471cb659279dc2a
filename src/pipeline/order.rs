//! Handler ordering using topological sort.
//!
//! Handlers of one stage are ordered by their `before`/`after` constraints
//! with Kahn's algorithm. Unconstrained handlers keep their input order.

use std::collections::{HashMap, HashSet, VecDeque};

use super::{HandlerRegistration, Stage};
use crate::error::{Error, Result};

/// Sort `items` so every `before`/`after` constraint is satisfied.
///
/// Constraints naming handlers absent from `items` are ignored. Among handlers
/// that are not constrained relative to each other the input order is kept
/// (the ready queue is FIFO and seeded in input order).
///
/// # Errors
/// Returns `Error::CircularDependency` listing the handlers left unordered.
/// No partial order is returned.
pub fn sort<T, F>(stage: Stage, items: Vec<T>, registration: F) -> Result<Vec<T>>
where
    F: Fn(&T) -> &HandlerRegistration,
{
    let count = items.len();

    // name -> position in `items`
    let index: HashMap<&str, usize> = items
        .iter()
        .enumerate()
        .map(|(i, item)| (registration(item).name(), i))
        .collect();

    // edges[a] holds every b where a must run before b
    let mut edges: Vec<Vec<usize>> = vec![Vec::new(); count];
    let mut seen: HashSet<(usize, usize)> = HashSet::new();
    let mut in_degree = vec![0usize; count];

    let mut add_edge = |from: usize, to: usize| {
        if seen.insert((from, to)) {
            edges[from].push(to);
            in_degree[to] += 1;
        }
    };

    for (i, item) in items.iter().enumerate() {
        let info = registration(item);
        for dep in info.runs_after() {
            if let Some(&j) = index.get(dep.as_str()) {
                add_edge(j, i);
            }
        }
        for dep in info.runs_before() {
            if let Some(&j) = index.get(dep.as_str()) {
                add_edge(i, j);
            }
        }
    }

    let mut queue: VecDeque<usize> = (0..count).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(count);

    while let Some(current) = queue.pop_front() {
        order.push(current);
        for &next in &edges[current] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                queue.push_back(next);
            }
        }
    }

    if order.len() != count {
        let placed: HashSet<usize> = order.iter().copied().collect();
        let names = items
            .iter()
            .enumerate()
            .filter(|(i, _)| !placed.contains(i))
            .map(|(_, item)| registration(item).name().to_string())
            .collect();
        return Err(Error::CircularDependency { stage, names });
    }

    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    Ok(order
        .into_iter()
        .filter_map(|i| slots[i].take())
        .collect())
}
