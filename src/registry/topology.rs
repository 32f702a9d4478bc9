//! Dependency ordering of registered tables.

use std::collections::BTreeSet;

/// Orders items so that every item comes after the items it depends on.
///
/// Items are identified by their insertion index. Among the items that are
/// ready at any step, the earliest inserted one is popped first, so the
/// resulting order is stable.
#[derive(Clone, Debug, Default)]
pub(crate) struct TopologicalSort {
    num_prec: Vec<usize>,
    succ: Vec<BTreeSet<usize>>,
    done: Vec<bool>,
}

impl TopologicalSort {
    pub fn new(len: usize) -> Self {
        Self {
            num_prec: vec![0; len],
            succ: vec![BTreeSet::new(); len],
            done: vec![false; len],
        }
    }

    /// Records that `prec` must come before `succ`.
    pub fn add_dependency(&mut self, prec: usize, succ: usize) {
        if prec == succ {
            // self reference is okay
            return;
        }
        if self.succ[prec].insert(succ) {
            self.num_prec[succ] += 1;
        }
    }

    /// Number of items not yet popped
    pub fn len(&self) -> usize {
        self.done.iter().filter(|d| !**d).count()
    }

    /// Removes and returns the earliest item with no pending dependency, or
    /// `None` when everything is popped or the rest forms a cycle.
    pub fn pop(&mut self) -> Option<usize> {
        let next = (0..self.done.len()).find(|&i| !self.done[i] && self.num_prec[i] == 0)?;
        self.done[next] = true;
        for &s in &self.succ[next] {
            self.num_prec[s] -= 1;
        }
        Some(next)
    }

    /// Pops everything. Items caught in a cycle are appended in insertion order.
    pub fn into_order(mut self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.done.len());
        while let Some(i) = self.pop() {
            order.push(i);
        }
        if self.len() > 0 {
            for (i, done) in self.done.iter().enumerate() {
                if !done {
                    order.push(i);
                }
            }
        }
        order
    }
}
