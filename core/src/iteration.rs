//! The two traversal styles compared by the loop benchmarks.
//!
//! Both visit every element exactly once, in sequence order. They differ only
//! in how the element is reached: by integer position or through the slice
//! iterator.

use serde::{Deserialize, Serialize};
use std::hint::black_box;

/// Visit `items[0]` through `items[len - 1]` by position, in ascending order.
#[allow(clippy::needless_range_loop)]
pub fn visit_by_index<T, F>(items: &[T], mut visit: F)
where
    F: FnMut(&T),
{
    let len = items.len();
    for i in 0..len {
        visit(black_box(&items[i]));
    }
}

/// Visit every element in sequence order without exposing its index.
pub fn visit_by_element<T, F>(items: &[T], mut visit: F)
where
    F: FnMut(&T),
{
    for item in items {
        visit(black_box(item));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IterationStyle {
    ByIndex,
    ByElement,
}

impl IterationStyle {
    pub const ALL: [IterationStyle; 2] = [IterationStyle::ByIndex, IterationStyle::ByElement];

    pub fn key(self) -> &'static str {
        match self {
            IterationStyle::ByIndex => "by_index",
            IterationStyle::ByElement => "by_element",
        }
    }

    pub fn run<T, F>(self, items: &[T], visit: F)
    where
        F: FnMut(&T),
    {
        match self {
            IterationStyle::ByIndex => visit_by_index(items, visit),
            IterationStyle::ByElement => visit_by_element(items, visit),
        }
    }

    pub fn count_visits<T>(self, items: &[T]) -> usize {
        let mut visits = 0usize;
        self.run(items, |_| visits += 1);
        visits
    }
}

impl std::fmt::Display for IterationStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
