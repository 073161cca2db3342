//! Order statistic index. An [AVL][avl] tree augmented with subtree
//! sizes, answering rank-of-key and select-by-rank along with the usual
//! search, insert and delete, all in O(log n).
//!
//! [avl]: https://en.wikipedia.org/wiki/AVL_tree

mod config;
mod depth;
mod error;
mod menu;
mod ost;

pub use crate::config::Config;
pub use crate::depth::Depth;
pub use crate::error::OstError;
pub use crate::menu::Menu;
pub use crate::ost::{Iter, Key, Node, Ost, Range, Reverse, Stats};

#[cfg(test)]
mod menu_test;
