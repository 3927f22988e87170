//! An index-arena red-black tree holding a set of ordered values.
//!
//! Nodes live in a dense `Vec` and refer to each other by index. All leaf
//! links and the parent link of the root point at a reserved sentinel index
//! which is always black and never allocated.

#![deny(rust_2018_idioms)]
#![forbid(unsafe_code)]

mod error;
mod node;
mod red_black_tree;
mod validate;

pub use error::Error;
pub use node::Color;
pub use red_black_tree::{Iter, NodeRecord, RedBlackTree};
pub use validate::Violation;
