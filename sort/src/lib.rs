//! In-place sorting of slices into ascending order.

#![deny(rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod heap_sort;
pub mod insertion_sort;
pub mod quicksort;
