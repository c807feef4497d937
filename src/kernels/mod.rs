//! This module contains the pure, stateless kernels the traversal relies on:
//! scalar classification, the temporal codec, label rendering and generic text
//! conversion. None of them walk containers; that is the job of `traversal`.

pub mod labels;
pub mod scalar;
pub mod temporal;
pub mod text;
