//! Columnar data model for Colonnade.
//!
//! This crate holds the pieces of the column abstraction the scan engine
//! consumes but does not own:
//! - Typed, contiguous column storage (`ColumnData`, `Column`).
//! - Validity bitmaps (`BitVec`): one bit per row, 1 = valid.
//! - Fallible buffer allocation (`try_filled_vec`) so resource exhaustion
//!   surfaces as an error instead of an abort.

#![forbid(unsafe_code)]

mod alloc;
mod bitmap;
mod column;
mod types;

pub use crate::alloc::{try_filled_vec, AllocationError};
pub use crate::bitmap::BitVec;
pub use crate::column::{Column, ColumnData, ColumnError};
pub use crate::types::{ElementType, TypeCategory};
