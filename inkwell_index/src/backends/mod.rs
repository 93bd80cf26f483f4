// Copyright 2025 the Inkwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend implementations for different spatial strategies.
//!
//! - `grid`: uniform square grid for `f64` coordinates with a reverse slot → cells map.
//!   Point queries touch a single bucket; range queries union the covered buckets.
//! - `flatvec`: flat vector with linear scans (small, simple, exact).
//!
//! Both honor the same contract: no false negatives, and every slot is reported at most
//! once per query even when it spans several partitions.

pub mod flatvec;
pub mod grid;

pub use flatvec::FlatVec;
pub use grid::GridF64;
