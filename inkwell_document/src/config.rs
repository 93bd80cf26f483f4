// Copyright 2025 the Inkwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Document configuration.

use inkwell_index::DEFAULT_CELL_SIZE;
use serde::{Deserialize, Serialize};

use crate::error::DocumentError;

/// Tuning for the spatial index.
///
/// Deserializes from any `serde` format; missing fields take their defaults.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentConfig {
    /// Edge length of a grid cell in world units.
    pub cell_size: f64,
    /// World x of the grid origin.
    pub origin_x: f64,
    /// World y of the grid origin.
    pub origin_y: f64,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            origin_x: 0.0,
            origin_y: 0.0,
        }
    }
}

impl DocumentConfig {
    /// Reject settings the grid cannot work with.
    pub fn validate(&self) -> Result<(), DocumentError> {
        if !(self.cell_size > 0.0 && self.cell_size.is_finite()) {
            return Err(DocumentError::InvalidCellSize(self.cell_size));
        }
        if !(self.origin_x.is_finite() && self.origin_y.is_finite()) {
            return Err(DocumentError::InvalidOrigin(self.origin_x, self.origin_y));
        }
        Ok(())
    }
}
