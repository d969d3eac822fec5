//! Environment — the per-cell resource field.
//!
//! Every cell holds a resource level in `[0, max_resource]`. Organisms
//! drain it by consuming and refill it by planting or cooperating; once
//! per step every cell not covered by a structure recharges by a fixed
//! rate.

use niche_core::error::{ensure_non_negative, Result, SimError};
use niche_core::types::Cell;
use std::collections::HashSet;

/// Dense resource levels for a `width` x `height` torus, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceGrid {
    width: usize,
    height: usize,
    levels: Vec<f64>,
    max_resource: f64,
    recharge_rate: f64,
}

impl ResourceGrid {
    /// Every cell starts at `initial`, clamped to the capacity.
    pub fn new(
        width: usize,
        height: usize,
        max_resource: f64,
        recharge_rate: f64,
        initial: f64,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(SimError::invalid_config(
                "grid",
                format!("{width}x{height}"),
                "width and height must be positive",
            ));
        }
        ensure_non_negative("max_resource", max_resource)?;
        ensure_non_negative("recharge_rate", recharge_rate)?;
        ensure_non_negative("initial_resource", initial)?;
        Ok(Self {
            width,
            height,
            levels: vec![initial.min(max_resource); width * height],
            max_resource,
            recharge_rate,
        })
    }

    fn index(&self, cell: Cell) -> usize {
        cell.y * self.width + cell.x
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn max_resource(&self) -> f64 {
        self.max_resource
    }

    pub fn recharge_rate(&self) -> f64 {
        self.recharge_rate
    }

    pub fn level(&self, cell: Cell) -> f64 {
        self.levels[self.index(cell)]
    }

    /// Overwrite a cell, clamped to `[0, max_resource]`.
    pub fn set_level(&mut self, cell: Cell, level: f64) {
        let i = self.index(cell);
        self.levels[i] = level.clamp(0.0, self.max_resource);
    }

    /// Row-major view of every level.
    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    pub fn total(&self) -> f64 {
        self.levels.iter().sum()
    }

    pub fn mean_level(&self) -> f64 {
        self.total() / self.levels.len() as f64
    }

    /// Grow every cell not in `blocked` by the recharge rate.
    pub fn recharge(&mut self, blocked: &HashSet<Cell>) {
        let (rate, cap, width) = (self.recharge_rate, self.max_resource, self.width);
        for (i, level) in self.levels.iter_mut().enumerate() {
            if blocked.contains(&Cell::new(i % width, i / width)) {
                continue;
            }
            *level = (*level + rate).min(cap);
        }
    }

    /// Take up to `requested` from a cell. Returns what was granted.
    pub fn consume(&mut self, cell: Cell, requested: f64) -> f64 {
        let i = self.index(cell);
        let granted = self.levels[i].min(requested.max(0.0));
        self.levels[i] -= granted;
        granted
    }

    /// Add `amount` (negative drains), clamped to `[0, max_resource]`.
    /// Returns the change actually applied.
    pub fn enrich(&mut self, cell: Cell, amount: f64) -> f64 {
        let i = self.index(cell);
        let before = self.levels[i];
        self.levels[i] = (before + amount).clamp(0.0, self.max_resource);
        self.levels[i] - before
    }
}
