//! Abstract traits for dataset records.
//!
//! The controller and the render seam only see records through [`Item`],
//! so any compiled-in dataset can drive a visualization.

use std::fmt::{Debug, Display};

/// A record that belongs to exactly one time key.
pub trait Item: Clone + Debug {
    /// Ordered key the dataset is partitioned by (e.g. a year)
    type Key: Ord + Clone + Debug + Display;

    /// Time key this record belongs to
    fn time_key(&self) -> Self::Key;

    /// Identity stable across frames (category, title...).
    /// Used to key visual marks so they update in place between renders.
    fn identity(&self) -> String;

    /// Tooltip text
    fn describe(&self) -> String {
        format!("{} ({})", self.identity(), self.time_key())
    }
}
