//! Data model for tallies.
//!
//! Counting produces one [`DocumentRecord`] per input file. The pivot
//! builder turns those into a [`Table`], which renders to a [`Grid`] of typed
//! cells for a given normalization rate.

mod record;
mod table;

pub use record::*;
pub use table::*;
