//! Durable output of a harvesting run.
//!
//! # Submodules
//!
//! - [`json`]: Atomic writes of the output array and the per-unit scratch files
//! - [`dedupe`]: Post-run removal of repeated URLs from an output file
//!
//! # Output Structure
//!
//! ```text
//! data/raw/
//! ├── aktualne_cz_output.json     # Full accumulator, rewritten after every unit
//! ├── links_nuclear_energy.json   # Scratch, removed when the unit completes
//! └── articles_nuclear_energy.json
//! ```

pub mod dedupe;
pub mod json;
