//! Core types and utilities

pub mod parameters;
pub mod units;

pub use parameters::{Compressors, CompressorSpec, FlowParameters, HpFlare, LpFlare};
pub use units::{convert, convert_to_all, try_convert, units, UnitCategory, UnitError};
