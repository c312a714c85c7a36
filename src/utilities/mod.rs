pub mod config;
pub use config::LabConfig;

pub mod errors;
pub use errors::{LabError, Result};

pub mod gcxgc;

pub mod ir;

pub mod online_gc;

pub mod parse;

pub mod sgg;
pub use sgg::{SggOptions, sgg};

pub mod simulation;

pub mod structs;

pub mod tga;

pub mod utilities;
pub use utilities::{gradient, nearest_index, trapezoid};
