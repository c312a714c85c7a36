pub mod helper;

pub mod parse_gcxgc;
pub use parse_gcxgc::{parse_gcxgc, parse_gcxgc_str};

pub mod parse_online_gc;
pub use parse_online_gc::{parse_online_gc, parse_online_gc_str};

pub mod parse_spectra;
pub use parse_spectra::{parse_spectra, parse_spectra_str};

pub mod parse_tga;
pub use parse_tga::{parse_stage_csv, parse_tga, parse_tga_str};
