//! Pure, deterministic logic: descriptor shape checks, settings and TOC
//! parsing, and run-target validation. No I/O happens here.

pub mod settings;
pub mod target;
pub mod toc;
pub mod validate;
