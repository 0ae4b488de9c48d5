//! Debayering module for turning CFA mosaics into planar RGB

mod cpu_debayer;

pub use cpu_debayer::CpuDebayer;
