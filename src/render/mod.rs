//! Turns aggregated data into SVG documents.
//!
//! Every renderer takes all of its constants through a config value and returns the finished
//! document as a string, so nothing is written anywhere until the whole image exists.

pub mod city;
pub mod color;
pub mod isometric;
pub mod preset;
pub mod stat_bar;
pub mod svg;
