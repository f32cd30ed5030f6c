//! Generates the images of a GitHub profile README.
//! `stats` renders a bar card of the languages used across the viewer's repositories, `city`
//! renders a year of contributions as an isometric skyline.
//!

pub mod cli;
pub mod github;
pub mod render;
pub mod stats;
pub mod utils;
