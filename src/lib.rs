//! # `playback`
//!
//! `playback` animates a sprite sheet: it cycles through equally sized blocks of a single
//! image at a fixed interval and draws each one onto a [`surface::Surface`], either in
//! raster order or following an explicit frame sequence.
//!
//! The [`animator::Animator`] owns the timing and geometry. Surfaces are pluggable; an
//! in-memory [`surface::Canvas`] and a terminal [`screen::Screen`] are included.
pub mod animator;
pub mod config;
pub mod error;
pub mod event;
pub mod geometry;
pub mod screen;
pub mod sheet;
pub mod surface;
pub mod timer;
