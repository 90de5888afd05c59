//! Presentation helpers. Nothing here feeds back into stored state.

pub mod currency;
