//! Face-controlled arcade shooter core.
//!
//! Head position aims the player, opening the mouth fires.  Everything here is
//! a synchronous per-frame computation driven by an external face-landmark
//! detector; rendering, audio and capture live outside the library.

pub mod collision;
pub mod compute;
pub mod config;
pub mod control;
pub mod entities;
pub mod error;
pub mod media;
pub mod progression;
pub mod session;
pub mod snapshot;
pub mod spawner;

pub use error::{Error, Result};
