//! Vertical arcade shooter core: a player dodges and shoots falling enemies,
//! collects timed power-ups and periodically fights a boss.
//!
//! The simulation is display-free. A host calls [`compute::advance`] once per
//! frame, renders the returned [`entities::RunState`], and plays the
//! [`entities::Cue`]s it drains from it.

pub mod boss;
pub mod collision;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod highscore;
pub mod spawner;
pub mod timers;

pub use error::{Error, Result};
