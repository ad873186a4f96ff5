//! Discrete board model for the stackbot placement engine.
//!
//! This crate is the grid physics substrate every other crate builds on:
//!
//! - [`Grid`] - fixed-size occupancy grid with collision testing, gravity drop,
//!   copy-on-write locking, line clearing and hole detection
//! - [`PieceKind`] / [`PieceShape`] - the seven tetrominoes and their precomputed
//!   rotation states
//! - [`Placement`] - a resolved (kind, rotation, column, landing row) tuple
//! - [`GameField`] / [`GameStats`] / [`PieceGenerator`] - the minimal game state
//!   used by self-play (training and auto-play)
//!
//! Everything here is synchronous and free of shared mutable state. Operations
//! that produce a new board return a fresh [`Grid`] and leave their input
//! untouched.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;
