//! Minimal game state used for self-play.
//!
//! - [`GameField`] - grid plus statistics, advanced one placement at a time
//! - [`GameStats`] - lines cleared, score and piece count
//! - [`PieceGenerator`] - seeded uniform piece source
//!
//! There is no falling piece, gravity timer or hold slot here: a turn is a
//! single resolved [`Placement`](crate::Placement) locked onto the grid.

pub use self::{game_field::*, game_stats::*, piece_generator::*};

mod game_field;
mod game_stats;
mod piece_generator;
