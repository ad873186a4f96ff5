//! Multi-ply placement planning for the stackbot engine.
//!
//! - [`beam`] - bounded-width lookahead ranked by region topology
//! - [`protocol`] - JSON request/response shapes and validation
//! - [`worker`] - the planning context on its own thread
//!
//! A search that finds nothing is not an error: [`beam::BeamPlanner::plan`]
//! returns `None` and the response mode is `no_decision`. Callers must treat
//! that as "do nothing" rather than guess a placement.

pub mod beam;
pub mod protocol;
pub mod worker;
