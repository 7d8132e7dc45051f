//! Grid graph and pathfinding
//!
//! A generic width x height lattice with 4-directional unit-cost edges and an
//! A* search with a pluggable blocking predicate.

mod astar;
mod grid;
mod node;

pub use grid::{EDGE_COST, Graph};
pub use node::{Direction, Edge, GridNode, NodeId, Position, SearchState, SearchStatus};
