//! Path carving
//!
//! Repeatedly searches from the current start towards the exit. When ink
//! blocks the search, the cheapest inked neighbor of the furthest room
//! reached is cleared and the search resumes from that room. Carving stops
//! when the exit is reached, when the route uses up the graphite budget (the
//! exit then moves to the last room of the cut route), or fails when nothing
//! is left to clear.
//!
//! The route is kept loop-free: when a new segment walks back over a room
//! already on the route, the route is cut back to that room first.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::error::{GenerationError, Result};
use crate::graph::{GridNode, NodeId, Position};

use super::room::{InkState, RoomDescription, RoomGraph};

/// Overall direction of travel through a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum TravelDirection {
    /// Towards increasing x
    Right,
    /// Towards increasing y
    Up,
}

impl TravelDirection {
    /// Whether moving from `from` to `to` goes against the travel direction
    pub fn forbids(self, from: Position, to: Position) -> bool {
        match self {
            TravelDirection::Right => to.x < from.x,
            TravelDirection::Up => to.y < from.y,
        }
    }
}

/// Blocking predicate used while carving: inked rooms and backtracking
pub fn is_blocked(
    travel: TravelDirection,
    current: &GridNode<RoomDescription>,
    next: &GridNode<RoomDescription>,
) -> bool {
    next.data.is_inked() || travel.forbids(current.position(), next.position())
}

/// Result of one carving iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CarveStep {
    /// The exit was reached within budget
    Reached,
    /// The budget ran out; the exit moved
    Truncated,
    /// Blocked; this room was cleared
    Cleared(Position),
}

/// What carving produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarveOutcome {
    /// Loop-free route from the start to the exit
    pub route: Vec<NodeId>,
    /// Final exit; differs from the requested one when `truncated`
    pub exit: Position,
    /// Number of searches run
    pub iterations: usize,
    /// Rooms whose ink was cleared, in clearing order
    pub cleared: Vec<Position>,
    pub truncated: bool,
}

/// Carving controller for one level
pub struct PathCarver<'a> {
    graph: &'a mut RoomGraph,
    travel: TravelDirection,
    exit: Position,
    graphite: usize,
    current_start: Position,
    route: Vec<NodeId>,
    cleared: Vec<Position>,
}

impl<'a> PathCarver<'a> {
    pub fn new(
        graph: &'a mut RoomGraph,
        start: Position,
        exit: Position,
        travel: TravelDirection,
        graphite: usize,
    ) -> Result<Self> {
        graph.id_at(start)?;
        graph.id_at(exit)?;
        Ok(Self {
            graph,
            travel,
            exit,
            graphite,
            current_start: start,
            route: Vec::new(),
            cleared: Vec::new(),
        })
    }

    /// Run until the exit is reached or relocated
    ///
    /// Gives up after one iteration per room in the grid.
    pub fn carve(mut self) -> Result<CarveOutcome> {
        let limit = self.graph.len();

        for iteration in 1..=limit {
            match self.step()? {
                CarveStep::Reached => {
                    tracing::debug!(iteration, exit = %self.exit, "exit reached");
                    return Ok(self.finish(iteration, false));
                }
                CarveStep::Truncated => return Ok(self.finish(iteration, true)),
                CarveStep::Cleared(pos) => {
                    tracing::debug!(iteration, cleared = %pos, from = %self.current_start, "cleared obstacle");
                }
            }
        }

        Err(GenerationError::NoValidPath {
            reason: format!("exit {} not reached after {} iterations", self.exit, limit),
        })
    }

    fn step(&mut self) -> Result<CarveStep> {
        let travel = self.travel;
        let segment = self.graph.find_path(
            self.current_start,
            self.exit,
            |current, next| is_blocked(travel, current, next),
            true,
        )?;

        let candidate = self.joined(&segment);
        let Some(&last) = candidate.last() else {
            return Err(GenerationError::NoValidPath {
                reason: format!("no room reachable from {}", self.current_start),
            });
        };
        let last_pos = self.graph.node(last).position();

        if last_pos == self.exit && candidate.len() <= self.graphite {
            self.route = candidate;
            return Ok(CarveStep::Reached);
        }

        if candidate.len() >= self.graphite {
            self.route = candidate;
            self.route.truncate(self.graphite);
            let new_exit = self.graph.node(self.route[self.graphite - 1]).position();
            tracing::warn!(
                requested = %self.exit,
                relocated = %new_exit,
                graphite = self.graphite,
                "graphite budget used up, moving exit"
            );
            self.exit = new_exit;
            return Ok(CarveStep::Truncated);
        }

        let exit = self.exit;
        let graph = &*self.graph;
        let target = graph
            .node(last)
            .edges()
            .iter()
            .filter(|e| graph.node(e.target).data.is_inked())
            .min_by_key(|e| e.cost + graph.node(e.target).position().manhattan(exit))
            .map(|e| e.target);

        let Some(target) = target else {
            return Err(GenerationError::NoValidPath {
                reason: format!("route blocked at {} with no obstacle to clear", last_pos),
            });
        };

        let target_node = self.graph.node_mut(target);
        target_node.data.ink = InkState::None;
        let cleared = target_node.position();
        self.cleared.push(cleared);

        self.route = candidate;
        self.current_start = last_pos;
        Ok(CarveStep::Cleared(cleared))
    }

    /// The current route extended by `segment`, with any loop cut out
    fn joined(&self, segment: &[NodeId]) -> Vec<NodeId> {
        let mut route = self.route.clone();
        for &id in segment {
            match route.iter().position(|&r| r == id) {
                Some(i) => route.truncate(i + 1),
                None => route.push(id),
            }
        }
        route
    }

    fn finish(self, iterations: usize, truncated: bool) -> CarveOutcome {
        CarveOutcome {
            route: self.route,
            exit: self.exit,
            iterations,
            cleared: self.cleared,
            truncated,
        }
    }
}
