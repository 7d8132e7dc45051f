//! Player-drawn path through a generated level
//!
//! The path grows from the start room one neighbor at a time and only
//! shrinks at its leaves, so it always stays a connected tree rooted at the
//! start. Exit flags on the rooms mirror the links of the tree.

use crate::error::Result;
use crate::graph::{Direction, NodeId, Position};

use super::room::RoomGraph;

/// Rooms the player has connected, in the order they were added
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerPath {
    rooms: Vec<NodeId>,
}

impl PlayerPath {
    /// A path holding only `start`
    pub fn new(graph: &RoomGraph, start: Position) -> Result<Self> {
        let start = graph.id_at(start)?;
        Ok(Self { rooms: vec![start] })
    }

    pub fn start(&self) -> NodeId {
        self.rooms[0]
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.rooms.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Always false: the start room cannot be removed
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.rooms.iter().copied()
    }

    /// Whether the room at `exit` has been connected
    pub fn reaches(&self, graph: &RoomGraph, exit: Position) -> Result<bool> {
        Ok(self.contains(graph.id_at(exit)?))
    }

    /// Connect `to` to the path through its neighbor `from`
    ///
    /// Returns false without touching the graph when `from` is not on the
    /// path, `to` is not next to `from`, is inked or is already connected.
    pub fn add(&mut self, graph: &mut RoomGraph, from: Position, to: Position) -> Result<bool> {
        let from_id = graph.id_at(from)?;
        let to_id = graph.id_at(to)?;

        if !self.contains(from_id) || self.contains(to_id) {
            return Ok(false);
        }
        let Some(direction) = from.direction_to(to) else {
            return Ok(false);
        };
        if graph.node(to_id).data.is_inked() {
            return Ok(false);
        }

        graph.node_mut(from_id).data.open_exit(direction);
        graph.node_mut(to_id).data.open_exit(direction.opposite());
        self.rooms.push(to_id);
        tracing::debug!(from = %from, to = %to, "room added to path");
        Ok(true)
    }

    /// Rooms that can be removed without splitting the path
    ///
    /// These are the leaves: every room except the start with at most one
    /// open exit.
    pub fn removable(&self, graph: &RoomGraph) -> Vec<NodeId> {
        self.rooms
            .iter()
            .skip(1)
            .copied()
            .filter(|&id| graph.node(id).data.exit_count() <= 1)
            .collect()
    }

    /// Disconnect the room at `pos`
    ///
    /// Only removable rooms are taken off; anything else returns false. The
    /// exits linking the room to its neighbor are closed on both sides.
    pub fn remove(&mut self, graph: &mut RoomGraph, pos: Position) -> Result<bool> {
        let id = graph.id_at(pos)?;
        if id == self.start() || !self.contains(id) || graph.node(id).data.exit_count() > 1 {
            return Ok(false);
        }

        for direction in [Direction::North, Direction::South, Direction::West, Direction::East] {
            if !graph.node(id).data.has_exit(direction) {
                continue;
            }
            graph.node_mut(id).data.close_exit(direction);
            if let Ok(neighbor) = graph.get_node_mut(pos.step(direction)) {
                neighbor.data.close_exit(direction.opposite());
            }
        }

        self.rooms.retain(|&room| room != id);
        tracing::debug!(room = %pos, "room removed from path");
        Ok(true)
    }
}
