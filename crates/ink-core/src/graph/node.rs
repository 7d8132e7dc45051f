//! Grid nodes, edges and directions

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Integer grid coordinate
///
/// Signed so that requests just outside the grid, such as `(-1, 0)`, can be
/// expressed and rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Distance without diagonals
    pub fn manhattan(&self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// The neighboring position one step in `direction`
    pub fn step(&self, direction: Direction) -> Position {
        let (dx, dy) = direction.offset();
        Position::new(self.x + dx, self.y + dy)
    }

    /// Direction of `other` if it is a 4-neighbor of this position
    pub fn direction_to(&self, other: Position) -> Option<Direction> {
        match (other.x - self.x, other.y - self.y) {
            (0, -1) => Some(Direction::North),
            (0, 1) => Some(Direction::South),
            (-1, 0) => Some(Direction::West),
            (1, 0) => Some(Direction::East),
            _ => None,
        }
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Position::new(x, y)
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Cardinal direction of an edge, seen from the node that owns it
///
/// North is towards `y = 0`, west is towards `x = 0`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Direction {
    North,
    South,
    West,
    East,
}

impl Direction {
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::East => Direction::West,
        }
    }

    /// Coordinate delta of one step in this direction
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
            Direction::East => (1, 0),
        }
    }
}

/// Handle to a node inside the graph that created it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Row-major index of the node
    pub fn index(self) -> usize {
        self.0
    }
}

/// Directed link to a neighboring node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub target: NodeId,
    pub direction: Direction,
    pub cost: u32,
}

/// Where a node stands in the current search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStatus {
    #[default]
    Unvisited,
    Open,
    Closed,
}

/// Per-node A* scratch data
///
/// Only meaningful during or right after a search; every search resets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchState {
    /// Cost of the best known path from the start
    pub g: u32,
    /// Heuristic estimate to the goal
    pub h: u32,
    /// `g + h`
    pub f: u32,
    /// Predecessor on the best known path
    pub parent: Option<NodeId>,
    pub status: SearchStatus,
}

/// A node of the grid graph carrying a payload of type `T`
#[derive(Debug, Clone)]
pub struct GridNode<T> {
    pub(crate) position: Position,
    pub data: T,
    pub(crate) edges: Vec<Edge>,
    pub(crate) search: SearchState,
}

impl<T> GridNode<T> {
    pub(crate) fn new(position: Position, data: T) -> Self {
        Self {
            position,
            data,
            edges: Vec::with_capacity(4),
            search: SearchState::default(),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The edge leaving this node in `direction`, if the neighbor exists
    pub fn edge(&self, direction: Direction) -> Option<&Edge> {
        self.edges.iter().find(|e| e.direction == direction)
    }

    /// Search scores from the last search run
    pub fn search(&self) -> &SearchState {
        &self.search
    }
}
