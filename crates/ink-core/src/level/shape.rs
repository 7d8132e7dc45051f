//! Obstacle shapes and stamping
//!
//! A shape is a rectangular bitmap of filled (`#`) and empty (`.`) cells.
//! Stamping a shape inks every room under a filled cell. Each level stamps two
//! shapes from opposing edges, which fixes the direction the player travels.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::error::{GenerationError, Result};
use crate::graph::Position;
use crate::rng::GameRng;

use super::carve::TravelDirection;
use super::room::{InkState, RoomGraph};

/// Level edge a shape is stamped against
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
pub enum Side {
    North,
    South,
    West,
    East,
}

impl Side {
    /// Offset that puts `shape` flush against this edge, centered along it
    pub fn anchor(self, shape: &ShapeTemplate, width: usize, height: usize) -> Position {
        let free_x = width as i32 - shape.width() as i32;
        let free_y = height as i32 - shape.height() as i32;
        match self {
            Side::North => Position::new(free_x / 2, 0),
            Side::South => Position::new(free_x / 2, free_y),
            Side::West => Position::new(0, free_y / 2),
            Side::East => Position::new(free_x, free_y / 2),
        }
    }
}

/// Pair of opposing edges stamped for one level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum StampAxis {
    NorthSouth,
    WestEast,
}

impl StampAxis {
    /// Pick one of the two axes with equal probability
    pub fn random(rng: &mut GameRng) -> Self {
        if rng.one_in(2) {
            StampAxis::NorthSouth
        } else {
            StampAxis::WestEast
        }
    }

    pub const fn sides(self) -> [Side; 2] {
        match self {
            StampAxis::NorthSouth => [Side::North, Side::South],
            StampAxis::WestEast => [Side::West, Side::East],
        }
    }

    /// Shapes on the north and south edges leave a corridor running east,
    /// shapes on the west and east edges one running south.
    pub const fn travel(self) -> TravelDirection {
        match self {
            StampAxis::NorthSouth => TravelDirection::Right,
            StampAxis::WestEast => TravelDirection::Up,
        }
    }
}

/// Serialized form of a shape: a name and its text rows
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShapeRecord {
    #[serde(default)]
    pub name: String,
    pub rows: Vec<String>,
}

/// Rectangular obstacle bitmap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ShapeRecord", into = "ShapeRecord")]
pub struct ShapeTemplate {
    name: String,
    width: usize,
    height: usize,
    /// Row-major, true = filled
    cells: Vec<bool>,
}

impl ShapeTemplate {
    /// Parse a shape from text rows
    pub fn from_rows<S: AsRef<str>>(name: impl Into<String>, rows: &[S]) -> Result<Self> {
        let name = name.into();
        let height = rows.len();
        if height == 0 {
            return Err(GenerationError::InvalidShape {
                reason: format!("shape '{}' has no rows", name),
            });
        }

        let width = rows[0].as_ref().chars().count();
        if width == 0 {
            return Err(GenerationError::InvalidShape {
                reason: format!("shape '{}' has empty rows", name),
            });
        }

        let mut cells = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.chars().count() != width {
                return Err(GenerationError::InvalidShape {
                    reason: format!(
                        "shape '{}' row {} has {} cells, expected {}",
                        name,
                        y,
                        row.chars().count(),
                        width
                    ),
                });
            }
            for c in row.chars() {
                match c {
                    '#' => cells.push(true),
                    '.' => cells.push(false),
                    other => {
                        return Err(GenerationError::InvalidShape {
                            reason: format!("shape '{}' has unknown cell '{}'", name, other),
                        });
                    }
                }
            }
        }

        Ok(Self {
            name,
            width,
            height,
            cells,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether the cell at `(x, y)` is filled; cells outside the shape are empty
    pub fn is_filled(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.cells[y * self.width + x]
    }

    /// Number of filled cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// The shape mirrored top to bottom
    pub fn flipped_vertical(&self) -> Self {
        let mut cells = Vec::with_capacity(self.cells.len());
        for y in (0..self.height).rev() {
            cells.extend_from_slice(&self.cells[y * self.width..(y + 1) * self.width]);
        }
        Self {
            name: format!("{}-flipped", self.name),
            width: self.width,
            height: self.height,
            cells,
        }
    }

    /// The shape with rows and columns swapped
    pub fn transposed(&self) -> Self {
        let mut cells = Vec::with_capacity(self.cells.len());
        for x in 0..self.width {
            for y in 0..self.height {
                cells.push(self.cells[y * self.width + x]);
            }
        }
        Self {
            name: format!("{}-transposed", self.name),
            width: self.height,
            height: self.width,
            cells,
        }
    }

    fn rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().map(|&c| if c { '#' } else { '.' }).collect())
            .collect()
    }
}

impl TryFrom<ShapeRecord> for ShapeTemplate {
    type Error = GenerationError;

    fn try_from(raw: ShapeRecord) -> Result<Self> {
        ShapeTemplate::from_rows(raw.name, &raw.rows)
    }
}

impl From<ShapeTemplate> for ShapeRecord {
    fn from(shape: ShapeTemplate) -> Self {
        ShapeRecord {
            rows: shape.rows(),
            name: shape.name,
        }
    }
}

/// Ink every room under a filled cell of `shape` placed at `offset`
///
/// Cells that fall outside the grid are clipped. Returns how many rooms went
/// from open to inked.
pub fn stamp(graph: &mut RoomGraph, shape: &ShapeTemplate, offset: Position) -> usize {
    let mut inked = 0;
    for sy in 0..shape.height() {
        for sx in 0..shape.width() {
            if !shape.is_filled(sx, sy) {
                continue;
            }
            let pos = Position::new(offset.x + sx as i32, offset.y + sy as i32);
            if let Ok(node) = graph.get_node_mut(pos) {
                if node.data.ink != InkState::Blocked {
                    node.data.ink = InkState::Blocked;
                    inked += 1;
                }
            }
        }
    }
    inked
}

/// Source of obstacle shapes, one random pick per request
pub trait ShapeSource {
    fn pick(&mut self, side: Side, rng: &mut GameRng) -> Result<ShapeTemplate>;
}

/// In-memory shape collection keyed by edge
#[derive(Debug, Clone, Default)]
pub struct ShapeLibrary {
    shapes: BTreeMap<Side, Vec<ShapeTemplate>>,
}

const BUILTIN_NORTH: &[(&str, &[&str])] = &[
    (
        "teeth",
        &[
            "##.###.###",
            "#...#...#.",
            "..........",
        ],
    ),
    (
        "ridge",
        &[
            "###....###",
            ".##....##.",
            "..#....#..",
        ],
    ),
    (
        "hook",
        &[
            "##########",
            "...####...",
            "....##....",
        ],
    ),
];

impl ShapeLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Library with the built-in shapes for every edge
    ///
    /// South shapes are the north ones mirrored, west and east shapes are the
    /// north and south ones transposed.
    pub fn builtin() -> Result<Self> {
        let mut library = Self::new();
        for (name, rows) in BUILTIN_NORTH {
            let north = ShapeTemplate::from_rows(*name, *rows)?;
            let south = north.flipped_vertical();
            library.add(Side::West, north.transposed());
            library.add(Side::East, south.transposed());
            library.add(Side::South, south);
            library.add(Side::North, north);
        }
        Ok(library)
    }

    pub fn add(&mut self, side: Side, shape: ShapeTemplate) {
        self.shapes.entry(side).or_default().push(shape);
    }

    /// Shapes registered for `side`
    pub fn shapes(&self, side: Side) -> &[ShapeTemplate] {
        self.shapes.get(&side).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Total number of shapes
    pub fn len(&self) -> usize {
        self.shapes.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ShapeSource for ShapeLibrary {
    fn pick(&mut self, side: Side, rng: &mut GameRng) -> Result<ShapeTemplate> {
        rng.choose(self.shapes(side))
            .cloned()
            .ok_or(GenerationError::NoShapeForSide { side })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn inked_positions(graph: &RoomGraph) -> Vec<Position> {
        graph
            .nodes()
            .filter(|n| n.data.is_inked())
            .map(|n| n.position())
            .collect()
    }

    #[test]
    fn test_from_rows() {
        let shape = ShapeTemplate::from_rows("l", &["#..", "##."]).unwrap();
        assert_eq!(shape.width(), 3);
        assert_eq!(shape.height(), 2);
        assert!(shape.is_filled(0, 0));
        assert!(!shape.is_filled(1, 0));
        assert!(shape.is_filled(1, 1));
        assert!(!shape.is_filled(5, 5));
        assert_eq!(shape.filled_count(), 3);
    }

    #[test]
    fn test_from_rows_rejects_bad_input() {
        let empty: [&str; 0] = [];
        assert!(ShapeTemplate::from_rows("e", &empty).is_err());
        assert!(ShapeTemplate::from_rows("e", &[""]).is_err());
        assert!(ShapeTemplate::from_rows("ragged", &["##", "#"]).is_err());
        assert!(ShapeTemplate::from_rows("bad", &["#x"]).is_err());
    }

    #[test]
    fn test_flip_and_transpose() {
        let shape = ShapeTemplate::from_rows("l", &["#..", "##."]).unwrap();
        let flipped = shape.flipped_vertical();
        assert!(flipped.is_filled(0, 0) && flipped.is_filled(1, 0));
        assert!(flipped.is_filled(0, 1) && !flipped.is_filled(1, 1));

        let t = shape.transposed();
        assert_eq!((t.width(), t.height()), (2, 3));
        assert!(t.is_filled(0, 0) && t.is_filled(1, 0) && t.is_filled(1, 1));
        assert!(!t.is_filled(0, 1));
        assert_eq!(t.filled_count(), shape.filled_count());
    }

    #[test]
    fn test_stamp_marks_filled_cells() {
        let mut graph = RoomGraph::new(5, 5);
        let shape = ShapeTemplate::from_rows("bar", &["###", ".#."]).unwrap();
        let inked = stamp(&mut graph, &shape, Position::new(1, 0));
        assert_eq!(inked, 4);
        assert_eq!(
            inked_positions(&graph),
            vec![
                Position::new(1, 0),
                Position::new(2, 0),
                Position::new(3, 0),
                Position::new(2, 1),
            ]
        );
    }

    #[test]
    fn test_stamp_clips_outside_cells() {
        let mut graph = RoomGraph::new(3, 3);
        let shape = ShapeTemplate::from_rows("big", &["####", "####"]).unwrap();
        let inked = stamp(&mut graph, &shape, Position::new(-1, 2));
        assert_eq!(inked, 3);
        assert!(inked_positions(&graph).iter().all(|p| p.y == 2));
    }

    #[test]
    fn test_stamp_is_deterministic() {
        let shape = ShapeTemplate::from_rows("t", BUILTIN_NORTH[0].1).unwrap();
        let mut a = RoomGraph::new(10, 10);
        let mut b = RoomGraph::new(10, 10);
        stamp(&mut a, &shape, Position::new(0, 0));
        stamp(&mut b, &shape, Position::new(0, 0));
        assert_eq!(inked_positions(&a), inked_positions(&b));

        // Stamping twice changes nothing further.
        assert_eq!(stamp(&mut a, &shape, Position::new(0, 0)), 0);
        assert_eq!(inked_positions(&a), inked_positions(&b));
    }

    #[test]
    fn test_anchor_flush_with_edges() {
        let shape = ShapeTemplate::from_rows("s", &["####", "####"]).unwrap();
        assert_eq!(Side::North.anchor(&shape, 10, 8), Position::new(3, 0));
        assert_eq!(Side::South.anchor(&shape, 10, 8), Position::new(3, 6));
        assert_eq!(Side::West.anchor(&shape, 10, 8), Position::new(0, 3));
        assert_eq!(Side::East.anchor(&shape, 10, 8), Position::new(6, 3));
    }

    #[test]
    fn test_builtin_library_covers_every_side() {
        let library = ShapeLibrary::builtin().unwrap();
        for side in Side::iter() {
            assert_eq!(library.shapes(side).len(), BUILTIN_NORTH.len());
        }
        let west = &library.shapes(Side::West)[0];
        assert_eq!((west.width(), west.height()), (3, 10));
    }

    #[test]
    fn test_pick_from_empty_side() {
        let mut library = ShapeLibrary::new();
        let mut rng = GameRng::new(1);
        assert_eq!(
            library.pick(Side::East, &mut rng),
            Err(GenerationError::NoShapeForSide { side: Side::East })
        );
    }

    #[test]
    fn test_axis_sides_and_travel() {
        assert_eq!(StampAxis::NorthSouth.sides(), [Side::North, Side::South]);
        assert_eq!(StampAxis::WestEast.travel(), TravelDirection::Up);
        let mut rng = GameRng::new(3);
        let picks: Vec<StampAxis> = (0..64).map(|_| StampAxis::random(&mut rng)).collect();
        assert!(picks.contains(&StampAxis::NorthSouth));
        assert!(picks.contains(&StampAxis::WestEast));
    }

    #[test]
    fn test_shape_serde() {
        let shape = ShapeTemplate::from_rows("pair", &["#.", ".#"]).unwrap();
        let json = serde_json::to_string(&shape).unwrap();
        assert!(json.contains("\"rows\""));
        let back: ShapeTemplate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, shape);

        let bad: core::result::Result<ShapeTemplate, _> =
            serde_json::from_str(r###"{"rows": ["#", "##"]}"###);
        assert!(bad.is_err());
    }
}
