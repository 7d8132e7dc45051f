//! Level generation
//!
//! One call runs the whole pipeline: stamp two obstacle shapes against
//! opposing edges, pick a start and exit, carve a route between them, place
//! the stickers and keys. Any failure aborts the call and no level is
//! returned.

use crate::error::{GenerationError, Result};
use crate::graph::{NodeId, Position};
use crate::rng::GameRng;

use super::carve::{CarveOutcome, PathCarver, TravelDirection};
use super::keys::place_keys;
use super::player_path::PlayerPath;
use super::room::{RoleMarker, RoomConsumer, RoomDescriptor, RoomGraph};
use super::shape::{ShapeSource, StampAxis, stamp};
use super::template::LevelTemplate;

/// A generated level and the player's path through it
#[derive(Debug, Clone)]
pub struct Level {
    graph: RoomGraph,
    start: NodeId,
    exit: NodeId,
    route: Vec<NodeId>,
    keys: Vec<NodeId>,
    axis: StampAxis,
    cleared: Vec<Position>,
    iterations: usize,
    truncated: bool,
    player: PlayerPath,
}

/// Generate one level from `template`
pub fn generate_level<S>(
    template: &LevelTemplate,
    shapes: &mut S,
    rng: &mut GameRng,
) -> Result<Level>
where
    S: ShapeSource + ?Sized,
{
    template.validate()?;

    let mut graph = RoomGraph::new(template.width, template.height);
    let axis = StampAxis::random(rng);
    for side in axis.sides() {
        let shape = shapes.pick(side, rng)?;
        let offset = side.anchor(&shape, template.width, template.height);
        let inked = stamp(&mut graph, &shape, offset);
        tracing::debug!(%side, shape = shape.name(), %offset, inked, "stamped obstacle");
    }

    let travel = axis.travel();
    let (start, exit) = endpoints(&graph, travel)?;
    tracing::debug!(%start, %exit, %travel, "carving route");

    let CarveOutcome {
        route,
        exit,
        iterations,
        cleared,
        truncated,
    } = PathCarver::new(&mut graph, start, exit, travel, template.graphite)?.carve()?;

    let start_id = graph.id_at(start)?;
    let exit_id = graph.id_at(exit)?;
    graph.node_mut(start_id).data.role = RoleMarker::Start;
    graph.node_mut(exit_id).data.role = RoleMarker::Exit;

    let keys = place_keys(&mut graph, &route, start_id, exit_id, template, rng)?;
    let player = PlayerPath::new(&graph, start)?;

    tracing::info!(
        seed = rng.seed(),
        %axis,
        %start,
        %exit,
        route = route.len(),
        keys = keys.len(),
        cleared = cleared.len(),
        iterations,
        "level generated"
    );

    Ok(Level {
        graph,
        start: start_id,
        exit: exit_id,
        route,
        keys,
        axis,
        cleared,
        iterations,
        truncated,
        player,
    })
}

/// First and last open room along the travel direction
///
/// Rightward travel scans column by column from the west edge, upward travel
/// row by row from the north edge.
fn endpoints(graph: &RoomGraph, travel: TravelDirection) -> Result<(Position, Position)> {
    let (w, h) = (graph.width() as i32, graph.height() as i32);
    let order: Box<dyn Iterator<Item = Position>> = match travel {
        TravelDirection::Right => {
            Box::new((0..w).flat_map(move |x| (0..h).map(move |y| Position::new(x, y))))
        }
        TravelDirection::Up => {
            Box::new((0..h).flat_map(move |y| (0..w).map(move |x| Position::new(x, y))))
        }
    };

    let mut open = order.filter(|&pos| {
        graph
            .get_node_at(pos)
            .map(|node| !node.data.is_inked())
            .unwrap_or(false)
    });
    let first = open.next();
    let last = open.last();

    match (first, last) {
        (Some(start), Some(exit)) => Ok((start, exit)),
        _ => Err(GenerationError::NoValidPath {
            reason: "fewer than two open rooms after stamping".to_string(),
        }),
    }
}

impl Level {
    pub fn graph(&self) -> &RoomGraph {
        &self.graph
    }

    pub fn start(&self) -> Position {
        self.graph.node(self.start).position()
    }

    /// Exit room; the last room of the route
    pub fn exit(&self) -> Position {
        self.graph.node(self.exit).position()
    }

    /// Carved route from the start to the exit
    pub fn route(&self) -> &[NodeId] {
        &self.route
    }

    pub fn route_positions(&self) -> Vec<Position> {
        self.graph.positions(&self.route)
    }

    pub fn keys(&self) -> Vec<Position> {
        self.graph.positions(&self.keys)
    }

    pub fn axis(&self) -> StampAxis {
        self.axis
    }

    pub fn travel(&self) -> TravelDirection {
        self.axis.travel()
    }

    /// Rooms whose ink was cleared while carving
    pub fn cleared(&self) -> &[Position] {
        &self.cleared
    }

    /// Number of carving iterations used
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Whether the graphite budget moved the exit
    pub fn was_truncated(&self) -> bool {
        self.truncated
    }

    pub fn player_path(&self) -> &PlayerPath {
        &self.player
    }

    /// See [`PlayerPath::add`]
    pub fn add_room(&mut self, from: Position, to: Position) -> Result<bool> {
        self.player.add(&mut self.graph, from, to)
    }

    /// See [`PlayerPath::remove`]
    pub fn remove_room(&mut self, pos: Position) -> Result<bool> {
        self.player.remove(&mut self.graph, pos)
    }

    pub fn removable_rooms(&self) -> Vec<Position> {
        self.graph.positions(&self.player.removable(&self.graph))
    }

    /// Whether the player's path connects the start to the exit
    pub fn is_complete(&self) -> bool {
        self.player.contains(self.exit)
    }

    /// Extend the player's path along the carved route
    ///
    /// Returns how many rooms were added.
    pub fn follow_route(&mut self) -> Result<usize> {
        let positions = self.route_positions();
        let mut added = 0;
        for pair in positions.windows(2) {
            if self.player.add(&mut self.graph, pair[0], pair[1])? {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Send one descriptor per player-path room, in path order
    pub fn hand_off<C: RoomConsumer + ?Sized>(&self, consumer: &mut C) {
        for id in self.player.iter() {
            consumer.build_room(&RoomDescriptor::from_node(self.graph.node(id)));
        }
    }

    /// Debug map: `#` inked, `.` open, `*` route, `S`/`E`/`K` stickers
    pub fn render_ascii(&self) -> String {
        let mut on_route = vec![false; self.graph.len()];
        for id in &self.route {
            on_route[id.index()] = true;
        }

        let mut out = String::with_capacity((self.graph.width() + 1) * self.graph.height());
        for (index, node) in self.graph.nodes().enumerate() {
            let c = match node.data.role.symbol() {
                Some(c) => c,
                None if on_route[index] => '*',
                None => node.data.symbol(),
            };
            out.push(c);
            if (index + 1) % self.graph.width() == 0 {
                out.push('\n');
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::room::InkState;
    use crate::level::shape::{ShapeLibrary, ShapeTemplate, Side};

    /// Shape source that always hands out the same bitmap
    struct Fixed(ShapeTemplate);

    impl ShapeSource for Fixed {
        fn pick(&mut self, _side: Side, _rng: &mut GameRng) -> Result<ShapeTemplate> {
            Ok(self.0.clone())
        }
    }

    fn blank() -> Fixed {
        Fixed(ShapeTemplate::from_rows("blank", &["."]).unwrap())
    }

    fn generate(seed: u64) -> Level {
        let mut shapes = ShapeLibrary::builtin().unwrap();
        let mut rng = GameRng::new(seed);
        generate_level(&LevelTemplate::default(), &mut shapes, &mut rng).unwrap()
    }

    #[test]
    fn test_generated_level_is_consistent() {
        let level = generate(42);
        let route = level.route_positions();

        assert_eq!(route.first(), Some(&level.start()));
        assert_eq!(route.last(), Some(&level.exit()));
        assert!(route.len() <= LevelTemplate::default().graphite);
        for pair in route.windows(2) {
            assert_eq!(pair[0].manhattan(pair[1]), 1);
            assert!(!level.travel().forbids(pair[0], pair[1]));
        }
        for pos in &route {
            assert!(!level.graph().get_node_at(*pos).unwrap().data.is_inked());
        }

        let keys = level.keys();
        assert_eq!(keys.len(), 2);
        for key in &keys {
            assert!(route.contains(key));
            let room = level.graph().get_node_at(*key).unwrap().data;
            assert_eq!(room.role, RoleMarker::Key);
        }
        assert_eq!(
            level.graph().get_node_at(level.start()).unwrap().data.role,
            RoleMarker::Start
        );
        assert_eq!(
            level.graph().get_node_at(level.exit()).unwrap().data.role,
            RoleMarker::Exit
        );
    }

    #[test]
    fn test_same_seed_same_level() {
        let a = generate(7);
        let b = generate(7);
        assert_eq!(a.render_ascii(), b.render_ascii());
        assert_eq!(a.route_positions(), b.route_positions());
        assert_eq!(a.keys(), b.keys());
        assert_eq!(a.axis(), b.axis());
    }

    #[test]
    fn test_open_grid_endpoints() {
        let template = LevelTemplate {
            width: 4,
            height: 3,
            key_count: 0,
            ..Default::default()
        };
        let mut rng = GameRng::new(1);
        let level = generate_level(&template, &mut blank(), &mut rng).unwrap();
        // Both scan orders agree on an open grid.
        assert_eq!(level.start(), Position::new(0, 0));
        assert_eq!(level.exit(), Position::new(3, 2));
        assert!(level.cleared().is_empty());
        assert_eq!(level.route().len(), 6);
    }

    #[test]
    fn test_fully_inked_grid_fails() {
        let template = LevelTemplate {
            width: 3,
            height: 3,
            key_count: 0,
            ..Default::default()
        };
        let mut full = Fixed(ShapeTemplate::from_rows("full", &["###", "###", "###"]).unwrap());
        let mut rng = GameRng::new(1);
        let err = generate_level(&template, &mut full, &mut rng).unwrap_err();
        assert!(err.is_retryable());
    }

    #[test]
    fn test_invalid_template_is_not_retryable() {
        let template = LevelTemplate {
            graphite: 0,
            ..Default::default()
        };
        let mut rng = GameRng::new(1);
        let err = generate_level(&template, &mut blank(), &mut rng).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidTemplate { .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_missing_shapes_fail() {
        let mut rng = GameRng::new(1);
        let err = generate_level(&LevelTemplate::default(), &mut ShapeLibrary::new(), &mut rng)
            .unwrap_err();
        assert!(matches!(err, GenerationError::NoShapeForSide { .. }));
    }

    #[test]
    fn test_small_budget_moves_exit() {
        let template = LevelTemplate {
            width: 8,
            height: 8,
            graphite: 4,
            key_count: 0,
            ..Default::default()
        };
        let mut rng = GameRng::new(3);
        let level = generate_level(&template, &mut blank(), &mut rng).unwrap();
        assert!(level.was_truncated());
        assert_eq!(level.route().len(), 4);
        assert_eq!(level.start().manhattan(level.exit()), 3);
    }

    #[test]
    fn test_follow_route_completes_level() {
        let mut level = generate(11);
        assert!(!level.is_complete());

        let added = level.follow_route().unwrap();
        assert_eq!(added, level.route().len() - 1);
        assert!(level.is_complete());
        assert_eq!(level.removable_rooms(), vec![level.exit()]);

        let mut rooms: Vec<RoomDescriptor> = Vec::new();
        level.hand_off(&mut rooms);
        assert_eq!(rooms.len(), level.route().len());
        assert_eq!(rooms[0].role, RoleMarker::Start);
        assert_eq!(rooms[rooms.len() - 1].role, RoleMarker::Exit);
        for room in &rooms {
            assert_eq!(room.ink, InkState::None);
        }
        let middle = rooms.len() / 2;
        let exits = [rooms[middle].north, rooms[middle].south, rooms[middle].west, rooms[middle].east];
        assert_eq!(exits.iter().filter(|&&e| e).count(), 2);
    }

    #[test]
    fn test_player_edits_through_level() {
        let mut level = generate(5);
        let route = level.route_positions();
        assert!(level.add_room(route[0], route[1]).unwrap());
        assert_eq!(level.removable_rooms(), vec![route[1]]);
        assert!(level.remove_room(route[1]).unwrap());
        assert_eq!(level.player_path().len(), 1);
    }

    #[test]
    fn test_render_ascii_shape() {
        let level = generate(3);
        let map = level.render_ascii();
        let lines: Vec<&str> = map.lines().collect();
        assert_eq!(lines.len(), 10);
        assert!(lines.iter().all(|l| l.chars().count() == 10));
        assert_eq!(map.matches('S').count(), 1);
        assert_eq!(map.matches('E').count(), 1);
        assert_eq!(map.matches('K').count(), 2);
        assert_eq!(map.matches('*').count(), level.route().len() - 4);
    }
}
