//! Fixed-size 2D lattice with 4-directional edges

use std::collections::VecDeque;

use crate::error::{GenerationError, Result};

use super::node::{Direction, Edge, GridNode, NodeId, Position};

/// Cost of moving between two neighboring nodes
pub const EDGE_COST: u32 = 1;

/// Generic grid graph
///
/// Nodes are stored row-major and owned by the graph. Edges are built once at
/// construction and never change; only node payloads do.
#[derive(Debug, Clone)]
pub struct Graph<T> {
    width: usize,
    height: usize,
    pub(crate) nodes: Vec<GridNode<T>>,
}

impl<T: Default> Graph<T> {
    /// Build a `width` x `height` graph with default payloads
    ///
    /// Scans row-major and links every node to its west and north neighbors
    /// in both directions, so the graph ends up fully 4-connected.
    pub fn new(width: usize, height: usize) -> Self {
        let mut nodes: Vec<GridNode<T>> = Vec::with_capacity(width * height);

        for y in 0..height {
            for x in 0..width {
                let id = NodeId(nodes.len());
                let mut node = GridNode::new(Position::new(x as i32, y as i32), T::default());

                // west connection
                if x > 0 {
                    let other = NodeId(id.0 - 1);
                    node.edges.push(Edge {
                        target: other,
                        direction: Direction::West,
                        cost: EDGE_COST,
                    });
                    nodes[other.0].edges.push(Edge {
                        target: id,
                        direction: Direction::East,
                        cost: EDGE_COST,
                    });
                }
                // north connection
                if y > 0 {
                    let other = NodeId(id.0 - width);
                    node.edges.push(Edge {
                        target: other,
                        direction: Direction::North,
                        cost: EDGE_COST,
                    });
                    nodes[other.0].edges.push(Edge {
                        target: id,
                        direction: Direction::South,
                        cost: EDGE_COST,
                    });
                }

                nodes.push(node);
            }
        }

        Self {
            width,
            height,
            nodes,
        }
    }
}

impl<T> Graph<T> {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total number of directed edges
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.edges.len()).sum()
    }

    /// Check if a position lies inside the grid
    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && (position.x as usize) < self.width
            && (position.y as usize) < self.height
    }

    /// Handle of the node at `position`
    pub fn id_at(&self, position: Position) -> Result<NodeId> {
        if !self.contains(position) {
            return Err(GenerationError::OutOfRange {
                x: position.x,
                y: position.y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(NodeId(position.y as usize * self.width + position.x as usize))
    }

    /// Node at `(x, y)`
    pub fn get_node(&self, x: i32, y: i32) -> Result<&GridNode<T>> {
        self.get_node_at(Position::new(x, y))
    }

    /// Node at `position`
    pub fn get_node_at(&self, position: Position) -> Result<&GridNode<T>> {
        let id = self.id_at(position)?;
        Ok(&self.nodes[id.0])
    }

    /// Mutable node at `position`
    pub fn get_node_mut(&mut self, position: Position) -> Result<&mut GridNode<T>> {
        let id = self.id_at(position)?;
        Ok(&mut self.nodes[id.0])
    }

    /// Node behind a handle issued by this graph
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by a larger graph.
    pub fn node(&self, id: NodeId) -> &GridNode<T> {
        &self.nodes[id.0]
    }

    /// Mutable node behind a handle issued by this graph
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by a larger graph.
    pub fn node_mut(&mut self, id: NodeId) -> &mut GridNode<T> {
        &mut self.nodes[id.0]
    }

    /// Iterate over all nodes in row-major order
    pub fn nodes(&self) -> impl Iterator<Item = &GridNode<T>> {
        self.nodes.iter()
    }

    /// Iterate over all node handles in row-major order
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + use<T> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Manhattan distance between two nodes
    pub fn manhattan(&self, a: NodeId, b: NodeId) -> u32 {
        self.nodes[a.0].position.manhattan(self.nodes[b.0].position)
    }

    /// Positions of a list of node handles
    pub fn positions(&self, ids: &[NodeId]) -> Vec<Position> {
        ids.iter().map(|id| self.nodes[id.0].position).collect()
    }

    /// Find the nearest node, starting from `seed`, that satisfies `predicate`
    ///
    /// Expands breadth-first along edges, so nodes are tested in order of
    /// their grid distance from the seed (ties in edge order). The predicate
    /// sees each reachable node at most once. The search is read-only: a
    /// caller that wants to modify the found node does so on the returned
    /// handle.
    pub fn find_node<P>(&self, seed: Position, mut predicate: P) -> Result<Option<NodeId>>
    where
        P: FnMut(&GridNode<T>) -> bool,
    {
        let start = self.id_at(seed)?;
        let mut seen = vec![false; self.nodes.len()];
        let mut queue = VecDeque::new();
        seen[start.0] = true;
        queue.push_back(start);

        while let Some(id) = queue.pop_front() {
            let node = &self.nodes[id.0];
            if predicate(node) {
                return Ok(Some(id));
            }
            for edge in &node.edges {
                if !seen[edge.target.0] {
                    seen[edge.target.0] = true;
                    queue.push_back(edge.target);
                }
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adjacent_pairs(width: usize, height: usize) -> usize {
        width.saturating_sub(1) * height + height.saturating_sub(1) * width
    }

    #[test]
    fn test_construction_counts() {
        let graph: Graph<()> = Graph::new(4, 3);
        assert_eq!(graph.len(), 12);
        assert_eq!(graph.edge_count(), 2 * adjacent_pairs(4, 3));
    }

    #[test]
    fn test_single_node_has_no_edges() {
        let graph: Graph<()> = Graph::new(1, 1);
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_edges_point_at_neighbors() {
        let graph: Graph<()> = Graph::new(5, 5);
        for node in graph.nodes() {
            for edge in node.edges() {
                let target = graph.node(edge.target).position();
                assert_eq!(node.position().step(edge.direction), target);
                assert_eq!(edge.cost, EDGE_COST);
            }
        }
    }

    #[test]
    fn test_corner_and_center_degree() {
        let graph: Graph<()> = Graph::new(3, 3);
        assert_eq!(graph.get_node(0, 0).unwrap().edges().len(), 2);
        assert_eq!(graph.get_node(1, 0).unwrap().edges().len(), 3);
        assert_eq!(graph.get_node(1, 1).unwrap().edges().len(), 4);
        assert!(graph.get_node(0, 0).unwrap().edge(Direction::North).is_none());
        assert!(graph.get_node(0, 0).unwrap().edge(Direction::East).is_some());
    }

    #[test]
    fn test_get_node_out_of_range() {
        let graph: Graph<()> = Graph::new(3, 2);
        assert!(graph.get_node(2, 1).is_ok());
        for (x, y) in [(-1, 0), (0, -1), (3, 0), (0, 2)] {
            assert!(matches!(
                graph.get_node(x, y),
                Err(GenerationError::OutOfRange { .. })
            ));
        }
    }

    #[test]
    fn test_node_positions_match_lookup() {
        let graph: Graph<()> = Graph::new(6, 4);
        for y in 0..4 {
            for x in 0..6 {
                assert_eq!(graph.get_node(x, y).unwrap().position(), Position::new(x, y));
            }
        }
    }

    #[test]
    fn test_find_node_nearest_first() {
        let mut graph: Graph<u8> = Graph::new(5, 5);
        graph.get_node_mut(Position::new(4, 4)).unwrap().data = 1;
        graph.get_node_mut(Position::new(1, 2)).unwrap().data = 1;

        let found = graph
            .find_node(Position::new(0, 0), |n| n.data == 1)
            .unwrap()
            .unwrap();
        assert_eq!(graph.node(found).position(), Position::new(1, 2));
    }

    #[test]
    fn test_find_node_visits_each_node_once() {
        let graph: Graph<()> = Graph::new(4, 4);
        let mut calls = 0;
        let found = graph
            .find_node(Position::new(2, 1), |_| {
                calls += 1;
                false
            })
            .unwrap();
        assert!(found.is_none());
        assert_eq!(calls, 16);
    }

    #[test]
    fn test_find_node_out_of_range_seed() {
        let graph: Graph<()> = Graph::new(2, 2);
        assert!(graph.find_node(Position::new(5, 5), |_| true).is_err());
    }
}
