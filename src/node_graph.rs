use crate::error::Result;
use crate::occupancy::{OccupancyField, WorldPosition};
use crate::path_finder::PathFinder;
use crate::{step_cost, ALLOW_CORNER_CUTTING, NEIGHBOUR_OFFSETS, N_SMALLVEC_SIZE};
use fxhash::FxBuildHasher;
use grid_util::point::Point;
use indexmap::IndexMap;
use itertools::iproduct;
use log::info;
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Index of a [Node] inside the [NodeGraph] that created it. Ids are handed out row-major from
/// the bottom row and stay valid until the graph is rebuilt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub const fn new(index: usize) -> NodeId {
        NodeId(index)
    }
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A free cell of the occupancy field.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub cell: Point,
    /// Center of the cell in world space.
    pub world: WorldPosition,
    pub neighbours: SmallVec<[NodeId; N_SMALLVEC_SIZE]>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GraphConfig {
    /// If [false], a diagonal neighbour is only linked when both cells sharing the corner are free
    /// as well.
    pub allow_corner_cutting: bool,
}

impl Default for GraphConfig {
    fn default() -> GraphConfig {
        GraphConfig {
            allow_corner_cutting: ALLOW_CORNER_CUTTING,
        }
    }
}

/// [NodeGraph] owns one [Node] per free cell of an [OccupancyField], keyed by cell coordinate.
/// Neighbours are stored as [NodeId]s into the same graph, so adjacency is always symmetric and
/// never refers outside the graph. Connected components are tracked in a [UnionFind] so that
/// unreachable goals can be rejected without flood-filling the graph.
///
/// A graph starts out unbuilt; [ensure_built](Self::ensure_built) builds it on demand and
/// [rebuild](Self::rebuild) replaces every node after the field has changed.
#[derive(Clone, Debug)]
pub struct NodeGraph {
    nodes: FxIndexMap<Point, Node>,
    components: UnionFind<usize>,
    config: GraphConfig,
    built: bool,
}

impl Default for NodeGraph {
    fn default() -> NodeGraph {
        NodeGraph::new(GraphConfig::default())
    }
}

impl NodeGraph {
    /// An unbuilt graph without nodes.
    pub fn new(config: GraphConfig) -> NodeGraph {
        NodeGraph {
            nodes: FxIndexMap::default(),
            components: UnionFind::new(0),
            config,
            built: false,
        }
    }

    pub fn build<F: OccupancyField>(field: &F) -> NodeGraph {
        NodeGraph::build_with_config(field, GraphConfig::default())
    }

    pub fn build_with_config<F: OccupancyField>(field: &F, config: GraphConfig) -> NodeGraph {
        let mut graph = NodeGraph::new(config);
        graph.rebuild(field);
        graph
    }

    /// Builds the graph if that has not happened yet. Returns whether a build took place.
    pub fn ensure_built<F: OccupancyField>(&mut self, field: &F) -> bool {
        if self.built {
            return false;
        }
        self.rebuild(field);
        true
    }

    /// Discards all nodes and builds them again from `field`. Node ids handed out before are
    /// meaningless afterwards.
    pub fn rebuild<F: OccupancyField>(&mut self, field: &F) {
        let (w, h) = (field.width() as i32, field.height() as i32);
        info!("Building node graph from a {}x{} field", w, h);
        let mut nodes = FxIndexMap::default();
        for (y, x) in iproduct!(0..h, 0..w) {
            if field.is_free(x, y) {
                let cell = Point::new(x, y);
                nodes.insert(
                    cell,
                    Node {
                        cell,
                        world: field.cell_center(x, y),
                        neighbours: SmallVec::new(),
                    },
                );
            }
        }
        info!("{} of {} cells are free", nodes.len(), w * h);

        for ix in 0..nodes.len() {
            let cell = nodes[ix].cell;
            let neighbours = NEIGHBOUR_OFFSETS
                .iter()
                .filter(|&&(dx, dy)| self.can_step(&nodes, cell, dx, dy))
                .filter_map(|&(dx, dy)| nodes.get_index_of(&Point::new(cell.x + dx, cell.y + dy)))
                .map(NodeId)
                .collect::<SmallVec<[NodeId; N_SMALLVEC_SIZE]>>();
            nodes[ix].neighbours = neighbours;
        }
        self.nodes = nodes;
        self.generate_components();
        self.built = true;
    }

    fn can_step(&self, nodes: &FxIndexMap<Point, Node>, from: Point, dx: i32, dy: i32) -> bool {
        let diagonal = dx != 0 && dy != 0;
        if self.config.allow_corner_cutting || !diagonal {
            true
        } else {
            nodes.contains_key(&Point::new(from.x + dx, from.y))
                && nodes.contains_key(&Point::new(from.x, from.y + dy))
        }
    }

    /// Generates a new [UnionFind] structure and links up neighbours to the same components.
    fn generate_components(&mut self) {
        info!("Generating connected components");
        self.components = UnionFind::new(self.nodes.len());
        for (ix, node) in self.nodes.values().enumerate() {
            for n in &node.neighbours {
                self.components.union(ix, n.0);
            }
        }
    }

    pub fn config(&self) -> GraphConfig {
        self.config
    }
    pub fn is_built(&self) -> bool {
        self.built
    }
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|n| n.neighbours.len()).sum::<usize>() / 2
    }

    /// All nodes in [NodeId] order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = &Node> + '_ {
        self.nodes.values()
    }

    /// Returns [None] for blocked and out of bounds cells.
    pub fn node_at(&self, cell: Point) -> Option<&Node> {
        self.nodes.get(&cell)
    }
    pub fn node_id(&self, cell: Point) -> Option<NodeId> {
        self.nodes.get_index_of(&cell).map(NodeId)
    }
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get_index(id.0).map(|(_, node)| node)
    }
    pub fn neighbours(&self, id: NodeId) -> &[NodeId] {
        self.node(id)
            .map(|node| node.neighbours.as_slice())
            .unwrap_or(&[])
    }

    /// Neighbours of a node together with the cost of stepping to them.
    pub fn neighbours_and_cost(&self, id: NodeId) -> SmallVec<[(NodeId, i32); N_SMALLVEC_SIZE]> {
        let Some(node) = self.node(id) else {
            return SmallVec::new();
        };
        node.neighbours
            .iter()
            .filter_map(|&n| {
                self.node(n)
                    .map(|neighbour| (n, step_cost(&node.cell, &neighbour.cell)))
            })
            .collect()
    }

    pub fn all_free_coordinates(&self) -> Vec<Point> {
        self.nodes.keys().copied().collect()
    }

    /// Retrieves the component id a given node belongs to.
    pub fn component(&self, id: NodeId) -> usize {
        self.components.find(id.0)
    }
    pub(crate) fn same_component(&self, a: NodeId, b: NodeId) -> bool {
        self.components.equiv(a.0, b.0)
    }
    /// Checks if both cells are nodes on the same component.
    pub fn reachable(&self, start: Point, goal: Point) -> bool {
        match (self.node_id(start), self.node_id(goal)) {
            (Some(a), Some(b)) => self.same_component(a, b),
            _ => false,
        }
    }

    /// Creates a [PathFinder] towards `goal` with the default configuration.
    pub fn path_finder(&self, goal: Point) -> Result<PathFinder<'_>> {
        PathFinder::new(self, goal)
    }
}
