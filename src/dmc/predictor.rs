//! DMC bit predictor.
//!
//! The model is a directed graph of nodes, each holding two transition
//! counts and two successor edges (one per bit value). Nodes live in a
//! single arena and refer to each other by [`NodeId`]; cloning appends a
//! node and rewrites one edge, so existing ids are never invalidated.
//!
//! The arena starts with the braid: 256 strands of 256 nodes. Within a
//! strand, positions `0..127` form a binary tree over the first seven bits
//! of a byte and positions `127..255` decide the eighth bit, jumping to the
//! root of another strand. Position 255 is never reached.

use tracing::debug;

use crate::config::DmcConfig;
use crate::error::Result;
use crate::utils::buffer::try_with_capacity;

/// Number of strands in the braid.
pub const STRANDS: usize = 256;

/// Nodes per strand.
pub const STRAND_LEN: usize = 256;

/// Nodes occupied by the braid at the start of the arena.
pub const BRAID_NODES: usize = STRANDS * STRAND_LEN;

/// First position in a strand whose edges leave the strand.
const LAST_BIT_POS: usize = 127;

/// Count both edges of every braid node start with.
const INITIAL_COUNT: f32 = 0.2;

/// Minimum count on the taken edge before its target may be cloned.
const MIN_EDGE_COUNT: f32 = 2.0;

/// Minimum traffic into the target from other edges before cloning.
const MIN_OTHER_COUNT: f32 = 2.0;

/// Index of a node within the predictor arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Root of strand 0, where every model starts.
    pub const ROOT: NodeId = NodeId(0);

    /// Braid node at position `pos` of strand `strand`.
    pub fn braid(strand: usize, pos: usize) -> NodeId {
        NodeId(strand * STRAND_LEN + pos)
    }

    /// Whether this id falls inside the braid rather than the clone area.
    pub fn is_braid(self) -> bool {
        self.0 < BRAID_NODES
    }
}

/// One state of the Markov model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    /// Observed transitions on bit 0 and bit 1.
    pub count: [f32; 2],
    /// Successor for bit 0 and bit 1.
    pub next: [NodeId; 2],
}

impl Node {
    /// Braid node stored at arena `index`.
    fn braid_at(index: usize) -> Node {
        let strand = index / STRAND_LEN;
        let pos = index % STRAND_LEN;
        let next = if pos < LAST_BIT_POS {
            [
                NodeId::braid(strand, 2 * pos + 1),
                NodeId::braid(strand, 2 * pos + 2),
            ]
        } else if pos < STRAND_LEN - 1 {
            [
                NodeId::braid(pos + 1, 0),
                NodeId::braid(pos - LAST_BIT_POS, 0),
            ]
        } else {
            // Unreachable filler; kept pointing at a valid node.
            [NodeId::braid(strand, 0); 2]
        };
        Node {
            count: [INITIAL_COUNT; 2],
            next,
        }
    }

    fn total(&self) -> f32 {
        self.count[0] + self.count[1]
    }
}

/// Adaptive bit predictor backed by a node arena.
///
/// Memory for the braid and every clone is reserved once in
/// [`Predictor::new`]. Once more than [`DmcConfig::clone_limit`] clones
/// exist, the whole arena is reset to a fresh braid.
///
/// # Examples
///
/// ```
/// use braidcodec::config::DmcConfig;
/// use braidcodec::dmc::predictor::Predictor;
///
/// let mut model = Predictor::new(&DmcConfig::default()).unwrap();
/// assert_eq!(model.predict(), 0.5);
/// model.update(false);
/// assert_eq!(model.clones(), 0);
/// ```
pub struct Predictor {
    nodes: Vec<Node>,
    curr: NodeId,
    clone_limit: usize,
    resets: usize,
}

impl Predictor {
    /// Allocates the arena and builds the initial braid.
    ///
    /// # Errors
    /// Returns [`CodecError::AllocationFailure`](crate::error::CodecError)
    /// if the arena cannot be reserved.
    pub fn new(config: &DmcConfig) -> Result<Self> {
        let nodes = try_with_capacity(BRAID_NODES + config.clone_capacity())?;
        let mut predictor = Predictor {
            nodes,
            curr: NodeId::ROOT,
            clone_limit: config.clone_limit(),
            resets: 0,
        };
        predictor.braid();
        Ok(predictor)
    }

    /// Discards every clone and restores the braid with initial counts.
    pub fn braid(&mut self) {
        self.nodes.clear();
        self.nodes.extend((0..BRAID_NODES).map(Node::braid_at));
        self.curr = NodeId::ROOT;
    }

    /// Rebuilds the braid and records it as a reset.
    pub fn reset(&mut self) {
        self.resets += 1;
        self.braid();
    }

    /// Probability that the next bit is 0.
    pub fn predict(&self) -> f32 {
        let node = &self.nodes[self.curr.0];
        node.count[0] / node.total()
    }

    /// Records `bit` at the current node and follows its edge, cloning the
    /// target first when the edge carries enough of its traffic.
    pub fn update(&mut self, bit: bool) {
        let i = usize::from(bit);
        let curr = self.curr.0;
        let edge = self.nodes[curr].count[i];
        let target_id = self.nodes[curr].next[i];
        let target = self.nodes[target_id.0];
        let total = target.total();

        if edge >= MIN_EDGE_COUNT && total >= MIN_OTHER_COUNT + edge {
            let ratio = edge / total;
            let clone = Node {
                count: [target.count[0] * ratio, target.count[1] * ratio],
                next: target.next,
            };
            let shrunk = &mut self.nodes[target_id.0];
            shrunk.count[0] -= clone.count[0];
            shrunk.count[1] -= clone.count[1];

            let clone_id = NodeId(self.nodes.len());
            self.nodes.push(clone);
            self.nodes[curr].next[i] = clone_id;
        }

        self.nodes[curr].count[i] += 1.0;
        self.curr = self.nodes[curr].next[i];

        if self.clones() > self.clone_limit {
            debug!(
                clones = self.clones(),
                "predictor memory exhausted, rebuilding braid"
            );
            self.reset();
        }
    }

    /// The node the next bit is predicted from.
    pub fn current(&self) -> NodeId {
        self.curr
    }

    /// Looks up a node by id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Number of clones currently in the arena.
    pub fn clones(&self) -> usize {
        self.nodes.len() - BRAID_NODES
    }

    /// Total arena slots reserved for braid and clones.
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// How many times the braid has been rebuilt since creation.
    pub fn resets(&self) -> usize {
        self.resets
    }
}
