//! Room adjacency graph: spanning tree plus loop edges

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::room::{RoomId, RoomRegion};
use super::triangulate::delaunay_edges;
use crate::rng::GenRng;

bitflags! {
    /// Why an edge is part of the final graph
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EdgeFlags: u8 {
        /// Selected by Kruskal
        const SPANNING_TREE = 0x01;
        /// Re-added to create a loop
        const EXTRA = 0x02;
    }
}

// Manual serde impl for EdgeFlags
impl Serialize for EdgeFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for EdgeFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(EdgeFlags::from_bits_truncate(bits))
    }
}

/// Undirected edge between two rooms; `a < b` always
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomEdge {
    pub a: RoomId,
    pub b: RoomId,
    /// Euclidean distance between the room centers
    pub distance: f32,
    pub flags: EdgeFlags,
}

impl RoomEdge {
    pub fn new(a: RoomId, b: RoomId, distance: f32) -> Self {
        let (a, b) = if a <= b { (a, b) } else { (b, a) };
        Self {
            a,
            b,
            distance,
            flags: EdgeFlags::empty(),
        }
    }

    pub fn connects(&self, x: RoomId, y: RoomId) -> bool {
        (self.a == x && self.b == y) || (self.a == y && self.b == x)
    }

    fn key(&self) -> (RoomId, RoomId) {
        (self.a, self.b)
    }
}

/// Tracks which rooms are joined (union-find over room indices)
#[derive(Debug, Clone)]
pub struct ConnectivityTracker {
    parent: Vec<usize>,
    /// Number of distinct classes left
    classes: usize,
}

impl ConnectivityTracker {
    /// Every room starts in its own class
    pub fn new(num_rooms: usize) -> Self {
        Self {
            parent: (0..num_rooms).collect(),
            classes: num_rooms,
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    /// Check if two rooms are already joined
    pub fn are_connected(&mut self, a: usize, b: usize) -> bool {
        if a >= self.parent.len() || b >= self.parent.len() {
            return false;
        }
        self.find(a) == self.find(b)
    }

    /// Join two rooms' classes. Returns false if they were already joined.
    pub fn merge(&mut self, a: usize, b: usize) -> bool {
        if a >= self.parent.len() || b >= self.parent.len() {
            return false;
        }
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }
        self.parent[rb] = ra;
        self.classes -= 1;
        true
    }

    pub fn all_connected(&self) -> bool {
        self.classes <= 1
    }
}

/// Adjacency graph over placed rooms
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomGraph {
    pub rooms: Vec<RoomRegion>,
    /// Delaunay candidates, sorted by room pair
    pub candidates: Vec<RoomEdge>,
    /// Kruskal selection, in selection order
    pub tree: Vec<RoomEdge>,
    /// Loop edges, sorted by room pair
    pub extra: Vec<RoomEdge>,
    /// `tree` followed by `extra`
    pub edges: Vec<RoomEdge>,
}

impl RoomGraph {
    /// Triangulate the rooms, select a spanning tree and add loops
    ///
    /// With fewer than two rooms the graph has no edges.
    pub fn build(rooms: Vec<RoomRegion>, extra_edge_ratio: f32, rng: &mut GenRng) -> Self {
        let centers: Vec<_> = rooms.iter().map(|r| r.center).collect();
        let candidates: Vec<RoomEdge> = delaunay_edges(&centers)
            .into_iter()
            .map(|(a, b)| {
                RoomEdge::new(
                    rooms[a].id,
                    rooms[b].id,
                    centers[a].distance(centers[b]),
                )
            })
            .collect();

        let (tree, remaining) = kruskal(rooms.len(), &candidates);
        let extra = select_extra(remaining, extra_edge_ratio, rng);

        let mut edges = tree.clone();
        edges.extend(extra.iter().copied());

        debug!(
            "graph: {} rooms, {} candidates, {} tree, {} extra",
            rooms.len(),
            candidates.len(),
            tree.len(),
            extra.len()
        );

        Self {
            rooms,
            candidates,
            tree,
            extra,
            edges,
        }
    }

    /// Check the final edge set joins every room
    pub fn is_connected(&self) -> bool {
        let mut tracker = ConnectivityTracker::new(self.rooms.len());
        for edge in &self.edges {
            tracker.merge(edge.a.index(), edge.b.index());
        }
        tracker.all_connected()
    }

    pub fn room(&self, id: RoomId) -> Option<&RoomRegion> {
        self.rooms.get(id.index())
    }

    pub fn entrance_room(&self) -> Option<&RoomRegion> {
        self.rooms.iter().find(|r| r.is_entrance())
    }

    pub fn exit_room(&self) -> Option<&RoomRegion> {
        self.rooms.iter().find(|r| r.is_exit())
    }

    /// Rooms adjacent to `id` in the final edge set
    pub fn neighbors(&self, id: RoomId) -> impl Iterator<Item = RoomId> + '_ {
        self.edges.iter().filter_map(move |e| {
            if e.a == id {
                Some(e.b)
            } else if e.b == id {
                Some(e.a)
            } else {
                None
            }
        })
    }

    /// Warn (never fail) if the final graph leaves a room out
    pub(crate) fn check_connected(&self) -> bool {
        let connected = self.is_connected();
        if !connected && self.rooms.len() > 1 {
            warn!(
                "room graph is disconnected ({} rooms, {} edges)",
                self.rooms.len(),
                self.edges.len()
            );
        }
        connected
    }
}

/// Minimum spanning tree over the candidates; returns (tree, rejected)
fn kruskal(num_rooms: usize, candidates: &[RoomEdge]) -> (Vec<RoomEdge>, Vec<RoomEdge>) {
    let mut sorted = candidates.to_vec();
    sorted.sort_by(|x, y| {
        x.distance
            .total_cmp(&y.distance)
            .then_with(|| x.key().cmp(&y.key()))
    });

    let mut tracker = ConnectivityTracker::new(num_rooms);
    let mut tree = Vec::new();
    let mut rest = Vec::new();
    for mut edge in sorted {
        if tracker.merge(edge.a.index(), edge.b.index()) {
            edge.flags |= EdgeFlags::SPANNING_TREE;
            tree.push(edge);
        } else {
            rest.push(edge);
        }
    }
    (tree, rest)
}

/// Sample `round(ratio × |remaining|)` edges uniformly as loops
fn select_extra(mut remaining: Vec<RoomEdge>, ratio: f32, rng: &mut GenRng) -> Vec<RoomEdge> {
    let count = ((remaining.len() as f32) * ratio.clamp(0.0, 1.0)).round() as usize;
    if count == 0 {
        return Vec::new();
    }

    // Canonical order before shuffling so the draw depends only on the seed
    remaining.sort_by_key(RoomEdge::key);
    rng.shuffle(&mut remaining);
    remaining.truncate(count);
    remaining.sort_by_key(RoomEdge::key);
    for edge in &mut remaining {
        edge.flags |= EdgeFlags::EXTRA;
    }
    remaining
}
