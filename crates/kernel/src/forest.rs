use glam::{Vec2, Vec3};
use rts_common::{Tree, TreeId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An event record produced by every mutation to the forest.
///
/// A presentation layer drains these between ticks to mirror the forest
/// without re-scanning it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ForestEvent {
    /// Tree was planted at the given position.
    Planted { id: TreeId, position: Vec3 },
    /// Tree was chopped down. Carries its last position.
    Felled { id: TreeId, position: Vec3 },
}

/// Errors from forest mutations.
#[derive(Debug, thiserror::Error)]
pub enum ForestError {
    #[error("tree {0:?} is already planted")]
    DuplicateTree(TreeId),
}

/// Rectangle on the XZ plane that scattered trees are placed in, plus the
/// height they stand at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Minimum corner as (x, z).
    pub min: Vec2,
    /// Maximum corner as (x, z).
    pub max: Vec2,
    /// Y coordinate of every scattered tree.
    pub height: f32,
}

impl Default for Bounds {
    /// The 10x10 block of land tiles (2 units apart) the sandbox lays out.
    fn default() -> Self {
        Self {
            min: Vec2::new(-0.5, -18.5),
            max: Vec2::new(18.5, 0.5),
            height: 3.0,
        }
    }
}

impl Bounds {
    pub fn contains(&self, p: Vec3) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.z >= self.min.y && p.z <= self.max.y
    }
}

/// The tree collection.
///
/// Trees live in a dense `Vec` and an id-to-slot index so that lookup and
/// removal are both O(1). Removal swaps the last tree into the freed slot,
/// so iteration order is only stable between removals.
#[derive(Debug, Clone, Default)]
pub struct Forest {
    trees: Vec<Tree>,
    slots: HashMap<TreeId, usize>,
    /// Append-only event log of all mutations.
    event_log: Vec<ForestEvent>,
}

impl Forest {
    /// Create an empty forest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Plant `count` trees at deterministic pseudo-random positions inside `bounds`.
    ///
    /// The same seed always yields the same ids and positions in the same order.
    pub fn scatter(count: usize, seed: u64, bounds: Bounds) -> Self {
        let mut rng = SplitMix64::new(seed);
        let mut forest = Self::new();
        while forest.len() < count {
            let id = TreeId::from_u128(((rng.next_u64() as u128) << 64) | rng.next_u64() as u128);
            let x = bounds.min.x + rng.next_f32() * (bounds.max.x - bounds.min.x);
            let z = bounds.min.y + rng.next_f32() * (bounds.max.y - bounds.min.y);
            if let Err(e) = forest.plant_with_id(id, Vec3::new(x, bounds.height, z)) {
                tracing::warn!("skipping scattered tree: {e}");
            }
        }
        tracing::debug!(count, seed, "scattered forest");
        forest
    }

    /// Number of trees still standing.
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// Plant a tree with a fresh id. Returns its id.
    pub fn plant(&mut self, position: Vec3) -> TreeId {
        let mut id = TreeId::new();
        while self.slots.contains_key(&id) {
            id = TreeId::new();
        }
        self.insert(Tree::new(id, position));
        id
    }

    /// Plant a tree with a specific id (used for scattering and replay).
    pub fn plant_with_id(&mut self, id: TreeId, position: Vec3) -> Result<(), ForestError> {
        if self.slots.contains_key(&id) {
            return Err(ForestError::DuplicateTree(id));
        }
        self.insert(Tree::new(id, position));
        Ok(())
    }

    fn insert(&mut self, tree: Tree) {
        self.slots.insert(tree.id(), self.trees.len());
        self.trees.push(tree);
        self.event_log.push(ForestEvent::Planted {
            id: tree.id(),
            position: tree.position(),
        });
    }

    /// Remove a tree by identity. Returns it if it was standing.
    ///
    /// O(1): the last tree is moved into the freed slot.
    pub fn remove(&mut self, id: TreeId) -> Option<Tree> {
        let slot = self.slots.remove(&id)?;
        let tree = self.trees.swap_remove(slot);
        if let Some(moved) = self.trees.get(slot) {
            self.slots.insert(moved.id(), slot);
        }
        self.event_log.push(ForestEvent::Felled {
            id,
            position: tree.position(),
        });
        Some(tree)
    }

    pub fn get(&self, id: TreeId) -> Option<&Tree> {
        self.slots.get(&id).map(|&slot| &self.trees[slot])
    }

    pub fn contains(&self, id: TreeId) -> bool {
        self.slots.contains_key(&id)
    }

    /// All standing trees in current iteration order.
    pub fn iter(&self) -> impl Iterator<Item = &Tree> {
        self.trees.iter()
    }

    /// All standing trees as a slice, in current iteration order.
    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    /// The tree with the smallest squared distance to `point`.
    ///
    /// Distance is full 3-D. Ties go to the tree that comes first in
    /// iteration order. Returns `None` for an empty forest.
    pub fn nearest_to(&self, point: Vec3) -> Option<&Tree> {
        let mut best: Option<(&Tree, f32)> = None;
        for tree in &self.trees {
            let d = tree.position().distance_squared(point);
            match best {
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((tree, d)),
            }
        }
        best.map(|(tree, _)| tree)
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<ForestEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[ForestEvent] {
        &self.event_log
    }

    /// Inspector-style summary.
    pub fn summary(&self) -> ForestSummary {
        let felled = self
            .event_log
            .iter()
            .filter(|e| matches!(e, ForestEvent::Felled { .. }))
            .count();
        ForestSummary {
            standing: self.len(),
            felled_pending: felled,
            pending_events: self.event_log.len(),
        }
    }
}

/// Summary of forest state for logging and the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForestSummary {
    pub standing: usize,
    /// Trees felled since the event log was last drained.
    pub felled_pending: usize,
    pub pending_events: usize,
}

impl std::fmt::Display for ForestSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Forest: standing={} felled={} pending_events={}",
            self.standing, self.felled_pending, self.pending_events
        )
    }
}

/// Splitmix64 generator. Small, fast and identical on every platform.
struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform in [0, 1) from the top 24 bits.
    fn next_f32(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }
}
