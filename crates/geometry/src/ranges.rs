use std::collections::BTreeMap;
use std::ops::Range;

use ghostmaze_common::LevelId;

/// Fixed sprite meshes shared by every level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpriteKind {
    Player,
    Ghost,
    /// Hexagonal pad used for start, end and every switch.
    Pad,
}

/// What a draw range belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DrawKey {
    /// Walls, pillars, floor and door jambs of one level.
    LevelStatic(LevelId),
    /// Panel of the `index`-th door of a level.
    Door { level: LevelId, index: usize },
    Sprite(SpriteKind),
}

/// Contiguous slice `[start, start + count)` of the shared index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawRange {
    pub start: u32,
    pub count: u32,
}

impl DrawRange {
    pub fn between(start: usize, end: usize) -> Self {
        Self {
            start: start as u32,
            count: end.saturating_sub(start) as u32,
        }
    }

    pub fn end(&self) -> u32 {
        self.start + self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// As a slice range into the index list.
    pub fn indices(&self) -> Range<usize> {
        self.start as usize..self.end() as usize
    }

    pub fn overlaps(&self, other: &DrawRange) -> bool {
        self.start < other.end() && other.start < self.end()
    }
}

/// Draw ranges recorded by one build pass, keyed by what they draw.
///
/// Ranges are only meaningful together with the mesh built in the same pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawRanges {
    ranges: BTreeMap<DrawKey, DrawRange>,
}

impl DrawRanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, key: DrawKey, range: DrawRange) {
        self.ranges.insert(key, range);
    }

    pub fn get(&self, key: DrawKey) -> Option<DrawRange> {
        self.ranges.get(&key).copied()
    }

    pub fn level(&self, id: LevelId) -> Option<DrawRange> {
        self.get(DrawKey::LevelStatic(id))
    }

    pub fn door(&self, level: LevelId, index: usize) -> Option<DrawRange> {
        self.get(DrawKey::Door { level, index })
    }

    pub fn sprite(&self, kind: SpriteKind) -> Option<DrawRange> {
        self.get(DrawKey::Sprite(kind))
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DrawKey, DrawRange)> + '_ {
        self.ranges.iter().map(|(k, r)| (*k, *r))
    }
}
