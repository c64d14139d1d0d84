use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use ghostmaze_common::{LevelId, SwitchUid};

use crate::loader::LevelError;

/// A door: a hinge line between two wall ends plus its open flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Door {
    pub polygon: [Vec2; 2],
    #[serde(default)]
    pub open: bool,
}

/// A pressure switch on the floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Switch {
    pub uid: SwitchUid,
    pub position: Vec2,
    #[serde(default)]
    pub pressed: bool,
}

/// One maze level in level units (y of a `Vec2` is the depth axis on screen).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub id: LevelId,
    /// Closed rings; each consecutive pair (wrapping) is one wall segment.
    #[serde(default)]
    pub walls: Vec<Vec<Vec2>>,
    /// Convex floor regions, fan-triangulated from their first point.
    #[serde(default, alias = "polys")]
    pub floors: Vec<Vec<Vec2>>,
    #[serde(default)]
    pub doors: Vec<Door>,
    #[serde(default)]
    pub switches: Vec<Switch>,
    pub start: Vec2,
    pub end: Vec2,
}

impl Level {
    /// An empty level with the given id and start/end points.
    pub fn new(id: LevelId, start: Vec2, end: Vec2) -> Self {
        Self {
            id,
            walls: Vec::new(),
            floors: Vec::new(),
            doors: Vec::new(),
            switches: Vec::new(),
            start,
            end,
        }
    }

    /// Number of wall segments the geometry builder will consider, including
    /// zero-length ones it later skips.
    pub fn segment_count(&self) -> usize {
        self.walls.iter().map(Vec::len).sum()
    }

    pub fn switch(&self, uid: SwitchUid) -> Option<&Switch> {
        self.switches.iter().find(|s| s.uid == uid)
    }

    pub fn switch_mut(&mut self, uid: SwitchUid) -> Option<&mut Switch> {
        self.switches.iter_mut().find(|s| s.uid == uid)
    }

    pub(crate) fn check_switch_uids(&self) -> Result<(), LevelError> {
        let mut seen = BTreeSet::new();
        for s in &self.switches {
            if !seen.insert(s.uid) {
                return Err(LevelError::DuplicateSwitch {
                    level: self.id,
                    uid: s.uid,
                });
            }
        }
        Ok(())
    }
}

/// An ordered collection of levels, built into one shared mesh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelSet {
    pub levels: Vec<Level>,
}

impl LevelSet {
    /// Build a level set, rejecting duplicate level ids or switch uids.
    pub fn new(levels: Vec<Level>) -> Result<Self, LevelError> {
        let set = Self { levels };
        set.validate()?;
        Ok(set)
    }

    pub fn validate(&self) -> Result<(), LevelError> {
        let mut ids = BTreeSet::new();
        for level in &self.levels {
            if !ids.insert(level.id) {
                return Err(LevelError::DuplicateLevel(level.id));
            }
            level.check_switch_uids()?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, id: LevelId) -> Option<&Level> {
        self.levels.iter().find(|l| l.id == id)
    }

    pub fn get_mut(&mut self, id: LevelId) -> Option<&mut Level> {
        self.levels.iter_mut().find(|l| l.id == id)
    }

    /// Like [`LevelSet::get`] but as an error for callers that need the level.
    pub fn require(&self, id: LevelId) -> Result<&Level, LevelError> {
        self.get(id).ok_or(LevelError::UnknownLevel(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Level> {
        self.levels.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(id: u32) -> Level {
        Level::new(LevelId(id), Vec2::ZERO, Vec2::new(10.0, 10.0))
    }

    #[test]
    fn rejects_duplicate_level_ids() {
        let err = LevelSet::new(vec![level(1), level(1)]).unwrap_err();
        assert!(matches!(err, LevelError::DuplicateLevel(LevelId(1))));
    }

    #[test]
    fn rejects_duplicate_switch_uids() {
        let mut l = level(1);
        for _ in 0..2 {
            l.switches.push(Switch {
                uid: SwitchUid(4),
                position: Vec2::ZERO,
                pressed: false,
            });
        }
        let err = LevelSet::new(vec![l]).unwrap_err();
        assert!(matches!(err, LevelError::DuplicateSwitch { uid: SwitchUid(4), .. }));
    }

    #[test]
    fn lookup_by_id() {
        let set = LevelSet::new(vec![level(1), level(2)]).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.get(LevelId(2)).is_some());
        assert!(matches!(
            set.require(LevelId(9)),
            Err(LevelError::UnknownLevel(LevelId(9)))
        ));
    }

    #[test]
    fn switch_mut_toggles_pressed() {
        let mut l = level(1);
        l.switches.push(Switch {
            uid: SwitchUid(1),
            position: Vec2::ZERO,
            pressed: false,
        });
        l.switch_mut(SwitchUid(1)).unwrap().pressed = true;
        assert!(l.switch(SwitchUid(1)).unwrap().pressed);
    }

    #[test]
    fn segment_count_sums_rings() {
        let mut l = level(1);
        l.walls.push(vec![Vec2::ZERO, Vec2::X, Vec2::Y]);
        l.walls.push(vec![Vec2::ZERO, Vec2::X]);
        assert_eq!(l.segment_count(), 5);
    }
}
