//! Built-in level set used when no level file is given.

use glam::Vec2;

use ghostmaze_common::{LevelId, SwitchUid};

use crate::level::{Door, Level, LevelSet, Switch};

fn v(x: f32, y: f32) -> Vec2 {
    Vec2::new(x, y)
}

fn rect(x0: f32, y0: f32, x1: f32, y1: f32) -> Vec<Vec2> {
    vec![v(x0, y0), v(x1, y0), v(x1, y1), v(x0, y1)]
}

/// Two small levels: a walled room split by a partition with a door, and a
/// corridor with a triangular landing.
pub fn demo_level_set() -> LevelSet {
    let mut first = Level::new(LevelId(1), v(50.0, 50.0), v(350.0, 250.0));
    first.walls.push(rect(0.0, 0.0, 400.0, 300.0));
    first.walls.push(vec![v(200.0, 0.0), v(200.0, 180.0)]);
    first.floors.push(rect(0.0, 0.0, 400.0, 300.0));
    first.doors.push(Door {
        polygon: [v(200.0, 180.0), v(200.0, 300.0)],
        open: false,
    });
    first.switches.push(Switch {
        uid: SwitchUid(1),
        position: v(100.0, 250.0),
        pressed: false,
    });
    first.switches.push(Switch {
        uid: SwitchUid(2),
        position: v(300.0, 60.0),
        pressed: false,
    });

    let mut second = Level::new(LevelId(2), v(40.0, 40.0), v(260.0, 160.0));
    second.walls.push(vec![
        v(0.0, 0.0),
        v(300.0, 0.0),
        v(300.0, 200.0),
        v(120.0, 200.0),
        v(0.0, 80.0),
    ]);
    second.floors.push(rect(0.0, 0.0, 300.0, 80.0));
    second.floors.push(vec![v(0.0, 80.0), v(300.0, 80.0), v(300.0, 200.0), v(120.0, 200.0)]);
    second.doors.push(Door {
        polygon: [v(150.0, 0.0), v(150.0, 80.0)],
        open: true,
    });
    second.switches.push(Switch {
        uid: SwitchUid(1),
        position: v(220.0, 40.0),
        pressed: false,
    });

    LevelSet {
        levels: vec![first, second],
    }
}
