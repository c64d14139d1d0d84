use std::hint::black_box;
use std::time::Instant;

use glam::Vec2;
use ghostmaze_common::{LevelId, SwitchUid};
use ghostmaze_geometry::build;
use ghostmaze_level::{Door, Level, Switch};

/// A grid of square cells, each walled in, with a door on every cell's east side.
fn make_level(id: u32, cells: usize, cell_size: f32) -> Level {
    let mut level = Level::new(LevelId(id), Vec2::ZERO, Vec2::splat(cell_size));
    for row in 0..cells {
        for col in 0..cells {
            let x0 = col as f32 * cell_size;
            let y0 = row as f32 * cell_size;
            let (x1, y1) = (x0 + cell_size, y0 + cell_size);
            let ring = vec![
                Vec2::new(x0, y0),
                Vec2::new(x1, y0),
                Vec2::new(x1, y1),
                Vec2::new(x0, y1),
            ];
            level.floors.push(ring.clone());
            level.walls.push(ring);
            level.doors.push(Door {
                polygon: [Vec2::new(x1, y0 + 10.0), Vec2::new(x1, y1 - 10.0)],
                open: false,
            });
            level.switches.push(Switch {
                uid: SwitchUid((row * cells + col) as u32),
                position: Vec2::new(x0 + cell_size / 2.0, y0 + cell_size / 2.0),
                pressed: false,
            });
        }
    }
    level
}

fn bench_build(level_count: usize, cells: usize, iterations: usize) {
    let levels: Vec<Level> = (0..level_count)
        .map(|i| make_level(i as u32, cells, 100.0))
        .collect();

    let start = Instant::now();
    let mut vertices = 0;
    for _ in 0..iterations {
        let out = build(black_box(&levels));
        vertices = out.mesh.vertex_count();
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  build ({level_count} levels, {cells}x{cells} cells, {vertices} vertices, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn main() {
    println!("mesh build benchmarks");
    bench_build(1, 4, 100);
    bench_build(4, 8, 20);
    bench_build(10, 16, 5);
}
