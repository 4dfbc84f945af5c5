use crate::landscape::{Cell, Coordinate, Landscape};

/// Ray directions in perception order.
pub const RAYS: [(i32, i32); 8] = [
    (1, 0),   // right
    (-1, 0),  // left
    (0, 1),   // down
    (0, -1),  // up
    (1, 1),   // down-right
    (-1, 1),  // down-left
    (1, -1),  // up-right
    (-1, -1), // up-left
];

/// Wall, apple and body, per ray.
pub const FEATURES: usize = 3;

pub const PERCEPTION_LEN: usize = RAYS.len() * FEATURES;

pub type Perception = [f32; PERCEPTION_LEN];

/// Inverse step distance from the head to the nearest wall, apple and body
/// segment along eight rays. A feature whose target is not on the ray reads 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistanceSensor;

impl DistanceSensor {
    pub fn sense(&self, head: Coordinate, landscape: &Landscape) -> Perception {
        let mut out = [0.0; PERCEPTION_LEN];
        for (ray, &dir) in RAYS.iter().enumerate() {
            let slot = &mut out[ray * FEATURES..(ray + 1) * FEATURES];
            let mut pos = head;
            let mut step = 0u32;
            loop {
                pos = pos.offset(dir);
                step += 1;
                let inv = 1.0 / step as f32;
                match landscape.query(pos) {
                    Cell::Wall => {
                        slot[0] = inv;
                        break;
                    }
                    Cell::Apple if slot[1] == 0.0 => slot[1] = inv,
                    Cell::Body if slot[2] == 0.0 => slot[2] = inv,
                    _ => {}
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: &[f32], b: &[f32]) {
        assert_eq!(a.len(), b.len());
        for (i, (x, y)) in a.iter().zip(b).enumerate() {
            assert!((x - y).abs() < 1e-6, "feature {i}: {x} != {y}");
        }
    }

    #[test]
    fn empty_grid_sees_only_walls() {
        let land = Landscape::new(5, 5);
        let v = DistanceSensor.sense(Coordinate::new(2, 2), &land);
        let walls: Vec<f32> = v.chunks(FEATURES).map(|c| c[0]).collect();
        close(&walls, &[1.0 / 3.0; 8]);
        assert!(v.chunks(FEATURES).all(|c| c[1] == 0.0 && c[2] == 0.0));
    }

    #[test]
    fn nearest_target_wins() {
        let mut land = Landscape::new(8, 1);
        land.set_body(Coordinate::new(3, 0));
        land.set_body(Coordinate::new(5, 0));
        land.plant_apple(Coordinate::new(6, 0));
        let v = DistanceSensor.sense(Coordinate::new(1, 0), &land);
        // right ray: wall at x=8, apple at x=6, first body at x=3
        close(&v[0..3], &[1.0 / 7.0, 1.0 / 5.0, 1.0 / 2.0]);
        // up and down leave the one-row grid immediately
        close(&v[6..12], &[1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
    }
}
