use crate::landscape::Coordinate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Endless stream of apple candidates drawn uniformly over the grid.
///
/// Occupancy is not checked here; the episode driver keeps pulling until
/// [`Landscape::plant_apple`](crate::landscape::Landscape::plant_apple) accepts one.
#[derive(Debug, Clone)]
pub struct AppleGenerator {
    width: i32,
    height: i32,
    rng: StdRng,
}

impl AppleGenerator {
    pub fn new((width, height): (i32, i32), seed: u64) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Iterator for AppleGenerator {
    type Item = Coordinate;

    fn next(&mut self) -> Option<Coordinate> {
        let x = self.rng.gen_range(0..self.width);
        let y = self.rng.gen_range(0..self.height);
        Some(Coordinate::new(x, y))
    }
}
