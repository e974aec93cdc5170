use nalgebra::Vector2;

use crate::position::Coordinate;

/// Running mean of tower [Coordinate]s, used as the solver initial guess.
#[derive(Debug, Clone, Default)]
pub struct Averager {
    pub mean: Vector2<f64>,
    pub count: u64,
}

impl Averager {
    /// Builds new [Averager]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push new [Coordinate] into [Averager]
    pub fn add(&mut self, coordinate: &Coordinate) {
        self.count += 1;
        let k = self.count as f64;
        let x = Vector2::new(coordinate.latitude, coordinate.longitude);
        self.mean = x / k + self.mean * (k - 1.0) / k;
    }
}

impl<'a> FromIterator<&'a Coordinate> for Averager {
    fn from_iter<I: IntoIterator<Item = &'a Coordinate>>(iter: I) -> Self {
        let mut avg = Self::new();
        for coordinate in iter {
            avg.add(coordinate);
        }
        avg
    }
}
