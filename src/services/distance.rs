use rand::Rng;

use crate::models::{Customer, Restaurant};

/// Estimates the distance of a delivery from restaurant to customer.
///
/// Implementations must return a finite, non-negative value.
pub trait DistanceEstimator: Send + Sync {
    fn estimate(&self, restaurant: &Restaurant, customer: &Customer) -> f64;
}

impl<F> DistanceEstimator for F
where
    F: Fn(&Restaurant, &Customer) -> f64 + Send + Sync,
{
    fn estimate(&self, restaurant: &Restaurant, customer: &Customer) -> f64 {
        self(restaurant, customer)
    }
}

/// Placeholder until real routing exists: uniform in `[0, max)`. A non-positive `max`
/// always yields zero.
#[derive(Debug, Clone, Copy)]
pub struct RandomDistance {
    max: f64,
}

impl RandomDistance {
    pub const DEFAULT_MAX: f64 = 20.0;

    pub fn new(max: f64) -> Self {
        Self { max }
    }
}

impl Default for RandomDistance {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX)
    }
}

impl DistanceEstimator for RandomDistance {
    fn estimate(&self, _restaurant: &Restaurant, _customer: &Customer) -> f64 {
        if self.max <= 0.0 {
            return 0.0;
        }
        rand::thread_rng().gen_range(0.0..self.max)
    }
}

/// Always returns the same distance.
#[derive(Debug, Clone, Copy)]
pub struct FixedDistance(pub f64);

impl DistanceEstimator for FixedDistance {
    fn estimate(&self, _restaurant: &Restaurant, _customer: &Customer) -> f64 {
        self.0
    }
}
