//! Linear scales from data extents (times, pitches, note indices) to pixel
//! ranges.
//!
//! Scales are derived fresh for every frame from the notes being drawn.
//! A zero-width domain maps every value to the lower end of the range.

use serde::{Deserialize, Serialize};

/// `f(v) = lo + (v - min) / (max - min) * (hi - lo)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Scale whose domain is the extent of `samples`. An empty sample set
    /// gives the domain `(0, 0)`.
    pub fn from_samples<I>(samples: I, range: (f64, f64)) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        Self::new(extent(samples).unwrap_or((0.0, 0.0)), range)
    }

    pub fn is_degenerate(&self) -> bool {
        let (min, max) = self.domain;
        let width = max - min;
        width == 0.0 || !width.is_finite()
    }

    pub fn apply(&self, value: f64) -> f64 {
        let (min, max) = self.domain;
        let (lo, hi) = self.range;
        if self.is_degenerate() {
            return lo;
        }
        lo + (value - min) / (max - min) * (hi - lo)
    }
}

/// `(min, max)` of the finite samples, or `None` when there are none.
/// Independent of sample order.
pub fn extent<I>(samples: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    samples
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Largest finite sample, or `0.0` for an empty set.
pub fn max_value<I>(samples: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    extent(samples).map(|(_, hi)| hi).unwrap_or(0.0)
}

/// Dot radius for `whole_size` pixels shared among `divisor` slots,
/// clamped to `max_radius`.
///
/// A divisor that does not give a positive finite radius (no notes, every
/// note ending at time 0, or only negative times) yields the clamp value.
pub fn dot_radius(whole_size: f64, divisor: f64, max_radius: f64) -> f64 {
    let raw = whole_size / divisor / 2.0;
    if !(raw.is_finite() && raw > 0.0) {
        return max_radius;
    }
    raw.min(max_radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_domain_endpoints_onto_range() {
        let s = LinearScale::new((60.0, 67.0), (5.0, 20.0));
        assert_eq!(s.apply(60.0), 5.0);
        assert_eq!(s.apply(67.0), 20.0);
        assert!((s.apply(63.5) - 12.5).abs() < 1e-12);
    }

    #[test]
    fn zero_width_domain_is_constant_lower_bound() {
        let s = LinearScale::from_samples([64.0], (5.0, 20.0));
        assert!(s.is_degenerate());
        assert_eq!(s.apply(64.0), 5.0);
        assert_eq!(s.apply(1000.0), 5.0);

        let empty = LinearScale::from_samples(std::iter::empty(), (3.0, 9.0));
        assert_eq!(empty.domain, (0.0, 0.0));
        assert_eq!(empty.apply(0.0), 3.0);
    }

    #[test]
    fn extent_ignores_order_and_non_finite_samples() {
        let a = extent([3.0, 1.0, 2.0]);
        let b = extent([2.0, 3.0, 1.0]);
        assert_eq!(a, Some((1.0, 3.0)));
        assert_eq!(a, b);
        assert_eq!(extent([f64::NAN, 4.0, f64::INFINITY]), Some((4.0, 4.0)));
        assert_eq!(extent(Vec::<f64>::new()), None);
    }

    #[test]
    fn descending_range_is_supported() {
        let s = LinearScale::new((0.0, 10.0), (4.0, -4.0));
        assert_eq!(s.apply(0.0), 4.0);
        assert_eq!(s.apply(10.0), -4.0);
    }

    #[test]
    fn dot_radius_clamps() {
        assert_eq!(dot_radius(240.0, 2.0, 5.0), 5.0);
        assert_eq!(dot_radius(240.0, 48.0, 5.0), 2.5);
        assert_eq!(dot_radius(240.0, 0.0, 5.0), 5.0);
        assert_eq!(dot_radius(0.0, 0.0, 5.0), 5.0);
        assert_eq!(dot_radius(240.0, -1.0, 5.0), 5.0);
    }
}
