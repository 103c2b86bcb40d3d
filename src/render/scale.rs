//! Minimal scales for laying marks out: band, linear and square-root.

/// Ordinal band scale: each domain value gets an equal-width band.
/// `padding` is used for both inner and outer padding, bands are centered.
#[derive(Clone, Debug)]
pub struct BandScale {
    domain: Vec<String>,
    start: f32,
    step: f32,
    bandwidth: f32,
}

impl BandScale {
    pub fn new(domain: Vec<String>, range: (f32, f32), padding: f32) -> Self {
        let n = domain.len() as f32;
        let (r0, r1) = range;
        let padding = padding.clamp(0.0, 1.0);
        let step = (r1 - r0) / (n - padding + padding * 2.0).max(1.0);
        let start = r0 + (r1 - r0 - step * (n - padding)) * 0.5;
        Self {
            domain,
            start,
            step,
            bandwidth: step * (1.0 - padding),
        }
    }

    /// Start of the band for `value`
    pub fn position(&self, value: &str) -> Option<f32> {
        self.domain
            .iter()
            .position(|d| d == value)
            .map(|i| self.start + self.step * i as f32)
    }

    /// Center of the band for `value`
    pub fn center(&self, value: &str) -> Option<f32> {
        self.position(value).map(|p| p + self.bandwidth / 2.0)
    }

    pub fn bandwidth(&self) -> f32 {
        self.bandwidth
    }
}

#[derive(Clone, Copy, Debug)]
pub struct LinearScale {
    domain: (f32, f32),
    range: (f32, f32),
}

impl LinearScale {
    pub fn new(domain: (f32, f32), range: (f32, f32)) -> Self {
        Self { domain, range }
    }

    pub fn map(&self, v: f32) -> f32 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (v - d0) / (d1 - d0) * (r1 - r0)
    }
}

/// Square-root scale, used for radii so area tracks the value
#[derive(Clone, Copy, Debug)]
pub struct SqrtScale {
    inner: LinearScale,
}

impl SqrtScale {
    pub fn new(domain: (f32, f32), range: (f32, f32)) -> Self {
        Self {
            inner: LinearScale::new((signed_sqrt(domain.0), signed_sqrt(domain.1)), range),
        }
    }

    pub fn map(&self, v: f32) -> f32 {
        self.inner.map(signed_sqrt(v))
    }
}

fn signed_sqrt(v: f32) -> f32 {
    v.signum() * v.abs().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_band_without_padding_splits_range() {
        let band = BandScale::new(domain(&["a", "b", "c", "d"]), (0.0, 400.0), 0.0);
        assert_eq!(band.position("a"), Some(0.0));
        assert_eq!(band.position("c"), Some(200.0));
        assert_eq!(band.bandwidth(), 100.0);
        assert_eq!(band.center("d"), Some(350.0));
        assert_eq!(band.position("zzz"), None);
    }

    #[test]
    fn test_band_padding_is_symmetric() {
        let band = BandScale::new(domain(&["a", "b"]), (0.0, 100.0), 0.2);
        let first = band.position("a").unwrap_or_default();
        let last_end = band.position("b").unwrap_or_default() + band.bandwidth();
        assert!((first - (100.0 - last_end)).abs() < 1e-4);
    }

    #[test]
    fn test_sqrt_scale() {
        let r = SqrtScale::new((0.0, 16.0), (5.0, 20.0));
        assert_eq!(r.map(0.0), 5.0);
        assert_eq!(r.map(16.0), 20.0);
        assert_eq!(r.map(4.0), 12.5);
    }

    #[test]
    fn test_linear_degenerate_domain() {
        let x = LinearScale::new((3.0, 3.0), (0.0, 10.0));
        assert_eq!(x.map(3.0), 5.0);
    }
}
