// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

/// An exponentially weighted moving average over `f64` observations.
///
/// Uninitialized until the first observation; the first value seeds the
/// average directly.
#[derive(Debug, Clone, PartialEq)]
pub struct Ewma {
    alpha: f64,
    value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvalidAlphaError {
    value: f64,
}

impl InvalidAlphaError {
    pub fn new(value: f64) -> Self {
        Self { value }
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl std::fmt::Display for InvalidAlphaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Invalid alpha value {}. Allowed range is (0.0, 1.0].",
            self.value
        )
    }
}

impl std::error::Error for InvalidAlphaError {}

impl Ewma {
    /// Creates a new EWMA with smoothing factor `alpha` in `(0, 1]`.
    #[inline]
    pub fn new(alpha: f64) -> Result<Self, InvalidAlphaError> {
        if !alpha.is_finite() || alpha <= 0.0 || alpha > 1.0 {
            return Err(InvalidAlphaError::new(alpha));
        }
        Ok(Self { alpha, value: None })
    }

    /// Alpha chosen so the weight halves every `half_life_steps` observations.
    #[inline]
    pub fn from_half_life(half_life_steps: f64) -> Result<Self, InvalidAlphaError> {
        if !half_life_steps.is_finite() || half_life_steps <= 0.0 {
            return Err(InvalidAlphaError::new(f64::NAN));
        }
        Self::new(1.0 - 0.5_f64.powf(1.0 / half_life_steps))
    }

    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    #[inline]
    pub fn initialized(&self) -> bool {
        self.value.is_some()
    }

    #[inline]
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    #[inline]
    pub fn value_or(&self, default: f64) -> f64 {
        self.value.unwrap_or(default)
    }

    #[inline]
    pub fn reset(&mut self) {
        self.value = None;
    }

    /// Observes a value and returns the updated average.
    pub fn observe(&mut self, x: f64) -> f64 {
        let next = match self.value {
            None => x,
            Some(current) => self.alpha * x + (1.0 - self.alpha) * current,
        };
        self.value = Some(next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_alpha() {
        assert!(Ewma::new(0.0).is_err());
        assert!(Ewma::new(-0.1).is_err());
        assert!(Ewma::new(1.1).is_err());
        assert!(Ewma::new(f64::NAN).is_err());
        assert!(Ewma::new(1.0).is_ok());
    }

    #[test]
    fn test_first_observation_seeds() {
        let mut e = Ewma::new(0.5).unwrap();
        assert!(!e.initialized());
        assert_eq!(e.observe(10.0), 10.0);
        assert_eq!(e.value(), Some(10.0));
    }

    #[test]
    fn test_smoothing() {
        let mut e = Ewma::new(0.5).unwrap();
        e.observe(10.0);
        assert_eq!(e.observe(20.0), 15.0);
        assert_eq!(e.observe(15.0), 15.0);
    }

    #[test]
    fn test_half_life() {
        let e = Ewma::from_half_life(1.0).unwrap();
        assert!((e.alpha() - 0.5).abs() < 1e-12);
        assert!(Ewma::from_half_life(0.0).is_err());
    }

    #[test]
    fn test_reset() {
        let mut e = Ewma::new(0.3).unwrap();
        e.observe(4.0);
        e.reset();
        assert!(!e.initialized());
        assert_eq!(e.value_or(7.0), 7.0);
    }
}
