use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// A simple 2D vector struct. Positions are relative to the area center.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    /// Creates a new Vec2.
    pub fn new(x: f64, y: f64) -> Self {
        Vec2 { x, y }
    }

    /// Creates a zero vector.
    pub fn zero() -> Self {
        Vec2 { x: 0.0, y: 0.0 }
    }

    /// Calculates the squared length (magnitude) of the vector.
    pub fn length_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Calculates the length (magnitude) of the vector.
    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Returns the unit vector pointing the same way, or `None` for a
    /// (near) zero vector.
    pub fn try_normalize(&self) -> Option<Self> {
        let len_sq = self.length_squared();
        if len_sq > 1e-12 && len_sq.is_finite() {
            let inv_len = 1.0 / len_sq.sqrt();
            Some(Vec2 { x: self.x * inv_len, y: self.y * inv_len })
        } else {
            None
        }
    }

    /// Calculates the squared distance to another vector (point).
    pub fn distance_squared(&self, other: Vec2) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Calculates the distance to another vector (point).
    pub fn distance(&self, other: Vec2) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Scales the vector by a scalar value.
    pub fn scale(&self, scalar: f64) -> Self {
        Vec2 { x: self.x * scalar, y: self.y * scalar }
    }

    /// Mirror across the vertical axis (flip the horizontal component).
    pub fn reflect_x(&self) -> Self {
        Vec2 { x: -self.x, y: self.y }
    }

    /// Mirror across the horizontal axis (flip the vertical component).
    pub fn reflect_y(&self) -> Self {
        Vec2 { x: self.x, y: -self.y }
    }

    /// True when the length is 1 within `tolerance`.
    pub fn is_unit(&self, tolerance: f64) -> bool {
        (self.length() - 1.0).abs() <= tolerance
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self { x: self.x + other.x, y: self.y + other.y }
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self { x: self.x - other.x, y: self.y - other.y }
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;
    fn mul(self, scalar: f64) -> Self {
        Self { x: self.x * scalar, y: self.y * scalar }
    }
}

impl Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self { x: -self.x, y: -self.y }
    }
}

/// Clamps a value between a minimum and maximum.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflections_flip_one_component() {
        let v = Vec2::new(0.6, -0.8);
        assert_eq!(v.reflect_x(), Vec2::new(-0.6, -0.8));
        assert_eq!(v.reflect_y(), Vec2::new(0.6, 0.8));
        assert_eq!(-v, Vec2::new(-0.6, 0.8));
    }

    #[test]
    fn try_normalize_rejects_zero() {
        assert!(Vec2::zero().try_normalize().is_none());
        let n = Vec2::new(3.0, 4.0).try_normalize().expect("non-zero vector");
        assert!(n.is_unit(1e-12));
        assert!((n.x - 0.6).abs() < 1e-12);
    }

    #[test]
    fn clamp_bounds_value() {
        assert_eq!(clamp(12.0, 0.1, 10.0), 10.0);
        assert_eq!(clamp(0.0, 0.1, 10.0), 0.1);
        assert_eq!(clamp(2.5, 0.1, 10.0), 2.5);
    }
}
