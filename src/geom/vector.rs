use std::fmt;
use std::ops::{Add, AddAssign, Div, Index, IndexMut, Mul, Neg, Sub, SubAssign};

use num_traits::Float;

use super::tolerance::Tolerance;

// ─────────────────────────────────────────────────────────────────────────────
// Axis
// ─────────────────────────────────────────────────────────────────────────────

/// One of the three coordinate axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in processing order.
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::X),
            1 => Some(Self::Y),
            2 => Some(Self::Z),
            _ => None,
        }
    }

    /// The two axes spanning the plane a rotation about `self` acts on,
    /// ordered so that a positive angle turns the first toward the second.
    #[must_use]
    pub const fn orthogonal(self) -> (usize, usize) {
        match self {
            Self::X => (1, 2),
            Self::Y => (2, 0),
            Self::Z => (0, 1),
        }
    }

    #[must_use]
    pub const fn name(self) -> char {
        match self {
            Self::X => 'x',
            Self::Y => 'y',
            Self::Z => 'z',
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Vector3
// ─────────────────────────────────────────────────────────────────────────────

/// Three-component vector, generic over the float width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector3<F> {
    pub x: F,
    pub y: F,
    pub z: F,
}

/// Double-precision vector, the engine's working type.
pub type Vec3 = Vector3<f64>;

/// Single-precision vector, used at the boundary only.
pub type Vec3f = Vector3<f32>;

impl<F> Vector3<F> {
    #[must_use]
    pub const fn new(x: F, y: F, z: F) -> Self {
        Self { x, y, z }
    }
}

impl<F: Float> Vector3<F> {
    #[must_use]
    pub fn zero() -> Self {
        Self::splat(F::zero())
    }

    #[must_use]
    pub fn one() -> Self {
        Self::splat(F::one())
    }

    #[must_use]
    pub fn splat(v: F) -> Self {
        Self::new(v, v, v)
    }

    /// Unit vector along `axis`.
    #[must_use]
    pub fn unit(axis: Axis) -> Self {
        let mut v = Self::zero();
        v[axis.index()] = F::one();
        v
    }

    /// Create a vector from an array.
    #[must_use]
    pub fn from_array(arr: [F; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    /// Convert to an array.
    #[must_use]
    pub fn to_array(self) -> [F; 3] {
        [self.x, self.y, self.z]
    }

    #[must_use]
    pub fn dot(self, rhs: Self) -> F {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    #[must_use]
    pub fn cross(self, rhs: Self) -> Self {
        Self {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    #[must_use]
    pub fn length_squared(self) -> F {
        self.dot(self)
    }

    #[must_use]
    pub fn length(self) -> F {
        self.dot(self).sqrt()
    }

    /// Unit-length copy, or `None` when the length is below
    /// [`Tolerance::LINEAR`] or not finite.
    #[must_use]
    pub fn normalized(self) -> Option<Self> {
        let len = self.length();
        let eps = F::from(Tolerance::LINEAR.eps).unwrap_or_else(F::epsilon);
        if len.is_finite() && len >= eps {
            Some(self / len)
        } else {
            None
        }
    }

    /// Component-wise product.
    #[must_use]
    pub fn mul_elem(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y, self.z * rhs.z)
    }

    /// Component-wise quotient. Division by zero is not guarded.
    #[must_use]
    pub fn div_elem(self, rhs: Self) -> Self {
        Self::new(self.x / rhs.x, self.y / rhs.y, self.z / rhs.z)
    }

    #[must_use]
    pub fn abs(self) -> Self {
        Self::new(self.x.abs(), self.y.abs(), self.z.abs())
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Convert to another float width. Out-of-range components become NaN.
    #[must_use]
    pub fn cast<G: Float>(self) -> Vector3<G> {
        let conv = |v: F| G::from(v).unwrap_or_else(G::nan);
        Vector3::new(conv(self.x), conv(self.y), conv(self.z))
    }
}

impl<F: Float> Default for Vector3<F> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<F: Float> From<[F; 3]> for Vector3<F> {
    fn from(arr: [F; 3]) -> Self {
        Self::from_array(arr)
    }
}

impl From<Vec3> for [f64; 3] {
    fn from(v: Vec3) -> Self {
        v.to_array()
    }
}

impl From<Vec3f> for Vec3 {
    fn from(v: Vec3f) -> Self {
        v.cast()
    }
}

impl<F> Index<usize> for Vector3<F> {
    type Output = F;
    fn index(&self, index: usize) -> &F {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Vector3 index out of range: {index}"),
        }
    }
}

impl<F> IndexMut<usize> for Vector3<F> {
    fn index_mut(&mut self, index: usize) -> &mut F {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            _ => panic!("Vector3 index out of range: {index}"),
        }
    }
}

impl<F: Float> Add for Vector3<F> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl<F: Float> AddAssign for Vector3<F> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<F: Float> Sub for Vector3<F> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl<F: Float> SubAssign for Vector3<F> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<F: Float> Mul<F> for Vector3<F> {
    type Output = Self;
    fn mul(self, rhs: F) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Mul<Vec3> for f64 {
    type Output = Vec3;
    fn mul(self, rhs: Vec3) -> Self::Output {
        Vec3::new(self * rhs.x, self * rhs.y, self * rhs.z)
    }
}

impl<F: Float> Div<F> for Vector3<F> {
    type Output = Self;
    fn div(self, rhs: F) -> Self::Output {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl<F: Float> Neg for Vector3<F> {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl<F: fmt::Display> fmt::Display for Vector3<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(p) => write!(f, "{:11.p$} {:11.p$} {:11.p$}", self.x, self.y, self.z),
            None => write!(f, "{} {} {}", self.x, self.y, self.z),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
