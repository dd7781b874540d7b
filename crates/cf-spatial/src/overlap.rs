//! Geometric primitives and proximity queries.
//!
//! This module provides axis-aligned bounding boxes, spheres and capsules,
//! together with the distance queries a kinematic collision checker needs:
//! AABB separation for broad-phase rejection and exact capsule–capsule
//! distance for the narrow phase.
//!
//! # Example
//!
//! ```
//! use cf_spatial::{Aabb, Capsule};
//! use nalgebra::Point3;
//!
//! let a = Capsule::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0), 0.1);
//! let b = Capsule::sphere(Point3::new(0.5, 1.0, 0.0), 0.2);
//!
//! // Segment distance is 1.0, minus both radii
//! assert!((a.distance(&b) - 0.7).abs() < 1e-12);
//! assert!(!a.bounding_aabb().intersects(&b.bounding_aabb()));
//! ```

use nalgebra::{Point3, Vector3};

/// Squared-length threshold below which a segment is treated as a point.
const DEGENERATE_EPSILON: f64 = 1e-12;

/// An axis-aligned bounding box in world coordinates.
///
/// # Example
///
/// ```
/// use cf_spatial::Aabb;
/// use nalgebra::Point3;
///
/// let aabb = Aabb::new(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(10.0, 10.0, 10.0),
/// );
///
/// assert!(aabb.contains(&Point3::new(5.0, 5.0, 5.0)));
/// assert!(!aabb.contains(&Point3::new(15.0, 5.0, 5.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3<f64>,
    /// Maximum corner of the bounding box.
    pub max: Point3<f64>,
}

impl Aabb {
    /// Creates a new AABB from two corners.
    ///
    /// The corners are automatically reordered if necessary.
    ///
    /// # Example
    ///
    /// ```
    /// use cf_spatial::Aabb;
    /// use nalgebra::Point3;
    ///
    /// let aabb = Aabb::new(
    ///     Point3::new(10.0, 10.0, 10.0),
    ///     Point3::new(0.0, 0.0, 0.0),
    /// );
    /// assert_eq!(aabb.min, Point3::new(0.0, 0.0, 0.0));
    /// assert_eq!(aabb.max, Point3::new(10.0, 10.0, 10.0));
    /// ```
    #[must_use]
    pub fn new(a: Point3<f64>, b: Point3<f64>) -> Self {
        Self {
            min: Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Creates an AABB centered at a point with the given half-extents.
    #[must_use]
    pub fn from_center(center: Point3<f64>, half_extents: Vector3<f64>) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Returns the center point of the AABB.
    #[must_use]
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Returns the full size (dimensions) of the AABB.
    #[must_use]
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Checks if a point is inside the AABB.
    ///
    /// Points on the boundary are considered inside.
    #[must_use]
    pub fn contains(&self, point: &Point3<f64>) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Checks if this AABB intersects another AABB.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Returns this AABB grown by `margin` on every side.
    #[must_use]
    pub fn inflated(&self, margin: f64) -> Self {
        let margin = Vector3::repeat(margin.max(0.0));
        Self {
            min: self.min - margin,
            max: self.max + margin,
        }
    }

    /// Separation distance between two boxes, zero when they overlap.
    ///
    /// # Example
    ///
    /// ```
    /// use cf_spatial::Aabb;
    /// use nalgebra::Point3;
    ///
    /// let a = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
    /// let b = Aabb::new(Point3::new(4.0, 5.0, 0.0), Point3::new(5.0, 6.0, 1.0));
    /// assert!((a.distance(&b) - 5.0).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        let gap = |lo_a: f64, hi_a: f64, lo_b: f64, hi_b: f64| {
            (lo_b - hi_a).max(lo_a - hi_b).max(0.0)
        };
        Vector3::new(
            gap(self.min.x, self.max.x, other.min.x, other.max.x),
            gap(self.min.y, self.max.y, other.min.y, other.max.y),
            gap(self.min.z, self.max.z, other.min.z, other.max.z),
        )
        .norm()
    }

    /// Expands this AABB to include a point.
    pub fn expand_to_include(&mut self, point: &Point3<f64>) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    /// Returns a new AABB that is the union of this AABB and another.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::new(Point3::origin(), Point3::origin())
    }
}

/// A sphere in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sphere {
    /// The center of the sphere.
    pub center: Point3<f64>,
    /// The radius of the sphere.
    pub radius: f64,
}

impl Sphere {
    /// Creates a new sphere with the given center and radius.
    ///
    /// The radius is clamped to be non-negative.
    #[must_use]
    pub const fn new(center: Point3<f64>, radius: f64) -> Self {
        Self {
            center,
            radius: if radius < 0.0 { -radius } else { radius },
        }
    }

    /// Checks if a point is inside or on the sphere.
    #[must_use]
    pub fn contains(&self, point: &Point3<f64>) -> bool {
        (point - self.center).norm_squared() <= self.radius * self.radius
    }

    /// Checks if this sphere intersects another sphere.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        let radius_sum = self.radius + other.radius;
        (other.center - self.center).norm_squared() <= radius_sum * radius_sum
    }

    /// Returns the bounding AABB of this sphere.
    #[must_use]
    pub fn bounding_aabb(&self) -> Aabb {
        Aabb::from_center(self.center, Vector3::repeat(self.radius))
    }
}

impl Default for Sphere {
    fn default() -> Self {
        Self::new(Point3::origin(), 1.0)
    }
}

impl From<Sphere> for Capsule {
    fn from(sphere: Sphere) -> Self {
        Self::sphere(sphere.center, sphere.radius)
    }
}

/// A capsule: the set of points within `radius` of the segment `a`–`b`.
///
/// A capsule with coincident endpoints is a sphere, which lets a single
/// distance routine serve both link and obstacle geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Capsule {
    /// First endpoint of the core segment.
    pub a: Point3<f64>,
    /// Second endpoint of the core segment.
    pub b: Point3<f64>,
    /// Radius around the core segment.
    pub radius: f64,
}

impl Capsule {
    /// Creates a capsule around the segment `a`–`b`.
    #[must_use]
    pub fn new(a: Point3<f64>, b: Point3<f64>, radius: f64) -> Self {
        Self {
            a,
            b,
            radius: radius.abs(),
        }
    }

    /// Creates a spherical capsule (zero-length core).
    #[must_use]
    pub fn sphere(center: Point3<f64>, radius: f64) -> Self {
        Self::new(center, center, radius)
    }

    /// Length of the core segment.
    #[must_use]
    pub fn length(&self) -> f64 {
        (self.b - self.a).norm()
    }

    /// Returns the bounding AABB of this capsule.
    #[must_use]
    pub fn bounding_aabb(&self) -> Aabb {
        Aabb::new(self.a, self.b).inflated(self.radius)
    }

    /// Signed surface distance to another capsule.
    ///
    /// Negative values are penetration depths along the closest segment
    /// points.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        segment_segment_distance(&self.a, &self.b, &other.a, &other.b) - self.radius - other.radius
    }

    /// Returns true when the two capsules are within `margin` of each other.
    #[must_use]
    pub fn within(&self, other: &Self, margin: f64) -> bool {
        if !self
            .bounding_aabb()
            .inflated(margin)
            .intersects(&other.bounding_aabb())
        {
            return false;
        }
        self.distance(other) <= margin
    }
}

/// Shortest distance between segments `p1`–`q1` and `p2`–`q2`.
///
/// Degenerate segments are handled as points.
///
/// # Example
///
/// ```
/// use cf_spatial::segment_segment_distance;
/// use nalgebra::Point3;
///
/// let d = segment_segment_distance(
///     &Point3::new(0.0, 0.0, 0.0),
///     &Point3::new(2.0, 0.0, 0.0),
///     &Point3::new(1.0, -1.0, 3.0),
///     &Point3::new(1.0, 1.0, 3.0),
/// );
/// assert!((d - 3.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn segment_segment_distance(
    p1: &Point3<f64>,
    q1: &Point3<f64>,
    p2: &Point3<f64>,
    q2: &Point3<f64>,
) -> f64 {
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.norm_squared();
    let e = d2.norm_squared();
    let f = d2.dot(&r);

    if a <= DEGENERATE_EPSILON && e <= DEGENERATE_EPSILON {
        return r.norm();
    }

    let (s, t) = if a <= DEGENERATE_EPSILON {
        (0.0, (f / e).clamp(0.0, 1.0))
    } else {
        let c = d1.dot(&r);
        if e <= DEGENERATE_EPSILON {
            ((-c / a).clamp(0.0, 1.0), 0.0)
        } else {
            let b = d1.dot(&d2);
            let denom = a.mul_add(e, -(b * b));
            // Parallel segments: any s works, pick the start of the first one
            let s = if denom > DEGENERATE_EPSILON {
                (b.mul_add(f, -(c * e)) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let t = b.mul_add(s, f) / e;
            if t < 0.0 {
                ((-c / a).clamp(0.0, 1.0), 0.0)
            } else if t > 1.0 {
                (((b - c) / a).clamp(0.0, 1.0), 1.0)
            } else {
                (s, t)
            }
        }
    };

    let closest1 = p1 + d1 * s;
    let closest2 = p2 + d2 * t;
    (closest1 - closest2).norm()
}
