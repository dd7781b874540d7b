//! Declarative construction of articulated bodies.

use cf_spatial::Capsule;
use motion_types::{JointKind, JointRange, Pose};
use nalgebra::{Point3, Unit, Vector3};

/// Name given to the root link of every body.
pub const BASE_LINK_NAME: &str = "base";

/// A link and the joint connecting it to its parent.
///
/// # Example
///
/// ```
/// use motion_scene::LinkSpec;
/// use nalgebra::{Point3, Vector3};
///
/// let upper = LinkSpec::revolute("upper", "base", -2.0, 2.0)
///     .with_offset(Vector3::new(0.0, 0.0, 0.5))
///     .with_capsule(Point3::origin(), Point3::new(1.0, 0.0, 0.0), 0.05);
/// assert_eq!(upper.name(), "upper");
/// ```
#[derive(Debug, Clone)]
pub struct LinkSpec {
    pub(crate) name: String,
    pub(crate) parent: String,
    pub(crate) joint_name: String,
    pub(crate) kind: JointKind,
    pub(crate) range: JointRange,
    pub(crate) axis: Unit<Vector3<f64>>,
    pub(crate) origin: Pose,
    pub(crate) colliders: Vec<Capsule>,
}

impl LinkSpec {
    /// A link attached to `parent` by a joint of the given kind and range.
    ///
    /// The joint is named `"<name>_joint"`, rotates or slides about +Z and
    /// sits at the parent link's origin until configured otherwise.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        parent: impl Into<String>,
        kind: JointKind,
        range: JointRange,
    ) -> Self {
        let name = name.into();
        Self {
            joint_name: format!("{name}_joint"),
            name,
            parent: parent.into(),
            kind,
            range,
            axis: Vector3::z_axis(),
            origin: Pose::identity(),
            colliders: Vec::new(),
        }
    }

    /// Revolute joint limited to `[lower, upper]`.
    #[must_use]
    pub fn revolute(
        name: impl Into<String>,
        parent: impl Into<String>,
        lower: f64,
        upper: f64,
    ) -> Self {
        Self::new(name, parent, JointKind::Revolute, JointRange::bounded(lower, upper))
    }

    /// Unlimited revolute joint.
    #[must_use]
    pub fn continuous(name: impl Into<String>, parent: impl Into<String>) -> Self {
        Self::new(name, parent, JointKind::Continuous, JointRange::Circular)
    }

    /// Prismatic joint limited to `[lower, upper]`.
    #[must_use]
    pub fn prismatic(
        name: impl Into<String>,
        parent: impl Into<String>,
        lower: f64,
        upper: f64,
    ) -> Self {
        Self::new(name, parent, JointKind::Prismatic, JointRange::bounded(lower, upper))
    }

    /// Rigidly attached link.
    #[must_use]
    pub fn fixed(name: impl Into<String>, parent: impl Into<String>) -> Self {
        Self::new(name, parent, JointKind::Fixed, JointRange::bounded(0.0, 0.0))
    }

    /// Overrides the joint name.
    #[must_use]
    pub fn with_joint_name(mut self, name: impl Into<String>) -> Self {
        self.joint_name = name.into();
        self
    }

    /// Sets the joint axis.
    #[must_use]
    pub fn with_axis(mut self, axis: Unit<Vector3<f64>>) -> Self {
        self.axis = axis;
        self
    }

    /// Sets the joint frame relative to the parent link.
    #[must_use]
    pub fn with_origin(mut self, origin: Pose) -> Self {
        self.origin = origin;
        self
    }

    /// Sets the joint frame translation relative to the parent link.
    #[must_use]
    pub fn with_offset(mut self, offset: Vector3<f64>) -> Self {
        self.origin.position = Point3::from(offset);
        self
    }

    /// Adds a collider in link coordinates.
    #[must_use]
    pub fn with_collider(mut self, collider: Capsule) -> Self {
        self.colliders.push(collider);
        self
    }

    /// Adds a capsule collider in link coordinates.
    #[must_use]
    pub fn with_capsule(self, a: Point3<f64>, b: Point3<f64>, radius: f64) -> Self {
        self.with_collider(Capsule::new(a, b, radius))
    }

    /// Link name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Builder for a body: a base link plus a tree of jointed links.
///
/// Links are listed parents first; each [`LinkSpec`] names a parent that was
/// added before it (or [`BASE_LINK_NAME`]).
///
/// # Example
///
/// ```
/// use motion_scene::{BodyBuilder, KinematicWorld, LinkSpec, Scene};
/// use nalgebra::Point3;
///
/// let mut world = KinematicWorld::new();
/// let box_body = world
///     .add_body(BodyBuilder::new("crate").with_base_sphere(Point3::origin(), 0.3))
///     .unwrap();
/// assert_eq!(world.links(box_body).unwrap().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct BodyBuilder {
    pub(crate) name: String,
    pub(crate) base_pose: Pose,
    pub(crate) base_colliders: Vec<Capsule>,
    pub(crate) links: Vec<LinkSpec>,
}

impl BodyBuilder {
    /// Starts a body with an empty base link at the world origin.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_pose: Pose::identity(),
            base_colliders: Vec::new(),
            links: Vec::new(),
        }
    }

    /// A serial chain of continuous joints about +Z, one capsule link per
    /// entry of `lengths`, lying along +X at zero configuration.
    ///
    /// Links are named `link0`, `link1`, ...; joint `i` sits at the tip of
    /// link `i - 1`.
    ///
    /// # Example
    ///
    /// ```
    /// use motion_scene::{BodyBuilder, KinematicWorld, Scene};
    ///
    /// let mut world = KinematicWorld::new();
    /// let arm = world.add_body(BodyBuilder::planar_arm("arm", &[1.0, 0.5], 0.05)).unwrap();
    /// assert_eq!(world.joints(arm).unwrap().len(), 2);
    /// ```
    #[must_use]
    pub fn planar_arm(name: impl Into<String>, lengths: &[f64], radius: f64) -> Self {
        let mut builder = Self::new(name);
        let mut parent = BASE_LINK_NAME.to_string();
        let mut offset = 0.0;
        for (i, &length) in lengths.iter().enumerate() {
            let link = format!("link{i}");
            builder = builder.with_link(
                LinkSpec::continuous(link.clone(), parent)
                    .with_offset(Vector3::new(offset, 0.0, 0.0))
                    .with_capsule(Point3::origin(), Point3::new(length, 0.0, 0.0), radius),
            );
            parent = link;
            offset = length;
        }
        builder
    }

    /// Sets the initial world pose of the base.
    #[must_use]
    pub const fn with_base_pose(mut self, pose: Pose) -> Self {
        self.base_pose = pose;
        self
    }

    /// Adds a collider to the base link.
    #[must_use]
    pub fn with_base_collider(mut self, collider: Capsule) -> Self {
        self.base_colliders.push(collider);
        self
    }

    /// Adds a spherical collider to the base link.
    #[must_use]
    pub fn with_base_sphere(self, center: Point3<f64>, radius: f64) -> Self {
        self.with_base_collider(Capsule::sphere(center, radius))
    }

    /// Adds a jointed link.
    #[must_use]
    pub fn with_link(mut self, link: LinkSpec) -> Self {
        self.links.push(link);
        self
    }
}
