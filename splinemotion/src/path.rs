//! Path geometry seen by the locomotion code.
//!
//! The runtime only needs position, tangent, up vector and length at a normalized parameter.
//! Hosts backed by a real spline library implement [`PathEvaluator`] themselves;
//! [`PathContainer`] is a small arc-length polyline implementation used for tooling and tests.

use crate::Error;
use glam::{Affine3A, Vec3};

pub type PathId = usize;

pub trait PathEvaluator {
    fn path_count(&self) -> usize;

    /// World-space position at normalized parameter `t`.
    fn position(&self, path: PathId, t: f32) -> Vec3;

    /// World-space forward direction at `t`. Not necessarily normalized.
    fn tangent(&self, path: PathId, t: f32) -> Vec3;

    fn up_vector(&self, _path: PathId, _t: f32) -> Vec3 {
        Vec3::Y
    }

    /// Total world-space length. Callers are expected to cache it.
    fn length(&self, path: PathId) -> f32;
}

/// Polyline parameterised by arc length: `t` maps linearly onto distance travelled.
#[derive(Clone, Debug, PartialEq)]
pub struct PolylinePath {
    points: Vec<Vec3>,
    arcs: Vec<f32>,
}

impl PolylinePath {
    pub fn new(points: Vec<Vec3>) -> Result<Self, Error> {
        if points.is_empty() {
            return Err(Error::InvalidValue {
                message: "a path needs at least one point".to_string(),
            });
        }
        if points.iter().any(|p| !p.is_finite()) {
            return Err(Error::InvalidValue {
                message: "path points must be finite".to_string(),
            });
        }

        let mut arcs = Vec::with_capacity(points.len());
        let mut total = 0.0f32;
        arcs.push(0.0);
        for pair in points.windows(2) {
            total += pair[0].distance(pair[1]);
            arcs.push(total);
        }
        Ok(Self { points, arcs })
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn length(&self) -> f32 {
        self.arcs.last().copied().unwrap_or(0.0)
    }

    /// Segment index reached at parameter `t` and the interpolation factor inside it.
    fn locate(&self, t: f32) -> Option<(usize, f32)> {
        if self.points.len() < 2 {
            return None;
        }
        let total = self.length();
        let distance = t.clamp(0.0, 1.0) * total;

        let last_segment = self.points.len() - 2;
        let index = self
            .arcs
            .partition_point(|arc| *arc <= distance)
            .saturating_sub(1)
            .min(last_segment);
        let start = self.arcs[index];
        let span = self.arcs[index + 1] - start;
        if span <= 1.0e-12 {
            return Some((index, 0.0));
        }
        Some((index, ((distance - start) / span).clamp(0.0, 1.0)))
    }

    pub fn position(&self, t: f32) -> Vec3 {
        match self.locate(t) {
            Some((index, alpha)) => self.points[index].lerp(self.points[index + 1], alpha),
            None => self.points[0],
        }
    }

    pub fn tangent(&self, t: f32) -> Vec3 {
        let Some((index, _)) = self.locate(t) else {
            return Vec3::ZERO;
        };
        // Duplicate points: use the nearest segment with a direction, preferring earlier ones.
        let segments = self.points.len() - 1;
        (0..segments)
            .flat_map(|offset| {
                let before = index.checked_sub(offset);
                let after = (offset > 0 && index + offset < segments).then_some(index + offset);
                before.into_iter().chain(after)
            })
            .map(|segment| self.points[segment + 1] - self.points[segment])
            .find(|d| d.length_squared() > 1.0e-12)
            .map(Vec3::normalize)
            .unwrap_or(Vec3::ZERO)
    }
}

/// A set of paths sharing one local-to-world transform.
#[derive(Clone, Debug)]
pub struct PathContainer {
    transform: Affine3A,
    paths: Vec<PolylinePath>,
    world_lengths: Vec<f32>,
}

impl Default for PathContainer {
    fn default() -> Self {
        Self::new(Affine3A::IDENTITY, Vec::new())
    }
}

impl PathContainer {
    pub fn new(transform: Affine3A, paths: Vec<PolylinePath>) -> Self {
        let mut container = Self {
            transform,
            paths,
            world_lengths: Vec::new(),
        };
        container.measure();
        container
    }

    pub fn from_points(points: Vec<Vec3>) -> Result<Self, Error> {
        Ok(Self::new(Affine3A::IDENTITY, vec![PolylinePath::new(points)?]))
    }

    pub fn push(&mut self, path: PolylinePath) -> PathId {
        self.paths.push(path);
        self.measure();
        self.paths.len() - 1
    }

    pub fn transform(&self) -> Affine3A {
        self.transform
    }

    pub fn set_transform(&mut self, transform: Affine3A) {
        self.transform = transform;
        self.measure();
    }

    pub fn path(&self, path: PathId) -> Option<&PolylinePath> {
        self.paths.get(path)
    }

    fn measure(&mut self) {
        let transform = self.transform;
        self.world_lengths = self
            .paths
            .iter()
            .map(|path| {
                path.points()
                    .windows(2)
                    .map(|pair| {
                        transform
                            .transform_point3(pair[0])
                            .distance(transform.transform_point3(pair[1]))
                    })
                    .sum()
            })
            .collect();
    }
}

impl PathEvaluator for PathContainer {
    fn path_count(&self) -> usize {
        self.paths.len()
    }

    fn position(&self, path: PathId, t: f32) -> Vec3 {
        self.paths
            .get(path)
            .map(|p| self.transform.transform_point3(p.position(t)))
            .unwrap_or(Vec3::ZERO)
    }

    fn tangent(&self, path: PathId, t: f32) -> Vec3 {
        self.paths
            .get(path)
            .map(|p| self.transform.transform_vector3(p.tangent(t)))
            .unwrap_or(Vec3::ZERO)
    }

    fn length(&self, path: PathId) -> f32 {
        self.world_lengths.get(path).copied().unwrap_or(0.0)
    }
}
