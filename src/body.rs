use std::fmt;

use crate::color::{self, Color};
use crate::error::{Error, Result};
use ultraviolet::DVec2;

pub type Vector2 = DVec2;

/// Mass per unit of squared radius.
pub const MASS_FACTOR: f64 = 1e11;

/// A launch vector is divided by this once, when the body is created.
pub const LAUNCH_DAMPING: f64 = 4.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u64);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Rejects vectors with a NaN or infinite component.
pub fn check_finite(name: &'static str, v: Vector2) -> Result<()> {
    for value in [v.x, v.y] {
        if !value.is_finite() {
            return Err(Error::InvalidParameter { name, value });
        }
    }
    Ok(())
}

pub fn mass_of(radius: f64) -> f64 {
    radius * radius * MASS_FACTOR
}

#[derive(Clone, Debug)]
pub struct Body {
    pub id: BodyId,
    pub pos: Vector2,
    pub vel: Vector2,
    pub acc: Vector2,
    pub color: Color,
    radius: f64,
    mass: f64,
    pending_forces: Vec<Vector2>,
}

impl Body {
    pub fn new(
        id: BodyId,
        pos: Vector2,
        radius: f64,
        color: Color,
        launch: Option<Vector2>,
    ) -> Result<Self> {
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(Error::InvalidParameter {
                name: "radius",
                value: radius,
            });
        }
        check_finite("position", pos)?;
        if let Some(launch) = launch {
            check_finite("launch", launch)?;
        }
        Ok(Self::new_unchecked(id, pos, radius, color, launch))
    }

    fn new_unchecked(
        id: BodyId,
        pos: Vector2,
        radius: f64,
        color: Color,
        launch: Option<Vector2>,
    ) -> Self {
        Self {
            id,
            pos,
            vel: Vector2::zero(),
            acc: launch.map_or(Vector2::zero(), |v| v / LAUNCH_DAMPING),
            color,
            radius,
            mass: mass_of(radius),
            pending_forces: Vec::new(),
        }
    }

    /// Combines two colliding bodies. The larger one (the first on a tie)
    /// keeps its position and acceleration, and grows by a quarter of the
    /// smaller one's radius.
    pub fn merge(id: BodyId, a: &Body, b: &Body) -> Self {
        let (large, small) = if a.radius >= b.radius { (a, b) } else { (b, a) };
        Self::new_unchecked(
            id,
            large.pos,
            large.radius + small.radius / 4.0,
            color::neutral(),
            Some(large.acc),
        )
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn distance_to(&self, point: Vector2) -> f64 {
        (point - self.pos).mag()
    }

    /// Per-axis `+1` when `point` lies ahead of the body on that axis,
    /// `-1` otherwise (equal coordinates included).
    pub fn direction_to(&self, point: Vector2) -> Vector2 {
        let sign = |from: f64, to: f64| if from - to < 0.0 { 1.0 } else { -1.0 };
        Vector2::new(sign(self.pos.x, point.x), sign(self.pos.y, point.y))
    }

    pub fn collides_with(&self, other: &Body) -> bool {
        self.distance_to(other.pos) <= self.radius + other.radius
    }

    /// Replaces the current acceleration.
    pub fn apply_force(&mut self, force: Vector2) {
        self.acc = force;
    }

    pub fn integrate(&mut self) {
        self.pos += self.acc;
    }

    /// The sum of `forces` and the current acceleration becomes the new
    /// acceleration.
    pub fn resolve_forces(&mut self, forces: &[Vector2]) {
        let net = forces.iter().fold(self.acc, |sum, &f| sum + f);
        self.apply_force(net);
    }

    pub fn pending_forces(&self) -> &[Vector2] {
        &self.pending_forces
    }

    pub(crate) fn set_pending_forces(&mut self, forces: Vec<Vector2>) {
        assert!(
            self.pending_forces.is_empty(),
            "body {} already has pending forces",
            self.id
        );
        self.pending_forces = forces;
    }

    pub(crate) fn resolve_pending(&mut self) {
        let forces = std::mem::take(&mut self.pending_forces);
        self.resolve_forces(&forces);
    }
}
