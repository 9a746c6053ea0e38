use crate::body::{self, Body, BodyId, Vector2};
use crate::color::{self, Color, ColorSource};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::gravity::Gravity;

use log::{debug, trace, warn};
use rayon::prelude::*;

pub const MIN_SPAWN_SIZE: u8 = 1;
pub const MAX_SPAWN_SIZE: u8 = 10;

/// Read-only view of a body, handed to whoever draws the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyView {
    pub id: BodyId,
    pub pos: Vector2,
    pub radius: f64,
    pub color: Color,
}

impl From<&Body> for BodyView {
    fn from(body: &Body) -> Self {
        Self {
            id: body.id,
            pos: body.pos,
            radius: body.radius(),
            color: body.color,
        }
    }
}

pub type Snapshot = Vec<BodyView>;

/// Two bodies replaced by one during an integration phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MergeEvent {
    pub larger: BodyId,
    pub smaller: BodyId,
    pub merged: BodyId,
    pub radius: f64,
}

/// Kick given to a body released at `release` after dragging from
/// `drag_start`: it flies back towards the drag start, harder the longer the drag.
pub fn launch_force(drag_start: Vector2, release: Vector2) -> Vector2 {
    let d = drag_start - release;
    let dir_x = if d.x > 0.0 { 1.0 } else { -1.0 };
    let dir_y = if d.y > 0.0 { 1.0 } else { -1.0 };
    let scale = d.mag().cbrt() / 2.0 / 150.0;
    Vector2::new(dir_x * d.x.abs() * scale, dir_y * d.y.abs() * scale)
}

pub struct World {
    bodies: Vec<Body>,
    gravity: Gravity,
    spawn_size_index: u8,
    parallel_threshold: usize,
    next_id: u64,
    colors: Box<dyn ColorSource + Send>,
}

impl World {
    pub fn new(config: &Config) -> Self {
        let rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        Self::with_color_source(config, rng)
    }

    pub fn with_color_source(config: &Config, colors: impl ColorSource + Send + 'static) -> Self {
        let mut world = Self {
            bodies: Vec::new(),
            gravity: config.gravity(),
            spawn_size_index: MIN_SPAWN_SIZE,
            parallel_threshold: config.parallel_threshold,
            next_id: 0,
            colors: Box::new(colors),
        };
        world.set_spawn_size_index(config.spawn_size_index as i64);
        world
    }

    pub fn gravity(&self) -> Gravity {
        self.gravity
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    fn alloc_id(&mut self) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn spawn(
        &mut self,
        pos: Vector2,
        radius: f64,
        color: Option<Color>,
        launch: Option<Vector2>,
    ) -> Result<BodyId> {
        let color = match color {
            Some(color) => color,
            None => self.colors.next_color(),
        };
        let id = self.alloc_id();
        let body = Body::new(id, pos, radius, color, launch)?;
        debug!("spawned body {} at ({}, {}) r={}", id, pos.x, pos.y, radius);
        self.bodies.push(body);
        Ok(id)
    }

    pub fn remove(&mut self, id: BodyId) -> Option<Body> {
        let index = self.bodies.iter().position(|b| b.id == id)?;
        debug!("removed body {}", id);
        Some(self.bodies.remove(index))
    }

    /// Replaces the acceleration of a live body.
    pub fn apply_launch(&mut self, id: BodyId, force: Vector2) -> Result<()> {
        body::check_finite("launch", force)?;
        let body = self
            .bodies
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(Error::UnknownBody(id))?;
        body.apply_force(force);
        Ok(())
    }

    pub fn spawn_size_index(&self) -> u8 {
        self.spawn_size_index
    }

    pub fn set_spawn_size_index(&mut self, index: i64) {
        self.spawn_size_index = index.clamp(MIN_SPAWN_SIZE as i64, MAX_SPAWN_SIZE as i64) as u8;
    }

    /// One notch of the size wheel: negative deltas shrink, anything else grows.
    pub fn scroll_spawn_size(&mut self, delta: f64) {
        let step = if delta < 0.0 { -1 } else { 1 };
        self.set_spawn_size_index(self.spawn_size_index as i64 + step);
    }

    pub fn spawn_radius(&self) -> f64 {
        2.0 * self.spawn_size_index as f64
    }

    /// Spawns a body of the current spawn size at `release` and kicks it
    /// with [`launch_force`]. The kick is applied as-is, not damped.
    pub fn slingshot(&mut self, drag_start: Vector2, release: Vector2) -> Result<BodyId> {
        let id = self.spawn(release, self.spawn_radius(), Some(color::neutral()), None)?;
        self.apply_launch(id, launch_force(drag_start, release))?;
        Ok(id)
    }

    fn forces_on(gravity: &Gravity, bodies: &[Body], index: usize) -> Vec<Vector2> {
        let body = &bodies[index];
        bodies
            .iter()
            .enumerate()
            .filter(|&(other_index, _)| other_index != index)
            .filter_map(|(_, other)| {
                let distance = body.distance_to(other.pos);
                let Some(a) = gravity.pull(other.mass(), distance) else {
                    warn!("no finite pull between {} and {}; skipping", body.id, other.id);
                    return None;
                };
                let direction = body.direction_to(other.pos);
                Some(Vector2::new(a * direction.x, a * direction.y))
            })
            .collect()
    }

    /// Force-resolution phase: every body collects the pull of every other
    /// body, all read from the same state, then folds it into its acceleration.
    ///
    /// Bodies sharing a position have no defined pull, so they are merged
    /// first; the returned events list those merges.
    pub fn tick_forces(&mut self) -> Vec<MergeEvent> {
        let mut merges = Vec::new();
        loop {
            let found = self.merge_where(|a, b| a.pos == b.pos);
            if found.is_empty() {
                break;
            }
            merges.extend(found);
        }

        trace!("resolving forces for {} bodies", self.bodies.len());

        let gravity = &self.gravity;
        let bodies = &self.bodies;
        let forces: Vec<Vec<Vector2>> = if bodies.len() >= self.parallel_threshold {
            (0..bodies.len())
                .into_par_iter()
                .map(|i| Self::forces_on(gravity, bodies, i))
                .collect()
        } else {
            (0..bodies.len())
                .map(|i| Self::forces_on(gravity, bodies, i))
                .collect()
        };

        for (body, forces) in self.bodies.iter_mut().zip(forces) {
            body.set_pending_forces(forces);
        }
        for body in &mut self.bodies {
            body.resolve_pending();
        }
        merges
    }

    /// Integration phase: moves every body, then merges colliding pairs.
    pub fn tick_integrate(&mut self) -> Vec<MergeEvent> {
        for body in &mut self.bodies {
            body.integrate();
        }
        self.merge_where(Body::collides_with)
    }

    /// One merge pass over the current order. Each body takes part in at
    /// most one merge; merged bodies are appended after the survivors.
    fn merge_where(&mut self, touching: impl Fn(&Body, &Body) -> bool) -> Vec<MergeEvent> {
        let n = self.bodies.len();
        let mut consumed = vec![false; n];
        let mut pairs = Vec::new();

        for i in 0..n {
            if consumed[i] {
                continue;
            }
            for j in (i + 1)..n {
                if consumed[j] || !touching(&self.bodies[i], &self.bodies[j]) {
                    continue;
                }
                consumed[i] = true;
                consumed[j] = true;
                pairs.push((i, j));
                break;
            }
        }

        if pairs.is_empty() {
            return Vec::new();
        }

        let mut merged = Vec::with_capacity(pairs.len());
        let mut events = Vec::with_capacity(pairs.len());
        for (i, j) in pairs {
            let id = self.alloc_id();
            let (a, b) = (&self.bodies[i], &self.bodies[j]);
            let body = Body::merge(id, a, b);
            let (larger, smaller) = if a.radius() >= b.radius() {
                (a.id, b.id)
            } else {
                (b.id, a.id)
            };
            debug!(
                "merged {} and {} into {} (r={})",
                larger,
                smaller,
                id,
                body.radius()
            );
            events.push(MergeEvent {
                larger,
                smaller,
                merged: id,
                radius: body.radius(),
            });
            merged.push(body);
        }

        let mut flags = consumed.into_iter();
        self.bodies.retain(|_| !flags.next().unwrap_or(false));
        self.bodies.extend(merged);
        events
    }

    pub fn snapshot(&self) -> Snapshot {
        self.bodies.iter().map(BodyView::from).collect()
    }
}
