//! One-shot force layout.
//!
//! Nodes are scattered uniformly inside a cube of half-width
//! `max_distance`, then relaxed: every node is pushed away from close
//! neighbours and pulled toward the nodes its record relates it to. By
//! default nodes move one at a time in graph order. A single [`relax`] call
//! is one step, not a simulation to convergence; callers that want a calmer
//! picture call it again. Positions never leave the cube.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::graph::Graph;

/// How the displacements of one pass reach the positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutUpdate {
    /// Nodes move one after another in graph order, so later nodes see the
    /// positions already moved in the same pass.
    #[default]
    InPlace,
    /// Every displacement is computed from the positions at the start of the
    /// pass, then all are applied together. Independent of node order.
    Simultaneous,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    /// Half-width of the layout cube and cut-off range of both forces.
    pub max_distance: f32,
    pub repulsion_factor: f32,
    pub attraction_factor: f32,
    /// Pairs closer than this have no usable direction and exert no force.
    pub min_distance: f32,
    pub update: LayoutUpdate,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            max_distance: 5.0,
            repulsion_factor: 0.1,
            attraction_factor: 0.05,
            min_distance: 1e-3,
            update: LayoutUpdate::InPlace,
        }
    }
}

impl LayoutParams {
    fn half_width(&self) -> f32 {
        self.max_distance.abs()
    }
}

/// Push on `a` away from `b`: `repulsion_factor / d²` while `d < max_distance`.
pub fn repulsion(a: Vec3, b: Vec3, params: &LayoutParams) -> Vec3 {
    let dir = a - b;
    let dist = dir.length();
    // negated so NaN distances fall through to zero
    if !(dist >= params.min_distance && dist < params.max_distance) {
        return Vec3::ZERO;
    }
    dir / dist * (params.repulsion_factor / (dist * dist))
}

/// Pull on `a` toward `c`, falling off linearly to zero at `max_distance`
/// and scaled by how many relations `a` declares.
pub fn attraction(a: Vec3, c: Vec3, relation_count: usize, params: &LayoutParams) -> Vec3 {
    let dir = c - a;
    let dist = dir.length();
    if !(dist >= params.min_distance) || params.max_distance <= 0.0 {
        return Vec3::ZERO;
    }
    let strength = (params.max_distance - dist).max(0.0) / params.max_distance
        * params.attraction_factor
        * relation_count as f32;
    dir / dist * strength
}

fn displacement_at(graph: &Graph, positions: &[Vec3], i: usize, params: &LayoutParams) -> Vec3 {
    let a = positions[i];
    let mut d = Vec3::ZERO;

    for (j, &b) in positions.iter().enumerate() {
        if i != j {
            d += repulsion(a, b, params);
        }
    }

    let node = &graph.nodes()[i];
    let count = node.relation_count();
    for rel in &node.relations {
        let Some(j) = graph.index_of(&rel.id) else {
            continue;
        };
        if i != j {
            d += attraction(a, positions[j], count, params);
        }
    }
    d
}

/// Displacement of every node for one step, computed against the current
/// positions without moving anything.
pub fn displacements(graph: &Graph, params: &LayoutParams) -> Vec<Vec3> {
    let positions: Vec<Vec3> = graph.nodes().iter().map(|n| n.position).collect();
    (0..positions.len())
        .map(|i| displacement_at(graph, &positions, i, params))
        .collect()
}

/// Where a node lands after displacement `d`, or `None` if it stays put.
/// A single step is capped at `max_distance` and the result is kept inside
/// the layout cube, so near-coincident pairs cannot fling nodes away.
fn step(graph: &Graph, i: usize, from: Vec3, d: Vec3, params: &LayoutParams) -> Option<Vec3> {
    if !d.is_finite() {
        tracing::warn!(id = %graph.nodes()[i].id, "discarding non-finite displacement");
        return None;
    }
    let half = params.half_width();
    let to = (from + d.clamp_length_max(half)).clamp(Vec3::splat(-half), Vec3::splat(half));
    (to != from).then_some(to)
}

/// Apply one relaxation step. Returns how many nodes moved.
pub fn relax(graph: &mut Graph, params: &LayoutParams) -> usize {
    let mut positions: Vec<Vec3> = graph.nodes().iter().map(|n| n.position).collect();
    let mut moved = 0usize;

    match params.update {
        LayoutUpdate::InPlace => {
            for i in 0..positions.len() {
                let d = displacement_at(graph, &positions, i, params);
                if let Some(to) = step(graph, i, positions[i], d, params) {
                    positions[i] = to;
                    moved += 1;
                }
            }
        }
        LayoutUpdate::Simultaneous => {
            let deltas = displacements(graph, params);
            for (i, d) in deltas.into_iter().enumerate() {
                if let Some(to) = step(graph, i, positions[i], d, params) {
                    positions[i] = to;
                    moved += 1;
                }
            }
        }
    }

    for (node, p) in graph.nodes_mut().iter_mut().zip(positions) {
        node.position = p;
    }
    moved
}

pub struct LayoutEngine {
    params: LayoutParams,
    rng: StdRng,
}

impl LayoutEngine {
    pub fn new(params: LayoutParams) -> Self {
        Self {
            params,
            rng: StdRng::from_entropy(),
        }
    }

    /// Same seed and same graph give the same positions.
    pub fn seeded(params: LayoutParams, seed: u64) -> Self {
        Self {
            params,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn params(&self) -> &LayoutParams {
        &self.params
    }

    pub fn set_params(&mut self, params: LayoutParams) {
        self.params = params;
    }

    pub fn scatter(&mut self, graph: &mut Graph) {
        let half = self.params.half_width();
        for node in graph.nodes_mut() {
            node.position = Vec3::new(
                self.coord(half),
                self.coord(half),
                self.coord(half),
            );
        }
    }

    fn coord(&mut self, half: f32) -> f32 {
        self.rng.gen::<f32>() * half * 2.0 - half
    }

    pub fn relax(&self, graph: &mut Graph) -> usize {
        relax(graph, &self.params)
    }

    /// Scatter, then relax `passes` times. `passes == 0` is a purely random
    /// placement.
    pub fn run(&mut self, graph: &mut Graph, passes: usize) {
        self.scatter(graph);
        let mut moved = 0;
        for _ in 0..passes {
            moved = self.relax(graph);
        }
        tracing::debug!(nodes = graph.len(), passes, moved, "layout done");
    }
}
