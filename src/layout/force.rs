//! Force-directed layout: a particle simulation over the diagram graph.
//!
//! Every node becomes a particle; every semantic arc becomes a spring
//! between the particles its endpoints resolve to, going through the port
//! map where an endpoint is a process-node port. Three forces act on the
//! particles: pairwise inverse-square repulsion, linear spring attraction
//! with a rest length sized to just clear the two glyphs' half-diagonals,
//! and a drag force proportional to velocity.
//!
//! The simulation runs a fixed number of iterations with a time step that
//! decays linearly toward a small constant offset, so early iterations make
//! large exploratory moves and late iterations settle. There is no
//! convergence check; the fixed count is an engineering approximation of
//! good enough.

use crate::diagram::Diagram;
use crate::geometry::Point;
use crate::layout::{apply_positions, participant_ids, LayoutAlgorithm, LayoutOptions, LayoutReport};
use indexmap::IndexMap;
use tracing::debug;

// ────────────────────────────────────────────────────────────────────────────
// Simulator
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Particle {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    mass: f64,
}

#[derive(Debug, Clone)]
struct Spring {
    a: usize,
    b: usize,
    coefficient: f64,
    length: f64,
}

/// The bare physics: particles, springs, and a `step` that advances the
/// integration by one time slice.
#[derive(Debug, Clone)]
pub struct ForceSimulator {
    particles: Vec<Particle>,
    springs: Vec<Spring>,
    repulsion: f64,
    drag: f64,
    speed_limit: f64,
}

impl ForceSimulator {
    pub fn new(repulsion: f64, drag: f64, speed_limit: f64) -> Self {
        Self {
            particles: Vec::new(),
            springs: Vec::new(),
            repulsion,
            drag,
            speed_limit,
        }
    }

    /// Add a particle at the given warm-start position; returns its index.
    pub fn add_particle(&mut self, position: Point, mass: f64) -> usize {
        self.particles.push(Particle {
            x: position.x,
            y: position.y,
            vx: 0.0,
            vy: 0.0,
            mass,
        });
        self.particles.len() - 1
    }

    pub fn add_spring(&mut self, a: usize, b: usize, coefficient: f64, length: f64) {
        self.springs.push(Spring {
            a,
            b,
            coefficient,
            length,
        });
    }

    pub fn position(&self, index: usize) -> Point {
        let p = &self.particles[index];
        Point::new(p.x, p.y)
    }

    /// Advance the simulation by `dt`.
    pub fn step(&mut self, dt: f64) {
        let n = self.particles.len();
        let mut fx = vec![0.0; n];
        let mut fy = vec![0.0; n];

        // Pairwise repulsion. Coincident particles are separated along a
        // deterministic direction so repeated runs stay reproducible.
        for i in 0..n {
            for j in (i + 1)..n {
                let (mut dx, mut dy) = (
                    self.particles[j].x - self.particles[i].x,
                    self.particles[j].y - self.particles[i].y,
                );
                let mut d2 = dx * dx + dy * dy;
                if d2 < 1e-4 {
                    dx = 0.01 * (j - i) as f64;
                    dy = 0.01;
                    d2 = dx * dx + dy * dy;
                }
                let dist = d2.sqrt();
                let f = self.repulsion * self.particles[i].mass * self.particles[j].mass / d2;
                let (ux, uy) = (dx / dist, dy / dist);
                fx[i] -= f * ux;
                fy[i] -= f * uy;
                fx[j] += f * ux;
                fy[j] += f * uy;
            }
        }

        // Springs pull endpoints toward their rest length.
        for s in &self.springs {
            let (dx, dy) = (
                self.particles[s.b].x - self.particles[s.a].x,
                self.particles[s.b].y - self.particles[s.a].y,
            );
            let dist = (dx * dx + dy * dy).sqrt().max(1e-6);
            let f = s.coefficient * (dist - s.length);
            let (ux, uy) = (dx / dist, dy / dist);
            fx[s.a] += f * ux;
            fy[s.a] += f * uy;
            fx[s.b] -= f * ux;
            fy[s.b] -= f * uy;
        }

        // Drag opposes motion so the system settles.
        for (i, p) in self.particles.iter().enumerate() {
            fx[i] -= self.drag * p.vx;
            fy[i] -= self.drag * p.vy;
        }

        for (i, p) in self.particles.iter_mut().enumerate() {
            p.vx += fx[i] / p.mass * dt;
            p.vy += fy[i] / p.mass * dt;
            let speed = (p.vx * p.vx + p.vy * p.vy).sqrt();
            if speed > self.speed_limit {
                let scale = self.speed_limit / speed;
                p.vx *= scale;
                p.vy *= scale;
            }
            p.x += p.vx * dt;
            p.y += p.vy * dt;
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Force-directed algorithm
// ────────────────────────────────────────────────────────────────────────────

/// The force-directed layout strategy.
#[derive(Debug, Clone)]
pub struct ForceDirected {
    pub iterations: usize,
    pub spring_coefficient: f64,
    pub repulsion: f64,
    pub drag: f64,
    pub node_mass: f64,
    /// Base time step; decays linearly to `timestep_offset` over the run.
    pub timestep: f64,
    pub timestep_offset: f64,
    pub speed_limit: f64,
}

impl Default for ForceDirected {
    fn default() -> Self {
        Self {
            iterations: 100,
            spring_coefficient: 0.1,
            repulsion: 50.0,
            drag: 1.0,
            node_mass: 3.0,
            timestep: 1.0,
            timestep_offset: 0.05,
            speed_limit: 100.0,
        }
    }
}

impl LayoutAlgorithm for ForceDirected {
    fn name(&self) -> &'static str {
        "force-directed"
    }

    fn run(&self, diagram: &mut Diagram, opts: &LayoutOptions) -> LayoutReport {
        let ids = participant_ids(diagram, opts);
        if ids.is_empty() {
            return LayoutReport {
                iterations: 0,
                cancelled: false,
                particles: 0,
            };
        }

        let mut sim = ForceSimulator::new(self.repulsion, self.drag, self.speed_limit);
        let mut index: IndexMap<String, usize> = IndexMap::new();
        for id in &ids {
            if let Some(node) = diagram.node(id) {
                let particle = sim.add_particle(node.bounds.center(), self.node_mass);
                index.insert(id.clone(), particle);
            }
        }

        // One spring per arc. Endpoints naming a port are resolved to the
        // port's process node; arcs leaving the participant set get none.
        let ports = diagram.port_map();
        let resolve = |r: &str| {
            index
                .get(r)
                .or_else(|| ports.get(r).and_then(|owner| index.get(owner)))
                .copied()
        };
        let radius_of = |particle: usize| {
            index
                .get_index(particle)
                .and_then(|(id, _)| diagram.node(id))
                .map(|n| n.bounds.radius())
        };
        let mut springs = 0usize;
        for arc in diagram.arcs() {
            let (Some(a), Some(b)) = (resolve(&arc.start_ref), resolve(&arc.end_ref)) else {
                continue;
            };
            if a == b {
                continue;
            }
            let (Some(ra), Some(rb)) = (radius_of(a), radius_of(b)) else {
                continue;
            };
            sim.add_spring(a, b, self.spring_coefficient, ra + rb);
            springs += 1;
        }

        // Nothing to relax without springs; leave the warm-start positions.
        if springs == 0 {
            return LayoutReport {
                iterations: 0,
                cancelled: false,
                particles: index.len(),
            };
        }

        let mut iterations = 0;
        let mut cancelled = false;
        for i in 0..self.iterations {
            if opts.cancel.as_ref().is_some_and(|c| c.is_cancelled()) {
                cancelled = true;
                break;
            }
            let dt =
                self.timestep * (1.0 - i as f64 / self.iterations as f64) + self.timestep_offset;
            sim.step(dt);
            iterations += 1;
        }
        debug!(particles = index.len(), springs, iterations, "layout pass finished");

        let positions: IndexMap<String, Point> = index
            .iter()
            .map(|(id, particle)| (id.clone(), sim.position(*particle)))
            .collect();
        apply_positions(diagram, &positions, opts.selection.is_some());

        if opts.route_lines {
            crate::layout::routing::route_arcs(diagram);
        }

        LayoutReport {
            iterations,
            cancelled,
            particles: index.len(),
        }
    }
}
