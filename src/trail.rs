//! Decaying record of pointer movement.
//!
//! Samples live in a bounded ring ordered by timestamp. Each one is a radial
//! gradient whose reach shrinks with an eased age curve until it vanishes at
//! `max_age_ms`. The field is queried analytically on the CPU and rasterised
//! once per frame into a single-channel texel buffer for the GPU.

use std::collections::VecDeque;

use glam::Vec2;

use crate::config::TrailConfig;
use crate::easing::ease_in_out_circ_remaining;
use crate::field::TrailSampler;

/// Most samples held at once; the oldest is dropped beyond this.
pub const TRAIL_CAPACITY: usize = 512;
/// Upper bound on samples filled in between two distant pointer moves.
pub const MAX_INTERPOLATED: usize = 16;
/// Weakest force a moving pointer can leave.
pub const MIN_FORCE: f32 = 0.3;
/// Fraction of the outer radius drawn at full intensity.
const INNER_RADIUS: f32 = 0.25;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailSample {
    /// Trail UV, y up.
    pub position: Vec2,
    pub born_ms: f64,
    /// Speed-derived weight in `[MIN_FORCE, 1]`.
    pub force: f32,
}

pub struct TrailField {
    config: TrailConfig,
    samples: VecDeque<TrailSample>,
    now_ms: f64,
    scratch: Vec<f32>,
    texels: Vec<u8>,
    texels_blank: bool,
}

impl TrailField {
    pub fn new(config: TrailConfig) -> Self {
        let len = (config.size as usize).pow(2);
        Self {
            config,
            samples: VecDeque::with_capacity(TRAIL_CAPACITY),
            now_ms: 0.0,
            scratch: vec![0.0; len],
            texels: vec![0; len],
            texels_blank: true,
        }
    }

    pub fn config(&self) -> &TrailConfig {
        &self.config
    }

    pub fn size(&self) -> u32 {
        self.config.size
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> impl Iterator<Item = &TrailSample> {
        self.samples.iter()
    }

    /// Row-major, row 0 at the bottom (GL texture layout).
    pub fn texels(&self) -> &[u8] {
        &self.texels
    }

    /// Records a pointer position. Work is bounded by `MAX_INTERPOLATED`.
    pub fn record_move(&mut self, position: Vec2, now_ms: f64) {
        let force = match self.samples.back().copied() {
            Some(last) => {
                let delta = last.position - position;
                let dist_sq = delta.length_squared();
                let force = (dist_sq * 10_000.0).clamp(MIN_FORCE, 1.0);
                self.interpolate(last.position, delta, dist_sq, force, now_ms);
                force
            }
            None => 1.0,
        };
        self.push(TrailSample {
            position,
            born_ms: now_ms,
            force,
        });
    }

    fn interpolate(&mut self, from: Vec2, delta: Vec2, dist_sq: f32, force: f32, now_ms: f64) {
        let step = self.config.radius * 0.5;
        if step <= 0.0 {
            return;
        }
        let lines = (dist_sq / (step * step)).ceil();
        if !lines.is_finite() || lines <= 1.0 {
            return;
        }
        let lines = (lines as usize).min(MAX_INTERPOLATED + 1);
        for i in 1..lines {
            let t = i as f32 / lines as f32;
            self.push(TrailSample {
                position: from - delta * t,
                born_ms: now_ms,
                force,
            });
        }
    }

    fn push(&mut self, sample: TrailSample) {
        if self.samples.len() == TRAIL_CAPACITY {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Advances the clock and drops expired samples.
    pub fn tick(&mut self, now_ms: f64) {
        self.now_ms = now_ms;
        let max_age = self.config.max_age_ms;
        while let Some(front) = self.samples.front() {
            if now_ms - front.born_ms >= max_age {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    /// Age weight of a sample: 1 when fresh, 0 from `max_age_ms` on.
    pub fn strength(&self, age_ms: f64) -> f32 {
        let max_age = self.config.max_age_ms;
        if age_ms >= max_age {
            return 0.0;
        }
        ease_in_out_circ_remaining(age_ms.max(0.0) / max_age) as f32
    }

    /// Intensity one sample adds at `position`.
    pub fn contribution(&self, sample: &TrailSample, position: Vec2, now_ms: f64) -> f32 {
        let outer = self.config.radius * self.strength(now_ms - sample.born_ms) * sample.force;
        if outer <= 0.0 {
            return 0.0;
        }
        let inner = outer * INNER_RADIUS;
        let dist = sample.position.distance(position);
        if dist >= outer {
            return 0.0;
        }
        let t = ((dist - inner) / (outer - inner)).clamp(0.0, 1.0);
        self.config.intensity * (1.0 - t)
    }

    /// Screen-blended intensity of every live sample at `position`.
    pub fn evaluate(&self, position: Vec2, now_ms: f64) -> f32 {
        self.samples.iter().fold(0.0, |acc, sample| {
            screen(acc, self.contribution(sample, position, now_ms))
        })
    }

    /// Redraws the texel buffer for the current clock. Returns `false` when the
    /// buffer was blank before and still is, so the upload can be skipped.
    pub fn rasterize(&mut self) -> bool {
        if self.samples.is_empty() && self.texels_blank {
            return false;
        }

        self.scratch.fill(0.0);
        let size = self.config.size as usize;
        let texel = 1.0 / size as f32;

        for sample in &self.samples {
            let outer = self.config.radius * self.strength(self.now_ms - sample.born_ms) * sample.force;
            if outer <= 0.0 {
                continue;
            }
            let min = ((sample.position - outer) * size as f32).floor().max(Vec2::ZERO);
            let max = ((sample.position + outer) * size as f32).ceil().min(Vec2::splat(size as f32));
            if min.x >= max.x || min.y >= max.y {
                continue;
            }
            for row in min.y as usize..max.y as usize {
                for col in min.x as usize..max.x as usize {
                    let center = Vec2::new((col as f32 + 0.5) * texel, (row as f32 + 0.5) * texel);
                    let value = self.contribution(sample, center, self.now_ms);
                    if value > 0.0 {
                        let cell = &mut self.scratch[row * size + col];
                        *cell = screen(*cell, value);
                    }
                }
            }
        }

        for (out, value) in self.texels.iter_mut().zip(&self.scratch) {
            *out = (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        }
        self.texels_blank = self.samples.is_empty();
        true
    }

    /// Nearest-texel lookup into the rasterised buffer.
    pub fn texel_at(&self, uv: Vec2) -> f32 {
        let size = self.config.size as usize;
        let clamped = uv.clamp(Vec2::ZERO, Vec2::ONE);
        let col = ((clamped.x * size as f32) as usize).min(size - 1);
        let row = ((clamped.y * size as f32) as usize).min(size - 1);
        self.texels[row * size + col] as f32 / 255.0
    }
}

impl TrailSampler for TrailField {
    fn sample(&self, uv: Vec2) -> f32 {
        self.evaluate(uv, self.now_ms)
    }
}

/// Canvas "screen" compositing: `1 - (1 - a)(1 - b)`.
fn screen(a: f32, b: f32) -> f32 {
    1.0 - (1.0 - a) * (1.0 - b)
}
