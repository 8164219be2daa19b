//! Transient line-clear effects
//!
//! Purely cosmetic side channel for the UI: which rows flash, whether the
//! board shakes, and a burst of particles. Never read back by the rules.

use crate::rng::SimpleRng;
use crate::types::{PieceKind, Rgb};

/// One particle spawned from a cleared cell.
///
/// Positions are in board cells, velocities in cells per second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineEffectState {
    /// Cleared row indices, top to bottom
    pub flashing_lines: Vec<usize>,
    /// Set only for a four-line clear
    pub shaking: bool,
    pub particles: Vec<Particle>,
    /// Display time left; the effect is inactive at 0
    pub remaining_ms: u32,
}

impl LineEffectState {
    /// Start an effect for `rows` cleared by a piece of `kind`.
    pub fn trigger(
        &mut self,
        rows: &[usize],
        board_width: u8,
        kind: PieceKind,
        duration_ms: u32,
        rng: &mut SimpleRng,
    ) {
        self.flashing_lines = rows.to_vec();
        self.shaking = rows.len() == 4;
        self.particles.clear();
        self.particles.reserve(rows.len() * board_width as usize);

        let color = kind.color();
        for &row in rows {
            for x in 0..board_width {
                self.particles.push(Particle {
                    x: x as f32 + 0.5,
                    y: row as f32 + 0.5,
                    vx: (rng.next_unit() - 0.5) * 8.0,
                    vy: -(rng.next_unit() * 6.0 + 2.0),
                    color,
                });
            }
        }
        self.remaining_ms = duration_ms;
    }

    pub fn is_active(&self) -> bool {
        self.remaining_ms > 0
    }

    /// Count down; clears the effect when its time runs out.
    pub fn advance(&mut self, elapsed_ms: u32) {
        if !self.is_active() {
            return;
        }
        let dt = elapsed_ms.min(self.remaining_ms) as f32 / 1000.0;
        for p in &mut self.particles {
            p.x += p.vx * dt;
            p.y += p.vy * dt;
        }
        self.remaining_ms = self.remaining_ms.saturating_sub(elapsed_ms);
        if self.remaining_ms == 0 {
            self.clear();
        }
    }

    pub fn clear(&mut self) {
        self.flashing_lines.clear();
        self.shaking = false;
        self.particles.clear();
        self.remaining_ms = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tetris_shakes_and_spawns_particles_per_cell() {
        let mut rng = SimpleRng::new(3);
        let mut effect = LineEffectState::default();
        effect.trigger(&[16, 17, 18, 19], 10, PieceKind::I, 500, &mut rng);

        assert!(effect.shaking);
        assert_eq!(effect.particles.len(), 40);
        assert!(effect
            .particles
            .iter()
            .all(|p| p.color == PieceKind::I.color()));
    }

    #[test]
    fn single_does_not_shake() {
        let mut rng = SimpleRng::new(3);
        let mut effect = LineEffectState::default();
        effect.trigger(&[19], 10, PieceKind::T, 500, &mut rng);
        assert!(!effect.shaking);
        assert_eq!(effect.flashing_lines, vec![19]);
    }

    #[test]
    fn effect_expires_after_duration() {
        let mut rng = SimpleRng::new(3);
        let mut effect = LineEffectState::default();
        effect.trigger(&[5, 6], 10, PieceKind::S, 500, &mut rng);

        effect.advance(499);
        assert!(effect.is_active());
        assert_eq!(effect.flashing_lines, vec![5, 6]);

        effect.advance(1);
        assert_eq!(effect, LineEffectState::default());
    }

    #[test]
    fn same_seed_same_particles() {
        let mut a = LineEffectState::default();
        let mut b = LineEffectState::default();
        a.trigger(&[3], 10, PieceKind::L, 500, &mut SimpleRng::new(9));
        b.trigger(&[3], 10, PieceKind::L, 500, &mut SimpleRng::new(9));
        assert_eq!(a, b);
    }
}
