//! Confetti burst played when a run sets a new high score.

use rand::Rng;

pub const BURST_SIZE: usize = 140;
/// Downward acceleration in px/s².
pub const GRAVITY: f64 = 320.0;
pub const PALETTE: [&str; 5] = ["#ffd93d", "#ff6b6b", "#47d66d", "#5ad1ff", "#c77dff"];

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// Seconds left before the particle is culled.
    pub life: f64,
    pub color: &'static str,
    pub size: f64,
}

impl Particle {
    /// Fade used by the renderer; life starts around three seconds.
    pub fn alpha(&self) -> f64 {
        (self.life / 3.0).clamp(0.0, 1.0)
    }
}

#[derive(Clone, Debug, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a burst thrown outward and upward from `(x, y)`.
    pub fn burst<R: Rng + ?Sized>(&mut self, x: f64, y: f64, rng: &mut R) {
        self.particles.reserve(BURST_SIZE);
        for i in 0..BURST_SIZE {
            self.particles.push(Particle {
                x,
                y,
                vx: rng.gen_range(-120.0..120.0),
                vy: rng.gen_range(-240.0..-120.0),
                life: rng.gen_range(2.4..3.2),
                color: PALETTE[i % PALETTE.len()],
                size: rng.gen_range(4.0..8.0),
            });
        }
    }

    /// Semi-implicit Euler step, then cull expired particles.
    pub fn update(&mut self, dt: f64) {
        if self.particles.is_empty() {
            return;
        }
        for p in &mut self.particles {
            p.vy += GRAVITY * dt;
            p.x += p.vx * dt;
            p.y += p.vy * dt;
            p.life -= dt;
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn burst_spawns_upward_particles() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut ps = ParticleSystem::new();
        ps.burst(100.0, 50.0, &mut rng);
        assert_eq!(ps.len(), BURST_SIZE);
        for p in ps.iter() {
            assert!(p.vy < -119.0 && p.vy >= -240.0);
            assert!(p.vx.abs() <= 120.0);
            assert!(p.life >= 2.4 && p.life < 3.2);
            assert!(p.size >= 4.0 && p.size < 8.0);
            assert_eq!((p.x, p.y), (100.0, 50.0));
        }
    }

    #[test]
    fn gravity_is_applied_before_position() {
        let mut ps = ParticleSystem {
            particles: vec![Particle { x: 0.0, y: 0.0, vx: 10.0, vy: -100.0, life: 1.0, color: PALETTE[0], size: 4.0 }],
        };
        ps.update(0.5);
        let p = ps.iter().next().unwrap();
        assert!((p.vy - 60.0).abs() < 1e-9);
        assert!((p.y - 30.0).abs() < 1e-9);
        assert!((p.x - 5.0).abs() < 1e-9);
        assert!((p.life - 0.5).abs() < 1e-9);
    }

    #[test]
    fn expired_particles_are_culled() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut ps = ParticleSystem::new();
        ps.burst(0.0, 0.0, &mut rng);
        for _ in 0..200 {
            ps.update(1.0 / 60.0);
        }
        assert!(ps.is_empty(), "all particles live under 3.2s");
    }
}
