//! Fixed-step integrator for cast tokens.

use std::f64::consts::TAU;

use rand::Rng;

/// Per-step constants, tuned for a ~60 Hz frame loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsConstants {
    /// Linear velocity multiplier applied every step.
    pub friction: f64,
    pub angular_friction: f64,
    /// Velocity multiplier on wall contact (negative reverses direction).
    pub wall_bounce: f64,
    pub scale_decay: f64,
    pub min_scale: f64,
    pub release_scale: f64,
    /// Token radius at `scale == 1.0`.
    pub token_radius: f64,
    /// Launch velocity per axis is drawn from `±launch_speed / 2`.
    pub launch_speed: f64,
    pub launch_spin: f64,
    pub settle_speed: f64,
    pub settle_scale_tolerance: f64,
}

impl Default for PhysicsConstants {
    fn default() -> Self {
        Self {
            friction: 0.94,
            angular_friction: 0.98,
            wall_bounce: -0.6,
            scale_decay: 0.96,
            min_scale: 1.0,
            release_scale: 3.0,
            token_radius: 22.0,
            launch_speed: 45.0,
            launch_spin: 0.5,
            settle_speed: 0.1,
            settle_scale_tolerance: 0.01,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPhase {
    /// Still dropping toward the board (scale above minimum).
    Launched,
    /// Landed but still sliding.
    Settling,
    Settled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CastToken {
    /// Index into the charm catalog.
    pub charm: usize,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub rotation: f64,
    pub angular_velocity: f64,
    pub scale: f64,
    pub settled: bool,
    pub has_landed: bool,
}

impl CastToken {
    /// Releases a token at `origin` with a random outward velocity and spin.
    pub fn launch<R: Rng + ?Sized>(
        charm: usize,
        origin: (f64, f64),
        constants: &PhysicsConstants,
        rng: &mut R,
    ) -> Self {
        let vx = (rng.gen::<f64>() - 0.5) * constants.launch_speed;
        let vy = (rng.gen::<f64>() - 0.5) * constants.launch_speed;
        let rotation = rng.gen::<f64>() * TAU;
        let angular_velocity = (rng.gen::<f64>() - 0.5) * constants.launch_spin;

        Self {
            charm,
            x: origin.0,
            y: origin.1,
            vx,
            vy,
            rotation,
            angular_velocity,
            scale: constants.release_scale,
            settled: false,
            has_landed: false,
        }
    }

    pub fn phase(&self, constants: &PhysicsConstants) -> TokenPhase {
        if self.settled {
            TokenPhase::Settled
        } else if self.scale > constants.min_scale {
            TokenPhase::Launched
        } else {
            TokenPhase::Settling
        }
    }

    /// Visual radius at the current depth.
    pub fn radius(&self, constants: &PhysicsConstants) -> f64 {
        constants.token_radius * self.scale
    }
}

/// Something a step did that an outside observer (audio, UI) may react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEvent {
    /// Token reached minimum scale for the first time.
    Landed { token: usize },
    Settled { token: usize },
}

/// Advances one unsettled token by one step inside a `width` x `height` board.
/// Settled tokens are left untouched.
pub fn step_token(
    token: &mut CastToken,
    index: usize,
    width: f64,
    height: f64,
    constants: &PhysicsConstants,
    events: &mut Vec<StepEvent>,
) {
    if token.settled {
        return;
    }

    token.x += token.vx;
    token.y += token.vy;

    token.rotation += token.angular_velocity;
    token.angular_velocity *= constants.angular_friction;

    if token.scale > constants.min_scale {
        token.scale *= constants.scale_decay;
        if token.scale <= constants.min_scale {
            token.scale = constants.min_scale;
            if !token.has_landed {
                token.has_landed = true;
                events.push(StepEvent::Landed { token: index });
            }
        }
    }

    let radius = token.radius(constants);
    if token.x - radius < 0.0 {
        token.x = radius;
        token.vx *= constants.wall_bounce;
    }
    if token.x + radius > width {
        token.x = width - radius;
        token.vx *= constants.wall_bounce;
    }
    if token.y - radius < 0.0 {
        token.y = radius;
        token.vy *= constants.wall_bounce;
    }
    if token.y + radius > height {
        token.y = height - radius;
        token.vy *= constants.wall_bounce;
    }

    token.vx *= constants.friction;
    token.vy *= constants.friction;

    let at_rest = token.vx.abs() < constants.settle_speed && token.vy.abs() < constants.settle_speed;
    let grounded = token.scale <= constants.min_scale + constants.settle_scale_tolerance;
    if at_rest && grounded {
        token.settled = true;
        events.push(StepEvent::Settled { token: index });
    }
}
