//! Player kinematics
//!
//! Semi-implicit Euler under thrust and gravity, with a speed cap and a
//! square play region. Leaving the region is a boundary exit: the player is
//! parked back on a lane and must release and re-press thrust.

use glam::Vec2;

use super::state::PlayerState;
use crate::clamp_to_square;
use crate::consts::*;

/// What happened to the player this step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KinematicOutcome {
    /// First thrust of this life (gravity switched on)
    pub launched: bool,
    /// Clamped position where the player left the play region
    pub boundary_exit: Option<Vec2>,
    /// Position or velocity was non-finite and got reset
    pub recovered: bool,
}

/// Thrust direction honoring single-axis mode
fn thrust_direction(dir: Vec2, single_axis: bool) -> Vec2 {
    if single_axis {
        Vec2::new(dir.x, 0.0).normalize_or_zero()
    } else {
        dir.normalize_or_zero()
    }
}

/// Advance the player by one step.
///
/// `snap_to` is where the player is parked after a boundary exit (the current
/// target ring's lane); `None` parks at the origin.
pub fn integrate(
    player: &mut PlayerState,
    thrust: bool,
    thrust_dir: Vec2,
    dt: f32,
    snap_to: Option<Vec2>,
    single_axis: bool,
) -> KinematicOutcome {
    let mut outcome = KinematicOutcome::default();

    // Require a release before thrust counts again
    if player.thrust_latched {
        if thrust {
            return outcome;
        }
        player.thrust_latched = false;
    }

    if thrust && !player.started {
        player.started = true;
        outcome.launched = true;
    }
    if !player.started {
        return outcome;
    }

    let mut accel = Vec2::ZERO;
    if thrust {
        accel += thrust_direction(thrust_dir, single_axis) * THRUST_ACCEL;
    }
    if !single_axis {
        accel.y -= GRAVITY;
    }

    player.vel += accel * dt;
    if single_axis {
        player.vel.y = 0.0;
    }
    player.vel = player.vel.clamp_length_max(MAX_SPEED);
    player.pos += player.vel * dt;

    if !player.vel.is_finite() {
        log::warn!("Non-finite player velocity {:?}, zeroing", player.vel);
        player.vel = Vec2::ZERO;
        outcome.recovered = true;
    }
    if !player.pos.is_finite() {
        log::warn!("Non-finite player position {:?}, resetting to origin", player.pos);
        player.pos = Vec2::ZERO;
        player.vel = Vec2::ZERO;
        outcome.recovered = true;
    }

    if player.pos.x.abs() >= PLAY_BOUND || player.pos.y.abs() >= PLAY_BOUND {
        outcome.boundary_exit = Some(clamp_to_square(player.pos, PLAY_BOUND));
        player.vel = Vec2::ZERO;
        player.pos = snap_to
            .filter(|p| p.is_finite())
            .map(|p| clamp_to_square(p, TARGET_BOUND))
            .unwrap_or(Vec2::ZERO);
        player.started = false;
        player.thrust_latched = true;
    }

    outcome
}
