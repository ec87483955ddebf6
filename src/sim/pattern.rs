//! Procedural ring lanes
//!
//! A pattern is a closed-form path over `progress ∈ [0, 1)`. Each spawn takes
//! the next point along the current pattern; an exhausted pattern is replaced
//! by a fresh random one from a tier-gated palette. Hard tier groups patterns
//! into themed sections with their own palette and pacing.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::DifficultyTier;
use crate::{clamp_to_square, clamp_within_radius};

/// Path shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternKind {
    StraightLine,
    Diagonal,
    Vertical,
    SineWave,
    VerticalWave,
    Zigzag,
    Circle,
    Spiral,
    FigureEight,
    Triangle,
    Square,
    Star,
    RandomScatter,
}

impl PatternKind {
    pub const ALL: [PatternKind; 13] = [
        PatternKind::StraightLine,
        PatternKind::Diagonal,
        PatternKind::Vertical,
        PatternKind::SineWave,
        PatternKind::VerticalWave,
        PatternKind::Zigzag,
        PatternKind::Circle,
        PatternKind::Spiral,
        PatternKind::FigureEight,
        PatternKind::Triangle,
        PatternKind::Square,
        PatternKind::Star,
        PatternKind::RandomScatter,
    ];

    /// Shapes that only move along Y (useless in single-axis mode)
    pub fn is_vertical_only(&self) -> bool {
        matches!(self, PatternKind::Vertical | PatternKind::VerticalWave)
    }
}

/// Hard-tier section themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionKind {
    /// Fast straight runs
    Gauntlet,
    /// Polygons
    Geometric,
    /// Waves and curves, a little slower
    Flowing,
    /// Scatter and sharp turns
    Chaos,
}

impl SectionKind {
    pub const ALL: [SectionKind; 4] = [
        SectionKind::Gauntlet,
        SectionKind::Geometric,
        SectionKind::Flowing,
        SectionKind::Chaos,
    ];

    pub fn palette(&self) -> &'static [PatternKind] {
        match self {
            SectionKind::Gauntlet => &[
                PatternKind::StraightLine,
                PatternKind::Vertical,
                PatternKind::Zigzag,
                PatternKind::Diagonal,
            ],
            SectionKind::Geometric => &[
                PatternKind::Triangle,
                PatternKind::Square,
                PatternKind::Star,
                PatternKind::Circle,
            ],
            SectionKind::Flowing => &[
                PatternKind::SineWave,
                PatternKind::VerticalWave,
                PatternKind::Spiral,
                PatternKind::FigureEight,
            ],
            SectionKind::Chaos => &[
                PatternKind::RandomScatter,
                PatternKind::Zigzag,
                PatternKind::Diagonal,
                PatternKind::Spiral,
            ],
        }
    }

    /// (spawn interval multiplier, approach speed multiplier)
    pub fn pacing(&self) -> (f32, f32) {
        match self {
            SectionKind::Gauntlet => (0.85, 1.1),
            SectionKind::Geometric => (1.0, 1.0),
            SectionKind::Flowing => (1.1, 0.95),
            SectionKind::Chaos => (0.9, 1.05),
        }
    }
}

/// Active pattern instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternContext {
    pub kind: PatternKind,
    /// Rings generated so far in this pattern
    pub ring_index: u32,
    /// Rings per pattern instance
    pub pattern_length: u32,
    pub amplitude: f32,
    pub frequency: f32,
    pub phase: f32,
    /// Where the pattern is anchored on the plane
    pub center: Vec2,
}

impl PatternContext {
    /// Position within the pattern, 0 at the first ring
    pub fn progress(&self) -> f32 {
        self.ring_index as f32 / self.pattern_length.max(1) as f32
    }

    pub fn is_exhausted(&self) -> bool {
        self.ring_index >= self.pattern_length
    }

    /// Offset from `center` at the given progress
    pub fn offset_at<R: Rng + ?Sized>(&self, progress: f32, rng: &mut R) -> Vec2 {
        let u = progress.clamp(0.0, 1.0);
        let a = self.amplitude;
        let f = self.frequency;
        let phi = self.phase;
        let sweep = 2.0 * u - 1.0;

        match self.kind {
            PatternKind::StraightLine => Vec2::new(a * sweep, 0.0),
            PatternKind::Diagonal => {
                let slope = if phi < TAU / 2.0 { 0.7 } else { -0.7 };
                Vec2::new(a * sweep, a * sweep * slope)
            }
            PatternKind::Vertical => Vec2::new(0.0, a * sweep),
            PatternKind::SineWave => Vec2::new((u * TAU * f + phi).sin() * a, a * 0.4 * sweep),
            PatternKind::VerticalWave => Vec2::new(a * 0.4 * sweep, (u * TAU * f + phi).sin() * a),
            PatternKind::Zigzag => {
                let s = u * (1.0 + f) * 2.0 + phi / TAU;
                let tri = 4.0 * (s - (s + 0.5).floor()).abs() - 1.0;
                Vec2::new(tri * a, a * 0.5 * sweep)
            }
            PatternKind::Circle => Vec2::from_angle(phi + u * TAU) * a,
            PatternKind::Spiral => {
                let radius = a * (0.15 + 0.85 * u);
                Vec2::from_angle(phi + u * TAU * (1.0 + f)) * radius
            }
            PatternKind::FigureEight => {
                let theta = phi + u * TAU;
                Vec2::new(a * theta.sin(), a * 0.5 * (2.0 * theta).sin())
            }
            PatternKind::Triangle => polygon_point(&regular_vertices(3, a, phi), u),
            PatternKind::Square => polygon_point(&regular_vertices(4, a, phi), u),
            PatternKind::Star => {
                let points = regular_vertices(5, a, phi);
                // Pentagram: visit every second vertex
                let star: Vec<Vec2> = (0..5).map(|k| points[(k * 2) % 5]).collect();
                polygon_point(&star, u)
            }
            PatternKind::RandomScatter => {
                let r = a * rng.random::<f32>().sqrt();
                Vec2::from_angle(rng.random::<f32>() * TAU) * r
            }
        }
    }
}

/// Vertices of a regular polygon of circumradius `radius`
fn regular_vertices(sides: usize, radius: f32, phase: f32) -> Vec<Vec2> {
    (0..sides)
        .map(|k| Vec2::from_angle(phase + k as f32 * TAU / sides as f32) * radius)
        .collect()
}

/// Walk a closed polygon: `u` picks the side, the remainder interpolates along it
fn polygon_point(vertices: &[Vec2], u: f32) -> Vec2 {
    let n = vertices.len();
    if n == 0 {
        return Vec2::ZERO;
    }
    let scaled = u.clamp(0.0, 1.0) * n as f32;
    let side = (scaled.floor() as usize).min(n - 1);
    let local = scaled - side as f32;
    vertices[side].lerp(vertices[(side + 1) % n], local)
}

/// Active hard-tier section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionContext {
    pub kind: SectionKind,
    pub rings_in_section: u32,
    pub section_duration: u32,
    pub interval_multiplier: f32,
    pub speed_multiplier: f32,
}

impl SectionContext {
    fn new(kind: SectionKind, section_duration: u32) -> Self {
        let (interval_multiplier, speed_multiplier) = kind.pacing();
        Self {
            kind,
            rings_in_section: 0,
            section_duration,
            interval_multiplier,
            speed_multiplier,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.rings_in_section >= self.section_duration
    }
}

/// Patterns a tier may pick from right now
pub fn candidate_patterns(
    tier: DifficultyTier,
    rings_cleared: u32,
    section: Option<&SectionContext>,
    single_axis: bool,
) -> Vec<PatternKind> {
    use PatternKind::*;

    let mut list: Vec<PatternKind> = match (tier, section) {
        (DifficultyTier::Hard, Some(section)) => section.kind.palette().to_vec(),
        (DifficultyTier::Expert, _) | (DifficultyTier::Hard, None) => PatternKind::ALL.to_vec(),
        (DifficultyTier::Easy, _) => {
            let mut l = vec![StraightLine, Diagonal, SineWave];
            if rings_cleared >= 10 {
                l.extend([Vertical, VerticalWave, Circle]);
            }
            if rings_cleared >= 25 {
                l.extend([Zigzag, Spiral, FigureEight, Triangle, Square]);
            }
            if rings_cleared >= 40 {
                l.push(Star);
            }
            l
        }
        (DifficultyTier::Normal, _) => {
            let mut l = vec![StraightLine, Diagonal, Vertical, SineWave];
            if rings_cleared >= 10 {
                l.extend([VerticalWave, Zigzag, Circle]);
            }
            if rings_cleared >= 25 {
                l.extend([Spiral, FigureEight, Triangle, Square]);
            }
            if rings_cleared >= 40 {
                l.extend([Star, RandomScatter]);
            }
            l
        }
    };

    if single_axis {
        list.retain(|k| !k.is_vertical_only());
    }
    if list.is_empty() {
        list.push(StraightLine);
    }
    list
}

/// Owns the pattern (and section) state between spawns
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternGenerator {
    pub pattern: Option<PatternContext>,
    pub section: Option<SectionContext>,
    /// Patterns started this round
    pub patterns_started: u32,
}

impl PatternGenerator {
    /// Interval and speed multipliers from the active section (1.0 when none)
    pub fn pacing_scales(&self) -> (f32, f32) {
        self.section
            .as_ref()
            .map(|s| (s.interval_multiplier, s.speed_multiplier))
            .unwrap_or((1.0, 1.0))
    }

    /// Next lane: advance along the pattern, then keep the point on the plane
    /// and within reach of the player's current position.
    pub fn next_target<R: Rng + ?Sized>(
        &mut self,
        player_pos: Vec2,
        rings_cleared: u32,
        tier: DifficultyTier,
        single_axis: bool,
        rng: &mut R,
    ) -> Vec2 {
        if tier.uses_sections() {
            self.refresh_section_if_needed(rng);
        } else {
            self.section = None;
        }

        let needs_pattern = self.pattern.as_ref().is_none_or(|p| p.is_exhausted());
        if needs_pattern {
            self.start_pattern(player_pos, rings_cleared, tier, single_axis, rng);
        }

        let Some(pattern) = self.pattern.as_mut() else {
            return player_pos;
        };
        let mut raw = pattern.center + pattern.offset_at(pattern.progress(), rng);
        pattern.ring_index += 1;
        if let Some(section) = self.section.as_mut() {
            section.rings_in_section += 1;
        }

        if single_axis {
            raw.y = 0.0;
        }
        let on_plane = clamp_to_square(raw, TARGET_BOUND);
        clamp_within_radius(on_plane, player_pos, MAX_REACH_RADIUS)
    }

    fn refresh_section_if_needed<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.section.as_ref().is_some_and(|s| !s.is_exhausted()) {
            return;
        }
        let previous = self.section.as_ref().map(|s| s.kind);
        let choices: Vec<SectionKind> = SectionKind::ALL
            .into_iter()
            .filter(|k| Some(*k) != previous)
            .collect();
        let kind = choices[rng.random_range(0..choices.len())];
        let duration = rng.random_range(8..=15);
        log::debug!("Section {:?} for {} rings", kind, duration);
        self.section = Some(SectionContext::new(kind, duration));
        // A new section always starts a fresh pattern from its palette
        self.pattern = None;
    }

    fn start_pattern<R: Rng + ?Sized>(
        &mut self,
        player_pos: Vec2,
        rings_cleared: u32,
        tier: DifficultyTier,
        single_axis: bool,
        rng: &mut R,
    ) {
        let mut candidates = candidate_patterns(tier, rings_cleared, self.section.as_ref(), single_axis);
        if let Some(previous) = self.pattern.as_ref().map(|p| p.kind)
            && candidates.len() > 1
        {
            candidates.retain(|k| *k != previous);
        }
        let kind = candidates[rng.random_range(0..candidates.len())];

        let scale = tier.tuning().amplitude_scale;
        let mut center = clamp_to_square(player_pos, PLAY_BOUND * 0.5);
        if single_axis {
            center.y = 0.0;
        }

        let pattern = PatternContext {
            kind,
            ring_index: 0,
            pattern_length: rng.random_range(6..=12),
            amplitude: rng.random_range(PATTERN_AMPLITUDE_MIN..PATTERN_AMPLITUDE_MAX) * scale,
            frequency: rng.random_range(0.5..2.0),
            phase: rng.random_range(0.0..TAU),
            center,
        };
        log::debug!(
            "Pattern {:?} x{} (amplitude {:.0}, frequency {:.2})",
            pattern.kind,
            pattern.pattern_length,
            pattern.amplitude,
            pattern.frequency
        );
        self.pattern = Some(pattern);
        self.patterns_started += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn context(kind: PatternKind) -> PatternContext {
        PatternContext {
            kind,
            ring_index: 0,
            pattern_length: 8,
            amplitude: 400.0,
            frequency: 1.0,
            phase: 0.0,
            center: Vec2::ZERO,
        }
    }

    #[test]
    fn test_same_seed_same_lanes() {
        let run = |seed| {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut generator = PatternGenerator::default();
            (0..40)
                .map(|i| generator.next_target(Vec2::ZERO, i, DifficultyTier::Expert, false, &mut rng))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(11), run(11));
        assert_ne!(run(11), run(12));
    }

    #[test]
    fn test_sine_formula() {
        let mut rng = Pcg32::seed_from_u64(0);
        let mut ctx = context(PatternKind::SineWave);
        ctx.frequency = 1.5;
        ctx.phase = 0.3;
        let u = 0.25;
        let p = ctx.offset_at(u, &mut rng);
        let expected = (u * TAU * 1.5 + 0.3).sin() * 400.0;
        assert!((p.x - expected).abs() < 1e-3);
    }

    #[test]
    fn test_square_walks_vertices() {
        let mut rng = Pcg32::seed_from_u64(0);
        let ctx = context(PatternKind::Square);
        let v0 = ctx.offset_at(0.0, &mut rng);
        let mid = ctx.offset_at(0.125, &mut rng);
        let v1 = ctx.offset_at(0.25, &mut rng);
        assert!((v0 - Vec2::new(400.0, 0.0)).length() < 1e-2);
        assert!((v1 - Vec2::new(0.0, 400.0)).length() < 1e-2);
        assert!((mid - Vec2::new(200.0, 200.0)).length() < 1e-2);
    }

    #[test]
    fn test_spiral_radius_grows() {
        let mut rng = Pcg32::seed_from_u64(0);
        let ctx = context(PatternKind::Spiral);
        let early = ctx.offset_at(0.1, &mut rng).length();
        let late = ctx.offset_at(0.9, &mut rng).length();
        assert!(late > early);
    }

    #[test]
    fn test_easy_starts_gentle() {
        let early = candidate_patterns(DifficultyTier::Easy, 0, None, false);
        assert!(early.iter().all(|k| matches!(
            k,
            PatternKind::StraightLine | PatternKind::Diagonal | PatternKind::SineWave
        )));
        let late = candidate_patterns(DifficultyTier::Easy, 100, None, false);
        assert!(late.contains(&PatternKind::Star));
        assert!(!late.contains(&PatternKind::RandomScatter));
        assert_eq!(candidate_patterns(DifficultyTier::Expert, 0, None, false).len(), 13);
    }

    #[test]
    fn test_single_axis_drops_vertical_shapes() {
        let list = candidate_patterns(DifficultyTier::Expert, 0, None, true);
        assert!(list.iter().all(|k| !k.is_vertical_only()));

        let mut rng = Pcg32::seed_from_u64(3);
        let mut generator = PatternGenerator::default();
        for i in 0..50 {
            let p = generator.next_target(Vec2::new(120.0, 0.0), i, DifficultyTier::Expert, true, &mut rng);
            assert_eq!(p.y, 0.0);
        }
    }

    #[test]
    fn test_hard_tier_uses_section_palette() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut generator = PatternGenerator::default();
        let mut sections_seen = 0;
        let mut last_kind = None;
        for i in 0..120 {
            generator.next_target(Vec2::ZERO, i, DifficultyTier::Hard, false, &mut rng);
            let section = generator.section.as_ref().unwrap();
            let pattern = generator.pattern.as_ref().unwrap();
            assert!(section.kind.palette().contains(&pattern.kind));
            assert!(section.rings_in_section <= section.section_duration);
            if last_kind != Some(section.kind) {
                sections_seen += 1;
                last_kind = Some(section.kind);
            }
        }
        // 120 rings with 8..=15 per section
        assert!(sections_seen >= 8);
        assert_ne!(generator.pacing_scales(), (0.0, 0.0));
    }

    #[test]
    fn test_patterns_rotate_after_length() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut generator = PatternGenerator::default();
        generator.next_target(Vec2::ZERO, 0, DifficultyTier::Normal, false, &mut rng);
        let len = generator.pattern.as_ref().unwrap().pattern_length;
        for i in 1..len {
            generator.next_target(Vec2::ZERO, i, DifficultyTier::Normal, false, &mut rng);
        }
        assert_eq!(generator.patterns_started, 1);
        generator.next_target(Vec2::ZERO, len, DifficultyTier::Normal, false, &mut rng);
        assert_eq!(generator.patterns_started, 2);
        assert_eq!(generator.pattern.as_ref().unwrap().ring_index, 1);
    }

    proptest! {
        #[test]
        fn prop_lanes_stay_reachable(
            seed in any::<u64>(),
            px in -1999.0f32..1999.0,
            py in -1999.0f32..1999.0,
            rings in 0u32..200,
            tier_idx in 0usize..4,
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut generator = PatternGenerator::default();
            let player = Vec2::new(px, py);
            for i in 0..20 {
                let p = generator.next_target(player, rings + i, DifficultyTier::ALL[tier_idx], false, &mut rng);
                prop_assert!(p.is_finite());
                prop_assert!(p.distance(player) <= MAX_REACH_RADIUS + 0.5);
                prop_assert!(p.x.abs() <= PLAY_BOUND && p.y.abs() <= PLAY_BOUND);
            }
        }
    }
}
