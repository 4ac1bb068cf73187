//! Global weather phase state machine
//!
//! One [`WeatherScheduler`] per session. It holds the active [`WeatherPhase`], counts
//! down the phase duration and, on expiry, picks the next phase from the season's
//! weight table. Thunderstorms are never rolled directly: a streak of consecutive Rain
//! phases queues one for the next transition out of Rain.
//!
//! Every transition queues `PhaseEnded(old)` then `PhaseStarted(new)` for
//! collaborators to drain once per frame.

use super::phase::{PhaseTable, Season, SeasonTable, WeatherEvent, WeatherPhase};
use crate::core_types::Vec3;
use crate::error::{ensure_non_negative, ensure_unit, ConfigError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::f32::consts::TAU;
use tracing::{debug, info, warn};

/// Shortest duration a sampled phase may have, in seconds
pub const MIN_PHASE_SECONDS: f32 = 0.1;

/// Upper bound on phase transitions processed by one `advance` call
pub const MAX_TRANSITIONS_PER_ADVANCE: usize = 64;

/// Relative likelihood of each base phase in one season
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseWeights {
    pub clear: f32,
    pub rain: f32,
    pub wind: f32,
    pub snow: f32,
}

impl PhaseWeights {
    /// Create a weight set
    pub fn new(clear: f32, rain: f32, wind: f32, snow: f32) -> Self {
        Self {
            clear,
            rain,
            wind,
            snow,
        }
    }

    /// Weight of a phase; Thunderstorm has none
    pub fn get(&self, phase: WeatherPhase) -> f32 {
        match phase {
            WeatherPhase::Clear => self.clear,
            WeatherPhase::Rain => self.rain,
            WeatherPhase::Wind => self.wind,
            WeatherPhase::Snow => self.snow,
            WeatherPhase::Thunderstorm => 0.0,
        }
    }

    /// Weights in bucket order: clear, wind, rain, snow
    fn buckets(&self) -> [(WeatherPhase, f32); 4] {
        [
            (WeatherPhase::Clear, self.clear),
            (WeatherPhase::Wind, self.wind),
            (WeatherPhase::Rain, self.rain),
            (WeatherPhase::Snow, self.snow),
        ]
    }
}

/// Inclusive `[min, max]` duration range in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationRange {
    pub min: f32,
    pub max: f32,
}

impl DurationRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Draw a duration, exact when `min == max`, never below [`MIN_PHASE_SECONDS`]
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f32 {
        let seconds = if self.min < self.max {
            rng.random_range(self.min..=self.max)
        } else {
            self.min
        };
        seconds.max(MIN_PHASE_SECONDS)
    }
}

/// Weather scheduler parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Base phase weights per season
    pub season_weights: SeasonTable<PhaseWeights>,
    /// Duration range per phase
    pub durations: PhaseTable<DurationRange>,
    /// Wind speed while each phase is active (world units per second)
    pub wind_speeds: PhaseTable<f32>,
    /// Weight multiplier for staying in the active base phase (>= 1)
    pub stickiness: f32,
    /// Consecutive Rain phases needed to queue a thunderstorm
    pub thunder_threshold: u32,
    /// Chance a queued thunderstorm fires when Rain ends
    pub thunder_chance: f32,
    /// A queued thunderstorm always fires when Rain ends
    pub thunder_guaranteed_when_queued: bool,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            season_weights: SeasonTable {
                spring: PhaseWeights::new(0.4, 0.35, 0.2, 0.05),
                summer: PhaseWeights::new(0.6, 0.2, 0.2, 0.0),
                autumn: PhaseWeights::new(0.35, 0.35, 0.3, 0.0),
                winter: PhaseWeights::new(0.3, 0.1, 0.2, 0.4),
            },
            durations: PhaseTable {
                clear: DurationRange::new(30.0, 60.0),
                rain: DurationRange::new(20.0, 40.0),
                thunderstorm: DurationRange::new(15.0, 25.0),
                wind: DurationRange::new(15.0, 30.0),
                snow: DurationRange::new(25.0, 45.0),
            },
            wind_speeds: PhaseTable {
                clear: 1.0,
                rain: 2.0,
                thunderstorm: 6.0,
                wind: 8.0,
                snow: 1.5,
            },
            stickiness: 1.5,
            thunder_threshold: 2,
            thunder_chance: 0.5,
            thunder_guaranteed_when_queued: true,
        }
    }
}

impl WeatherConfig {
    /// Check weights, durations and escalation settings
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for negative or non-finite weights, durations or wind
    /// speeds, an inverted duration range, stickiness below 1, a zero escalation
    /// threshold, or a thunder chance outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (_, weights) in self.season_weights.iter() {
            for (_, weight) in weights.buckets() {
                ensure_non_negative("weather.season_weights", weight)?;
            }
        }
        for (phase, range) in self.durations.iter() {
            ensure_non_negative("weather.durations.min", range.min)?;
            ensure_non_negative("weather.durations.max", range.max)?;
            if range.min > range.max {
                return Err(ConfigError::InvertedDuration {
                    phase,
                    min: range.min,
                    max: range.max,
                });
            }
        }
        for (_, &speed) in self.wind_speeds.iter() {
            ensure_non_negative("weather.wind_speeds", speed)?;
        }
        if !(self.stickiness.is_finite() && self.stickiness >= 1.0) {
            return Err(ConfigError::Stickiness(self.stickiness));
        }
        if self.thunder_threshold == 0 {
            return Err(ConfigError::ZeroCount {
                field: "weather.thunder_threshold",
            });
        }
        ensure_unit("weather.thunder_chance", self.thunder_chance)
    }
}

/// Roll the next base phase
///
/// Weights are normalised, the active base phase is multiplied by `stickiness`, and
/// `unit_draw` in `[0, 1)` is mapped onto the cumulative buckets in the order clear,
/// wind, rain, snow. Returns `None` when no weight is positive.
pub fn pick_base_phase(
    weights: &PhaseWeights,
    current: WeatherPhase,
    stickiness: f32,
    unit_draw: f32,
) -> Option<WeatherPhase> {
    let mut buckets = weights.buckets();
    for (_, weight) in &mut buckets {
        // NaN and negatives contribute nothing
        if weight.is_nan() || *weight < 0.0 {
            *weight = 0.0;
        }
    }

    let total: f32 = buckets.iter().map(|(_, w)| w).sum();
    if total <= 0.0 || !total.is_finite() {
        return None;
    }

    for (phase, weight) in &mut buckets {
        *weight /= total;
        if *phase == current {
            *weight *= stickiness.max(1.0);
        }
    }

    let total: f32 = buckets.iter().map(|(_, w)| w).sum();
    let r = unit_draw.clamp(0.0, 1.0) * total;

    let mut cumulative = 0.0;
    for &(phase, weight) in &buckets {
        cumulative += weight;
        if weight > 0.0 && r < cumulative {
            return Some(phase);
        }
    }

    // Rounding can leave r on the upper edge; the last positive bucket takes it
    buckets
        .iter()
        .rev()
        .find(|(_, w)| *w > 0.0)
        .map(|&(phase, _)| phase)
}

/// Per-session weather phase state machine
#[derive(Debug, Clone)]
pub struct WeatherScheduler {
    config: WeatherConfig,
    phase: WeatherPhase,
    /// Seconds left in the active phase
    remaining: f32,
    /// Seconds the active phase has been running
    elapsed_in_phase: f32,
    wind: Vec3,
    /// Consecutive Rain phases entered
    rain_streak: u32,
    thunder_queued: bool,
    transitions: u64,
    events: VecDeque<WeatherEvent>,
    rng: StdRng,
}

impl WeatherScheduler {
    /// Start in Clear with a sampled duration
    ///
    /// The initial `PhaseStarted(Clear)` is queued so listeners see a complete history.
    pub fn new(config: WeatherConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let phase = WeatherPhase::Clear;
        let remaining = config.durations.get(phase).sample(&mut rng);
        let wind = sample_wind(&mut rng, *config.wind_speeds.get(phase));

        info!(
            "Weather scheduler starting in {} for {:.1}s (seed {})",
            phase, remaining, seed
        );

        let mut events = VecDeque::new();
        events.push_back(WeatherEvent::PhaseStarted(phase));

        Self {
            config,
            phase,
            remaining,
            elapsed_in_phase: 0.0,
            wind,
            rain_streak: 0,
            thunder_queued: false,
            transitions: 0,
            events,
            rng,
        }
    }

    /// Get the active phase
    #[inline]
    pub fn phase(&self) -> WeatherPhase {
        self.phase
    }

    /// Get the seconds left before the next transition
    #[inline]
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Get the seconds the active phase has been running
    #[inline]
    pub fn elapsed_in_phase(&self) -> f32 {
        self.elapsed_in_phase
    }

    /// Get the wind vector (world XZ plane)
    #[inline]
    pub fn wind(&self) -> Vec3 {
        self.wind
    }

    /// Get the current rain streak
    #[inline]
    pub fn rain_streak(&self) -> u32 {
        self.rain_streak
    }

    /// Whether a thunderstorm waits for the end of the current Rain
    #[inline]
    pub fn thunder_queued(&self) -> bool {
        self.thunder_queued
    }

    /// Get the number of transitions since creation
    #[inline]
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Get the configuration
    pub fn config(&self) -> &WeatherConfig {
        &self.config
    }

    /// Number of events waiting to be drained
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Take every queued event in order
    pub fn drain_events(&mut self) -> Vec<WeatherEvent> {
        self.events.drain(..).collect()
    }

    /// Queue an event produced outside the scheduler, e.g. a season change
    pub(crate) fn push_event(&mut self, event: WeatherEvent) {
        self.events.push_back(event);
    }

    /// Count down the active phase and transition as often as the elapsed time demands
    ///
    /// Non-positive or non-finite `dt` is ignored. At most
    /// [`MAX_TRANSITIONS_PER_ADVANCE`] transitions happen per call.
    pub fn advance(&mut self, dt: f32, season: Season) {
        if !(dt.is_finite() && dt > 0.0) {
            return;
        }

        self.remaining -= dt;
        self.elapsed_in_phase += dt;

        let mut count = 0;
        while self.remaining <= 0.0 {
            if count == MAX_TRANSITIONS_PER_ADVANCE {
                warn!(
                    "Weather advance hit {} transitions; dropping {:.1}s of backlog",
                    MAX_TRANSITIONS_PER_ADVANCE, -self.remaining
                );
                self.remaining = MIN_PHASE_SECONDS;
                break;
            }
            let overshoot = -self.remaining;
            self.transition(season);
            self.remaining -= overshoot;
            self.elapsed_in_phase = overshoot;
            count += 1;
        }
    }

    /// End the active phase now and pick the next one
    pub fn force_transition(&mut self, season: Season) {
        self.transition(season);
    }

    fn transition(&mut self, season: Season) {
        let old = self.phase;
        let next = self.escalate().unwrap_or_else(|| self.roll(season));
        self.enter(old, next);
    }

    /// Consume a queued thunderstorm if Rain is ending and the escalation roll passes
    fn escalate(&mut self) -> Option<WeatherPhase> {
        if !(self.thunder_queued && self.phase == WeatherPhase::Rain) {
            return None;
        }
        let triggered = self.config.thunder_guaranteed_when_queued
            || self.rng.random::<f32>() < self.config.thunder_chance;
        if triggered {
            self.thunder_queued = false;
            Some(WeatherPhase::Thunderstorm)
        } else {
            None
        }
    }

    fn roll(&mut self, season: Season) -> WeatherPhase {
        let weights = self.config.season_weights.get(season);
        let draw = self.rng.random::<f32>();
        match pick_base_phase(weights, self.phase, self.config.stickiness, draw) {
            Some(phase) => phase,
            None => {
                warn!("All {} weather weights are non-positive; using Clear", season);
                WeatherPhase::Clear
            }
        }
    }

    fn enter(&mut self, old: WeatherPhase, next: WeatherPhase) {
        if next == WeatherPhase::Rain {
            self.rain_streak += 1;
            if self.rain_streak >= self.config.thunder_threshold {
                self.thunder_queued = true;
            }
        } else {
            // A queued storm waits for the next Rain; only `escalate` consumes it
            self.rain_streak = 0;
        }

        self.phase = next;
        self.remaining = self.config.durations.get(next).sample(&mut self.rng);
        self.elapsed_in_phase = 0.0;
        self.wind = sample_wind(&mut self.rng, *self.config.wind_speeds.get(next));
        self.transitions += 1;

        self.events.push_back(WeatherEvent::PhaseEnded(old));
        self.events.push_back(WeatherEvent::PhaseStarted(next));

        debug!(
            "Weather {} -> {} for {:.1}s (rain streak {}, thunder queued {})",
            old, next, self.remaining, self.rain_streak, self.thunder_queued
        );
    }
}

/// Wind with a uniform random heading in the XZ plane
fn sample_wind<R: Rng>(rng: &mut R, speed: f32) -> Vec3 {
    let heading = rng.random_range(0.0..TAU);
    Vec3::new(heading.cos() * speed, 0.0, heading.sin() * speed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn config_with_weights(weights: PhaseWeights) -> WeatherConfig {
        WeatherConfig {
            season_weights: SeasonTable {
                spring: weights,
                summer: weights,
                autumn: weights,
                winter: weights,
            },
            ..WeatherConfig::default()
        }
    }

    /// Collect the phases entered over `transitions` forced transitions
    fn run(scheduler: &mut WeatherScheduler, transitions: usize) -> Vec<WeatherPhase> {
        (0..transitions)
            .map(|_| {
                scheduler.force_transition(Season::Spring);
                scheduler.phase()
            })
            .collect()
    }

    #[test]
    fn test_starts_clear_with_start_event() {
        let mut scheduler = WeatherScheduler::new(WeatherConfig::default(), 7);
        assert_eq!(scheduler.phase(), WeatherPhase::Clear);
        assert!((30.0..=60.0).contains(&scheduler.remaining()));
        assert_eq!(
            scheduler.drain_events(),
            vec![WeatherEvent::PhaseStarted(WeatherPhase::Clear)]
        );
        assert_eq!(scheduler.pending_events(), 0);
    }

    #[test]
    fn test_pick_base_phase_buckets() {
        let weights = PhaseWeights::new(0.25, 0.25, 0.25, 0.25);
        // No stickiness from Thunderstorm, so each bucket is a quarter
        let pick = |r| pick_base_phase(&weights, WeatherPhase::Thunderstorm, 1.5, r);
        assert_eq!(pick(0.1), Some(WeatherPhase::Clear));
        assert_eq!(pick(0.3), Some(WeatherPhase::Wind));
        assert_eq!(pick(0.6), Some(WeatherPhase::Rain));
        assert_eq!(pick(0.9), Some(WeatherPhase::Snow));
        assert_eq!(pick(1.0), Some(WeatherPhase::Snow));
    }

    #[test]
    fn test_pick_base_phase_stickiness() {
        let weights = PhaseWeights::new(0.5, 0.0, 0.5, 0.0);
        // Active Clear weighs 0.75 of 1.25 after stickiness, so 0.59 stays Clear
        assert_eq!(
            pick_base_phase(&weights, WeatherPhase::Clear, 1.5, 0.59),
            Some(WeatherPhase::Clear)
        );
        assert_eq!(
            pick_base_phase(&weights, WeatherPhase::Wind, 1.5, 0.59),
            Some(WeatherPhase::Wind)
        );
    }

    #[test]
    fn test_pick_base_phase_degenerate_weights() {
        let zero = PhaseWeights::new(0.0, 0.0, 0.0, 0.0);
        assert_eq!(pick_base_phase(&zero, WeatherPhase::Rain, 1.5, 0.5), None);

        let negative = PhaseWeights::new(-1.0, f32::NAN, 0.0, 0.0);
        assert_eq!(pick_base_phase(&negative, WeatherPhase::Clear, 1.5, 0.5), None);

        let mut scheduler = WeatherScheduler::new(config_with_weights(zero), 3);
        assert!(run(&mut scheduler, 20)
            .iter()
            .all(|&p| p == WeatherPhase::Clear));
    }

    #[test]
    fn test_rain_streak_escalates_to_thunderstorm() {
        let config = config_with_weights(PhaseWeights::new(0.0, 1.0, 0.0, 0.0));
        let mut scheduler = WeatherScheduler::new(config, 11);

        let phases = run(&mut scheduler, 3);
        assert_eq!(
            phases,
            vec![
                WeatherPhase::Rain,
                WeatherPhase::Rain,
                WeatherPhase::Thunderstorm
            ]
        );
        assert!(!scheduler.thunder_queued());
        assert_eq!(scheduler.rain_streak(), 0);

        // After the storm the streak has to build up again
        let phases = run(&mut scheduler, 3);
        assert_eq!(
            phases,
            vec![
                WeatherPhase::Rain,
                WeatherPhase::Rain,
                WeatherPhase::Thunderstorm
            ]
        );
    }

    #[test]
    fn test_no_thunderstorm_without_rain() {
        let mut config = config_with_weights(PhaseWeights::new(1.0, 0.0, 0.0, 0.0));
        config.thunder_threshold = 1;
        let mut scheduler = WeatherScheduler::new(config, 5);

        assert!(run(&mut scheduler, 200)
            .iter()
            .all(|&p| p == WeatherPhase::Clear));
        assert!(!scheduler.thunder_queued());
    }

    /// Rain-only weather with a queued storm that fires with `chance`
    fn chance_config(chance: f32) -> WeatherConfig {
        WeatherConfig {
            thunder_chance: chance,
            thunder_guaranteed_when_queued: false,
            ..config_with_weights(PhaseWeights::new(0.0, 1.0, 0.0, 0.0))
        }
    }

    #[test]
    fn test_queue_survives_non_rain_phase() {
        let config = config_with_weights(PhaseWeights::new(0.0, 1.0, 0.0, 0.0));
        let mut scheduler = WeatherScheduler::new(config, 9);
        run(&mut scheduler, 2);
        assert!(scheduler.thunder_queued());

        scheduler.enter(WeatherPhase::Rain, WeatherPhase::Wind);
        assert!(scheduler.thunder_queued());
        assert_eq!(scheduler.rain_streak(), 0);

        // The next Rain segment ends in the storm the queue was holding
        scheduler.enter(WeatherPhase::Wind, WeatherPhase::Rain);
        assert_eq!(scheduler.rain_streak(), 1);
        assert_eq!(run(&mut scheduler, 1), vec![WeatherPhase::Thunderstorm]);
        assert!(!scheduler.thunder_queued());
    }

    #[test]
    fn test_zero_thunder_chance_falls_through_to_roll() {
        let mut scheduler = WeatherScheduler::new(chance_config(0.0), 13);

        assert!(run(&mut scheduler, 100)
            .iter()
            .all(|&p| p == WeatherPhase::Rain));
        assert!(scheduler.thunder_queued());
        assert_eq!(scheduler.rain_streak(), 100);

        // Clear and Rain both possible: Rain still ends through the seasonal roll
        let mixed = WeatherConfig {
            thunder_chance: 0.0,
            thunder_guaranteed_when_queued: false,
            ..config_with_weights(PhaseWeights::new(1.0, 1.0, 0.0, 0.0))
        };
        let mut scheduler = WeatherScheduler::new(mixed, 13);
        let phases = run(&mut scheduler, 200);
        assert!(!phases.contains(&WeatherPhase::Thunderstorm));
        assert!(phases.contains(&WeatherPhase::Clear));
    }

    #[test]
    fn test_certain_thunder_chance_matches_guaranteed() {
        let mut by_chance = WeatherScheduler::new(chance_config(1.0), 17);
        let mut guaranteed = WeatherScheduler::new(
            config_with_weights(PhaseWeights::new(0.0, 1.0, 0.0, 0.0)),
            17,
        );

        let phases = run(&mut by_chance, 6);
        assert_eq!(
            &phases[..3],
            &[
                WeatherPhase::Rain,
                WeatherPhase::Rain,
                WeatherPhase::Thunderstorm
            ]
        );
        let expected: Vec<WeatherPhase> = run(&mut guaranteed, 6);
        assert_eq!(phases, expected);
    }

    #[test]
    fn test_failed_thunder_roll_keeps_queue() {
        let mut scheduler = WeatherScheduler::new(chance_config(0.5), 23);
        let mut failed = 0;
        let mut fired = 0;

        for _ in 0..400 {
            let queued = scheduler.thunder_queued();
            let from_rain = scheduler.phase() == WeatherPhase::Rain;
            scheduler.force_transition(Season::Spring);

            if queued && from_rain {
                if scheduler.phase() == WeatherPhase::Thunderstorm {
                    fired += 1;
                    assert!(!scheduler.thunder_queued());
                } else {
                    failed += 1;
                    assert!(scheduler.thunder_queued());
                }
            } else {
                assert_ne!(scheduler.phase(), WeatherPhase::Thunderstorm);
            }
        }
        assert!(failed > 0, "no failed roll in 400 transitions");
        assert!(fired > 0, "no storm in 400 transitions");
    }

    #[test]
    fn test_events_are_paired_and_ordered() {
        let mut scheduler = WeatherScheduler::new(WeatherConfig::default(), 21);
        scheduler.drain_events();

        scheduler.advance(1_000.0, Season::Summer);
        let events = scheduler.drain_events();
        assert!(!events.is_empty());
        assert_eq!(events.len() % 2, 0);

        let mut previous = WeatherPhase::Clear;
        for pair in events.chunks(2) {
            assert_eq!(pair[0], WeatherEvent::PhaseEnded(previous));
            match pair[1] {
                WeatherEvent::PhaseStarted(next) => previous = next,
                other => panic!("expected PhaseStarted, got {other:?}"),
            }
        }
        assert_eq!(previous, scheduler.phase());
    }

    #[test]
    fn test_advance_bounds_transitions() {
        let mut config = WeatherConfig::default();
        for range in [
            &mut config.durations.clear,
            &mut config.durations.rain,
            &mut config.durations.thunderstorm,
            &mut config.durations.wind,
            &mut config.durations.snow,
        ] {
            *range = DurationRange::new(0.0, 0.0);
        }
        let mut scheduler = WeatherScheduler::new(config, 1);
        scheduler.advance(1.0e9, Season::Winter);

        assert_eq!(scheduler.transitions(), MAX_TRANSITIONS_PER_ADVANCE as u64);
        assert!(scheduler.remaining() > 0.0);
    }

    #[test]
    fn test_advance_ignores_bad_dt() {
        let mut scheduler = WeatherScheduler::new(WeatherConfig::default(), 2);
        let before = scheduler.remaining();
        scheduler.advance(-1.0, Season::Spring);
        scheduler.advance(f32::NAN, Season::Spring);
        scheduler.advance(0.0, Season::Spring);
        assert_eq!(scheduler.remaining(), before);
        assert_eq!(scheduler.transitions(), 0);
    }

    #[test]
    fn test_duration_sampling() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(DurationRange::new(12.0, 12.0).sample(&mut rng), 12.0);
        assert_eq!(DurationRange::new(0.0, 0.0).sample(&mut rng), MIN_PHASE_SECONDS);
        for _ in 0..100 {
            let d = DurationRange::new(20.0, 40.0).sample(&mut rng);
            assert!((20.0..=40.0).contains(&d));
        }
    }

    #[test]
    fn test_wind_speed_matches_phase() {
        let scheduler = WeatherScheduler::new(WeatherConfig::default(), 4);
        let wind = scheduler.wind();
        assert_eq!(wind.y, 0.0);
        assert_relative_eq!(wind.norm(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = WeatherScheduler::new(WeatherConfig::default(), 99);
        let mut b = WeatherScheduler::new(WeatherConfig::default(), 99);
        for season in Season::ALL {
            a.advance(500.0, season);
            b.advance(500.0, season);
        }
        assert_eq!(a.drain_events(), b.drain_events());
        assert_eq!(a.remaining(), b.remaining());
    }

    #[test]
    fn test_validate() {
        assert!(WeatherConfig::default().validate().is_ok());

        let config = WeatherConfig {
            stickiness: 0.5,
            ..WeatherConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::Stickiness(0.5)));

        let mut config = WeatherConfig::default();
        config.durations.rain = DurationRange::new(30.0, 10.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedDuration {
                phase: WeatherPhase::Rain,
                ..
            })
        ));

        let mut config = WeatherConfig::default();
        config.season_weights.winter.snow = -0.1;
        assert!(config.validate().is_err());

        let config = WeatherConfig {
            thunder_threshold: 0,
            ..WeatherConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
