use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::kinematics::uniform;

/// Closed range a duration or size is drawn from. Durations are in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn sample(&self, rng: &mut fastrand::Rng) -> f32 {
        uniform(rng, self.min, self.max)
    }

    fn check(&self, name: &'static str) -> Result<(), ConfigError> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.min < 0.0 || self.min > self.max
        {
            return Err(ConfigError::InvalidSpan {
                name,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// All tunables. Defaults reproduce the classic spider toy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // --- Sprites ---
    pub hunter_frames: u32,
    pub prey_frames: u32,
    /// Multiplies the hunter's frame-change rate.
    pub anim_speed_mul: f32,
    /// Prey body width in pixels.
    pub prey_size: Span,

    // --- Speeds (px/s) ---
    pub base_speed: f32,
    pub angry_speed: f32,
    pub chase_speed: f32,
    pub prey_speed: f32,

    // --- Distances (px) ---
    pub catch_dist: f32,
    pub grab_dist: f32,

    // --- Idle wandering ---
    /// Give up on a waypoint after this long.
    pub idle_wander_after: f32,
    /// Dwell at a reached waypoint.
    pub idle_wander_pause: Span,
    pub wobble_amplitude: f32,
    pub wander_wobble_amplitude: f32,

    // --- Cursor hunting ---
    pub attack_chance: f32,
    pub web_chance: f32,
    pub cursor_sit_chance: f32,
    pub attack_min_hits: u32,
    pub attack_max_hits: u32,
    pub web_duration: Span,
    pub web_size: Span,
    pub attention_open: Span,
    pub attention_closed: Span,

    // --- Prey ---
    pub prey_ensnare_chance: f32,
    pub first_spawn_delay: Span,
    pub prey_spawn_interval: Span,
    /// Upper bound on a single spawn batch.
    pub max_spawn_batch: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            hunter_frames: 12,
            prey_frames: 25,
            anim_speed_mul: 1.3,
            prey_size: Span::new(20.0, 56.0),

            base_speed: 65.0,
            angry_speed: 180.0,
            chase_speed: 350.0,
            prey_speed: 40.0,

            catch_dist: 15.0,
            grab_dist: 5.0,

            idle_wander_after: 10.0,
            idle_wander_pause: Span::new(0.5, 5.0),
            wobble_amplitude: 8.0,
            wander_wobble_amplitude: 15.0,

            attack_chance: 0.40,
            web_chance: 0.40,
            cursor_sit_chance: 0.20,
            attack_min_hits: 2,
            attack_max_hits: 4,
            web_duration: Span::new(3.0, 7.5),
            web_size: Span::new(48.0, 86.0),
            attention_open: Span::new(3.0, 5.0),
            attention_closed: Span::new(3.0, 8.0),

            prey_ensnare_chance: 0.28,
            first_spawn_delay: Span::new(2.0, 5.0),
            prey_spawn_interval: Span::new(7.5, 30.0),
            max_spawn_batch: 5,
        }
    }
}

impl SimConfig {
    /// Parse a (possibly partial) JSON document; missing keys keep defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, span) in [
            ("prey_size", self.prey_size),
            ("idle_wander_pause", self.idle_wander_pause),
            ("web_duration", self.web_duration),
            ("web_size", self.web_size),
            ("attention_open", self.attention_open),
            ("attention_closed", self.attention_closed),
            ("first_spawn_delay", self.first_spawn_delay),
            ("prey_spawn_interval", self.prey_spawn_interval),
        ] {
            span.check(name)?;
        }

        for (name, value) in [
            ("attack_chance", self.attack_chance),
            ("web_chance", self.web_chance),
            ("cursor_sit_chance", self.cursor_sit_chance),
            ("prey_ensnare_chance", self.prey_ensnare_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidChance { name, value });
            }
        }

        for (name, value) in [
            ("anim_speed_mul", self.anim_speed_mul),
            ("base_speed", self.base_speed),
            ("angry_speed", self.angry_speed),
            ("chase_speed", self.chase_speed),
            ("prey_speed", self.prey_speed),
            ("catch_dist", self.catch_dist),
            ("grab_dist", self.grab_dist),
            ("idle_wander_after", self.idle_wander_after),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::NonPositive { name });
            }
        }

        if self.hunter_frames == 0 {
            return Err(ConfigError::NonPositive { name: "hunter_frames" });
        }
        if self.prey_frames == 0 {
            return Err(ConfigError::NonPositive { name: "prey_frames" });
        }
        if self.max_spawn_batch == 0 {
            return Err(ConfigError::NonPositive { name: "max_spawn_batch" });
        }
        if self.attack_min_hits == 0 || self.attack_max_hits < self.attack_min_hits {
            return Err(ConfigError::InvalidSpan {
                name: "attack_hits",
                min: self.attack_min_hits as f32,
                max: self.attack_max_hits as f32,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        SimConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = SimConfig::from_json_str(r#"{ "web_chance": 1.0, "max_spawn_batch": 2 }"#)
            .unwrap();
        assert_eq!(cfg.web_chance, 1.0);
        assert_eq!(cfg.max_spawn_batch, 2);
        assert_eq!(cfg.chase_speed, 350.0);
    }

    #[test]
    fn rejects_bad_values() {
        let err = SimConfig::from_json_str(r#"{ "attack_chance": 1.5 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidChance { name: "attack_chance", .. }));

        let err =
            SimConfig::from_json_str(r#"{ "web_duration": { "min": 5.0, "max": 1.0 } }"#)
                .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSpan { name: "web_duration", .. }));

        let err = SimConfig::from_json_str(r#"{ "max_spawn_batch": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::NonPositive { .. }));

        assert!(matches!(
            SimConfig::from_json_str("{ nope").unwrap_err(),
            ConfigError::Parse(_)
        ));
    }

    #[test]
    fn span_samples_within_bounds() {
        let mut rng = fastrand::Rng::with_seed(1);
        let span = Span::new(2.0, 3.0);
        for _ in 0..1000 {
            let v = span.sample(&mut rng);
            assert!((2.0..=3.0).contains(&v));
        }
        assert_eq!(Span::new(4.0, 4.0).sample(&mut rng), 4.0);
    }
}
