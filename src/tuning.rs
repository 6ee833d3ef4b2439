//! Data-driven game balance
//!
//! Every numeric policy of the simulation lives here so a host can override
//! it from JSON. Missing fields fall back to the defaults below.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Barrel movement and ladder AI policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarrelTuning {
    /// Initial horizontal speed (positive = rightward)
    pub roll_speed: f32,
    pub width: f32,
    pub height: f32,
    pub gravity: f32,
    pub max_fall_speed: f32,
    pub ladder_descent_speed: f32,
    /// Chance per landing tick to take an eligible ladder
    pub ladder_probability: f32,
    /// Max horizontal distance between barrel and ladder centers
    pub alignment_tolerance: f32,
    pub platform_detection_threshold: f32,
    pub slope_segment_width: f32,
    /// Height change per slope segment
    pub slope_step: f32,
    /// Platforms starting right of this x (relative to the screen) slope the other way
    pub slope_pivot_x: f32,
    /// Ticks after leaving a ladder during which landing is suppressed
    pub fall_grace_ticks: u32,
    /// Minimum ladder dwell before the barrel reverses direction
    pub min_ladder_ticks: u32,
    /// Downward speed given when stepping off a ladder
    pub ladder_exit_speed: f32,
    /// Barrels this far below the player are dropped at the side walls
    pub fall_out_margin: f32,
}

impl Default for BarrelTuning {
    fn default() -> Self {
        Self {
            roll_speed: 2.5,
            width: 12.0,
            height: 12.0,
            gravity: 0.25,
            max_fall_speed: 4.0,
            ladder_descent_speed: 1.0,
            ladder_probability: 0.10,
            alignment_tolerance: 4.0,
            platform_detection_threshold: 2.0,
            slope_segment_width: 16.0,
            slope_step: 1.0,
            slope_pivot_x: 100.0,
            fall_grace_ticks: 2,
            min_ladder_ticks: 2,
            ladder_exit_speed: 2.0,
            fall_out_margin: 32.0,
        }
    }
}

/// Bubble motion policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BubbleTuning {
    pub radius: f32,
    /// Collision sub-steps per tick for launched bubbles
    pub micro_steps: u32,
    pub fall_speed: f32,
    /// Extra gap still treated as touching when attaching
    pub attach_tolerance: f32,
}

impl Default for BubbleTuning {
    fn default() -> Self {
        Self {
            radius: 10.0,
            micro_steps: 30,
            fall_speed: 5.0,
            attach_tolerance: 2.0,
        }
    }
}

/// Breakout paddle policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaddleTuning {
    pub speed: f32,
    pub min_width: f32,
    pub max_width: f32,
    pub height: f32,
    pub center_hitbox_width: f32,
    pub boost_hitbox_width: f32,
}

impl Default for PaddleTuning {
    fn default() -> Self {
        Self {
            speed: 2.5,
            min_width: 16.0,
            max_width: 64.0,
            height: 8.0,
            center_hitbox_width: 16.0,
            boost_hitbox_width: 8.0,
        }
    }
}

/// Complete tuning set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub barrel: BarrelTuning,
    pub bubble: BubbleTuning,
    pub paddle: PaddleTuning,
}

fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::Invalid {
            field,
            reason: format!("expected a finite positive number, got {value}"),
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(TuningError::Invalid {
            field,
            reason: format!("expected a finite non-negative number, got {value}"),
        })
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        let result = self.validate_inner();
        if let Err(err) = &result {
            log::warn!("Rejected tuning: {err}");
        }
        result
    }

    fn validate_inner(&self) -> Result<(), TuningError> {
        let b = &self.barrel;
        if !b.roll_speed.is_finite() {
            return Err(TuningError::Invalid {
                field: "barrel.roll_speed",
                reason: "must be finite".into(),
            });
        }
        positive("barrel.width", b.width)?;
        positive("barrel.height", b.height)?;
        non_negative("barrel.gravity", b.gravity)?;
        non_negative("barrel.max_fall_speed", b.max_fall_speed)?;
        positive("barrel.ladder_descent_speed", b.ladder_descent_speed)?;
        if !(0.0..=1.0).contains(&b.ladder_probability) {
            return Err(TuningError::Invalid {
                field: "barrel.ladder_probability",
                reason: format!("must be within [0, 1], got {}", b.ladder_probability),
            });
        }
        non_negative("barrel.alignment_tolerance", b.alignment_tolerance)?;
        non_negative("barrel.platform_detection_threshold", b.platform_detection_threshold)?;
        positive("barrel.slope_segment_width", b.slope_segment_width)?;
        non_negative("barrel.slope_step", b.slope_step)?;
        non_negative("barrel.ladder_exit_speed", b.ladder_exit_speed)?;
        non_negative("barrel.fall_out_margin", b.fall_out_margin)?;

        let bubble = &self.bubble;
        positive("bubble.radius", bubble.radius)?;
        positive("bubble.fall_speed", bubble.fall_speed)?;
        non_negative("bubble.attach_tolerance", bubble.attach_tolerance)?;
        if bubble.micro_steps == 0 {
            return Err(TuningError::Invalid {
                field: "bubble.micro_steps",
                reason: "must be at least 1".into(),
            });
        }

        let p = &self.paddle;
        positive("paddle.speed", p.speed)?;
        positive("paddle.min_width", p.min_width)?;
        positive("paddle.max_width", p.max_width)?;
        positive("paddle.height", p.height)?;
        positive("paddle.center_hitbox_width", p.center_hitbox_width)?;
        positive("paddle.boost_hitbox_width", p.boost_hitbox_width)?;
        if p.min_width > p.max_width {
            return Err(TuningError::Invalid {
                field: "paddle.min_width",
                reason: format!("exceeds max_width ({} > {})", p.min_width, p.max_width),
            });
        }
        Ok(())
    }
}
