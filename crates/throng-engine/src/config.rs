//! Simulation configuration, validation, and error types.
//!
//! [`SimConfig`] is the construction input for a
//! [`Simulation`](crate::Simulation). [`validate()`](SimConfig::validate)
//! checks every parameter up front so that epoch drivers never see an
//! out-of-range probability or an impossible layout.

use std::error::Error;
use std::fmt;

use throng_core::{SimError, MAX_CLASSES};

/// Smallest accepted grid dimension: a border ring around one floor cell.
pub const MIN_DIMENSION: u32 = 3;

// ── LayoutKind ─────────────────────────────────────────────────────

/// Initial furniture placed on the grid at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LayoutKind {
    /// Border walls, one attractor per class at its default slot, a ring
    /// of eight doors around every attractor and, when producers are
    /// enabled, a 3x3 producer block on the next free slot.
    #[default]
    Standard,
    /// Border walls and attractor tags only.
    Bordered,
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`SimConfig::validate()`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A grid dimension is below [`MIN_DIMENSION`].
    GridTooSmall {
        /// Configured columns.
        columns: u32,
        /// Configured rows.
        rows: u32,
    },
    /// Class count is zero.
    NoClasses,
    /// Attractor slots plus the producer slot exceed [`MAX_CLASSES`].
    TooManySlots {
        /// Configured class count.
        num_classes: u8,
        /// Whether a producer block was requested.
        producer_enabled: bool,
    },
    /// A probability lies outside `[0, 1]` or is not finite.
    InvalidProbability {
        /// Name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// A non-negative coefficient is negative or not finite.
    InvalidCoefficient {
        /// Name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GridTooSmall { columns, rows } => write!(
                f,
                "grid {columns}x{rows} is below the minimum of {MIN_DIMENSION}x{MIN_DIMENSION}"
            ),
            Self::NoClasses => write!(f, "at least one attractor class is required"),
            Self::TooManySlots {
                num_classes,
                producer_enabled,
            } => write!(
                f,
                "{num_classes} classes with producer_enabled={producer_enabled} \
                 need more than {MAX_CLASSES} slots"
            ),
            Self::InvalidProbability { name, value } => {
                write!(f, "{name} must be a probability in [0, 1], got {value}")
            }
            Self::InvalidCoefficient { name, value } => {
                write!(f, "{name} must be finite and non-negative, got {value}")
            }
        }
    }
}

impl Error for ConfigError {}

impl From<ConfigError> for SimError {
    fn from(e: ConfigError) -> Self {
        SimError::invalid(e.to_string())
    }
}

// ── SimConfig ──────────────────────────────────────────────────────

/// Parameters of a crowd simulation.
///
/// Probabilities are per agent (or per producer) per epoch.
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    /// Grid width. Default: 30.
    pub columns: u32,
    /// Grid height. Default: 60.
    pub rows: u32,
    /// Number of attractor classes. Default: 1.
    pub num_classes: u8,
    /// Place a producer block in the standard layout. Default: true.
    pub producer_enabled: bool,
    /// Agents stepping onto a door leave the simulation. Default: false.
    pub exit_enabled: bool,
    /// Chance that two agents heading into each other's cell swap
    /// (parallel policy). Zero also removes occupied cells from the
    /// candidate set. Default: 0.
    pub change_place_prob: f64,
    /// Trail diffusion coefficient. Zero disables the trail. Default: 0.
    pub diffusion_coeff: f64,
    /// Trail decay rate. Zero means `1.1 * diffusion_coeff`. Default: 0.
    pub decay_rate: f64,
    /// Chance that an agent is reassigned to a random class. Default: 0.001.
    pub change_class_prob: f64,
    /// Chance that a free producer spawns an agent. Default: 0.05.
    pub production_prob: f64,
    /// Weight of the trail term in the movement cost. Default: 0.75.
    pub trail_weight: f64,
    /// Exponent `p` of the `(width + height)^p` temperature scale. Default: 0.3.
    pub size_exponent: f64,
    /// Apply cross-class repulsion in the parallel policy. Default: true.
    pub cross_class_repulsion: bool,
    /// Initial furniture. Default: [`LayoutKind::Standard`].
    pub layout: LayoutKind,
    /// Seed of the simulation RNG. Default: 0.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            columns: 30,
            rows: 60,
            num_classes: 1,
            producer_enabled: true,
            exit_enabled: false,
            change_place_prob: 0.0,
            diffusion_coeff: 0.0,
            decay_rate: 0.0,
            change_class_prob: 0.001,
            production_prob: 0.05,
            trail_weight: 0.75,
            size_exponent: 0.3,
            cross_class_repulsion: true,
            layout: LayoutKind::Standard,
            seed: 0,
        }
    }
}

impl SimConfig {
    /// Default parameters on a `columns x rows` grid with `num_classes`
    /// attractor classes.
    pub fn new(columns: u32, rows: u32, num_classes: u8) -> Self {
        Self {
            columns,
            rows,
            num_classes,
            ..Self::default()
        }
    }

    /// Decay actually applied to the trail each epoch.
    pub fn effective_decay(&self) -> f64 {
        if self.decay_rate == 0.0 {
            1.1 * self.diffusion_coeff
        } else {
            self.decay_rate
        }
    }

    /// Whether the trail field is active.
    pub fn diffusion_enabled(&self) -> bool {
        self.diffusion_coeff != 0.0
    }

    /// Trail added by one qualifying move.
    pub fn trail_deposit(&self) -> f64 {
        10.0 * self.diffusion_coeff
    }

    /// Check every parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns < MIN_DIMENSION || self.rows < MIN_DIMENSION {
            return Err(ConfigError::GridTooSmall {
                columns: self.columns,
                rows: self.rows,
            });
        }
        if self.num_classes == 0 {
            return Err(ConfigError::NoClasses);
        }
        if usize::from(self.num_classes) + usize::from(self.producer_enabled) > MAX_CLASSES {
            return Err(ConfigError::TooManySlots {
                num_classes: self.num_classes,
                producer_enabled: self.producer_enabled,
            });
        }
        for (name, value) in [
            ("change_place_prob", self.change_place_prob),
            ("change_class_prob", self.change_class_prob),
            ("production_prob", self.production_prob),
        ] {
            check_probability(name, value)?;
        }
        for (name, value) in [
            ("diffusion_coeff", self.diffusion_coeff),
            ("decay_rate", self.decay_rate),
            ("trail_weight", self.trail_weight),
            ("size_exponent", self.size_exponent),
        ] {
            check_coefficient(name, value)?;
        }
        Ok(())
    }
}

/// Reject `value` unless it is a finite probability.
pub(crate) fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::InvalidProbability { name, value });
    }
    Ok(())
}

/// Reject `value` unless it is finite and non-negative.
pub(crate) fn check_coefficient(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidCoefficient { name, value });
    }
    Ok(())
}
