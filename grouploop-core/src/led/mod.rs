//! LED behavior engine
//!
//! The strip is driven by exactly one behavior variant at a time. Variants
//! are long-lived: switching the active pattern runs the new variant's
//! setup (which deterministically establishes its initial visual state)
//! and leaves every other variant's internal state untouched, so a pattern
//! resumes where it left off when reactivated.

pub mod behaviors;
pub mod process;

pub use behaviors::{Breathing, Cycle, HeartBeat, Off, Solid, Spring};
pub use process::LedProcess;

use grouploop_hal::{PixelStrip, Rgb};

/// Refresh interval for animated variants (50 Hz)
pub const ANIMATION_INTERVAL_MS: u32 = 20;

/// Colors rotated through while the link is up; red is reserved for the
/// disconnected state.
pub const CONNECTED_PALETTE: [Rgb; 6] = [
    Rgb::new(0x00, 0xFF, 0x00), // green
    Rgb::new(0x00, 0x00, 0xFF), // blue
    Rgb::new(0x00, 0xFF, 0xFF), // cyan
    Rgb::new(0xFF, 0xFF, 0x00), // yellow
    Rgb::new(0xFF, 0x00, 0xFF), // magenta
    Rgb::new(0xFF, 0x80, 0x00), // orange
];

/// The closed set of LED behavior variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedPattern {
    Off,
    Solid,
    Breathing,
    HeartBeat,
    Cycle,
    Spring,
}

impl LedPattern {
    /// Pattern from its command-surface name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "off" => Some(LedPattern::Off),
            "solid" => Some(LedPattern::Solid),
            "breathing" => Some(LedPattern::Breathing),
            "heartbeat" => Some(LedPattern::HeartBeat),
            "cycle" => Some(LedPattern::Cycle),
            "spring" => Some(LedPattern::Spring),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            LedPattern::Off => "off",
            LedPattern::Solid => "solid",
            LedPattern::Breathing => "breathing",
            LedPattern::HeartBeat => "heartbeat",
            LedPattern::Cycle => "cycle",
            LedPattern::Spring => "spring",
        }
    }
}

/// All behavior variants plus the tag selecting the active one
pub struct LedEngine {
    active: LedPattern,
    off: Off,
    solid: Solid,
    breathing: Breathing,
    heartbeat: HeartBeat,
    cycle: Cycle,
    spring: Spring,
}

impl Default for LedEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LedEngine {
    pub fn new() -> Self {
        Self {
            active: LedPattern::Off,
            off: Off::new(),
            solid: Solid::new(Rgb::BLACK),
            breathing: Breathing::new(Rgb::WHITE, 2000),
            heartbeat: HeartBeat::new(Rgb::RED, 770, 2000),
            cycle: Cycle::new(Rgb::BLACK, 100),
            spring: Spring::new(Rgb::WHITE),
        }
    }

    /// The currently active pattern
    pub fn pattern(&self) -> LedPattern {
        self.active
    }

    /// Switch the active pattern
    ///
    /// Runs the new variant's setup; the previously active variant keeps
    /// its transient state for later reactivation.
    pub fn set_pattern<P: PixelStrip>(&mut self, pattern: LedPattern, pixels: &mut P, now: u32) {
        self.active = pattern;
        match pattern {
            LedPattern::Off => self.off.setup(pixels),
            LedPattern::Solid => self.solid.setup(pixels),
            LedPattern::Breathing => self.breathing.setup(pixels, now),
            LedPattern::HeartBeat => self.heartbeat.setup(pixels, now),
            LedPattern::Cycle => self.cycle.setup(pixels, now),
            LedPattern::Spring => self.spring.setup(now),
        }
    }

    /// Drive the active variant; each variant self-throttles on its own
    /// timer, so this is safe to call every scheduler tick.
    pub fn update<P: PixelStrip>(&mut self, pixels: &mut P, now: u32) {
        match self.active {
            LedPattern::Off => {}
            LedPattern::Solid => {}
            LedPattern::Breathing => self.breathing.update(pixels, now),
            LedPattern::HeartBeat => self.heartbeat.update(pixels, now),
            LedPattern::Cycle => self.cycle.update(pixels, now),
            LedPattern::Spring => self.spring.update(pixels, now),
        }
    }

    /// Reset the active variant's animation state
    pub fn reset(&mut self, now: u32) {
        match self.active {
            LedPattern::Off => {}
            LedPattern::Solid => {}
            LedPattern::Breathing => self.breathing.reset(now),
            LedPattern::HeartBeat => self.heartbeat.reset(now),
            LedPattern::Cycle => self.cycle.reset(now),
            LedPattern::Spring => self.spring.reset(now),
        }
    }

    /// Set the active variant's base color
    ///
    /// Takes effect on the variant's next repaint; static variants repaint
    /// on their next setup.
    pub fn set_color(&mut self, color: Rgb) {
        match self.active {
            LedPattern::Off => {}
            LedPattern::Solid => self.solid.set_color(color),
            LedPattern::Breathing => self.breathing.set_color(color),
            LedPattern::HeartBeat => self.heartbeat.set_color(color),
            LedPattern::Cycle => self.cycle.set_color(color),
            LedPattern::Spring => self.spring.set_color(color),
        }
    }

    /// Color the breathing variant will use when next activated
    pub fn set_breathing_color(&mut self, color: Rgb) {
        self.breathing.set_color(color);
    }

    /// Store spring physics parameters
    ///
    /// Applies to the spring variant whether or not it is active; the
    /// running oscillator is not reset.
    pub fn set_spring_params(&mut self, k: f32, damping: f32, mass: f32) {
        self.spring.set_params(k, damping, mass);
    }

    /// Spring oscillator target brightness (0.0 to 1.0)
    pub fn set_spring_target(&mut self, target: f32) {
        self.spring.set_target(target);
    }

    #[cfg(test)]
    pub(crate) fn spring(&self) -> &Spring {
        &self.spring
    }
}
