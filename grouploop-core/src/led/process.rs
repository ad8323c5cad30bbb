//! LED process
//!
//! Owns the pixel strip and the behavior engine, and exposes the few
//! pattern/color hooks the node policy and the command surface need.

use grouploop_hal::{PixelStrip, Rgb};

use super::{LedEngine, LedPattern, CONNECTED_PALETTE};

/// The LED subsystem process
pub struct LedProcess<P: PixelStrip> {
    pixels: P,
    engine: LedEngine,
    palette_index: usize,
}

impl<P: PixelStrip> LedProcess<P> {
    pub fn new(pixels: P) -> Self {
        Self {
            pixels,
            engine: LedEngine::new(),
            palette_index: 0,
        }
    }

    /// One-time initialization: full strip brightness, red breathing until
    /// the link comes up.
    pub fn setup(&mut self, now: u32) {
        self.pixels.set_brightness(255);
        self.set_disconnected(now);
    }

    /// Drive the active behavior; called every scheduler tick
    pub fn update(&mut self, now: u32) {
        self.engine.update(&mut self.pixels, now);
    }

    /// Switch the active pattern
    pub fn set_pattern(&mut self, pattern: LedPattern, now: u32) {
        self.engine.set_pattern(pattern, &mut self.pixels, now);
        log::info!("LED pattern set to {}", pattern.name());
    }

    /// Currently active pattern
    pub fn pattern(&self) -> LedPattern {
        self.engine.pattern()
    }

    /// Set the active behavior's color
    pub fn set_color(&mut self, color: Rgb) {
        self.engine.set_color(color);
    }

    /// Reset the active behavior's animation state
    pub fn reset(&mut self, now: u32) {
        self.engine.reset(now);
    }

    /// Set the global strip brightness
    pub fn set_brightness(&mut self, brightness: u8) {
        self.pixels.set_brightness(brightness);
    }

    /// Store spring parameters (applied when the spring becomes active)
    pub fn set_spring_params(&mut self, k: f32, damping: f32, mass: f32) {
        self.engine.set_spring_params(k, damping, mass);
    }

    /// Link up: breathe in the next color of the connected palette
    pub fn set_connected(&mut self, now: u32) {
        let color = CONNECTED_PALETTE[self.palette_index % CONNECTED_PALETTE.len()];
        self.palette_index = self.palette_index.wrapping_add(1);
        self.engine.set_breathing_color(color);
        self.engine
            .set_pattern(LedPattern::Breathing, &mut self.pixels, now);
        log::info!("LED breathing in connected color #{:06X}", color.packed());
    }

    /// Link down: red breathing
    pub fn set_disconnected(&mut self, now: u32) {
        self.engine.set_breathing_color(Rgb::RED);
        self.engine
            .set_pattern(LedPattern::Breathing, &mut self.pixels, now);
        log::info!("LED breathing red (link down)");
    }

    pub fn engine(&self) -> &LedEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut LedEngine {
        &mut self.engine
    }

    pub fn pixels_mut(&mut self) -> &mut P {
        &mut self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec;
    use std::vec::Vec;

    struct TestStrip {
        pixels: Vec<Rgb>,
        brightness: u8,
    }

    impl PixelStrip for TestStrip {
        fn len(&self) -> usize {
            self.pixels.len()
        }

        fn set_brightness(&mut self, brightness: u8) {
            self.brightness = brightness;
        }

        fn set_pixel(&mut self, index: usize, color: Rgb) {
            if let Some(p) = self.pixels.get_mut(index) {
                *p = color;
            }
        }

        fn fill(&mut self, color: Rgb) {
            self.pixels.fill(color);
        }

        fn show(&mut self) {}
    }

    fn process() -> LedProcess<TestStrip> {
        LedProcess::new(TestStrip {
            pixels: vec![Rgb::BLACK; 6],
            brightness: 0,
        })
    }

    #[test]
    fn setup_starts_red_breathing_at_full_brightness() {
        let mut led = process();
        led.setup(0);
        assert_eq!(led.pattern(), LedPattern::Breathing);
        assert_eq!(led.pixels.brightness, 255);
    }

    #[test]
    fn switching_to_off_clears_all_pixels() {
        let mut led = process();
        led.setup(0);
        // Run some breathing frames so pixels are lit
        led.update(21);
        led.set_pattern(LedPattern::Off, 42);
        assert!(led.pixels.pixels.iter().all(|&c| c == Rgb::BLACK));
    }

    #[test]
    fn connected_palette_rotates_and_skips_red() {
        let mut led = process();
        led.setup(0);
        for _ in 0..(2 * CONNECTED_PALETTE.len()) {
            led.set_connected(0);
            // The currently stored breathing color is never red
            led.update(21);
            assert!(led.pixels.pixels.iter().all(|&c| c.r == 0 || c.g > 0 || c.b > 0));
        }
    }

    #[test]
    fn spring_params_apply_while_inactive() {
        let mut led = process();
        led.setup(0);
        led.set_pattern(LedPattern::HeartBeat, 0);
        led.set_spring_params(1.0, 2.0, 1.2);

        // HeartBeat is unaffected; the parameters wait on the spring variant
        assert_eq!(led.pattern(), LedPattern::HeartBeat);
        led.engine_mut().set_spring_target(0.5);
        led.set_pattern(LedPattern::Spring, 0);
        assert_eq!(led.engine().spring().params(), (1.0, 2.0, 1.2));
    }
}
