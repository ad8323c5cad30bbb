//! The remote command surface
//!
//! Handlers are registered per subsystem at setup and dispatched by the
//! node at the end of each tick. Every parse failure maps to
//! [`CommandError::BadArguments`] and leaves device state untouched.

use grouploop_hal::{Board, Rgb};

use crate::command::{CommandError, CommandRegistry};
use crate::led::LedPattern;
use crate::node::Node;

/// Register the whole command surface
pub fn register_all<B: Board>(registry: &mut CommandRegistry<Node<B>>) {
    register_led_commands(registry);
    register_vibration_commands(registry);
    register_node_commands(registry);
}

/// LED subsystem commands
pub fn register_led_commands<B: Board>(registry: &mut CommandRegistry<Node<B>>) {
    let _ = registry.register("led", cmd_led::<B>);
    let _ = registry.register("pattern", cmd_pattern::<B>);
    let _ = registry.register("reset", cmd_reset::<B>);
    let _ = registry.register("brightness", cmd_brightness::<B>);
    let _ = registry.register("spring_param", cmd_spring_param::<B>);
}

/// Vibration subsystem commands
pub fn register_vibration_commands<B: Board>(registry: &mut CommandRegistry<Node<B>>) {
    let _ = registry.register("vibrate", cmd_vibrate::<B>);
}

/// Node-level commands
pub fn register_node_commands<B: Board>(registry: &mut CommandRegistry<Node<B>>) {
    let _ = registry.register("status", cmd_status::<B>);
}

/// `led:<hex color>` — set the active behavior's color
fn cmd_led<B: Board>(node: &mut Node<B>, params: &str) -> Result<(), CommandError> {
    let hex = params.trim().trim_start_matches('#');
    let packed = u32::from_str_radix(hex, 16).map_err(|_| CommandError::BadArguments)?;
    node.led.set_color(Rgb::from_packed(packed));
    log::info!("LED color set to #{hex}");
    Ok(())
}

/// `pattern:<name>` — switch the active LED behavior
fn cmd_pattern<B: Board>(node: &mut Node<B>, params: &str) -> Result<(), CommandError> {
    let pattern = LedPattern::from_name(params.trim()).ok_or(CommandError::BadArguments)?;
    let now = node.now();
    node.led.set_pattern(pattern, now);
    Ok(())
}

/// `reset` — reset the active LED behavior's animation state
fn cmd_reset<B: Board>(node: &mut Node<B>, _params: &str) -> Result<(), CommandError> {
    let now = node.now();
    node.led.reset(now);
    log::info!("LED pattern reset");
    Ok(())
}

/// `brightness:<0-255>` — set the global strip brightness
fn cmd_brightness<B: Board>(node: &mut Node<B>, params: &str) -> Result<(), CommandError> {
    let brightness: u8 = params
        .trim()
        .parse()
        .map_err(|_| CommandError::BadArguments)?;
    node.led.set_brightness(brightness);
    log::info!("LED brightness set to {brightness}");
    Ok(())
}

/// `spring_param:<6 hex chars>` — spring constant, damping and mass as
/// byte pairs scaled to (b/10, b/10, b/10 + 0.1)
fn cmd_spring_param<B: Board>(node: &mut Node<B>, params: &str) -> Result<(), CommandError> {
    let hex = params.trim();
    if hex.len() < 6 || !hex.is_ascii() {
        return Err(CommandError::BadArguments);
    }
    let byte = |range: core::ops::Range<usize>| -> Result<u8, CommandError> {
        u8::from_str_radix(&hex[range], 16).map_err(|_| CommandError::BadArguments)
    };

    let k = byte(0..2)? as f32 / 10.0;
    let damping = byte(2..4)? as f32 / 10.0;
    let mass = byte(4..6)? as f32 / 10.0 + 0.1;

    node.led.set_spring_params(k, damping, mass);
    log::info!("spring parameters: k={k:.1} damping={damping:.1} mass={mass:.1}");
    Ok(())
}

/// `vibrate:<ms>` — run the motor at full duty for a duration
fn cmd_vibrate<B: Board>(node: &mut Node<B>, params: &str) -> Result<(), CommandError> {
    let duration: u32 = params
        .trim()
        .parse()
        .map_err(|_| CommandError::BadArguments)?;
    if duration == 0 {
        return Err(CommandError::BadArguments);
    }
    let now = node.now();
    node.vibration.vibrate(duration, now);
    Ok(())
}

/// `status` — log the link/connection/process summary
fn cmd_status<B: Board>(node: &mut Node<B>, _params: &str) -> Result<(), CommandError> {
    node.log_status();
    Ok(())
}
