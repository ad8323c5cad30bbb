//! Host simulator for the grouploop scanner node
//!
//! Runs the real firmware core against simulated hardware at the 5 ms tick
//! rate of the device loop, on a virtual clock. A small scripted scenario
//! drops and restores the WiFi link and exercises the remote command
//! surface, so a full run shows the scheduler, the link gate, and every
//! behavior engine doing their job.

mod board;

use anyhow::Result;
use clap::Parser;

use grouploop_core::command::CommandRegistry;
use grouploop_core::node::Node;

use board::{peripherals, SimBoard, SimWorld};

/// Milliseconds per scheduler tick
const TICK_MS: u32 = 5;

#[derive(Parser, Debug)]
#[command(name = "grouploop-sim", about = "Run the scanner firmware core on simulated hardware")]
struct Args {
    /// Virtual seconds to simulate
    #[arg(long, default_value_t = 30)]
    duration: u32,

    /// Drop the WiFi link at this virtual second (0 = never)
    #[arg(long, default_value_t = 12)]
    drop_link: u32,

    /// Restore the WiFi link at this virtual second (0 = never)
    #[arg(long, default_value_t = 18)]
    restore_link: u32,

    /// Strip length in pixels
    #[arg(long, default_value_t = 6)]
    pixels: usize,

    /// Run on the wall clock instead of as fast as possible
    #[arg(long)]
    realtime: bool,
}

/// One scripted stimulus at a virtual time
enum Stimulus {
    LinkUp(bool),
    Command(&'static str),
}

fn scenario(args: &Args) -> Vec<(u32, Stimulus)> {
    let mut events = vec![
        // The link comes up shortly after boot
        (500, Stimulus::LinkUp(true)),
        // Exercise the command surface
        (3_000, Stimulus::Command("pattern:heartbeat")),
        (5_000, Stimulus::Command("led:00FF88")),
        (7_000, Stimulus::Command("spring_param:0A140B")),
        (8_000, Stimulus::Command("pattern:spring")),
        (9_500, Stimulus::Command("vibrate:300")),
        (10_500, Stimulus::Command("status")),
    ];
    if args.drop_link > 0 {
        events.push((args.drop_link * 1_000, Stimulus::LinkUp(false)));
    }
    if args.restore_link > 0 {
        events.push((args.restore_link * 1_000, Stimulus::LinkUp(true)));
    }
    events.sort_by_key(|(at, _)| *at);
    events
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let world = SimWorld::default();
    let mut node = Node::<SimBoard>::new(peripherals(&world, args.pixels));
    let mut registry = CommandRegistry::new();

    node.setup(&mut registry, 0);
    log::info!(
        "simulating {} s at {} ms per tick",
        args.duration,
        TICK_MS
    );

    let mut events = scenario(&args).into_iter().peekable();
    let end = args.duration.saturating_mul(1_000);
    let mut now = 0u32;

    while now < end {
        now += TICK_MS;

        while events.peek().is_some_and(|(at, _)| *at <= now) {
            let Some((_, stimulus)) = events.next() else {
                break;
            };
            match stimulus {
                Stimulus::LinkUp(up) => {
                    log::info!("scenario: link {}", if up { "restored" } else { "dropped" });
                    *world.link_up.borrow_mut() = up;
                }
                Stimulus::Command(line) => {
                    log::info!("scenario: server sends {line:?}");
                    world.inbound.borrow_mut().push_back(line.to_string());
                }
            }
        }

        node.tick(&registry, now);

        if *world.restart_requested.borrow() {
            log::info!("device restart requested, ending simulation");
            break;
        }
        if args.realtime {
            std::thread::sleep(std::time::Duration::from_millis(TICK_MS as u64));
        }
    }

    log::info!("=== simulation summary ===");
    log::info!("virtual time: {} ms", now);
    log::info!("frames published: {}", world.frames_sent.borrow());
    log::info!("WiFi: {:?}", node.wifi_state());
    log::info!("socket: {:?}", node.connection_state());
    log::info!("scanning: {}", node.scan_running());
    node.log_status();

    Ok(())
}
