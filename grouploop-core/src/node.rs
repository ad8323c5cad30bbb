//! The node: typed process arena plus the control-loop policy
//!
//! One [`Node::tick`] per loop pass. The tick ordering is a documented
//! contract, not an accident:
//!
//! 1. The configuration process always runs first; while a configuration
//!    session is pending every other process is suppressed.
//! 2. The WiFi link gate runs before the processes it gates, so scanning
//!    halts or resumes within one tick of a link transition, and a gated
//!    process never updates after the gate has observed the link down.
//! 3. The shared connection is pumped exactly once.
//! 4. Every running process updates, in registration order.
//! 5. Commands received this tick are dispatched through the registry.

use grouploop_hal::{Board, Peripherals, SystemControl};
use heapless::Deque;

use crate::beacon::RssiCache;
use crate::command::{CommandRegistry, OwnedCommand};
use crate::commands;
use crate::config::Configuration;
use crate::configmode::ConfigModeProcess;
use crate::imu::{AccelSample, ImuProcess};
use crate::latch::EventLatch;
use crate::led::LedProcess;
use crate::net::{ConnState, ConnectionManager, PublishProcess, ReceiveProcess};
use crate::process::{ProcessId, Schedule};
use crate::scan::ScanProcess;
use crate::vibration::VibrationProcess;
use crate::wifi::{LinkState, WifiProcess};

/// Commands that can pile up within one tick
pub const MAX_QUEUED_COMMANDS: usize = 8;

/// Commands parsed by the receive process, dispatched at the end of the tick
pub type CommandQueue = Deque<OwnedCommand, MAX_QUEUED_COMMANDS>;

/// Cached sensor readings shared between producer and publisher processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SensorReadings {
    pub accel: AccelSample,
    pub tap: EventLatch,
    pub beacons: RssiCache,
}

/// The whole device: every process, the shared singletons, and the policy
/// that couples them
pub struct Node<B: Board> {
    schedule: Schedule,
    pub(crate) configuration: ConfigModeProcess<B::Button, B::Console>,
    pub(crate) wifi: WifiProcess<B::Link>,
    pub(crate) led: LedProcess<B::Pixels>,
    pub(crate) vibration: VibrationProcess<B::Motor>,
    pub(crate) imu: ImuProcess<B::Accel>,
    pub(crate) scan: ScanProcess<B::Radio>,
    pub(crate) publish: PublishProcess,
    pub(crate) receive: ReceiveProcess,
    pub(crate) connection: ConnectionManager<B::Socket>,
    store: B::Store,
    system: B::System,
    config: Configuration,
    readings: SensorReadings,
    commands: CommandQueue,
    now: u32,
}

impl<B: Board> Node<B> {
    /// Build the node from a board's peripherals
    ///
    /// Configuration is loaded (or defaulted) before anything else touches
    /// the hardware.
    pub fn new(peripherals: Peripherals<B>) -> Self {
        let Peripherals {
            pixels,
            motor,
            accel,
            radio,
            link,
            socket,
            mut store,
            button,
            console,
            system,
        } = peripherals;

        let config = Configuration::load(&mut store);

        Self {
            schedule: Schedule::new(),
            configuration: ConfigModeProcess::new(button, console),
            wifi: WifiProcess::new(link),
            led: LedProcess::new(pixels),
            vibration: VibrationProcess::new(motor),
            imu: ImuProcess::new(accel),
            scan: ScanProcess::new(radio),
            publish: PublishProcess::new(),
            receive: ReceiveProcess::new(),
            connection: ConnectionManager::new(socket),
            store,
            system,
            config,
            readings: SensorReadings::default(),
            commands: Deque::new(),
            now: 0,
        }
    }

    /// One-time setup: register and initialize every process, in the order
    /// they will update each tick
    pub fn setup(&mut self, registry: &mut CommandRegistry<Self>, now: u32) {
        self.now = now;

        const ORDER: [ProcessId; 8] = [
            ProcessId::Configuration,
            ProcessId::Wifi,
            ProcessId::Led,
            ProcessId::Vibration,
            ProcessId::Imu,
            ProcessId::Scan,
            ProcessId::Publish,
            ProcessId::Receive,
        ];
        for id in ORDER {
            if self.schedule.register(id).is_err() {
                log::error!("process table full registering {}", id.name());
            }
        }
        // Scanning stays halted until the link gate releases it
        self.schedule.halt(ProcessId::Scan);

        self.configuration.setup(now);
        self.wifi.setup(&self.config, now);
        self.led.setup(now);
        self.vibration.setup(now);
        self.imu.setup(now);
        self.scan.setup(now);
        self.publish.setup(now);
        self.receive.setup(now);

        self.connection
            .initialize(&self.config.socket_url, self.system.mac_address(), now);

        commands::register_all(registry);
        log::info!("node setup complete, {} processes registered", self.schedule.len());
    }

    /// One scheduler tick
    pub fn tick(&mut self, registry: &CommandRegistry<Self>, now: u32) {
        self.now = now;

        // Configuration first: it may claim exclusivity for this tick
        if self.schedule.is_running(ProcessId::Configuration) {
            self.configuration
                .update(&mut self.config, &mut self.store, &mut self.system, now);
        }
        if self.configuration.is_pending() {
            return;
        }

        self.apply_link_gate(now);
        self.connection.update(now);

        let count = self.schedule.len();
        for index in 0..count {
            let Some(id) = self.schedule.running_id_at(index) else {
                continue;
            };
            self.dispatch(id, now);
        }

        while let Some(command) = self.commands.pop_front() {
            // Failures are reported by the registry; the tick goes on
            let _ = registry.execute(self, &command.name, &command.params);
        }
    }

    /// Link-gates-scanning policy
    ///
    /// Runs before the gated processes, so a transition observed by the
    /// WiFi process takes effect before the next gated update.
    fn apply_link_gate(&mut self, now: u32) {
        let link_up = self.wifi.is_connected();
        let scanning = self.schedule.is_running(ProcessId::Scan);

        if link_up && !scanning {
            log::info!("link up: starting BLE scanning");
            self.schedule.start(ProcessId::Scan);
            self.led.set_connected(now);
        } else if !link_up && scanning {
            log::info!("link down: halting BLE scanning");
            self.schedule.halt(ProcessId::Scan);
            self.led.set_disconnected(now);
        }
    }

    fn dispatch(&mut self, id: ProcessId, now: u32) {
        match id {
            // Already ran at the top of the tick
            ProcessId::Configuration => {}
            ProcessId::Wifi => self.wifi.update(now),
            ProcessId::Led => self.led.update(now),
            ProcessId::Vibration => self.vibration.update(now),
            ProcessId::Imu => {
                self.imu.update(now);
                self.readings.accel = self.imu.sample();
                if self.imu.take_tap() {
                    self.readings.tap.set();
                }
            }
            ProcessId::Scan => {
                self.scan.update(now);
                self.readings.beacons = *self.scan.beacons();
            }
            ProcessId::Publish => {
                self.publish
                    .update(&mut self.connection, &mut self.readings, now)
            }
            ProcessId::Receive => {
                self.receive
                    .update(&mut self.connection, &mut self.commands, now)
            }
        }
    }

    /// Log the link/connection/process summary (the `status` command)
    pub fn log_status(&self) {
        log::info!("=== Device Status ===");
        log::info!("WiFi: {:?}", self.wifi.state());
        let scan = match self.schedule.lookup(ProcessId::Scan.name()) {
            Ok(id) if self.schedule.is_running(id) => "running",
            Ok(_) => "halted",
            Err(_) => "unknown",
        };
        log::info!("BLE scanning: {scan}");
        log::info!("Socket: {}", self.connection.state().label());
        log::info!("Device ID: {:04X}", self.connection.device_id());
        log::info!("Configuration: {:?}", self.configuration.state());
    }

    /// Timestamp of the current tick, for command handlers
    pub fn now(&self) -> u32 {
        self.now
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// True while a configuration session is pending
    pub fn is_configuring(&self) -> bool {
        self.configuration.is_pending()
    }

    pub fn wifi_state(&self) -> LinkState {
        self.wifi.state()
    }

    pub fn connection_state(&self) -> ConnState {
        self.connection.state()
    }

    pub fn scan_running(&self) -> bool {
        self.schedule.is_running(ProcessId::Scan)
    }

    pub fn led(&mut self) -> &mut LedProcess<B::Pixels> {
        &mut self.led
    }

    pub fn vibration(&mut self) -> &mut VibrationProcess<B::Motor> {
        &mut self.vibration
    }
}
