//! Simulated board
//!
//! Host implementations of every HAL trait: a scripted accelerometer and
//! beacon field, a wireless link and socket whose availability the
//! scenario can toggle, and an in-memory configuration store. Shared
//! `Rc<RefCell<...>>` handles let the scenario driver poke hardware state
//! while the node owns the peripherals.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use grouploop_core::scan::BEACON_SERVICE_UUID;
use grouploop_hal::{
    Accelerometer, Advertisement, BeaconRadio, Board, ConfigStore, InputPin, Peripherals,
    PixelStrip, RawAccel, Rgb, ScanError, ScanParams, SensorError, SerialConsole, SocketClient,
    SocketError, SocketEvent, StoreError, SystemControl, VibrationMotor, WirelessLink,
    MAX_VALUE_LEN,
};

/// Scenario-facing handles into the simulated hardware
#[derive(Clone, Default)]
pub struct SimWorld {
    pub link_up: Rc<RefCell<bool>>,
    pub button_low: Rc<RefCell<bool>>,
    pub console_rx: Rc<RefCell<VecDeque<u8>>>,
    pub inbound: Rc<RefCell<VecDeque<String>>>,
    pub frames_sent: Rc<RefCell<u64>>,
    pub restart_requested: Rc<RefCell<bool>>,
}

pub struct SimPixels {
    pixels: Vec<Rgb>,
    brightness: u8,
    shows: u64,
}

impl SimPixels {
    pub fn new(len: usize) -> Self {
        Self {
            pixels: vec![Rgb::BLACK; len],
            brightness: 255,
            shows: 0,
        }
    }
}

impl PixelStrip for SimPixels {
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

    fn show(&mut self) {
        self.shows += 1;
        // 50 Hz animations: one rendering per second keeps the log readable
        if self.shows % 50 == 0 {
            let strip: String = self
                .pixels
                .iter()
                .map(|c| if c.packed() == 0 { '.' } else { '*' })
                .collect();
            log::debug!(
                "strip [{}] #{:06X} @ {}",
                strip,
                self.pixels[0].packed(),
                self.brightness
            );
        }
    }
}

#[derive(Default)]
pub struct SimMotor {
    duty: u8,
}

impl VibrationMotor for SimMotor {
    fn set_duty(&mut self, duty: u8) {
        if duty != self.duty {
            log::debug!("motor duty -> {duty}");
        }
        self.duty = duty;
    }
}

/// Scripted accelerometer: gravity plus a slow wobble, with a tap spike
/// once every few seconds of samples
pub struct SimAccel {
    step: u32,
}

impl SimAccel {
    pub fn new() -> Self {
        Self { step: 0 }
    }
}

impl Accelerometer for SimAccel {
    fn init(&mut self) -> Result<(), SensorError> {
        Ok(())
    }

    fn data_ready(&mut self) -> bool {
        true
    }

    fn read(&mut self) -> Result<RawAccel, SensorError> {
        self.step += 1;
        // 100 Hz sampling: a spike every 500 samples is one tap per ~5 s
        if self.step % 500 == 0 {
            return Ok(RawAccel {
                x: 3500.0,
                y: 0.0,
                z: 980.665,
            });
        }
        let wobble = (self.step % 100) as f32 / 100.0 - 0.5;
        Ok(RawAccel {
            x: wobble * 200.0,
            y: wobble * -150.0,
            z: 980.665,
        })
    }
}

/// Scripted beacon field: four corner beacons whose signal drifts with a
/// counter, plus one foreign advertisement that must be filtered out
pub struct SimRadio {
    scanning: bool,
    cycle: u32,
    results: Vec<Advertisement>,
}

impl SimRadio {
    pub fn new() -> Self {
        Self {
            scanning: false,
            cycle: 0,
            results: Vec::new(),
        }
    }
}

impl BeaconRadio for SimRadio {
    fn configure(&mut self, params: ScanParams) {
        log::debug!(
            "radio configured: interval {} ms, window {} ms",
            params.interval_ms,
            params.window_ms
        );
    }

    fn start_scan(&mut self) -> Result<(), ScanError> {
        if self.scanning {
            return Err(ScanError::AlreadyInState);
        }
        self.scanning = true;
        Ok(())
    }

    fn stop_scan(&mut self) -> Result<(), ScanError> {
        if !self.scanning {
            return Err(ScanError::AlreadyInState);
        }
        self.scanning = false;
        self.cycle += 1;
        let drift = (self.cycle % 20) as i8;
        self.results = vec![
            Advertisement {
                service: None,
                rssi: -42,
            },
            Advertisement {
                service: Some(BEACON_SERVICE_UUID),
                rssi: -50 - drift,
            },
            Advertisement {
                service: Some(BEACON_SERVICE_UUID),
                rssi: -60 - drift,
            },
            Advertisement {
                service: Some(BEACON_SERVICE_UUID),
                rssi: -70 + drift,
            },
            Advertisement {
                service: Some(BEACON_SERVICE_UUID),
                rssi: -80 + drift,
            },
        ];
        Ok(())
    }

    fn results(&mut self) -> &[Advertisement] {
        &self.results
    }
}

pub struct SimLink {
    world: SimWorld,
}

impl SimLink {
    pub fn new(world: SimWorld) -> Self {
        Self { world }
    }
}

impl WirelessLink for SimLink {
    fn set_credentials(&mut self, ssid: &str, _password: &str) {
        log::debug!("link credentials set for {ssid:?}");
    }

    fn begin_connect(&mut self) {
        // Association always succeeds unless the scenario holds it down
    }

    fn disconnect(&mut self) {
        *self.world.link_up.borrow_mut() = false;
    }

    fn is_connected(&self) -> bool {
        *self.world.link_up.borrow()
    }
}

/// Loopback socket: connects two polls after open, delivers scenario
/// frames, counts outbound traffic
pub struct SimSocket {
    world: SimWorld,
    opened: bool,
    connected: bool,
    polls_until_up: u8,
}

impl SimSocket {
    pub fn new(world: SimWorld) -> Self {
        Self {
            world,
            opened: false,
            connected: false,
            polls_until_up: 0,
        }
    }
}

impl SocketClient for SimSocket {
    fn open(&mut self, url: &str) -> Result<(), SocketError> {
        if !url.starts_with("ws://") {
            return Err(SocketError::BadUrl);
        }
        self.opened = true;
        self.polls_until_up = 2;
        log::debug!("socket opening {url}");
        Ok(())
    }

    fn poll(&mut self) -> SocketEvent {
        if !self.opened {
            return SocketEvent::Idle;
        }
        if !self.connected {
            if self.polls_until_up > 0 {
                self.polls_until_up -= 1;
                return SocketEvent::Idle;
            }
            self.connected = true;
            return SocketEvent::Connected;
        }
        if let Some(text) = self.world.inbound.borrow_mut().pop_front() {
            match heapless::String::try_from(text.as_str()) {
                Ok(frame) => return SocketEvent::Frame(frame),
                Err(_) => log::warn!("scenario frame too long, dropped"),
            }
        }
        SocketEvent::Idle
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn send(&mut self, frame: &str) -> Result<(), SocketError> {
        if !self.connected {
            return Err(SocketError::NotConnected);
        }
        *self.world.frames_sent.borrow_mut() += 1;
        log::trace!("frame out: {}", frame.trim_end());
        Ok(())
    }
}

/// In-memory key/value store
#[derive(Default)]
pub struct SimStore {
    values: HashMap<String, String>,
}

impl ConfigStore for SimStore {
    fn open(&mut self, _namespace: &str) -> Result<(), StoreError> {
        Ok(())
    }

    fn get_str(&mut self, key: &str) -> Result<heapless::String<MAX_VALUE_LEN>, StoreError> {
        let value = self.values.get(key).ok_or(StoreError::NotFound)?;
        heapless::String::try_from(value.as_str()).map_err(|_| StoreError::ValueTooLong)
    }

    fn put_str(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.into(), value.into());
        Ok(())
    }

    fn get_u8(&mut self, key: &str) -> Result<u8, StoreError> {
        self.values
            .get(key)
            .ok_or(StoreError::NotFound)?
            .parse()
            .map_err(|_| StoreError::NotFound)
    }

    fn put_u8(&mut self, key: &str, value: u8) -> Result<(), StoreError> {
        self.values.insert(key.into(), value.to_string());
        Ok(())
    }

    fn close(&mut self) {}
}

pub struct SimButton {
    world: SimWorld,
}

impl SimButton {
    pub fn new(world: SimWorld) -> Self {
        Self { world }
    }
}

impl InputPin for SimButton {
    fn is_high(&self) -> bool {
        !*self.world.button_low.borrow()
    }
}

pub struct SimConsole {
    world: SimWorld,
}

impl SimConsole {
    pub fn new(world: SimWorld) -> Self {
        Self { world }
    }
}

impl SerialConsole for SimConsole {
    fn read_byte(&mut self) -> Option<u8> {
        self.world.console_rx.borrow_mut().pop_front()
    }

    fn write_line(&mut self, line: &str) {
        println!("{line}");
    }
}

pub struct SimSystem {
    world: SimWorld,
}

impl SimSystem {
    pub fn new(world: SimWorld) -> Self {
        Self { world }
    }
}

impl SystemControl for SimSystem {
    fn mac_address(&self) -> [u8; 6] {
        [0x24, 0x6F, 0x28, 0x9A, 0xBE, 0xEF]
    }

    fn restart(&mut self) {
        log::info!("restart requested by firmware");
        *self.world.restart_requested.borrow_mut() = true;
    }
}

/// The simulated board
pub struct SimBoard;

impl Board for SimBoard {
    type Pixels = SimPixels;
    type Motor = SimMotor;
    type Accel = SimAccel;
    type Radio = SimRadio;
    type Link = SimLink;
    type Socket = SimSocket;
    type Store = SimStore;
    type Button = SimButton;
    type Console = SimConsole;
    type System = SimSystem;
}

/// Build the full peripheral set around one shared world
pub fn peripherals(world: &SimWorld, strip_len: usize) -> Peripherals<SimBoard> {
    Peripherals {
        pixels: SimPixels::new(strip_len),
        motor: SimMotor::default(),
        accel: SimAccel::new(),
        radio: SimRadio::new(),
        link: SimLink::new(world.clone()),
        socket: SimSocket::new(world.clone()),
        store: SimStore::default(),
        button: SimButton::new(world.clone()),
        console: SimConsole::new(world.clone()),
        system: SimSystem::new(world.clone()),
    }
}
