//! Board composition
//!
//! A board is the full set of peripherals a platform provides, bundled as
//! associated types so application code can be written once and instantiated
//! against real hardware or the host simulator.

use crate::console::SerialConsole;
use crate::gpio::InputPin;
use crate::link::WirelessLink;
use crate::motor::VibrationMotor;
use crate::pixels::PixelStrip;
use crate::radio::BeaconRadio;
use crate::sensor::Accelerometer;
use crate::socket::SocketClient;
use crate::storage::ConfigStore;
use crate::system::SystemControl;

/// The peripheral set of one platform
pub trait Board {
    type Pixels: PixelStrip;
    type Motor: VibrationMotor;
    type Accel: Accelerometer;
    type Radio: BeaconRadio;
    type Link: WirelessLink;
    type Socket: SocketClient;
    type Store: ConfigStore;
    type Button: InputPin;
    type Console: SerialConsole;
    type System: SystemControl;
}

/// Concrete peripherals handed from a board to the application at boot
pub struct Peripherals<B: Board> {
    pub pixels: B::Pixels,
    pub motor: B::Motor,
    pub accel: B::Accel,
    pub radio: B::Radio,
    pub link: B::Link,
    pub socket: B::Socket,
    pub store: B::Store,
    pub button: B::Button,
    pub console: B::Console,
    pub system: B::System,
}
