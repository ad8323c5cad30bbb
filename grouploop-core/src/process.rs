//! Cooperative process schedule
//!
//! The original downcast-driven name→pointer map is replaced by a typed
//! registry: the node owns each process as a typed field, and this schedule
//! tracks only the registration order and per-process running flags.
//! Lookups by name resolve to a [`ProcessId`], which callers dispatch on —
//! statically checked, no runtime trust between caller and callee.

use heapless::Vec;

/// Upper bound on registered processes
pub const MAX_PROCESSES: usize = 8;

/// Identity of every process the node runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProcessId {
    Configuration,
    Wifi,
    Led,
    Vibration,
    Imu,
    Scan,
    Publish,
    Receive,
}

impl ProcessId {
    /// The registration name of this process
    pub const fn name(self) -> &'static str {
        match self {
            ProcessId::Configuration => "configuration",
            ProcessId::Wifi => "wifi",
            ProcessId::Led => "led",
            ProcessId::Vibration => "vibration",
            ProcessId::Imu => "imu",
            ProcessId::Scan => "scan",
            ProcessId::Publish => "publish",
            ProcessId::Receive => "receive",
        }
    }
}

/// Errors from schedule operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScheduleError {
    /// No process registered under that name
    UnknownProcess,
    /// The schedule is full
    Full,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    id: ProcessId,
    running: bool,
}

/// Registration order and running flags for all processes
///
/// Update order is the registration order, every tick. Toggling a running
/// flag never destroys process state: a halted process resumes exactly
/// where it left off.
#[derive(Debug, Default)]
pub struct Schedule {
    entries: Vec<Entry, MAX_PROCESSES>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a process; it starts in the running state
    pub fn register(&mut self, id: ProcessId) -> Result<(), ScheduleError> {
        if self.entries.iter().any(|e| e.id == id) {
            return Ok(());
        }
        self.entries
            .push(Entry { id, running: true })
            .map_err(|_| ScheduleError::Full)
    }

    /// Number of registered processes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The process at a registration slot
    pub fn id_at(&self, index: usize) -> Option<ProcessId> {
        self.entries.get(index).map(|e| e.id)
    }

    /// The process at a registration slot, if currently running
    pub fn running_id_at(&self, index: usize) -> Option<ProcessId> {
        self.entries
            .get(index)
            .filter(|e| e.running)
            .map(|e| e.id)
    }

    /// Resolve a process name
    ///
    /// Unregistered names are non-fatal: callers skip the dependent
    /// behavior.
    pub fn lookup(&self, name: &str) -> Result<ProcessId, ScheduleError> {
        self.entries
            .iter()
            .find(|e| e.id.name() == name)
            .map(|e| e.id)
            .ok_or(ScheduleError::UnknownProcess)
    }

    /// True if the process is registered and running
    pub fn is_running(&self, id: ProcessId) -> bool {
        self.entries
            .iter()
            .any(|e| e.id == id && e.running)
    }

    /// Set the running flag
    pub fn start(&mut self, id: ProcessId) {
        self.set_running(id, true);
    }

    /// Clear the running flag; takes effect before the next update
    pub fn halt(&mut self, id: ProcessId) {
        self.set_running(id, false);
    }

    /// Halt every process
    pub fn halt_all(&mut self) {
        for entry in self.entries.iter_mut() {
            entry.running = false;
        }
    }

    /// Halt every process except one
    pub fn halt_all_except(&mut self, keep: ProcessId) {
        for entry in self.entries.iter_mut() {
            if entry.id != keep {
                entry.running = false;
            }
        }
    }

    fn set_running(&mut self, id: ProcessId, running: bool) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) {
            entry.running = running;
        }
    }
}
