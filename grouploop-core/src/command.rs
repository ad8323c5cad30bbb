//! Command registry
//!
//! Remote text commands are dispatched through a name→handler map.
//! Handlers are plain function pointers over a caller-supplied context, so
//! the registry itself stays allocation-free and can live apart from the
//! state the handlers mutate. Unknown names and handler failures are
//! reported and treated as no-ops; execution always continues.

use heapless::{FnvIndexMap, String};

use grouploop_protocol::CommandLine;

/// Upper bound on registered commands (power of two for the index map)
pub const MAX_COMMANDS: usize = 16;

/// Maximum stored command-name length
pub const MAX_NAME_LEN: usize = 24;

/// Maximum stored parameter length
pub const MAX_PARAMS_LEN: usize = 96;

/// Errors from command registration and execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// No handler registered under that name
    Unknown,
    /// Parameters did not parse; state is unchanged
    BadArguments,
    /// The registry is full
    RegistryFull,
}

/// A command handler over context `Ctx`
pub type Handler<Ctx> = fn(&mut Ctx, &str) -> Result<(), CommandError>;

/// Name→handler map
pub struct CommandRegistry<Ctx> {
    handlers: FnvIndexMap<&'static str, Handler<Ctx>, MAX_COMMANDS>,
}

impl<Ctx> Default for CommandRegistry<Ctx> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Ctx> CommandRegistry<Ctx> {
    pub fn new() -> Self {
        Self {
            handlers: FnvIndexMap::new(),
        }
    }

    /// Register a handler; called once per subsystem at setup
    pub fn register(&mut self, name: &'static str, handler: Handler<Ctx>) -> Result<(), CommandError> {
        self.handlers
            .insert(name, handler)
            .map_err(|_| CommandError::RegistryFull)?;
        log::debug!("registered command: {name}");
        Ok(())
    }

    /// True if a handler is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Number of registered commands
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Execute a command by exact name
    ///
    /// Failures are reported here; callers need not log again.
    pub fn execute(&self, ctx: &mut Ctx, name: &str, params: &str) -> Result<(), CommandError> {
        let Some(handler) = self.handlers.get(name) else {
            log::warn!("unknown command: {name}");
            return Err(CommandError::Unknown);
        };
        match handler(ctx, params) {
            Ok(()) => {
                log::info!("executed command: {name}");
                Ok(())
            }
            Err(err) => {
                log::warn!("command {name} failed: {err:?}");
                Err(err)
            }
        }
    }
}

/// One queued command, owned so it can outlive the inbound frame buffer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnedCommand {
    pub name: String<MAX_NAME_LEN>,
    pub params: String<MAX_PARAMS_LEN>,
}

impl OwnedCommand {
    /// Copy a parsed command line; None if either part is oversized
    pub fn from_line(line: &CommandLine<'_>) -> Option<Self> {
        let mut cmd = OwnedCommand::default();
        cmd.name.push_str(line.name).ok()?;
        cmd.params.push_str(line.params).ok()?;
        Some(cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        hits: u32,
    }

    fn bump(ctx: &mut Counter, _params: &str) -> Result<(), CommandError> {
        ctx.hits += 1;
        Ok(())
    }

    fn refuse(_ctx: &mut Counter, _params: &str) -> Result<(), CommandError> {
        Err(CommandError::BadArguments)
    }

    #[test]
    fn executes_registered_handlers() {
        let mut reg = CommandRegistry::new();
        reg.register("bump", bump).unwrap();

        let mut ctx = Counter { hits: 0 };
        assert!(reg.execute(&mut ctx, "bump", "").is_ok());
        assert_eq!(ctx.hits, 1);
    }

    #[test]
    fn unknown_command_is_a_reported_noop() {
        let reg: CommandRegistry<Counter> = CommandRegistry::new();
        let mut ctx = Counter { hits: 0 };
        assert_eq!(reg.execute(&mut ctx, "nope", ""), Err(CommandError::Unknown));
        assert_eq!(ctx.hits, 0);
    }

    #[test]
    fn handler_failure_does_not_propagate_panics() {
        let mut reg = CommandRegistry::new();
        reg.register("refuse", refuse).unwrap();

        let mut ctx = Counter { hits: 0 };
        assert_eq!(
            reg.execute(&mut ctx, "refuse", "junk"),
            Err(CommandError::BadArguments)
        );
    }

    #[test]
    fn owned_command_copies_both_parts() {
        let line = CommandLine::parse("led:FF0000");
        let owned = OwnedCommand::from_line(&line).unwrap();
        assert_eq!(owned.name.as_str(), "led");
        assert_eq!(owned.params.as_str(), "FF0000");
    }

    #[test]
    fn oversized_command_is_refused() {
        let long = "x".repeat(200);
        let line = CommandLine { name: "ok", params: &long };
        assert!(OwnedCommand::from_line(&line).is_none());
    }
}
