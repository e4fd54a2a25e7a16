//! The command dispatch registry.
//!
//! A mapping from command name to handler function, built once at startup.
//! Duplicate registration is a programming error and panics before the
//! server accepts requests. Dispatch is the single boundary where
//! execution errors become error replies; handlers below it return
//! `Result` and never touch the wire.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use shoal_core::{Reply, Result, ShoalError};
use shoal_array::Fabric;
use shoal_engine::{MemoryAdmission, SymbolTable};
use tracing::{debug, warn};

use crate::args::ArgBundle;
use crate::handlers;

/// Shared engine state handlers execute against. Explicitly passed rather
/// than ambient, so every layer is testable in isolation.
#[derive(Debug)]
pub struct Context {
    /// The locale fabric arrays are distributed over.
    pub fabric: Arc<Fabric>,
    /// Memory admission state for this server instance.
    pub admission: Arc<MemoryAdmission>,
    /// The symbol table owning all live arrays.
    pub symtab: Arc<SymbolTable>,
}

impl Context {
    /// Wire up engine state for one server instance.
    pub fn new(fabric: Arc<Fabric>, admission: Arc<MemoryAdmission>) -> Self {
        let symtab = Arc::new(SymbolTable::new(Arc::clone(&admission)));
        Context {
            fabric,
            admission,
            symtab,
        }
    }
}

/// A command handler: resolved context plus parsed arguments in, the
/// `Normal` reply message out.
pub type Handler = fn(&Context, &ArgBundle) -> Result<String>;

/// Command-name → handler mapping.
pub struct Registry {
    handlers: HashMap<String, Handler>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Registry {
            handlers: HashMap::new(),
        }
    }

    /// A registry with every standard command bound.
    pub fn with_standard_commands() -> Self {
        let mut reg = Registry::new();
        reg.register("intersect1d", handlers::setops::intersect1d_cmd);
        reg.register("union1d", handlers::setops::union1d_cmd);
        reg.register("setxor1d", handlers::setops::setxor1d_cmd);
        reg.register("setdiff1d", handlers::setops::setdiff1d_cmd);
        reg.register("in1d", handlers::setops::in1d_cmd);
        reg.register("broadcast", handlers::broadcast::broadcast_cmd);
        reg.register("create", handlers::create::create_cmd);
        reg.register("arange", handlers::create::arange_cmd);
        reg.register("randint", handlers::create::randint_cmd);
        reg.register("info", handlers::generic::info_cmd);
        reg.register("delete", handlers::generic::delete_cmd);
        reg.register("tolist", handlers::generic::tolist_cmd);
        reg.register("memory", handlers::generic::memory_cmd);
        reg.register("clear", handlers::generic::clear_cmd);
        reg
    }

    /// Bind a command name to a handler. Registering the same name twice
    /// indicates a broken startup and panics.
    pub fn register(&mut self, name: &str, handler: Handler) {
        if self.handlers.insert(name.to_string(), handler).is_some() {
            panic!("duplicate command registration: {}", name);
        }
    }

    /// Execute one command and convert the outcome to a wire reply.
    ///
    /// `arg_size` is the argument count the client declared for the
    /// payload. Every failure path (malformed bundle, unknown command,
    /// handler error) produces an `Error` reply; nothing propagates.
    pub fn dispatch(&self, ctx: &Context, cmd: &str, payload: &Value, arg_size: usize) -> Reply {
        let bundle = match ArgBundle::parse(cmd, payload, arg_size) {
            Ok(b) => b,
            Err(e) => return Reply::from_error(cmd, &e),
        };
        let handler = match self.handlers.get(cmd) {
            Some(h) => h,
            None => {
                return Reply::from_error(
                    cmd,
                    &ShoalError::UnknownCommand {
                        cmd: cmd.to_string(),
                    },
                )
            }
        };
        match handler(ctx, &bundle) {
            Ok(msg) => {
                debug!(cmd, %msg, "command completed");
                Reply::Normal(msg)
            }
            Err(e) => {
                warn!(cmd, error = %e, "command failed");
                Reply::from_error(cmd, &e)
            }
        }
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// True if no commands are registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_standard_commands()
    }
}
