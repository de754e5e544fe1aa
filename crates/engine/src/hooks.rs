//! Per-operation interception hooks
//!
//! A [`Hooks`] table maps each [`Operation`] to at most one handler. Before an
//! operation runs, the store calls the installed handler with the operation's
//! arguments ([`HookArgs`]) and a reference to the store. A truthy response
//! short-circuits the operation and becomes its result; nothing is read or
//! persisted. `None` or a falsy value lets the operation proceed.
//!
//! Composite operations (`remove`, `add`, `post`) write through an inner
//! `set`. That inner call runs against [`Hooks::without`]`(Operation::Set)`,
//! so a `set` handler sees only the caller's own `set` calls.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use jstore_core::{is_truthy, DocPath, Error, QueryOptions, Value};

use crate::store::Store;

/// Public store operations that can be intercepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    /// `get`
    Get,
    /// `set`
    Set,
    /// `remove`
    Remove,
    /// `add`
    Add,
    /// `exists`
    Exists,
    /// `post`
    Post,
    /// `reset`
    Reset,
}

impl Operation {
    /// Every operation, in declaration order
    pub const ALL: [Operation; 7] = [
        Operation::Get,
        Operation::Set,
        Operation::Remove,
        Operation::Add,
        Operation::Exists,
        Operation::Post,
        Operation::Reset,
    ];

    /// The operation's name as used by `on`/`clear_listener` callers
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Get => "get",
            Operation::Set => "set",
            Operation::Remove => "remove",
            Operation::Add => "add",
            Operation::Exists => "exists",
            Operation::Post => "post",
            Operation::Reset => "reset",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| Error::InvalidOperation(format!("unknown operation '{}'", s)))
    }
}

/// Arguments of the intercepted call
///
/// Fields an operation does not take are `None`.
#[derive(Debug, Clone, Copy)]
pub struct HookArgs<'a> {
    /// Which operation is about to run
    pub operation: Operation,
    /// Target path (`get`, `set`, `remove`, `add`, `exists`, `post`)
    pub path: Option<&'a DocPath>,
    /// Value argument (`set`, `add`, `post`)
    pub value: Option<&'a Value>,
    /// Insert position (`add`)
    pub index: Option<usize>,
    /// Query options (`get`)
    pub options: Option<&'a QueryOptions>,
}

impl<'a> HookArgs<'a> {
    pub(crate) fn new(operation: Operation) -> Self {
        Self {
            operation,
            path: None,
            value: None,
            index: None,
            options: None,
        }
    }

    pub(crate) fn path(mut self, path: &'a DocPath) -> Self {
        self.path = Some(path);
        self
    }

    pub(crate) fn value(mut self, value: &'a Value) -> Self {
        self.value = Some(value);
        self
    }

    pub(crate) fn index(mut self, index: Option<usize>) -> Self {
        self.index = index;
        self
    }

    pub(crate) fn options(mut self, options: Option<&'a QueryOptions>) -> Self {
        self.options = options;
        self
    }
}

/// Installed hook callback
pub type Handler = Arc<dyn Fn(&HookArgs<'_>, &Store) -> Option<Value> + Send + Sync>;

/// Operation → handler table
#[derive(Clone, Default)]
pub struct Hooks {
    handlers: HashMap<Operation, Handler>,
}

impl Hooks {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `handler` for `operation` (builder pattern)
    pub fn on<F>(mut self, operation: Operation, handler: F) -> Self
    where
        F: Fn(&HookArgs<'_>, &Store) -> Option<Value> + Send + Sync + 'static,
    {
        self.insert(operation, Arc::new(handler));
        self
    }

    /// Install `handler` for `operation`, replacing any previous one
    pub fn insert(&mut self, operation: Operation, handler: Handler) {
        self.handlers.insert(operation, handler);
    }

    /// Remove the handler for `operation`; returns whether one was installed
    pub fn remove(&mut self, operation: Operation) -> bool {
        self.handlers.remove(&operation).is_some()
    }

    /// The handler installed for `operation`
    pub fn get(&self, operation: Operation) -> Option<&Handler> {
        self.handlers.get(&operation)
    }

    /// Whether a handler is installed for `operation`
    pub fn contains(&self, operation: Operation) -> bool {
        self.handlers.contains_key(&operation)
    }

    /// A copy of this table with the handler for `operation` cleared
    pub fn without(&self, operation: Operation) -> Hooks {
        let mut hooks = self.clone();
        hooks.remove(operation);
        hooks
    }

    /// Number of installed handlers
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// True when no handler is installed
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run the handler for `args.operation`, keeping only a truthy response
    pub(crate) fn intercept(&self, args: &HookArgs<'_>, store: &Store) -> Option<Value> {
        let handler = self.handlers.get(&args.operation)?;
        handler(args, store).filter(is_truthy)
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut installed: Vec<&Operation> = self.handlers.keys().collect();
        installed.sort();
        f.debug_struct("Hooks").field("installed", &installed).finish()
    }
}
