//! # Virtual machine
//!
//! [`Vm`] owns the process-wide class cache and runs the single-consumer
//! command loop described in `original_source/internal/vm/vm.go`'s
//! `Run`/`Command` pair. Unlike the original's `GetVirtualMachine()`
//! package-level singleton, a `Vm` is an ordinary value a caller constructs
//! and holds onto; nothing here reaches for global mutable state.

pub mod class;
pub mod frame;
pub mod loader;
pub mod op;
pub mod value;

use std::collections::HashMap;
use std::fs;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::compiler::Compiler;
use crate::config::VmConfig;
use crate::error::GmslError;
use crate::host::ContextProvider;
use crate::parser::{self, ParseFailure};
use crate::vm::class::{Class, Method, Object};
use crate::vm::value::Value;

/// One request handled by the command loop.
pub enum Command {
    MethodCall {
        object: Arc<Object>,
        method: String,
        arguments: Vec<Value>,
        context: Arc<dyn ContextProvider>,
        reply: tokio::sync::oneshot::Sender<Result<Vec<Value>, GmslError>>,
    },
    Stop,
}

pub struct Vm {
    config: VmConfig,
    classes: HashMap<String, Arc<Class>>,
}

impl Vm {
    pub fn new(config: VmConfig) -> Self {
        Vm {
            config,
            classes: HashMap::new(),
        }
    }

    /// Register a class that isn't backed by a `.gms` source file, e.g. a
    /// host class whose methods are all `Internal`. Scripted classes loaded
    /// later from disk never overwrite one registered this way.
    pub fn register_class(&mut self, name: impl Into<String>, class: Arc<Class>) {
        self.classes.entry(name.into()).or_insert(class);
    }

    /// Return the cached class by this name, loading and compiling
    /// `<script_root>/<name>.gms` on first request.
    pub fn load_class(&mut self, name: &str) -> Result<Arc<Class>, GmslError> {
        if let Some(class) = self.classes.get(name) {
            return Ok(class.clone());
        }

        log::info!("loading class {name}");
        let path = self.config.script_root.join(format!("{name}.gms"));
        let source = fs::read_to_string(&path).map_err(|source| GmslError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let ast = parser::parse(&source).map_err(|failure| match failure {
            ParseFailure::Lex(mut errors) => GmslError::Lex(errors.remove(0)),
            ParseFailure::Parse(err) => GmslError::Parse(err),
        })?;
        let assembly = Compiler::compile(&ast)?;

        let mut methods = HashMap::new();
        for function in &assembly.functions {
            let scripted = loader::load_function(function)?;
            methods.insert(function.name.clone(), Method::Scripted(scripted));
        }

        let class = Arc::new(Class::new(name.to_string(), methods));
        self.classes.insert(name.to_string(), class.clone());
        Ok(class)
    }

    fn execute(
        &mut self,
        object: &Object,
        method_name: &str,
        arguments: Vec<Value>,
        context: &dyn ContextProvider,
    ) -> Result<Vec<Value>, GmslError> {
        let method = object
            .class
            .method(method_name)
            .ok_or_else(|| {
                GmslError::Runtime(crate::error::RuntimeError::NoSuchMethod {
                    class: object.class.name.clone(),
                    method: method_name.to_string(),
                })
            })?;
        Ok(frame::run_method(method, arguments, context, &self.config)?)
    }

    /// Drain `commands` until a [`Command::Stop`] is received or the
    /// channel closes. Every `MethodCall` runs to completion before the
    /// next is taken off the channel, matching the original's
    /// single-goroutine command loop.
    pub async fn run(mut self, mut commands: mpsc::Receiver<Command>) {
        log::info!("VM started");
        while let Some(command) = commands.recv().await {
            match command {
                Command::Stop => break,
                Command::MethodCall {
                    object,
                    method,
                    arguments,
                    context,
                    reply,
                } => {
                    let result = self.execute(&object, &method, arguments, context.as_ref());
                    let _ = reply.send(result);
                }
            }
        }
        log::info!("VM stopped");
    }
}
