//! # Classes, objects, and methods
//!
//! A [`Class`] is a name plus a method table; a [`Method`] is either
//! `Scripted` (bytecode, built by [`crate::vm::loader`]) or `Internal` (a
//! host callback). An [`Object`] is a thin handle onto a class, matching the
//! original's `vmObject{class Class}` — objects carry no per-instance state
//! of their own in this design, since the scripted language has no instance
//! fields, only class-level methods resolved at call time.

use std::collections::HashMap;
use std::sync::Arc;

use crate::host::HostFn;
use crate::vm::op::Op;

#[derive(Debug)]
pub struct ScriptedMethod {
    pub argument_count: usize,
    pub return_count: usize,
    pub ops: Vec<Op>,
    pub strings: Vec<String>,
}

pub struct InternalMethod {
    pub argument_count: usize,
    pub return_count: usize,
    pub handle: HostFn,
}

pub enum Method {
    Scripted(ScriptedMethod),
    Internal(InternalMethod),
}

impl Method {
    pub fn argument_count(&self) -> usize {
        match self {
            Method::Scripted(m) => m.argument_count,
            Method::Internal(m) => m.argument_count,
        }
    }

    pub fn return_count(&self) -> usize {
        match self {
            Method::Scripted(m) => m.return_count,
            Method::Internal(m) => m.return_count,
        }
    }
}

pub struct Class {
    pub name: String,
    methods: HashMap<String, Method>,
}

impl Class {
    pub fn new(name: String, methods: HashMap<String, Method>) -> Self {
        Self { name, methods }
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.get(name)
    }
}

/// A handle onto a loaded class. Two objects constructed from the same
/// class name via the VM's cache share the same `Arc<Class>`.
pub struct Object {
    pub class: Arc<Class>,
}

impl Object {
    pub fn new(class: Arc<Class>) -> Self {
        Self { class }
    }
}

impl std::fmt::Debug for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Object").field("class", &self.class.name).finish()
    }
}
