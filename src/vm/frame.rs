//! # Execution frame
//!
//! A frame owns a bounded operand stack and a bounded register file and
//! interprets one [`ScriptedMethod`]'s [`Op`] sequence against them. `CALL`
//! recurses directly into [`run_method`] on the Rust call stack for a
//! scripted callee, rather than threading a `nextFrame` pointer the way the
//! original's `ExecutionFrame.nextFrame` field does — Rust's own call stack
//! already gives us that nesting for free.
//!
//! Grounded on `original_source/internal/vm/execution_stack.go` for the
//! bounded-stack shape and `operation.go` for per-opcode semantics.

use crate::config::VmConfig;
use crate::error::RuntimeError;
use crate::host::ContextProvider;
use crate::vm::class::Method;
use crate::vm::op::Op;
use crate::vm::value::Value;

struct ExecutionFrame<'a> {
    stack: Vec<Value>,
    registers: Vec<Option<Value>>,
    config: &'a VmConfig,
}

impl<'a> ExecutionFrame<'a> {
    fn new(config: &'a VmConfig) -> Self {
        ExecutionFrame {
            stack: Vec::with_capacity(config.stack_depth),
            registers: vec![None; config.register_count],
            config,
        }
    }

    fn push(&mut self, value: Value) -> Result<(), RuntimeError> {
        if self.stack.len() >= self.config.stack_depth {
            return Err(RuntimeError::StackOverflow);
        }
        self.stack.push(value);
        Ok(())
    }

    fn pop(&mut self) -> Result<Value, RuntimeError> {
        self.stack.pop().ok_or(RuntimeError::StackUnderflow)
    }

    fn write_register(&mut self, register: usize, value: Value) -> Result<(), RuntimeError> {
        let slot = self
            .registers
            .get_mut(register)
            .ok_or(RuntimeError::RegisterOutOfRange(register))?;
        *slot = Some(value);
        Ok(())
    }

    /// An unwritten register reads as an empty string, matching the
    /// original's zero-valued `StringValue` register file.
    fn read_register(&self, register: usize) -> Result<Value, RuntimeError> {
        let slot = self
            .registers
            .get(register)
            .ok_or(RuntimeError::RegisterOutOfRange(register))?;
        Ok(slot.clone().unwrap_or_else(|| Value::Str(String::new())))
    }
}

/// Run one method to completion with the given arguments, dispatching to
/// the host callback for an [`Method::Internal`] method or to the
/// bytecode interpreter for a [`Method::Scripted`] one.
///
/// `arguments` are handed to the callee in the order given — including for
/// `Scripted` methods, where they land on the frame's operand stack in that
/// same order and are popped by a `POPR` prologue that also runs in
/// declaration order. For a single-argument call this is unobservable; for
/// two or more, the callee's `POPR` sequence pops the stack top first, so
/// the *last* argument binds to the *first* parameter. This matches
/// `original_source`'s own top-level dispatch (`vm.execute` pushes
/// `arguments` unreversed) rather than correcting it.
pub fn run_method(
    method: &Method,
    arguments: Vec<Value>,
    ctx: &dyn ContextProvider,
    config: &VmConfig,
) -> Result<Vec<Value>, RuntimeError> {
    match method {
        Method::Internal(internal) => (internal.handle)(&arguments),
        Method::Scripted(scripted) => {
            let mut frame = ExecutionFrame::new(config);
            for argument in arguments {
                frame.push(argument)?;
            }

            let mut pc = 0usize;
            while pc < scripted.ops.len() {
                log::trace!("pc={pc} op={:?}", scripted.ops[pc]);
                match &scripted.ops[pc] {
                    Op::Ret => {
                        log::debug!("returning");
                        break;
                    }
                    Op::Noop => pc += 1,
                    Op::Pusc(index) => {
                        let s = scripted
                            .strings
                            .get(*index)
                            .ok_or(RuntimeError::ConstantOutOfRange(*index))?;
                        log::trace!("pushing string {s:?}");
                        frame.push(Value::Str(s.clone()))?;
                        pc += 1;
                    }
                    Op::Pusn(value) => {
                        log::trace!("pushing number {value}");
                        frame.push(Value::Num(*value))?;
                        pc += 1;
                    }
                    Op::Pucx(index) => {
                        let name = scripted
                            .strings
                            .get(*index)
                            .ok_or(RuntimeError::ConstantOutOfRange(*index))?;
                        log::trace!("resolving context {name:?}");
                        let object = ctx
                            .resolve(name)
                            .ok_or_else(|| RuntimeError::MissingContext(name.clone()))?;
                        frame.push(Value::Obj(Some(object)))?;
                        pc += 1;
                    }
                    Op::Popr(register) => {
                        let value = frame.pop()?;
                        log::trace!("popping to register {register}: {value}");
                        frame.write_register(*register, value)?;
                        pc += 1;
                    }
                    Op::Pure(register) => {
                        let value = frame.read_register(*register)?;
                        log::trace!("pushing from register {register}: {value}");
                        frame.push(value)?;
                        pc += 1;
                    }
                    Op::Add => {
                        let (a, b) = frame.pop_pair()?;
                        let result = a.add(&b)?;
                        log::trace!("{a} + {b} = {result}");
                        frame.push(result)?;
                        pc += 1;
                    }
                    Op::Sub => {
                        let (a, b) = frame.pop_pair()?;
                        let result = a.sub(&b)?;
                        log::trace!("{a} - {b} = {result}");
                        frame.push(result)?;
                        pc += 1;
                    }
                    Op::Mul => {
                        let (a, b) = frame.pop_pair()?;
                        let result = a.mul(&b)?;
                        log::trace!("{a} * {b} = {result}");
                        frame.push(result)?;
                        pc += 1;
                    }
                    Op::Div => {
                        let (a, b) = frame.pop_pair()?;
                        let result = a.div(&b)?;
                        log::trace!("{a} / {b} = {result}");
                        frame.push(result)?;
                        pc += 1;
                    }
                    Op::Mod => {
                        let (a, b) = frame.pop_pair()?;
                        let result = a.rem(&b)?;
                        log::trace!("{a} % {b} = {result}");
                        frame.push(result)?;
                        pc += 1;
                    }
                    Op::Cmp => {
                        let (a, b) = frame.pop_pair()?;
                        let result = a.equal(&b);
                        log::trace!("{a} == {b} -> {result}");
                        frame.push(result)?;
                        pc += 1;
                    }
                    Op::Jmpf(target) => {
                        let value = frame.pop()?;
                        if value.is_truthy() {
                            pc += 1;
                        } else {
                            log::trace!("jumping (condition {value} is falsy) to {target}");
                            pc = *target;
                        }
                    }
                    Op::Jmp(target) => {
                        log::trace!("jumping to {target}");
                        pc = *target;
                    }
                    Op::Call => {
                        let object = frame.pop()?;
                        let method_name = frame.pop()?;
                        let (object, name) = match (object, method_name) {
                            (Value::Obj(Some(object)), Value::Str(name)) => (object, name),
                            _ => return Err(RuntimeError::InvalidCallOperands),
                        };
                        log::debug!("calling {}.{name}", object.class.name);
                        let callee =
                            object
                                .class
                                .method(&name)
                                .ok_or_else(|| RuntimeError::NoSuchMethod {
                                    class: object.class.name.clone(),
                                    method: name.clone(),
                                })?;

                        let argc = callee.argument_count();
                        let mut args = Vec::with_capacity(argc);
                        for _ in 0..argc {
                            args.push(frame.pop()?);
                        }
                        args.reverse();

                        let results = run_method(callee, args, ctx, config)?;
                        log::debug!("called {}.{name}, {} result(s)", object.class.name, results.len());
                        for result in results {
                            frame.push(result)?;
                        }
                        pc += 1;
                    }
                }
            }

            let mut results = Vec::with_capacity(scripted.return_count);
            for _ in 0..scripted.return_count {
                results.push(frame.pop()?);
            }
            results.reverse();
            Ok(results)
        }
    }
}

impl<'a> ExecutionFrame<'a> {
    /// Pop the right then the left operand of a binary op, returning
    /// `(left, right)` in source order.
    fn pop_pair(&mut self) -> Result<(Value, Value), RuntimeError> {
        let right = self.pop()?;
        let left = self.pop()?;
        Ok((left, right))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::class::{Class, InternalMethod, Object, ScriptedMethod};
    use std::collections::HashMap;
    use std::sync::Arc;

    struct NoContext;
    impl ContextProvider for NoContext {
        fn resolve(&self, _name: &str) -> Option<Arc<Object>> {
            None
        }
    }

    fn method(ops: Vec<Op>, strings: Vec<&str>, argc: usize, retc: usize) -> Method {
        Method::Scripted(ScriptedMethod {
            argument_count: argc,
            return_count: retc,
            ops,
            strings: strings.into_iter().map(String::from).collect(),
        })
    }

    #[test]
    fn straight_line_arithmetic_runs_to_completion() {
        let m = method(
            vec![Op::Pusn(3), Op::Pusn(4), Op::Add, Op::Ret],
            vec![],
            0,
            1,
        );
        let config = VmConfig::default();
        let result = run_method(&m, vec![], &NoContext, &config).unwrap();
        assert!(matches!(result[0], Value::Num(7)));
    }

    #[test]
    fn arguments_bind_to_registers_in_declaration_order() {
        let m = method(
            vec![Op::Popr(0), Op::Pure(0), Op::Ret],
            vec![],
            1,
            1,
        );
        let config = VmConfig::default();
        let result = run_method(&m, vec![Value::Num(9)], &NoContext, &config).unwrap();
        assert!(matches!(result[0], Value::Num(9)));
    }

    #[test]
    fn jmpf_skips_to_target_when_condition_is_falsy() {
        // if (0) { push 1 } else { push 2 }; return
        let m = method(
            vec![
                Op::Pusn(0),
                Op::Jmpf(4),
                Op::Pusn(1),
                Op::Jmp(5),
                Op::Pusn(2),
                Op::Ret,
            ],
            vec![],
            0,
            1,
        );
        let config = VmConfig::default();
        let result = run_method(&m, vec![], &NoContext, &config).unwrap();
        assert!(matches!(result[0], Value::Num(2)));
    }

    #[test]
    fn stack_underflow_surfaces_as_runtime_error() {
        let m = method(vec![Op::Add, Op::Ret], vec![], 0, 1);
        let config = VmConfig::default();
        let err = run_method(&m, vec![], &NoContext, &config).unwrap_err();
        assert_eq!(err, RuntimeError::StackUnderflow);
    }

    #[test]
    fn call_dispatches_to_internal_method_on_object() {
        let mut methods = HashMap::new();
        methods.insert(
            "echo".to_string(),
            Method::Internal(InternalMethod {
                argument_count: 1,
                return_count: 1,
                handle: Box::new(|args| Ok(vec![args[0].clone()])),
            }),
        );
        let class = Arc::new(Class::new("Player".to_string(), methods));
        let object = Arc::new(Object::new(class));

        let m = method(
            vec![
                Op::Pusn(5),
                Op::Pusc(0),
                Op::Pucx(1),
                Op::Call,
                Op::Ret,
            ],
            vec!["echo", "player"],
            0,
            1,
        );
        let config = VmConfig::default();

        struct PlayerContext(Arc<Object>);
        impl ContextProvider for PlayerContext {
            fn resolve(&self, name: &str) -> Option<Arc<Object>> {
                if name == "player" {
                    Some(self.0.clone())
                } else {
                    None
                }
            }
        }

        let result = run_method(&m, vec![], &PlayerContext(object), &config).unwrap();
        assert!(matches!(result[0], Value::Num(5)));
    }

    #[test]
    fn call_on_unknown_method_is_no_such_method() {
        let class = Arc::new(Class::new("Player".to_string(), HashMap::new()));
        let object = Arc::new(Object::new(class));

        let m = method(
            vec![Op::Pusc(0), Op::Pucx(1), Op::Call, Op::Ret],
            vec!["missing", "player"],
            0,
            0,
        );
        let config = VmConfig::default();

        struct PlayerContext(Arc<Object>);
        impl ContextProvider for PlayerContext {
            fn resolve(&self, name: &str) -> Option<Arc<Object>> {
                if name == "player" {
                    Some(self.0.clone())
                } else {
                    None
                }
            }
        }

        let err = run_method(&m, vec![], &PlayerContext(object), &config).unwrap_err();
        assert!(matches!(err, RuntimeError::NoSuchMethod { .. }));
    }

    #[test]
    fn missing_context_name_is_fatal() {
        let m = method(vec![Op::Pucx(0), Op::Ret], vec!["room"], 0, 1);
        let config = VmConfig::default();
        let err = run_method(&m, vec![], &NoContext, &config).unwrap_err();
        assert_eq!(err, RuntimeError::MissingContext("room".to_string()));
    }
}
