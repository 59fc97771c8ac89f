//! # Loader
//!
//! Translates one compiled function into an executable [`ScriptedMethod`],
//! resolving every jump label to a concrete instruction index.
//!
//! This is a two-pass algorithm ported from the original's
//! `NewMethodFromAssembly`: walk the entries once, recording where each
//! label points and which instructions still need a target patched in, then
//! patch. One simplification versus the original: labels here resolve
//! directly to "the instruction that comes after me," with no
//! off-by-one adjustment at either recording or patch time — jumps set the
//! frame's program counter to that index outright rather than one less than
//! it. `spec.md` explicitly allows this as an equivalent formulation of the
//! same jump semantics.

use std::collections::HashMap;

use crate::compiler::assembly::{Entry, FunctionInfo};
use crate::error::LoadError;
use crate::vm::class::ScriptedMethod;
use crate::vm::op::Op;

pub fn load_function(f: &FunctionInfo) -> Result<ScriptedMethod, LoadError> {
    let mut ops = Vec::with_capacity(f.entries.len());
    let mut label_pos: HashMap<String, usize> = HashMap::new();
    let mut pending_jumps: Vec<(usize, String)> = Vec::new();

    for entry in &f.entries {
        match entry {
            Entry::Label { name, .. } => {
                label_pos.insert(name.clone(), ops.len());
            }
            Entry::PushString { pool_index, .. } => ops.push(Op::Pusc(*pool_index)),
            Entry::PushNumber { value, .. } => ops.push(Op::Pusn(*value)),
            Entry::PushContext { pool_index, .. } => ops.push(Op::Pucx(*pool_index)),
            Entry::PopToRegister { register, .. } => ops.push(Op::Popr(*register)),
            Entry::PushFromRegister { register, .. } => ops.push(Op::Pure(*register)),
            Entry::BinOp { op, .. } => ops.push(binop_to_op(*op)),
            Entry::Call { .. } => ops.push(Op::Call),
            Entry::JumpIfFalse { label, .. } => {
                pending_jumps.push((ops.len(), label.clone()));
                ops.push(Op::Jmpf(0));
            }
            Entry::Jump { label, .. } => {
                pending_jumps.push((ops.len(), label.clone()));
                ops.push(Op::Jmp(0));
            }
            Entry::NoOp { .. } => ops.push(Op::Noop),
            Entry::Return { .. } => ops.push(Op::Ret),
        }
    }

    for (pos, label) in pending_jumps {
        let target = label_pos
            .get(&label)
            .copied()
            .ok_or_else(|| LoadError::UndefinedLabel {
                function: f.name.clone(),
                label: label.clone(),
            })?;
        ops[pos] = match ops[pos] {
            Op::Jmpf(_) => Op::Jmpf(target),
            Op::Jmp(_) => Op::Jmp(target),
            ref other => other.clone(),
        };
    }

    Ok(ScriptedMethod {
        argument_count: f.arguments.len(),
        return_count: f.returns.len(),
        ops,
        strings: f.strings().to_vec(),
    })
}

fn binop_to_op(op: crate::parser::ast::BinOp) -> Op {
    use crate::parser::ast::BinOp::*;
    match op {
        Add => Op::Add,
        Sub => Op::Sub,
        Mul => Op::Mul,
        Div => Op::Div,
        Mod => Op::Mod,
        Eq => Op::Cmp,
    }
}
