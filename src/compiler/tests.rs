use super::assembly::{CompiledType, Entry};
use super::Compiler;
use crate::parser::parse;

fn compile(src: &str) -> super::Assembly {
    let class = parse(src).unwrap_or_else(|e| panic!("parse failed: {e:?}"));
    Compiler::compile(&class).expect("compile failed")
}

#[test]
fn every_function_ends_with_return() {
    let assembly = compile("package demo\nfunc f() {\n}\n");
    assert!(matches!(
        assembly.functions[0].entries.last(),
        Some(Entry::Return { .. })
    ));
}

#[test]
fn arguments_get_dense_registers_and_leading_pops() {
    let assembly = compile("package demo\nfunc f(a string b int) {\n}\n");
    let f = &assembly.functions[0];
    assert_eq!(f.arguments, vec![CompiledType::Str, CompiledType::Int]);
    assert_eq!(f.register_of("a"), Some(0));
    assert_eq!(f.register_of("b"), Some(1));
    assert!(matches!(f.entries[0], Entry::PopToRegister { register: 0, .. }));
    assert!(matches!(f.entries[1], Entry::PopToRegister { register: 1, .. }));
}

#[test]
fn string_pool_interning_is_idempotent() {
    let assembly = compile(
        "package demo\nfunc f() {\nplayer.Send(\"hi\")\nplayer.Send(\"hi\")\n}\n",
    );
    let f = &assembly.functions[0];
    assert_eq!(f.strings().iter().filter(|s| s.as_str() == "hi").count(), 1);
}

#[test]
fn method_call_on_context_name_pushes_context_not_string() {
    let assembly = compile("package demo\nfunc f() {\nplayer.Send(\"hi\")\n}\n");
    let f = &assembly.functions[0];
    let has_push_context = f
        .entries
        .iter()
        .any(|e| matches!(e, Entry::PushContext { .. }));
    assert!(has_push_context);
}

#[test]
fn method_call_on_non_context_name_pushes_string() {
    let assembly = compile("package demo\nfunc f() {\nthing.Send(\"hi\")\n}\n");
    let f = &assembly.functions[0];
    let push_contexts = f
        .entries
        .iter()
        .filter(|e| matches!(e, Entry::PushContext { .. }))
        .count();
    assert_eq!(push_contexts, 0);
}

#[test]
fn unbound_identifier_is_a_compile_error() {
    let class = parse("package demo\nfunc f() {\nreturn missing\n}\n").unwrap();
    let err = Compiler::compile(&class).unwrap_err();
    assert!(matches!(err, crate::error::CompileError::UnboundIdentifier { .. }));
}

#[test]
fn if_else_emits_jump_and_label_entries_with_distinct_names() {
    let assembly =
        compile("package demo\nfunc f() {\nif x == 1 {\nreturn 1\n} else {\nreturn 0\n}\n}\n");
    let f = &assembly.functions[0];
    let labels: Vec<&str> = f
        .entries
        .iter()
        .filter_map(|e| match e {
            Entry::Label { name, .. } => Some(name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(labels.len(), 2);
    assert_ne!(labels[0], labels[1]);
    assert!(matches!(f.entries.last(), Some(Entry::Return { .. })));
}

#[test]
fn var_create_defaults_to_string_type() {
    let assembly = compile("package demo\nfunc f() {\nx := \"hi\"\n}\n");
    let f = &assembly.functions[0];
    assert_eq!(f.register_of("x"), Some(0));
}

#[test]
fn binary_op_emission_is_post_order() {
    let assembly = compile("package demo\nfunc f() {\nreturn 1 + 2\n}\n");
    let f = &assembly.functions[0];
    assert!(matches!(f.entries[0], Entry::PushNumber { value: 1, .. }));
    assert!(matches!(f.entries[1], Entry::PushNumber { value: 2, .. }));
    assert!(matches!(f.entries[2], Entry::BinOp { .. }));
}
