//! End-to-end rendering through the built-in C backend.

#![allow(
    clippy::unwrap_used,
    reason = "test code uses unwrap for concise assertions"
)]

use metal_codegen::{c, Backend, BackendConfig, BackendRegistry, BackendSource, Node, RenderError};
use metal_ir::{
    BinaryOp, CallArg, Expr, FuncCall, FuncCallPredicate, FuncDef, GlobalVar, LocalDecl,
    MessageSend, Module, Param, Stmt, StringConstant, StructDef, StructMember, UnaryOp,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn backend() -> Backend {
    Backend::c(BackendConfig::default()).unwrap()
}

fn point() -> StructDef {
    StructDef::new(
        "Point",
        vec![StructMember::field("x", "word"), StructMember::field("y", "word")],
    )
}

fn name_func(body: Vec<Stmt>) -> FuncDef {
    FuncDef::new(
        "Name",
        vec![Param::inbound("x", "word"), Param::outbound("y", "word")],
        body,
    )
}

fn predicate(name: &str, on_pass: Vec<Stmt>, on_fail: Vec<Stmt>) -> Stmt {
    Stmt::Predicate(FuncCallPredicate {
        call: FuncCall::new(name, vec![CallArg::Record]),
        on_pass,
        on_fail,
    })
}

fn sample_module() -> Module {
    let mut module = Module::new("geometry");
    module.structs.push(point());
    module.constants.push(StringConstant {
        name: "GREETING".into(),
        value: "hi".into(),
    });
    module.funcs.push(name_func(vec![Stmt::Pass]));
    module
}

/// `stmt` as a statement of a function named `Caller`.
fn in_caller(stmt: &Stmt) -> Node<'_> {
    Node::Stmt {
        func: "Caller",
        stmt,
    }
}

fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("`{needle}` not found in:\n{haystack}"))
}

// Structs

#[test]
fn struct_renders_members_in_order() {
    let def = point();
    assert_eq!(
        backend().render(&Node::Struct(&def)).unwrap(),
        "typedef struct Point\n{\n    word x;\n    word y;\n} Point;\n"
    );
}

#[test]
fn struct_lands_between_section_markers() {
    let mut module = Module::new("geometry");
    module.structs.push(point());
    let code = backend().render_module(&module).unwrap();

    let open = position(&code, "/* -- Struct Definitions -- */");
    let def = position(&code, "typedef struct Point\n{\n    word x;\n    word y;\n} Point;");
    let close = position(&code, "/* ------------------------ */\n\n/* -- Function Declarations");
    assert!(open < def && def < close);
}

#[test]
fn member_types_are_copied_verbatim() {
    let mut module = Module::new("text");
    module.structs.push(StructDef::new(
        "Point",
        vec![
            StructMember::field("length", "word"),
            StructMember::field("str", "char*"),
        ],
    ));
    let code = backend().render_module(&module).unwrap();

    let open = position(&code, "/* -- Struct Definitions -- */");
    let def = position(
        &code,
        "typedef struct Point\n{\n    word length;\n    char* str;\n} Point;",
    );
    let close = position(&code, "/* ------------------------ */");
    assert!(open < def && def < close);
}

#[test]
fn array_members_carry_their_length() {
    let def = StructDef::new("Buffer", vec![StructMember::array("bytes", "char", 16)]);
    let text = backend().render(&Node::Struct(&def)).unwrap();
    assert!(text.contains("    char bytes[16];\n"), "{text}");
}

#[test]
fn string_constants_are_escaped_with_byte_length() {
    let constant = StringConstant {
        name: "QUOTE".into(),
        value: "say \"hi\"\n".into(),
    };
    assert_eq!(
        backend().render(&Node::Constant(&constant)).unwrap(),
        "static const string QUOTE = { 9, \"say \\\"hi\\\"\\n\" };\n"
    );
}

// Functions

fn definition_of<'c>(code: &'c str, name: &str) -> &'c str {
    let start = position(code, &format!("bool {name}({name}_args* {name}_args"));
    let len = code[start..].find("\n}\n").map_or(code.len() - start, |end| end + 3);
    &code[start..start + len]
}

#[test]
fn declaration_uses_the_unnamed_signature() {
    let func = name_func(vec![]);
    assert_eq!(
        backend().render(&Node::FuncDecl(&func)).unwrap(),
        "bool Name(Name_args*, const word x);\n"
    );
}

#[test]
fn definition_aliases_outbound_parameters() {
    let func = name_func(vec![]);
    let text = backend().render(&Node::FuncDef(&func)).unwrap();
    assert!(text.starts_with("bool Name(Name_args* Name_args, const word x)\n{\n"), "{text}");
    assert!(text.contains("    word* y = &Name_args->y;\n"), "{text}");
    assert!(text.ends_with("    return true;\n}\n"), "{text}");
}

#[test]
fn explicit_final_return_is_not_repeated() {
    let code = backend().render_module(&sample_module()).unwrap();
    let definition = definition_of(&code, "Name");
    assert_eq!(definition.matches("return true;").count(), 1, "{definition}");

    let failing = name_func(vec![Stmt::Fail]);
    let text = backend().render(&Node::FuncDef(&failing)).unwrap();
    assert!(!text.contains("return true;"), "{text}");
    assert!(text.ends_with("    return false;\n}\n"), "{text}");
}

#[test]
fn argument_record_holds_outbound_parameters() {
    let func = name_func(vec![]);
    assert_eq!(
        backend().render(&Node::ArgsRecord(&func)).unwrap(),
        "typedef struct Name_args\n{\n    word y;\n} Name_args;\n"
    );

    let no_out = FuncDef::new("Reset", vec![Param::inbound("x", "word")], vec![]);
    let text = backend().render(&Node::ArgsRecord(&no_out)).unwrap();
    assert!(text.contains("    char reserved;\n"), "{text}");
}

#[test]
fn calls_pass_the_record_then_inbound_values() {
    let stmt = Stmt::Call(FuncCall::new(
        "Move",
        vec![
            CallArg::Record,
            CallArg::Inbound(Expr::id_val("dx", "word")),
            CallArg::Inbound(Expr::literal("3", "word")),
        ],
    ));
    assert_eq!(
        backend().render(&in_caller(&stmt)).unwrap(),
        "Move(&Move_args, dx, 3);\n"
    );
}

#[test]
fn caller_declares_a_record_per_callee() {
    let mut module = Module::new("calls");
    module.funcs.push(FuncDef::new(
        "G",
        vec![Param::inbound("n", "word"), Param::outbound("r", "word")],
        vec![Stmt::Pass],
    ));
    module.funcs.push(FuncDef::new(
        "F",
        vec![],
        vec![
            Stmt::Call(FuncCall::new(
                "G",
                vec![CallArg::Record, CallArg::Inbound(Expr::literal("3", "word"))],
            )),
            predicate("G", vec![Stmt::Pass], vec![Stmt::Fail]),
        ],
    ));
    let code = backend().render_module(&module).unwrap();
    let definition = definition_of(&code, "F");

    assert_eq!(definition.matches("G_args G_args;").count(), 1, "{definition}");
    let record = position(definition, "    G_args G_args;\n");
    let call = position(definition, "    G(&G_args, 3);\n");
    assert!(record < call);
    assert!(definition.contains("if (G(&G_args))"), "{definition}");
    assert!(!definition_of(&code, "G").contains("G_args G_args;"));
}

#[test]
fn recursive_call_passes_its_own_record() {
    let func = FuncDef::new(
        "Count",
        vec![Param::outbound("n", "word")],
        vec![predicate("Count", vec![Stmt::Pass], vec![Stmt::Fail])],
    );
    let text = backend().render(&Node::FuncDef(&func)).unwrap();
    assert!(text.contains("if (Count(Count_args))"), "{text}");
    assert!(!text.contains("Count_args Count_args;"), "{text}");
}

#[test]
fn locals_with_and_without_initializer() {
    let plain = Stmt::Local(LocalDecl {
        name: "count".into(),
        ty: "word".into(),
        is_typed_ref: false,
        init: None,
    });
    let pointer = Stmt::Local(LocalDecl {
        name: "p".into(),
        ty: "Point".into(),
        is_typed_ref: true,
        init: Some(Expr::id_val("origin", "Point")),
    });
    let backend = backend();
    assert_eq!(backend.render(&in_caller(&plain)).unwrap(), "word count;\n");
    assert_eq!(
        backend.render(&in_caller(&pointer)).unwrap(),
        "Point* p = origin;\n"
    );
}

// Operators

#[test]
fn string_equality_uses_the_runtime_compare() {
    let expr = Expr::binary(
        BinaryOp::Eq,
        Expr::id_val("a", "string"),
        Expr::id_val("b", "string"),
        "string",
    );
    assert_eq!(
        backend().resolver().render(&Node::Expr(&expr)).unwrap(),
        "compare_strings(&a, &b) == 0"
    );
}

#[test]
fn string_references_compare_without_dereference() {
    let expr = Expr::binary(
        BinaryOp::Eq,
        Expr::id_ref("a", "string"),
        Expr::id_ref("b", "string"),
        "string",
    );
    assert_eq!(
        backend().resolver().render(&Node::Expr(&expr)).unwrap(),
        "compare_strings(&a, &b) == 0"
    );

    let word = Expr::id_ref("n", "word");
    assert_eq!(
        backend().resolver().render(&Node::Expr(&word)).unwrap(),
        "(*n)"
    );
}

#[test]
fn word_equality_falls_back_to_default() {
    let expr = Expr::binary(
        BinaryOp::Eq,
        Expr::id_val("a", "word"),
        Expr::id_val("b", "word"),
        "word",
    );
    assert_eq!(
        backend().resolver().render(&Node::Expr(&expr)).unwrap(),
        "a == b"
    );
}

#[test]
fn nested_expressions_render_as_given() {
    let sum = Expr::binary(
        BinaryOp::Add,
        Expr::id_ref("n", "word"),
        Expr::literal("1", "word"),
        "word",
    );
    let expr = Expr::unary(UnaryOp::Neg, Expr::paren(sum));
    assert_eq!(
        backend().resolver().render(&Node::Expr(&expr)).unwrap(),
        "-((*n) + 1)"
    );

    let cast = Expr::cast(Expr::sizeof(Expr::id_val("s", "string")), "word");
    assert_eq!(
        backend().resolver().render(&Node::Expr(&cast)).unwrap(),
        "(word)s.length"
    );
}

#[test]
fn struct_isnull_defers_to_default() {
    let expr = Expr::is_null(Expr::id_val("p", "struct"));
    assert_eq!(
        backend().resolver().render(&Node::Expr(&expr)).unwrap(),
        "(p == 0)"
    );
}

// Predicate calls

#[test]
fn empty_predicate_branches_still_render() {
    let stmt = predicate("Check", vec![], vec![]);
    assert_eq!(
        backend().render(&in_caller(&stmt)).unwrap(),
        "if (Check(&Check_args))\n{\n}\nelse\n{\n}\n"
    );
}

#[test]
fn nested_predicates_indent_per_level() {
    let inner = predicate("Inner", vec![Stmt::Pass], vec![Stmt::Fail]);
    let outer = predicate("Outer", vec![inner], vec![Stmt::Fail]);
    assert_eq!(
        backend().render(&in_caller(&outer)).unwrap(),
        "if (Outer(&Outer_args))\n\
         {\n\
         \x20   if (Inner(&Inner_args))\n\
         \x20   {\n\
         \x20       return true;\n\
         \x20   }\n\
         \x20   else\n\
         \x20   {\n\
         \x20       return false;\n\
         \x20   }\n\
         }\n\
         else\n\
         {\n\
         \x20   return false;\n\
         }\n"
    );
}

// Message sends

#[test]
fn message_send_looks_up_and_caches_a_handler() {
    let send = Stmt::Send(MessageSend {
        receiver: Expr::id_val("shape", "Shape"),
        selector: "area".into(),
        args: vec![Expr::id_val("w", "word")],
        on_pass: vec![Stmt::Pass],
        on_fail: vec![Stmt::Fail],
    });
    let text = backend().render(&in_caller(&send)).unwrap();
    for needle in [
        "static metal_msg_handler __handler_cache;",
        "const void* __receiver = shape;",
        "metal_type* __parm_types[1];",
        "extern metal_type metal_type_word;",
        "word __parm0 = w;",
        "__parm_types[0] = &metal_type_word;",
        "__msg.parms[0] = (void*)&__parm0;",
        "__msg.nparms = 1;",
        "if (!__handler_cache.cached || __handler_cache.receiver != __receiver)",
        "__rte_find_handler(&__handler_cache.handler, __receiver, &(const string){ 4, \"area\" });",
        "__handler_cache.receiver = __receiver;",
        "if (__handler_cache.cached && __handler_cache.handler((metal_msg*)&__msg))",
    ] {
        assert!(text.contains(needle), "missing `{needle}` in:\n{text}");
    }
}

#[test]
fn computed_payloads_are_sent_through_temporaries() {
    let send = Stmt::Send(MessageSend {
        receiver: Expr::id_val("shape", "Shape"),
        selector: "scale".into(),
        args: vec![
            Expr::literal("5", "word"),
            Expr::binary(
                BinaryOp::Add,
                Expr::id_val("w", "word"),
                Expr::literal("1", "word"),
                "word",
            ),
        ],
        on_pass: vec![],
        on_fail: vec![],
    });
    let text = backend().render(&in_caller(&send)).unwrap();
    for needle in [
        "word __parm0 = 5;",
        "__msg.parms[0] = (void*)&__parm0;",
        "word __parm1 = w + 1;",
        "__msg.parms[1] = (void*)&__parm1;",
    ] {
        assert!(text.contains(needle), "missing `{needle}` in:\n{text}");
    }
    assert!(!text.contains("(void*)&5"), "{text}");
}

#[test]
fn message_without_parameters_keeps_one_slot() {
    let send = Stmt::Send(MessageSend {
        receiver: Expr::id_val("shape", "Shape"),
        selector: "reset".into(),
        args: vec![],
        on_pass: vec![],
        on_fail: vec![],
    });
    let text = backend().render(&in_caller(&send)).unwrap();
    assert!(text.contains("metal_type* __parm_types[1];"), "{text}");
    assert!(text.contains("__msg.nparms = 0;"), "{text}");
}

// Modules

#[test]
fn module_sections_follow_declaration_order() {
    let code = backend().render_module(&sample_module()).unwrap();

    let preamble = position(&code, "typedef uint32_t word;");
    let point = position(&code, "typedef struct Point");
    let record = position(&code, "typedef struct Name_args");
    let constant = position(&code, "static const string GREETING = { 2, \"hi\" };");
    let declaration = position(&code, "bool Name(Name_args*, const word x);");
    let definition = position(&code, "bool Name(Name_args* Name_args, const word x)");
    assert!(preamble < point);
    assert!(point < record);
    assert!(record < constant);
    assert!(constant < declaration);
    assert!(declaration < definition);
}

#[test]
fn module_without_constants_omits_the_section() {
    let mut module = sample_module();
    module.constants.clear();
    let code = backend().render_module(&module).unwrap();
    assert!(!code.contains("/* -- Constants -- */"), "{code}");
}

#[test]
fn globals_follow_constants() {
    let mut module = sample_module();
    module.globals.push(GlobalVar::new(
        "origin",
        "Point",
        vec![Expr::literal("1", "word"), Expr::literal("2", "word")],
    ));
    module.globals.push(GlobalVar::new("scratch", "Point", vec![]));
    let code = backend().render_module(&module).unwrap();

    let constant = position(&code, "static const string GREETING");
    let section = position(&code, "/* -- Globals -- */");
    let origin = position(&code, "static Point origin = { 1, 2 };");
    let scratch = position(&code, "static Point scratch = { 0 };");
    let declaration = position(&code, "bool Name(Name_args*, const word x);");
    assert!(constant < section);
    assert!(section < origin && origin < scratch);
    assert!(scratch < declaration);

    assert!(!backend()
        .render_module(&sample_module())
        .unwrap()
        .contains("/* -- Globals -- */"));
}

#[test]
fn preamble_declares_the_runtime_contract() {
    let backend = Backend::c(BackendConfig::default().with_word_type("uint64_t")).unwrap();
    let code = backend.render_module(&Module::new("empty")).unwrap();
    for name in ["string", "metal_type", "metal_msg", "metal_msg_handler"] {
        assert!(code.contains(&format!("}} {name};")), "no `{name}` in:\n{code}");
    }
    assert!(code.contains("typedef uint64_t word;"));
    assert!(code.contains("typedef bool (*metal_msg_handler_fn)(metal_msg*);"));
    assert!(code.contains("extern bool acquire_memory(word*, word);"));
}

#[test]
fn indent_unit_is_configurable() {
    let backend = Backend::c(BackendConfig::default().with_indent("\t")).unwrap();
    let def = point();
    assert_eq!(
        backend.render(&Node::Struct(&def)).unwrap(),
        "typedef struct Point\n{\n\tword x;\n\tword y;\n} Point;\n"
    );
}

#[test]
fn parallel_and_sequential_output_match() {
    let mut module = sample_module();
    for i in 0..32 {
        module.structs.push(StructDef::new(
            format!("S{i}"),
            vec![StructMember::field("v", "word")],
        ));
        module.funcs.push(FuncDef::new(
            format!("F{i}"),
            vec![Param::outbound("r", "word")],
            vec![Stmt::Pass],
        ));
    }
    let parallel = Backend::c(BackendConfig::default().with_parallel(true)).unwrap();
    let sequential = Backend::c(BackendConfig::default().with_parallel(false)).unwrap();
    assert_eq!(
        parallel.render_module(&module).unwrap(),
        sequential.render_module(&module).unwrap()
    );
}

#[test]
fn generate_wraps_success() {
    let result = backend().generate(&sample_module());
    assert!(result.success);
    assert!(!result.has_errors());
    assert!(result.code.contains("bool Name("));
}

// Failures

/// The C backend with `struct_member` binding a placeholder nothing supplies.
fn broken_source(frames: &'static [(&'static str, &'static str)]) -> BackendSource<'static> {
    BackendSource {
        name: "broken",
        frames,
        ..c::SOURCE
    }
}

const BROKEN_STRUCT: &str = "struct\n${\ntypedef struct $(name)\n{\n$(members)\n} $(name);\n$}\n\
                             struct_member\n${\n$(type) $(foo);\n$}\n\
                             struct_array_member\n${\n$(type) $(name)[$(size)];\n$}\n";

#[test]
fn missing_binding_yields_no_code() {
    static FRAMES: &[(&str, &str)] = &[
        ("module.c.tmpl", c::MODULE),
        ("runtime.c.tmpl", c::RUNTIME),
        ("struct.c.tmpl", BROKEN_STRUCT),
        ("func.c.tmpl", c::FUNC),
        ("msg.c.tmpl", c::MSG),
    ];
    let backend = Backend::load(&broken_source(FRAMES), BackendConfig::default()).unwrap();

    let mut module = Module::new("geometry");
    module.structs.push(point());
    let result = backend.generate(&module);

    assert!(result.has_errors());
    assert_eq!(result.code, "");
    assert_eq!(result.errors[0].construct.as_deref(), Some("member 'x'"));
    assert!(result.errors[0].message.contains("`foo`"));
}

#[test]
fn first_failure_in_declaration_order_wins() {
    static FRAMES: &[(&str, &str)] = &[
        ("module.c.tmpl", c::MODULE),
        ("runtime.c.tmpl", c::RUNTIME),
        ("struct.c.tmpl", BROKEN_STRUCT),
        ("func.c.tmpl", c::FUNC),
        ("msg.c.tmpl", c::MSG),
    ];
    let backend = Backend::load(&broken_source(FRAMES), BackendConfig::default()).unwrap();

    let mut module = Module::new("many");
    for i in 0..16 {
        module.structs.push(StructDef::new(
            format!("S{i}"),
            vec![StructMember::field(format!("m{i}"), "word")],
        ));
    }
    for _ in 0..4 {
        let err = backend.render_module(&module).unwrap_err();
        assert_eq!(err.construct().unwrap().to_string(), "member 'm0'");
    }
}

#[test]
fn missing_frame_fails_at_load() {
    static FRAMES: &[(&str, &str)] = &[
        ("module.c.tmpl", c::MODULE),
        ("runtime.c.tmpl", c::RUNTIME),
        ("struct.c.tmpl", c::STRUCT),
        ("msg.c.tmpl", c::MSG),
    ];
    let err = Backend::load(&broken_source(FRAMES), BackendConfig::default()).unwrap_err();
    assert!(matches!(
        &err,
        RenderError::MissingTemplate { name, .. } if name == "func_signature"
    ));
    assert_eq!(err.construct().unwrap().to_string(), "backend 'broken'");
}

#[test]
fn operator_without_default_fails_at_load() {
    let source = BackendSource {
        operators: ("ops.c.tmpl", "string.== compare_strings(&$(left), &$(right)) == 0\n"),
        ..c::SOURCE
    };
    assert!(Backend::load(&source, BackendConfig::default()).is_err());
}

#[test]
fn symbol_without_any_template_is_unresolved() {
    let source = BackendSource {
        operators: ("ops.c.tmpl", "default.id_val $(name)\n"),
        ..c::SOURCE
    };
    let backend = Backend::load(&source, BackendConfig::default()).unwrap();
    let expr = Expr::binary(
        BinaryOp::Shl,
        Expr::id_val("a", "word"),
        Expr::id_val("b", "word"),
        "word",
    );
    assert_eq!(
        backend.resolver().render(&Node::Expr(&expr)).unwrap_err(),
        RenderError::UnresolvedOperator {
            category: "word".into(),
            symbol: "<<".into(),
        }
    );
}

#[test]
fn unknown_category_resolves_through_default() {
    let expr = Expr::is_null(Expr::id_val("p", "Point"));
    assert_eq!(
        backend().resolver().render(&Node::Expr(&expr)).unwrap(),
        "(p == 0)"
    );
}

// Registry

#[test]
fn registry_selects_backends_by_name() {
    let registry = BackendRegistry::with_builtin().unwrap();
    assert_eq!(registry.names(), ["c"]);
    assert!(registry.get("c").is_some());
    assert!(registry.get("js").is_none());

    let replaced = registry.register(backend());
    assert_eq!(replaced.unwrap().name(), "c");
    assert_eq!(registry.names(), ["c"]);
}

#[test]
fn registry_backends_render_from_many_threads() {
    let registry = BackendRegistry::with_builtin().unwrap();
    let module = sample_module();
    let expected = backend().render_module(&module).unwrap();
    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let backend = registry.get("c").unwrap();
                assert_eq!(backend.render_module(&module).unwrap(), expected);
            });
        }
    });
}

proptest! {
    #[test]
    fn unknown_categories_use_default_binary_templates(
        category in "t_[a-z]{1,8}",
        index in 0..BinaryOp::ALL.len(),
    ) {
        let op = BinaryOp::ALL[index];
        let expr = Expr::binary(
            op,
            Expr::id_val("l", category.as_str()),
            Expr::id_val("r", category.as_str()),
            category.as_str(),
        );
        let text = backend().resolver().render(&Node::Expr(&expr)).unwrap();
        prop_assert_eq!(text, format!("l {} r", op.as_symbol()));
    }

    #[test]
    fn module_rendering_is_deterministic(
        names in proptest::collection::vec("[A-Z][a-z]{0,6}", 1..8),
    ) {
        let mut module = Module::new("prop");
        for (i, name) in names.iter().enumerate() {
            module.structs.push(StructDef::new(
                format!("{name}{i}"),
                vec![StructMember::field("v", "word")],
            ));
            module.funcs.push(name_func(vec![predicate(name, vec![Stmt::Pass], vec![])]));
        }
        let backend = backend();
        let first = backend.render_module(&module).unwrap();
        prop_assert_eq!(&first, &backend.render_module(&module).unwrap());
    }
}
