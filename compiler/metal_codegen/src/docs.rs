//! HTML summary of a module's interface.

use std::fmt::Write as _;

use metal_ir::{FuncDef, GlobalVar, Module, ParamDirection, StructMember};

/// Render an HTML page documenting `module`: its doc text, each struct with
/// its members, each constant, each global and each function signature.
pub fn document_module(module: &Module) -> String {
    let mut doc = String::new();
    let _ = writeln!(doc, "<h1>{}</h1>", escape(&module.name));
    paragraph(&mut doc, module.doc.as_deref());

    doc.push_str("<h2>structs</h2>\n");
    for def in &module.structs {
        let _ = writeln!(doc, "<h3>{}</h3>", escape(&def.name));
        paragraph(&mut doc, def.doc.as_deref());
        let members: Vec<_> = def.members.iter().map(member).collect();
        let _ = writeln!(doc, "<pre>{}</pre>", escape(&members.join("\n")));
    }

    doc.push_str("<h2>constants</h2>\n");
    for constant in &module.constants {
        let _ = writeln!(doc, "<h3>{}</h3>", escape(&constant.name));
        let _ = writeln!(doc, "<pre>{}</pre>", escape(&format!("{:?}", constant.value)));
    }

    doc.push_str("<h2>globals</h2>\n");
    for global in &module.globals {
        let _ = writeln!(doc, "<h3>{}</h3>", escape(&global.name));
        paragraph(&mut doc, global.doc.as_deref());
        let _ = writeln!(doc, "<pre>{}</pre>", escape(&global_decl(global)));
    }

    doc.push_str("<h2>functions</h2>\n");
    for func in &module.funcs {
        let _ = writeln!(doc, "<h3>{}</h3>", escape(&func.name));
        paragraph(&mut doc, func.doc.as_deref());
        let _ = writeln!(doc, "<pre>{}</pre>", escape(&signature(func)));
    }

    format!("<html>\n{doc}</html>\n")
}

fn paragraph(doc: &mut String, text: Option<&str>) {
    if let Some(text) = text.filter(|t| !t.trim().is_empty()) {
        let _ = writeln!(doc, "<p>{}</p>", escape(text.trim()));
    }
}

fn member(member: &StructMember) -> String {
    match member.array_len {
        Some(len) => format!("{} {}[{len}]", member.ty, member.name),
        None => format!("{} {}", member.ty, member.name),
    }
}

fn global_decl(global: &GlobalVar) -> String {
    format!("{}: {}", global.name, global.ty)
}

fn signature(func: &FuncDef) -> String {
    let params: Vec<_> = func
        .params
        .iter()
        .map(|p| {
            let dir = match p.direction {
                ParamDirection::Inbound => "in",
                ParamDirection::Outbound => "out",
            };
            format!("{dir} {}: {}", p.name, p.ty)
        })
        .collect();
    format!("{}({})", func.name, params.join(", "))
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
