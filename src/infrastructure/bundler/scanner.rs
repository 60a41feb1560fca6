//! Import scanning and module body rewriting
//!
//! Works on source text with line-anchored patterns; it does not parse
//! JavaScript. Statements inside comments or template strings can confuse it.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};

/// One import edge found in a module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRef {
    pub specifier: String,
    /// `import("...")` expression rather than a static statement
    pub dynamic: bool,
}

fn import_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?m)^[ \t]*import\s+(?:(?P<clause>[^'";]*?)\s*from\s*)?['"](?P<spec>[^'"]+)['"][ \t]*;?"#,
        )
        .expect("import pattern")
    })
}

fn reexport_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?m)^[ \t]*export\s+(?P<ty>type\s+)?(?P<clause>\*(?:\s+as\s+[\w$]+)?|\{[^}]*\})\s*from\s*['"](?P<spec>[^'"]+)['"][ \t]*;?"#,
        )
        .expect("re-export pattern")
    })
}

fn dynamic_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\bimport\s*\(\s*['"](?P<spec>[^'"]+)['"]\s*\)"#).expect("dynamic pattern")
    })
}

fn export_list_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?m)^[ \t]*export\s*(?P<ty>type\s*)?\{(?P<list>[^}]*)\}[ \t]*;?"#)
            .expect("export list pattern")
    })
}

fn export_default_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?m)^(?P<indent>[ \t]*)export\s+default\s+"#).expect("export default pattern")
    })
}

fn export_decl_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?m)^(?P<indent>[ \t]*)export\s+(?P<decl>(?:async\s+)?function\*?|class|const|let|var)\s+(?P<name>[\w$]+)"#,
        )
        .expect("export declaration pattern")
    })
}

/// Quote a string as a JavaScript string literal
pub fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

fn is_type_only(clause: &str) -> bool {
    let clause = clause.trim_start();
    clause.starts_with("type ") || clause.starts_with("type{")
}

/// All import edges of a module, in source order. Type-only imports are skipped.
pub fn scan_imports(source: &str) -> Vec<ImportRef> {
    let mut found: Vec<(usize, ImportRef)> = Vec::new();

    for caps in import_re().captures_iter(source) {
        if caps.name("clause").is_some_and(|c| is_type_only(c.as_str())) {
            continue;
        }
        found.push((caps.get(0).map_or(0, |m| m.start()), static_ref(&caps)));
    }

    for caps in reexport_re().captures_iter(source) {
        if caps.name("ty").is_some() {
            continue;
        }
        found.push((caps.get(0).map_or(0, |m| m.start()), static_ref(&caps)));
    }

    for caps in dynamic_re().captures_iter(source) {
        found.push((
            caps.get(0).map_or(0, |m| m.start()),
            ImportRef {
                specifier: caps["spec"].to_string(),
                dynamic: true,
            },
        ));
    }

    found.sort_by_key(|(pos, _)| *pos);
    found.into_iter().map(|(_, r)| r).collect()
}

fn static_ref(caps: &Captures<'_>) -> ImportRef {
    ImportRef {
        specifier: caps["spec"].to_string(),
        dynamic: false,
    }
}

/// Rewrite a module body for the `(__import, exports)` module function.
///
/// `resolved` maps specifiers to module ids; unknown specifiers are passed
/// through unchanged.
pub fn rewrite_module(source: &str, resolved: &HashMap<String, String>) -> String {
    let target = |spec: &str| -> String {
        let id = resolved.get(spec).map(String::as_str).unwrap_or(spec);
        format!("__import({})", js_string(id))
    };

    let body = reexport_re().replace_all(source, |caps: &Captures<'_>| {
        if caps.name("ty").is_some() {
            return String::new();
        }
        reexport_bindings(&caps["clause"], &target(&caps["spec"]))
    });

    let body = import_re().replace_all(&body, |caps: &Captures<'_>| match caps.name("clause") {
        Some(clause) if is_type_only(clause.as_str()) => String::new(),
        Some(clause) => import_bindings(clause.as_str(), &target(&caps["spec"])),
        None => format!("{};", target(&caps["spec"])),
    });

    let body = dynamic_re().replace_all(&body, |caps: &Captures<'_>| {
        format!("Promise.resolve({})", target(&caps["spec"]))
    });

    let mut exported: Vec<(String, String)> = Vec::new();

    let body = export_list_re().replace_all(&body, |caps: &Captures<'_>| {
        if caps.name("ty").is_none() {
            for spec in split_specifiers(&caps["list"]) {
                let (local, public) = split_alias(spec);
                exported.push((public.to_string(), local.to_string()));
            }
        }
        String::new()
    });

    let body = export_default_re().replace_all(&body, "${indent}exports.default = ");

    let body = export_decl_re().replace_all(&body, |caps: &Captures<'_>| {
        let name = &caps["name"];
        exported.push((name.to_string(), name.to_string()));
        format!("{}{} {}", &caps["indent"], &caps["decl"], name)
    });

    let mut out = body.into_owned();
    if !out.ends_with('\n') {
        out.push('\n');
    }
    for (public, local) in exported {
        out.push_str(&format!("exports.{} = {};\n", public, local));
    }
    out
}

fn split_specifiers(list: &str) -> impl Iterator<Item = &str> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.starts_with("type "))
}

/// Binding name after `* as`
fn namespace_name(rest: &str) -> &str {
    let rest = rest.trim();
    rest.strip_prefix("as").unwrap_or(rest).trim()
}

/// `a as b` -> (`a`, `b`); `a` -> (`a`, `a`)
fn split_alias(spec: &str) -> (&str, &str) {
    match spec.split_once(" as ") {
        Some((local, public)) => (local.trim(), public.trim()),
        None => (spec, spec),
    }
}

fn import_bindings(clause: &str, target: &str) -> String {
    let clause = clause.trim();
    let (head, named) = match (clause.find('{'), clause.rfind('}')) {
        (Some(open), Some(close)) if close > open => (&clause[..open], Some(&clause[open + 1..close])),
        _ => (clause, None),
    };

    let mut statements = Vec::new();

    for part in head.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.strip_prefix('*') {
            Some(rest) => {
                let ns = namespace_name(rest);
                statements.push(format!("const {} = {};", ns, target));
            }
            None => statements.push(format!("const {} = {}.default;", part, target)),
        }
    }

    if let Some(named) = named {
        let bindings: Vec<String> = split_specifiers(named)
            .map(|spec| match split_alias(spec) {
                (local, public) if local == public => local.to_string(),
                (imported, local) => format!("{}: {}", imported, local),
            })
            .collect();
        if !bindings.is_empty() {
            statements.push(format!("const {{ {} }} = {};", bindings.join(", "), target));
        }
    }

    if statements.is_empty() {
        statements.push(format!("{};", target));
    }

    statements.join(" ")
}

fn reexport_bindings(clause: &str, target: &str) -> String {
    let clause = clause.trim();

    if let Some(rest) = clause.strip_prefix('*') {
        let ns = namespace_name(rest);
        if ns.is_empty() {
            return format!(
                "(function (m) {{ for (var k in m) if (k !== \"default\") exports[k] = m[k]; }})({});",
                target
            );
        }
        return format!("exports.{} = {};", ns, target);
    }

    let inner = clause.trim_start_matches('{').trim_end_matches('}');
    let assignments: Vec<String> = split_specifiers(inner)
        .map(|spec| {
            let (imported, public) = split_alias(spec);
            format!("exports.{} = m.{};", public, imported)
        })
        .collect();

    format!("(function (m) {{ {} }})({});", assignments.join(" "), target)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(s, id)| (s.to_string(), id.to_string()))
            .collect()
    }

    #[test]
    fn scans_static_imports_in_order() {
        let source = "import { a } from './a';\nimport './side-effect';\nexport * from \"./c\";\n";
        let specs: Vec<_> = scan_imports(source)
            .into_iter()
            .map(|r| r.specifier)
            .collect();
        assert_eq!(specs, vec!["./a", "./side-effect", "./c"]);
    }

    #[test]
    fn scans_multiline_named_import() {
        let source = "import {\n  one,\n  two,\n} from '$lib/utils';\n";
        let refs = scan_imports(source);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].specifier, "$lib/utils");
    }

    #[test]
    fn skips_type_only_imports() {
        let source = "import type { Tag } from './types';\nexport type { Tag } from './types';\n";
        assert!(scan_imports(source).is_empty());
    }

    #[test]
    fn flags_dynamic_imports() {
        let refs = scan_imports("button.onclick = () => import('./lazy');\n");
        assert_eq!(
            refs,
            vec![ImportRef {
                specifier: "./lazy".to_string(),
                dynamic: true
            }]
        );
    }

    #[test]
    fn rewrites_import_forms() {
        let map = resolved(&[("./a", "src/a.ts")]);
        let out = rewrite_module(
            "import A, { b, c as d } from './a';\nimport * as ns from './a';\nimport './a';\n",
            &map,
        );
        assert!(out.contains("const A = __import(\"src/a.ts\").default;"));
        assert!(out.contains("const { b, c: d } = __import(\"src/a.ts\");"));
        assert!(out.contains("const ns = __import(\"src/a.ts\");"));
        assert!(out.contains("\n__import(\"src/a.ts\");"));
    }

    #[test]
    fn rewrites_local_exports() {
        let out = rewrite_module(
            "export const x = 1;\nexport function f() {}\nconst y = 2;\nexport { y as z };\nexport default f;\n",
            &HashMap::new(),
        );
        assert!(out.contains("const x = 1;"));
        assert!(out.contains("function f() {}"));
        assert!(out.contains("exports.default = f;"));
        assert!(out.contains("exports.x = x;"));
        assert!(out.contains("exports.f = f;"));
        assert!(out.contains("exports.z = y;"));
        assert!(!out.contains("export "));
    }

    #[test]
    fn rewrites_reexports() {
        let map = resolved(&[("./c", "src/c.ts")]);
        let out = rewrite_module("export { a, b as c } from './c';\nexport * as all from './c';\n", &map);
        assert!(out.contains("exports.a = m.a; exports.c = m.b;"));
        assert!(out.contains("exports.all = __import(\"src/c.ts\");"));
    }

    #[test]
    fn inlined_dynamic_import_becomes_resolved_promise() {
        let map = resolved(&[("./lazy", "src/lazy.ts")]);
        let out = rewrite_module("const m = import('./lazy');\n", &map);
        assert!(out.contains("Promise.resolve(__import(\"src/lazy.ts\"))"));
    }

    #[test]
    fn js_string_escapes_quotes() {
        assert_eq!(js_string("a\"b"), "\"a\\\"b\"");
    }
}
