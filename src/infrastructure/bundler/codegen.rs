//! Chunk code generation
//!
//! Every source module becomes a `function (__import, exports)` keyed by its
//! module id. A chunk hands its module table to `__link`, which instantiates
//! modules lazily, once per page, and forwards unknown ids to the chunks it
//! imports. `__link` is emitted at the top level of every chunk, which is why
//! chunks must be isolated before they share a page.

use super::chunker::SourceModule;
use super::scanner::{js_string, rewrite_module};

pub const LINK_HELPER: &str = r#"function __link(defs, deps) {
  var cache = {};
  var own = Object.prototype.hasOwnProperty;
  var chunk = {
    has: function (id) {
      return own.call(defs, id);
    },
    load: function (id) {
      if (own.call(defs, id)) {
        if (!own.call(cache, id)) {
          cache[id] = {};
          defs[id](chunk.load, cache[id]);
        }
        return cache[id];
      }
      for (var i = 0; i < deps.length; i++) {
        if (deps[i] && deps[i].has && deps[i].has(id)) {
          return deps[i].load(id);
        }
      }
      throw new Error("Module " + id + " is not linked");
    }
  };
  return chunk;
}
"#;

fn module_table(modules: &[&SourceModule]) -> String {
    let mut out = String::from("{\n");
    for module in modules {
        out.push_str(&format!(
            "{}: function (__import, exports) {{\n{}}},\n",
            js_string(&module.id),
            rewrite_module(&module.source, &module.resolved)
        ));
    }
    out.push('}');
    out
}

/// A named `define` module for the module-wrapped pass
///
/// Every chunk's module value is its linker, so any chunk (entry chunks
/// included) can serve its modules to the chunks that import it. An entry
/// chunk runs its entry module before returning; its exports stay reachable
/// through `load`.
pub fn amd_chunk(
    define_name: &str,
    dependencies: &[String],
    modules: &[&SourceModule],
    entry: Option<&str>,
) -> String {
    let dep_names: Vec<String> = dependencies.iter().map(|d| js_string(d)).collect();
    let params: Vec<String> = (0..dependencies.len())
        .map(|i| format!("__dep{}", i))
        .collect();

    let run_entry = match entry {
        Some(id) => format!("__chunk.load({});\n", js_string(id)),
        None => String::new(),
    };

    format!(
        "{helper}define({name}, [{deps}], function ({params}) {{\nvar __chunk = __link({table}, [{params}]);\n{run_entry}return __chunk;\n}});\n",
        helper = LINK_HELPER,
        name = js_string(define_name),
        deps = dep_names.join(", "),
        params = params.join(", "),
        table = module_table(modules),
        run_entry = run_entry,
    )
}

/// A self-contained file for the plain pass
pub fn plain_chunk(modules: &[&SourceModule], entry: &str) -> String {
    format!(
        "{helper}__link({table}, []).load({entry});\n",
        helper = LINK_HELPER,
        table = module_table(modules),
        entry = js_string(entry),
    )
}
