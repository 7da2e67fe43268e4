#[cfg(test)]
mod tests {
  use crate::swc::ParsedSource;

  fn parse_exports(source: &str, node_env: &str, call_mode: bool) -> (Vec<String>, Vec<String>) {
    let parsed = ParsedSource::parse("index.cjs", source).expect("could not parse module");
    parsed.parse_cjs_exports(node_env, call_mode)
  }

  #[test]
  fn named_exports_on_exports_and_module_exports() {
    let source = r#"
      exports.foo = 'bar'
      module.exports.bar = 123
    "#;
    let (exports, reexports) = parse_exports(source, "", false);
    assert_eq!(exports.join(","), "bar,foo");
    assert_eq!(reexports.join(","), "");
  }

  #[test]
  fn bracket_member_exports() {
    let source = r#"
      exports['foo'] = 'bar'
      module['exports']['bar'] = 123
    "#;
    let (exports, _) = parse_exports(source, "", false);
    assert_eq!(exports.join(","), "bar,foo");
  }

  #[test]
  fn chained_and_comma_assignments() {
    let source = r#"
      exports.a = exports.b = exports.c = 1;
      exports.d = 2, exports.e = 3;
      x = exports.f = 4;
    "#;
    let (exports, _) = parse_exports(source, "", false);
    assert_eq!(exports.join(","), "a,b,c,d,e,f");
  }

  #[test]
  fn object_literal_reassignment() {
    let source = r#"
      const a = 1
      module.exports = { a, b: 2, 'c': 3, d() {}, get e() { return 5 } }
    "#;
    let (exports, _) = parse_exports(source, "", false);
    assert_eq!(exports.join(","), "a,b,c,d,e");
  }

  #[test]
  fn reassignment_voids_prior_names() {
    let source = r#"
      exports.foo = 'bar'
      module.exports = { a: 1 }
      exports.dropped = 1
      module.exports.e = 2
    "#;
    let (exports, _) = parse_exports(source, "", false);
    assert_eq!(exports.join(","), "a,e");
  }

  #[test]
  fn post_reassignment_appends() {
    let base = "module.exports = { a: 1, b: 2 }";
    let (exports, _) = parse_exports(base, "", false);
    assert_eq!(exports.join(","), "a,b");

    let (exports, _) = parse_exports(&format!("{};\nexports.d = 1", base), "", false);
    assert_eq!(exports.join(","), "a,b");

    let (exports, _) = parse_exports(&format!("{};\nmodule.exports.d = 1", base), "", false);
    assert_eq!(exports.join(","), "a,b,d");
  }

  #[test]
  fn object_spread_of_requires() {
    let source = r#"
      const a = 1
      module.exports = { a, ...require('x'), ...require('y') }
    "#;
    let (exports, reexports) = parse_exports(source, "", false);
    assert_eq!(exports.join(","), "a");
    assert_eq!(reexports.join(","), "x,y");
  }

  #[test]
  fn require_variable_reexport_with_patched_props() {
    let source = r#"
      var lib = require("lib")
      lib.foo = 'bar'
      module.exports = lib
    "#;
    let (exports, reexports) = parse_exports(source, "", false);
    assert_eq!(exports.join(","), "foo");
    assert_eq!(reexports.join(","), "lib");
  }

  #[test]
  fn require_reexport_forms() {
    let (_, reexports) = parse_exports("module.exports = require('lib')", "", false);
    assert_eq!(reexports.join(","), "lib");

    let (_, reexports) = parse_exports("module.exports = require('factory')()", "", false);
    assert_eq!(reexports.join(","), "factory()");
  }

  #[test]
  fn tracked_object_reassignment() {
    let source = r#"
      var base = { x: 1 }
      var obj = { y: 2, ...base, ...require('dep') }
      obj.z = 3
      module.exports = obj
    "#;
    let (exports, reexports) = parse_exports(source, "", false);
    assert_eq!(exports.join(","), "x,y,z");
    assert_eq!(reexports.join(","), "dep");
  }

  #[test]
  fn alias_variables_of_exports_objects() {
    let source = r#"
      var e = exports
      e.a = 1
      var m = module.exports
      m.b = 2
    "#;
    let (exports, _) = parse_exports(source, "", false);
    assert_eq!(exports.join(","), "a,b");
  }

  #[test]
  fn module_exports_object_alias() {
    let source = r#"
      var shared = module.exports = {}
      shared.c = 3
    "#;
    let (exports, _) = parse_exports(source, "", false);
    assert_eq!(exports.join(","), "c");
  }

  #[test]
  fn function_static_props() {
    let source = r#"
      function Factory() {}
      Factory.create = () => {}
      Factory.VERSION = '1.0'
      module.exports = Factory
    "#;
    let (exports, _) = parse_exports(source, "", false);
    assert_eq!(exports.join(","), "VERSION,create");
  }

  #[test]
  fn called_function_reassignment() {
    let source = r#"
      function make() {
        return { a: 1 }
      }
      module.exports = make()
    "#;
    let (exports, _) = parse_exports(source, "", false);
    assert_eq!(exports.join(","), "a");
  }

  #[test]
  fn call_mode_function_body() {
    let source = r#"
      module.exports = function () {
        const m = { foo: 'bar' }
        m.bar = 1
        return m
      }
    "#;
    let (exports, _) = parse_exports(source, "", true);
    assert_eq!(exports.join(","), "bar,foo");

    let (exports, _) = parse_exports(source, "", false);
    assert_eq!(exports.join(","), "");
  }

  #[test]
  fn define_property_descriptors() {
    let source = r#"
      const c = 'c'
      Object.defineProperty(exports, 'a', { value: true })
      Object.defineProperty(exports, 'b', { get: () => true })
      Object.defineProperty(exports, c, { get() { return true } })
      Object.defineProperty(exports, 'd', { "value": true })
      Object.defineProperty((0, exports), 'e', { "get": () => true })
      Object.defineProperty(exports, 'f', {})
      Object.defineProperty(module.exports, '__esModule', { value: true })
    "#;
    let (exports, _) = parse_exports(source, "", false);
    assert_eq!(exports.join(","), "__esModule,a,b,c,d,e");
  }

  #[test]
  fn define_property_on_module() {
    let source = r#"
      const obj = { bar: 123 }
      Object.defineProperty(exports, 'nope', { value: true })
      Object.defineProperty(module, 'exports', { value: { alas: true, foo: 'bar', ...obj, ...require('a') } })
    "#;
    let (exports, reexports) = parse_exports(source, "", false);
    assert_eq!(exports.join(","), "alas,bar,foo");
    assert_eq!(reexports.join(","), "a");

    let (_, reexports) = parse_exports("Object.defineProperty(module, 'exports', { value: require('lib') })", "", false);
    assert_eq!(reexports.join(","), "lib");
  }

  #[test]
  fn object_assign_to_exports() {
    let source = r#"
      Object.assign(module.exports, { foo: 'bar' }, require('a'));
      Object.assign(exports, { baz: 1 });
    "#;
    let (exports, reexports) = parse_exports(source, "", false);
    assert_eq!(exports.join(","), "baz,foo");
    assert_eq!(reexports.join(","), "a");
  }

  #[test]
  fn object_assign_to_module() {
    let source = r#"
      exports.nope = 1
      Object.assign(module, { exports: { foo: 1 } })
    "#;
    let (exports, _) = parse_exports(source, "", false);
    assert_eq!(exports.join(","), "foo");
  }

  #[test]
  fn export_helper_calls() {
    let source = r#"
      __export({ a: 1 })
      __export(require('x'))
    "#;
    let (exports, reexports) = parse_exports(source, "", false);
    assert_eq!(exports.join(","), "a");
    assert_eq!(reexports.join(","), "x");
  }

  #[test]
  fn export_star_helper_calls() {
    let source = r#"
      __exportStar(require('./y'), exports);
      (0, tslib.__exportStar)(require('./z'), exports);
      require("tslib").__exportStar(require('./w'), exports);
    "#;
    let (exports, reexports) = parse_exports(source, "", false);
    assert_eq!(exports.join(","), "");
    assert_eq!(reexports.join(","), "./w,./y,./z");
  }

  #[test]
  fn iife_forms() {
    let source = r#"
      (function () { exports.a = 1 })();
      (() => { exports.b = 2 })();
      !function () { exports.c = 3 }();
      (function () { exports.d = 4 }).call(this);
      ~function () { exports.e = 5 }();
    "#;
    let (exports, _) = parse_exports(source, "", false);
    assert_eq!(exports.join(","), "a,b,c,d,e");
  }

  #[test]
  fn iife_wrapped_declarations() {
    let source = r#"
      (function () {
        var lib = require("lib")
        module.exports = lib
      })();
    "#;
    let (_, reexports) = parse_exports(source, "", false);
    assert_eq!(reexports.join(","), "lib");
  }

  #[test]
  fn annotation_pattern() {
    let (exports, _) = parse_exports("0 && (module.exports = { foo, bar });", "", false);
    assert_eq!(exports.join(","), "bar,foo");

    // the annotation never voids names registered the ordinary way
    let (exports, _) = parse_exports("0 && (module.exports = { foo });\nexports.baz = 1", "", false);
    assert_eq!(exports.join(","), "baz,foo");
  }

  #[test]
  fn node_env_guarded_iife() {
    let source = r#"
      "production" !== process.env.NODE_ENV && (function () {
        module.exports = { foo: 'bar' }
      })()
    "#;
    let (exports, _) = parse_exports(source, "production", false);
    assert_eq!(exports.join(","), "");

    let (exports, _) = parse_exports(source, "development", false);
    assert_eq!(exports.join(","), "foo");
  }

  #[test]
  fn node_env_if_branches() {
    let source = r#"
      if (process.env.NODE_ENV === 'production') {
        exports.prod = 1
      } else {
        exports.dev = 1
      }
    "#;
    let (exports, _) = parse_exports(source, "production", false);
    assert_eq!(exports.join(","), "prod");

    let (exports, _) = parse_exports(source, "development", false);
    assert_eq!(exports.join(","), "dev");

    // evaluation disabled: both branches contribute
    let (exports, _) = parse_exports(source, "", false);
    assert_eq!(exports.join(","), "dev,prod");
  }

  #[test]
  fn node_env_alias_forms() {
    let source = r#"
      const env = process.env.NODE_ENV
      const { NODE_ENV } = process.env
      const { NODE_ENV: mode } = process.env
      if (env === 'production') exports.a = 1
      if (NODE_ENV !== 'production') exports.b = 1
      if (mode === 'development') exports.c = 1
    "#;
    let (exports, _) = parse_exports(source, "production", false);
    assert_eq!(exports.join(","), "a");

    let (exports, _) = parse_exports(source, "development", false);
    assert_eq!(exports.join(","), "b,c");
  }

  #[test]
  fn typeof_and_unknown_guards() {
    let source = r#"
      if (typeof module !== 'undefined') {
        exports.a = 1
      } else {
        exports.b = 1
      }
    "#;
    let (exports, _) = parse_exports(source, "production", false);
    assert_eq!(exports.join(","), "a");

    // string literal on the left decides through the flipped orientation
    let source = r#"
      if ('undefined' !== typeof exports) {
        exports.c = 1
      } else {
        exports.d = 1
      }
    "#;
    let (exports, _) = parse_exports(source, "production", false);
    assert_eq!(exports.join(","), "c");

    // undecidable conditions keep both branches
    let source = r#"
      if (globalThis.flag) {
        exports.x = 1
      } else {
        exports.y = 1
      }
    "#;
    let (exports, _) = parse_exports(source, "production", false);
    assert_eq!(exports.join(","), "x,y");
  }

  #[test]
  fn class_static_members() {
    let source = r#"
      class Client {
        static create() {}
        static VERSION = '2.0'
        connect() {}
      }
      module.exports = Client
    "#;
    let (exports, _) = parse_exports(source, "", false);
    assert_eq!(exports.join(","), "VERSION,create");

    let (exports, _) = parse_exports("module.exports = class { static of() {} }", "", false);
    assert_eq!(exports.join(","), "of");
  }

  #[test]
  fn top_level_return_parses_as_script() {
    let source = r#"
      exports.ok = 1
      if (!globalThis.window) return
      exports.later = 2
    "#;
    let (exports, _) = parse_exports(source, "", false);
    assert_eq!(exports.join(","), "later,ok");
  }

  #[test]
  fn empty_source_yields_empty_lists() {
    let (exports, reexports) = parse_exports("", "", false);
    assert!(exports.is_empty());
    assert!(reexports.is_empty());
  }

  #[test]
  fn deterministic_and_sorted() {
    let source = r#"
      exports.zeta = 1
      exports.alpha = 2
      module.exports.Mid = 3
    "#;
    let first = parse_exports(source, "", false);
    let second = parse_exports(source, "", false);
    assert_eq!(first, second);
    assert_eq!(first.0.join(","), "Mid,alpha,zeta");
  }

  #[test]
  fn property_order_and_comments_do_not_matter() {
    let (a, _) = parse_exports("module.exports = { b: 2, /* note */ a: 1, c: 3 }", "", false);
    let (b, _) = parse_exports("module.exports = { c: 3, a: 1, b: 2 }", "", false);
    assert_eq!(a, b);
    assert_eq!(a.join(","), "a,b,c");
  }

  #[test]
  fn unparseable_source_is_an_error() {
    assert!(ParsedSource::parse("index.cjs", "const").is_err());
  }
}
