use indexmap::{IndexMap, IndexSet};
use swc_core::common::DUMMY_SP;
use swc_core::ecma::ast::*;

/// Canonical identifier reference. The resolver pass has already collapsed
/// aliasing, so two ids compare equal exactly when they name the same binding.
pub type Ref = Id;

/// Properties known to live on a tracked object literal, plus the require()
/// paths spread into it.
#[derive(Clone, Debug, Default)]
pub struct ObjInfo {
  pub props: IndexSet<String>,
  pub spreads: Vec<String>,
}

/// Body of a tracked function or arrow, kept for call-mode analysis and for
/// `module.exports = fn()` returns.
#[derive(Clone, Debug)]
pub struct FnInfo {
  pub body: Vec<Stmt>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Cond {
  True,
  False,
  Unknown,
}

impl Cond {
  fn from_bool(value: bool) -> Self {
    if value {
      Cond::True
    } else {
      Cond::False
    }
  }

  fn negate(self) -> Self {
    match self {
      Cond::True => Cond::False,
      Cond::False => Cond::True,
      Cond::Unknown => Cond::Unknown,
    }
  }
}

/// Two-pass scanner over the top-level statements of a CommonJS file. The
/// first pass records what every interesting binding holds (a require()
/// result, the exports object, an object literal, a function body, the
/// NODE_ENV string); the second matches the export idioms against those
/// tables.
pub struct ExportsScanner {
  node_env: String,
  call_mode: bool,
  parts: Vec<Stmt>,

  pub exports: IndexSet<String>,
  pub reexports: IndexSet<String>,

  var_require: IndexMap<Ref, String>,
  var_exports: IndexSet<Ref>,
  var_mod_exports: IndexSet<Ref>,
  var_object: IndexMap<Ref, ObjInfo>,
  var_func: IndexMap<Ref, FnInfo>,
  var_class: IndexMap<Ref, Vec<String>>,
  node_env_aliases: IndexSet<Ref>,

  // Latched by `module.exports = ...`; `exports.foo = ...` is void afterwards
  // while `module.exports.foo = ...` still counts.
  module_exports_overridden: bool,
}

impl ExportsScanner {
  pub fn new(node_env: &str, call_mode: bool, parts: Vec<Stmt>) -> Self {
    ExportsScanner {
      node_env: node_env.to_owned(),
      call_mode,
      parts,
      exports: IndexSet::new(),
      reexports: IndexSet::new(),
      var_require: IndexMap::new(),
      var_exports: IndexSet::new(),
      var_mod_exports: IndexSet::new(),
      var_object: IndexMap::new(),
      var_func: IndexMap::new(),
      var_class: IndexMap::new(),
      node_env_aliases: IndexSet::new(),
      module_exports_overridden: false,
    }
  }

  pub fn analyze(&mut self) {
    let parts = self.parts.clone();
    self.collect_decls(&parts);
    self.walk_stmts(&parts);
  }

  /// Emits both sets sorted ascending by code point, deduplicated.
  pub fn into_exports(self) -> (Vec<String>, Vec<String>) {
    let mut exports: Vec<String> = self.exports.into_iter().collect();
    let mut reexports: Vec<String> = self.reexports.into_iter().collect();
    exports.sort_unstable();
    reexports.sort_unstable();
    (exports, reexports)
  }

  fn add_export(&mut self, name: String) {
    if !name.is_empty() {
      self.exports.insert(name);
    }
  }

  fn add_reexport(&mut self, path: String) {
    if !path.is_empty() {
      self.reexports.insert(path);
    }
  }

  // --- pass one: declaration collection ---

  fn collect_decls(&mut self, stmts: &[Stmt]) {
    for stmt in stmts {
      match stmt {
        Stmt::Decl(Decl::Var(var)) => {
          for decl in &var.decls {
            self.collect_decl(decl);
          }
        }
        // function declarations hoist, so they are collected up front too
        Stmt::Decl(Decl::Fn(FnDecl { ident, function, .. })) => {
          if let Some(body) = &function.body {
            self.var_func.insert(ident.to_id(), FnInfo { body: body.stmts.clone() });
          }
        }
        Stmt::Decl(Decl::Class(ClassDecl { ident, class, .. })) => {
          self.var_class.insert(ident.to_id(), class_static_names(class));
        }
        Stmt::Block(block) => self.collect_decls(&block.stmts),
        Stmt::If(if_stmt) => {
          self.collect_decls(std::slice::from_ref(if_stmt.cons.as_ref()));
          if let Some(alt) = &if_stmt.alt {
            self.collect_decls(std::slice::from_ref(alt.as_ref()));
          }
        }
        Stmt::Expr(expr_stmt) => self.collect_from_expr(&expr_stmt.expr),
        _ => {}
      }
    }
  }

  // Wrappers hide declarations from the top level; walk into every IIFE
  // spelling: (fn)(), (fn).call(this), !fn(), ~fn(), a && fn(), (0, fn()).
  fn collect_from_expr(&mut self, expr: &Expr) {
    match unwrap_paren(expr) {
      Expr::Call(call) => self.collect_from_call(call),
      Expr::Bin(bin) => {
        self.collect_from_expr(&bin.left);
        self.collect_from_expr(&bin.right);
      }
      Expr::Unary(unary) => self.collect_from_expr(&unary.arg),
      Expr::Seq(seq) => {
        for expr in &seq.exprs {
          self.collect_from_expr(expr);
        }
      }
      _ => {}
    }
  }

  fn collect_from_call(&mut self, call: &CallExpr) {
    if let Some(body) = iife_body(call) {
      self.collect_decls(&body);
    }
    if let Some(callee) = with_expr_callee(call) {
      self.collect_from_expr(callee);
    }
    for arg in &call.args {
      self.collect_from_expr(&arg.expr);
    }
  }

  fn collect_decl(&mut self, decl: &VarDeclarator) {
    let init = match &decl.init {
      Some(init) => unwrap_paren(init),
      None => return,
    };
    match &decl.name {
      Pat::Ident(BindingIdent { id, .. }) => self.classify_binding(id.to_id(), init),
      // const { NODE_ENV } = process.env
      // const { NODE_ENV: mode } = process.env
      Pat::Object(obj_pat) => {
        if !is_process_env(init) {
          return;
        }
        for prop in &obj_pat.props {
          match prop {
            ObjectPatProp::Assign(AssignPatProp { key, .. }) => {
              if key.sym.as_ref() == "NODE_ENV" {
                self.node_env_aliases.insert(key.to_id());
              }
            }
            ObjectPatProp::KeyValue(KeyValuePatProp { key, value }) => {
              if stringify_prop_name(key).as_deref() == Some("NODE_ENV") {
                if let Pat::Ident(BindingIdent { id, .. }) = value.as_ref() {
                  self.node_env_aliases.insert(id.to_id());
                }
              }
            }
            _ => {}
          }
        }
      }
      _ => {}
    }
  }

  fn classify_binding(&mut self, bind: Ref, init: &Expr) {
    match init {
      // var mod = require("mod")
      Expr::Call(call) => {
        if let Some(path) = require_call_path(call) {
          self.var_require.insert(bind, path);
        }
      }
      // var e = exports
      Expr::Ident(id) if id.sym.as_ref() == "exports" => {
        self.var_exports.insert(bind);
      }
      // var m = module.exports
      Expr::Member(_) if is_module_exports(init) => {
        self.var_mod_exports.insert(bind);
      }
      // var env = process.env.NODE_ENV
      Expr::Member(_) if is_process_env_node_env(init) => {
        self.node_env_aliases.insert(bind);
      }
      // var x = module.exports = {...}
      Expr::Assign(assign) if assign.op == AssignOp::Assign => {
        let target = match assign_target_expr(assign) {
          Some(target) => unwrap_paren(target),
          None => return,
        };
        if is_module_exports(target) {
          self.var_mod_exports.insert(bind.clone());
          if let Expr::Object(obj) = unwrap_paren(&assign.right) {
            let mut info = ObjInfo::default();
            self.harvest_object_props(obj, &mut info);
            self.var_object.insert(bind, info);
          }
        }
      }
      // var o = {...}
      Expr::Object(obj) => {
        let mut info = ObjInfo::default();
        self.harvest_object_props(obj, &mut info);
        self.var_object.insert(bind, info);
      }
      // var f = function () {...}
      Expr::Fn(FnExpr { function, .. }) => {
        if let Some(body) = &function.body {
          self.var_func.insert(bind, FnInfo { body: body.stmts.clone() });
        }
      }
      // var f = () => {...}
      Expr::Arrow(arrow) => {
        self.var_func.insert(bind, FnInfo { body: arrow_body_stmts(arrow) });
      }
      // var C = class {...}
      Expr::Class(ClassExpr { class, .. }) => {
        self.var_class.insert(bind, class_static_names(class));
      }
      _ => {}
    }
  }

  fn harvest_object_props(&self, obj: &ObjectLit, info: &mut ObjInfo) {
    for prop in &obj.props {
      match prop {
        PropOrSpread::Spread(SpreadElement { expr, .. }) => {
          let expr = unwrap_paren(expr);
          // { ...require("mod") }
          if let Some(path) = require_expr_path(expr) {
            info.spreads.push(path);
          } else if let Expr::Ident(id) = expr {
            // { ...other } where other is a tracked object
            if let Some(other) = self.var_object.get(&id.to_id()) {
              info.props.extend(other.props.iter().cloned());
              info.spreads.extend(other.spreads.iter().cloned());
            }
          }
        }
        PropOrSpread::Prop(prop) => {
          if let Some(name) = prop_name_of(prop) {
            info.props.insert(name);
          }
        }
      }
    }
  }

  // --- pass two: export walking ---

  fn walk_stmts(&mut self, stmts: &[Stmt]) {
    for stmt in stmts {
      self.walk_stmt(stmt);
    }
  }

  fn walk_stmt(&mut self, stmt: &Stmt) {
    match stmt {
      Stmt::Expr(expr_stmt) => self.walk_expr(&expr_stmt.expr),
      // initializers can carry chained assignments: var x = exports.foo = 1
      Stmt::Decl(Decl::Var(var)) => {
        for decl in &var.decls {
          if let Some(init) = &decl.init {
            self.walk_expr(init);
          }
        }
      }
      Stmt::Block(block) => self.walk_stmts(&block.stmts),
      Stmt::If(if_stmt) => self.walk_if_stmt(if_stmt),
      _ => {}
    }
  }

  fn walk_if_stmt(&mut self, if_stmt: &IfStmt) {
    if !self.node_env.is_empty() {
      match self.eval_condition(&if_stmt.test) {
        Cond::True => {
          self.walk_stmt(&if_stmt.cons);
          return;
        }
        Cond::False => {
          if let Some(alt) = &if_stmt.alt {
            self.walk_stmt(alt);
          }
          return;
        }
        Cond::Unknown => {}
      }
    }
    self.walk_stmt(&if_stmt.cons);
    if let Some(alt) = &if_stmt.alt {
      self.walk_stmt(alt);
    }
  }

  fn walk_expr(&mut self, expr: &Expr) {
    match unwrap_paren(expr) {
      Expr::Assign(assign) => self.walk_assign(assign),
      Expr::Bin(bin) => self.walk_bin(bin),
      Expr::Call(call) => self.walk_call(call),
      // !function () {...}(), ~function () {...}(), void fn()
      Expr::Unary(unary) => self.walk_expr(&unary.arg),
      Expr::Seq(seq) => {
        for expr in &seq.exprs {
          self.walk_expr(expr);
        }
      }
      _ => {}
    }
  }

  fn walk_assign(&mut self, assign: &AssignExpr) {
    if assign.op != AssignOp::Assign {
      return;
    }
    if let Some(target) = assign_target_expr(assign) {
      self.match_export_target(unwrap_paren(target), &assign.right);
    }
    // chained assignments: exports.a = exports.b = 1
    self.walk_expr(&assign.right);
  }

  fn match_export_target(&mut self, left: &Expr, right: &Expr) {
    // module.exports = <value>
    if is_module_exports(left) {
      self.reassign_module_exports(right);
      return;
    }
    if let Expr::Member(member) = left {
      let obj = unwrap_paren(&member.obj);
      let prop = match member_prop_name(&member.prop) {
        Some(prop) => prop,
        None => return,
      };
      // module.exports.foo = <value>, counts even after a reassignment
      if is_module_exports(obj) {
        self.add_export(prop);
        return;
      }
      // exports.foo = <value>, void once module.exports was reassigned
      if is_ident(obj, "exports") {
        if !self.module_exports_overridden {
          self.add_export(prop);
        }
        return;
      }
      if let Expr::Ident(id) = obj {
        let bind = id.to_id();
        // var e = exports; e.foo = ...
        // var m = module.exports; m.foo = ...
        if self.var_exports.contains(&bind) || self.var_mod_exports.contains(&bind) {
          self.add_export(prop);
          return;
        }
        // var o = {}; o.foo = ... is only an export if o reaches
        // module.exports later, so record it on the object.
        if let Some(info) = self.var_object.get_mut(&bind) {
          info.props.insert(prop);
          return;
        }
        // var lib = require("lib"); lib.foo = ...
        if self.var_require.contains_key(&bind) {
          self.add_export(prop);
        }
      }
    }
  }

  /// `module.exports = <value>` replaces the whole exports object: everything
  /// named before this point is void, and the replacement decides what the
  /// module offers from here on.
  fn reassign_module_exports(&mut self, value: &Expr) {
    self.module_exports_overridden = true;
    self.exports.clear();
    self.reexports.clear();

    match unwrap_paren(value) {
      // module.exports = { ... }
      Expr::Object(obj) => self.use_object_as_exports(obj),
      Expr::Call(call) => {
        // module.exports = require("lib")
        if let Some(path) = require_call_path(call) {
          self.add_reexport(path);
          return;
        }
        // module.exports = require("factory")(), recorded with trailing
        // parens so the consumer knows to call through
        if let Some(path) = require_call_through_path(call) {
          self.add_reexport(format!("{}()", path));
          return;
        }
        // module.exports = create()
        if let Some(Expr::Ident(id)) = with_expr_callee(call) {
          if self.var_func.contains_key(&id.to_id()) {
            let body = self.var_func[&id.to_id()].body.clone();
            self.analyze_fn_body(&body);
            return;
          }
        }
        self.walk_call(call);
      }
      Expr::Ident(id) => {
        let bind = id.to_id();
        // module.exports = lib where lib = require("lib")
        if let Some(path) = self.var_require.get(&bind).cloned() {
          self.add_reexport(path);
          if let Some(info) = self.var_object.get(&bind).cloned() {
            for name in info.props {
              self.add_export(name);
            }
          }
          self.harvest_assigned_props(&bind);
          return;
        }
        // module.exports = obj
        if let Some(info) = self.var_object.get(&bind).cloned() {
          for name in info.props {
            self.add_export(name);
          }
          for path in info.spreads {
            self.add_reexport(path);
          }
          return;
        }
        // module.exports = fn
        if self.var_func.contains_key(&bind) {
          if self.call_mode {
            let body = self.var_func[&bind].body.clone();
            self.analyze_fn_body(&body);
          } else {
            // function F() {}; F.helper = ...; module.exports = F
            self.harvest_assigned_props(&bind);
          }
          return;
        }
        // module.exports = SomeClass
        if let Some(names) = self.var_class.get(&bind).cloned() {
          for name in names {
            self.add_export(name);
          }
        }
      }
      Expr::Fn(FnExpr { function, .. }) => {
        if self.call_mode {
          if let Some(body) = &function.body {
            let stmts = body.stmts.clone();
            self.analyze_fn_body(&stmts);
          }
        }
      }
      Expr::Arrow(arrow) => {
        if self.call_mode {
          let stmts = arrow_body_stmts(arrow);
          self.analyze_fn_body(&stmts);
        }
      }
      // module.exports = class { static create() {} }
      Expr::Class(ClassExpr { class, .. }) => {
        for name in class_static_names(class) {
          self.add_export(name);
        }
      }
      _ => {}
    }
  }

  // Scans the top level for `target.foo = ...` once a require()'d or
  // function binding is assigned to module.exports. Triggered only on that
  // branch to keep the common case a single pass.
  fn harvest_assigned_props(&mut self, bind: &Ref) {
    let mut found = Vec::new();
    for stmt in &self.parts {
      if let Stmt::Expr(expr_stmt) = stmt {
        if let Expr::Assign(assign) = unwrap_paren(&expr_stmt.expr) {
          if assign.op == AssignOp::Assign {
            if let Some(Expr::Member(member)) = assign_target_expr(assign).map(unwrap_paren) {
              if let Expr::Ident(id) = unwrap_paren(&member.obj) {
                if id.to_id() == *bind {
                  if let Some(name) = member_prop_name(&member.prop) {
                    found.push(name);
                  }
                }
              }
            }
          }
        }
      }
    }
    for name in found {
      self.add_export(name);
    }
  }

  fn use_object_as_exports(&mut self, obj: &ObjectLit) {
    let mut info = ObjInfo::default();
    self.harvest_object_props(obj, &mut info);
    for name in info.props {
      self.add_export(name);
    }
    for path in info.spreads {
      self.add_reexport(path);
    }
  }

  fn walk_bin(&mut self, bin: &BinExpr) {
    match bin.op {
      BinaryOp::LogicalAnd => {
        // 0 && (module.exports = {...}) advertises names for a body that was
        // eliminated; it never replaces the exports object.
        if is_falsy_literal(&bin.left) {
          self.walk_annotation(&bin.right);
          return;
        }
        // "production" !== process.env.NODE_ENV && (function () {...})()
        if !self.node_env.is_empty() && self.eval_condition(&bin.left) == Cond::False {
          return;
        }
        self.walk_expr(&bin.right);
      }
      // exports.foo || (exports.foo = {})
      BinaryOp::LogicalOr => {
        self.walk_expr(&bin.left);
        self.walk_expr(&bin.right);
      }
      _ => {}
    }
  }

  fn walk_annotation(&mut self, expr: &Expr) {
    if let Expr::Assign(assign) = unwrap_paren(expr) {
      if assign.op != AssignOp::Assign {
        return;
      }
      if let Some(target) = assign_target_expr(assign) {
        if is_module_exports(unwrap_paren(target)) {
          if let Expr::Object(obj) = unwrap_paren(&assign.right) {
            self.use_object_as_exports(obj);
          }
        }
      }
    }
  }

  fn walk_call(&mut self, call: &CallExpr) {
    // Object.defineProperty(exports, "name", {...})
    // Object.defineProperty(module, "exports", {...})
    if is_object_static_call(call, "defineProperty") && call.args.len() >= 2 {
      self.handle_define_property(call);
      return;
    }
    if is_object_static_call(call, "assign") && call.args.len() >= 2 {
      let target = unwrap_seq(&call.args[0].expr);
      // Object.assign(module, { exports: {...} })
      if is_ident(target, "module") {
        self.handle_assign_to_module(&call.args[1..]);
        return;
      }
      // Object.assign(module.exports, {...}, require("a"))
      if self.is_exports_target(target) {
        self.handle_assign_to_exports(&call.args[1..]);
        return;
      }
    }
    // __exportStar(require("..."), exports), tslib.__exportStar(..., exports),
    // (0, tslib.__exportStar)(..., exports)
    if is_export_star_callee(call) && call.args.len() >= 2 && is_ident(unwrap_seq(&call.args[1].expr), "exports") {
      self.handle_export_helper_arg(&call.args[0].expr);
      return;
    }
    // __export({...}), __export(require("..."))
    if is_export_callee(call) && !call.args.is_empty() {
      self.handle_export_helper_arg(&call.args[0].expr);
      return;
    }
    // (function () {...})(), (() => {...})(), (function () {...}).call(this)
    if let Some(body) = iife_body(call) {
      self.walk_stmts(&body);
      return;
    }
    if let Some(callee) = with_expr_callee(call) {
      self.walk_expr(callee);
    }
    for arg in &call.args {
      self.walk_expr(&arg.expr);
    }
  }

  // exports, module.exports, or a tracked alias of either
  fn is_exports_target(&self, expr: &Expr) -> bool {
    match expr {
      Expr::Ident(id) => {
        id.sym.as_ref() == "exports" || self.var_exports.contains(&id.to_id()) || self.var_mod_exports.contains(&id.to_id())
      }
      Expr::Member(_) => is_module_exports(expr),
      _ => false,
    }
  }

  fn handle_define_property(&mut self, call: &CallExpr) {
    let target = unwrap_seq(&call.args[0].expr);
    let name = expr_to_string(&call.args[1].expr);

    // Object.defineProperty(module, "exports", { value: ... }) replaces the
    // exports object outright.
    if is_ident(target, "module") {
      if call.args.len() >= 3 && name.as_deref() == Some("exports") {
        if let Expr::Object(desc) = unwrap_paren(&call.args[2].expr) {
          if let Some(value) = descriptor_value(desc) {
            self.reassign_module_exports(value);
          }
        }
      }
      return;
    }

    if !self.is_exports_target(target) {
      return;
    }
    // A descriptor literal that defines neither a value nor a getter exposes
    // nothing readable. Any other descriptor shape is taken at its word.
    if call.args.len() >= 3 {
      if let Expr::Object(desc) = unwrap_paren(&call.args[2].expr) {
        if !descriptor_defines_value_or_getter(desc) {
          return;
        }
      }
    }
    if let Some(name) = name {
      self.add_export(name);
    }
  }

  fn handle_assign_to_exports(&mut self, sources: &[ExprOrSpread]) {
    for source in sources {
      match unwrap_paren(&source.expr) {
        Expr::Object(obj) => self.use_object_as_exports(obj),
        Expr::Call(call) => {
          if let Some(path) = require_call_path(call) {
            self.add_reexport(path);
          }
        }
        Expr::Ident(id) => {
          if let Some(path) = self.var_require.get(&id.to_id()).cloned() {
            self.add_reexport(path);
          }
        }
        _ => {}
      }
    }
  }

  fn handle_assign_to_module(&mut self, sources: &[ExprOrSpread]) {
    for source in sources {
      if let Expr::Object(obj) = unwrap_paren(&source.expr) {
        for prop in &obj.props {
          if let PropOrSpread::Prop(prop) = prop {
            if let Prop::KeyValue(KeyValueProp { key, value }) = prop.as_ref() {
              if stringify_prop_name(key).as_deref() == Some("exports") {
                self.reassign_module_exports(value);
                return;
              }
            }
          }
        }
      }
    }
  }

  fn handle_export_helper_arg(&mut self, arg: &Expr) {
    match unwrap_paren(arg) {
      Expr::Object(obj) => self.use_object_as_exports(obj),
      other => {
        if let Some(path) = require_expr_path(other) {
          self.add_reexport(path);
        }
      }
    }
  }

  // --- NODE_ENV condition evaluation ---

  fn eval_condition(&self, expr: &Expr) -> Cond {
    match unwrap_paren(expr) {
      Expr::Lit(Lit::Bool(Bool { value, .. })) => Cond::from_bool(*value),
      Expr::Unary(UnaryExpr {
        op: UnaryOp::Bang, arg, ..
      }) => self.eval_condition(arg).negate(),
      Expr::Bin(bin) => self.eval_bin_condition(bin),
      _ => Cond::Unknown,
    }
  }

  fn eval_bin_condition(&self, bin: &BinExpr) -> Cond {
    match bin.op {
      BinaryOp::EqEq | BinaryOp::EqEqEq => self.eval_equality(&bin.left, &bin.right, true),
      BinaryOp::NotEq | BinaryOp::NotEqEq => self.eval_equality(&bin.left, &bin.right, false),
      BinaryOp::LogicalAnd => {
        let left = self.eval_condition(&bin.left);
        if left == Cond::False {
          return Cond::False;
        }
        let right = self.eval_condition(&bin.right);
        if left == Cond::True {
          return right;
        }
        Cond::Unknown
      }
      BinaryOp::LogicalOr => {
        let left = self.eval_condition(&bin.left);
        if left == Cond::True {
          return Cond::True;
        }
        let right = self.eval_condition(&bin.right);
        if left == Cond::False {
          return right;
        }
        Cond::Unknown
      }
      _ => Cond::Unknown,
    }
  }

  // The comparison is decided only when one side is statically a NODE_ENV
  // read and the other a string literal, or when it is a typeof guard on
  // module/exports. Everything else stays Unknown and both branches get
  // walked.
  fn eval_equality(&self, left: &Expr, right: &Expr, is_eq: bool) -> Cond {
    let first = self.eval_equality_oriented(left, right, is_eq);
    if first != Cond::Unknown {
      return first;
    }
    self.eval_equality_oriented(right, left, is_eq)
  }

  fn eval_equality_oriented(&self, left: &Expr, right: &Expr, is_eq: bool) -> Cond {
    let left = unwrap_paren(left);
    let right = unwrap_paren(right);
    if self.is_node_env_read(left) {
      if let Expr::Lit(Lit::Str(Str { value, .. })) = right {
        let matches = self.node_env == value.as_ref();
        return Cond::from_bool(matches == is_eq);
      }
      return Cond::Unknown;
    }
    // typeof module and typeof exports are never "undefined" in CommonJS
    if is_typeof_of(left, "module") || is_typeof_of(left, "exports") {
      if let Expr::Lit(Lit::Str(Str { value, .. })) = right {
        if value.as_ref() == "undefined" {
          return Cond::from_bool(!is_eq);
        }
      }
    }
    Cond::Unknown
  }

  fn is_node_env_read(&self, expr: &Expr) -> bool {
    if is_process_env_node_env(expr) {
      return true;
    }
    matches!(expr, Expr::Ident(id) if self.node_env_aliases.contains(&id.to_id()))
  }

  // --- call-mode function body analysis ---

  // The consumer intends to call the exported function immediately, so the
  // names it returns are the exports surface.
  fn analyze_fn_body(&mut self, stmts: &[Stmt]) {
    for stmt in stmts {
      self.analyze_fn_stmt(stmt);
    }
  }

  fn analyze_fn_stmt(&mut self, stmt: &Stmt) {
    match stmt {
      Stmt::Return(ReturnStmt { arg: Some(arg), .. }) => self.analyze_return_value(arg),
      Stmt::Decl(Decl::Var(var)) => {
        for decl in &var.decls {
          self.collect_decl(decl);
        }
      }
      Stmt::Expr(expr_stmt) => {
        // mod.foo = ... augments a tracked object before it is returned
        if let Expr::Assign(assign) = unwrap_paren(&expr_stmt.expr) {
          if assign.op == AssignOp::Assign {
            if let Some(Expr::Member(member)) = assign_target_expr(assign).map(unwrap_paren) {
              if let Expr::Ident(id) = unwrap_paren(&member.obj) {
                if let Some(name) = member_prop_name(&member.prop) {
                  if let Some(info) = self.var_object.get_mut(&id.to_id()) {
                    info.props.insert(name);
                  }
                }
              }
            }
          }
        }
      }
      Stmt::If(if_stmt) => {
        if !self.node_env.is_empty() {
          match self.eval_condition(&if_stmt.test) {
            Cond::True => {
              self.analyze_fn_stmt(&if_stmt.cons);
              return;
            }
            Cond::False => {
              if let Some(alt) = &if_stmt.alt {
                self.analyze_fn_stmt(alt);
              }
              return;
            }
            Cond::Unknown => {}
          }
        }
        self.analyze_fn_stmt(&if_stmt.cons);
        if let Some(alt) = &if_stmt.alt {
          self.analyze_fn_stmt(alt);
        }
      }
      Stmt::Block(block) => self.analyze_fn_body(&block.stmts),
      _ => {}
    }
  }

  fn analyze_return_value(&mut self, expr: &Expr) {
    match unwrap_paren(expr) {
      // return { foo, bar: 1 }
      Expr::Object(obj) => {
        for prop in &obj.props {
          if let PropOrSpread::Prop(prop) = prop {
            if let Some(name) = prop_name_of(prop) {
              self.add_export(name);
            }
          }
        }
      }
      // return mod
      Expr::Ident(id) => {
        if let Some(info) = self.var_object.get(&id.to_id()).cloned() {
          for name in info.props {
            self.add_export(name);
          }
        }
      }
      _ => {}
    }
  }
}

// --- helpers ---

fn unwrap_paren(expr: &Expr) -> &Expr {
  match expr {
    Expr::Paren(ParenExpr { expr, .. }) => unwrap_paren(expr),
    _ => expr,
  }
}

// (0, expr) -> expr
fn unwrap_seq(expr: &Expr) -> &Expr {
  match unwrap_paren(expr) {
    Expr::Seq(SeqExpr { exprs, .. }) => match exprs.last() {
      Some(last) => unwrap_seq(last),
      None => expr,
    },
    other => other,
  }
}

fn with_expr_callee(call: &CallExpr) -> Option<&Expr> {
  match &call.callee {
    Callee::Expr(callee) => Some(unwrap_paren(callee)),
    _ => None,
  }
}

fn is_ident(expr: &Expr, name: &str) -> bool {
  matches!(expr, Expr::Ident(id) if id.sym.as_ref() == name)
}

fn non_empty(name: &str) -> Option<String> {
  if name.is_empty() {
    None
  } else {
    Some(name.to_owned())
  }
}

// `.b`, `["b"]`, or `[b]` where the identifier stands for its lexical name
fn member_prop_name(prop: &MemberProp) -> Option<String> {
  match prop {
    MemberProp::Ident(id) => non_empty(id.sym.as_ref()),
    MemberProp::Computed(ComputedPropName { expr, .. }) => match unwrap_paren(expr) {
      Expr::Lit(Lit::Str(Str { value, .. })) => non_empty(value.as_ref()),
      Expr::Ident(id) => non_empty(id.sym.as_ref()),
      _ => None,
    },
    _ => None,
  }
}

fn stringify_prop_name(name: &PropName) -> Option<String> {
  match name {
    PropName::Ident(id) => non_empty(id.sym.as_ref()),
    PropName::Str(Str { value, .. }) => non_empty(value.as_ref()),
    PropName::Computed(ComputedPropName { expr, .. }) => match unwrap_paren(expr) {
      Expr::Lit(Lit::Str(Str { value, .. })) => non_empty(value.as_ref()),
      Expr::Ident(id) => non_empty(id.sym.as_ref()),
      _ => None,
    },
    _ => None,
  }
}

fn prop_name_of(prop: &Prop) -> Option<String> {
  match prop {
    Prop::Shorthand(id) => non_empty(id.sym.as_ref()),
    Prop::KeyValue(KeyValueProp { key, .. }) => stringify_prop_name(key),
    Prop::Method(MethodProp { key, .. }) => stringify_prop_name(key),
    Prop::Getter(GetterProp { key, .. }) => stringify_prop_name(key),
    Prop::Setter(SetterProp { key, .. }) => stringify_prop_name(key),
    _ => None,
  }
}

// a.b or a["b"] with `a` spelled `obj_name`
fn is_member_of(expr: &Expr, obj_name: &str, prop_name: &str) -> bool {
  if let Expr::Member(member) = expr {
    if is_ident(unwrap_paren(&member.obj), obj_name) {
      return member_prop_name(&member.prop).as_deref() == Some(prop_name);
    }
  }
  false
}

fn is_module_exports(expr: &Expr) -> bool {
  is_member_of(expr, "module", "exports")
}

fn is_process_env(expr: &Expr) -> bool {
  is_member_of(expr, "process", "env")
}

fn is_process_env_node_env(expr: &Expr) -> bool {
  if let Expr::Member(member) = expr {
    if is_process_env(unwrap_paren(&member.obj)) {
      return member_prop_name(&member.prop).as_deref() == Some("NODE_ENV");
    }
  }
  false
}

// require("path") with a single string-literal argument
fn require_call_path(call: &CallExpr) -> Option<String> {
  let callee = with_expr_callee(call)?;
  if !is_ident(callee, "require") || call.args.len() != 1 {
    return None;
  }
  let arg = &call.args[0];
  if arg.spread.is_some() {
    return None;
  }
  match unwrap_paren(&arg.expr) {
    Expr::Lit(Lit::Str(Str { value, .. })) => non_empty(value.as_ref()),
    _ => None,
  }
}

fn require_expr_path(expr: &Expr) -> Option<String> {
  match unwrap_paren(expr) {
    Expr::Call(call) => require_call_path(call),
    _ => None,
  }
}

// require("path")()
fn require_call_through_path(call: &CallExpr) -> Option<String> {
  match with_expr_callee(call)? {
    Expr::Call(inner) => require_call_path(inner),
    _ => None,
  }
}

// Object.defineProperty(...), Object.assign(...)
fn is_object_static_call(call: &CallExpr, method: &str) -> bool {
  match with_expr_callee(call) {
    Some(callee) => is_member_of(callee, "Object", method),
    None => false,
  }
}

fn is_export_callee(call: &CallExpr) -> bool {
  match with_expr_callee(call) {
    Some(Expr::Ident(id)) => id.sym.as_ref() == "__export",
    _ => false,
  }
}

fn is_export_star_callee(call: &CallExpr) -> bool {
  let callee = match with_expr_callee(call) {
    Some(callee) => unwrap_seq(callee),
    None => return false,
  };
  match callee {
    Expr::Ident(id) => id.sym.as_ref() == "__exportStar",
    Expr::Member(MemberExpr { prop, .. }) => member_prop_name(prop).as_deref() == Some("__exportStar"),
    _ => false,
  }
}

fn arrow_body_stmts(arrow: &ArrowExpr) -> Vec<Stmt> {
  match arrow.body.as_ref() {
    BlockStmtOrExpr::BlockStmt(BlockStmt { stmts, .. }) => stmts.clone(),
    // expression bodies behave like a lone return statement
    BlockStmtOrExpr::Expr(expr) => vec![Stmt::Return(ReturnStmt {
      span: DUMMY_SP,
      arg: Some(expr.clone()),
    })],
  }
}

// (function () {})(), (() => {})(), (function () {}).call(this), .apply(this)
fn iife_body(call: &CallExpr) -> Option<Vec<Stmt>> {
  let callee = with_expr_callee(call)?;
  match callee {
    Expr::Fn(FnExpr { function, .. }) => function.body.as_ref().map(|body| body.stmts.clone()),
    Expr::Arrow(arrow) => Some(arrow_body_stmts(arrow)),
    Expr::Member(MemberExpr { obj, prop, .. }) => {
      let name = member_prop_name(prop)?;
      if name != "call" && name != "apply" {
        return None;
      }
      match unwrap_paren(obj) {
        Expr::Fn(FnExpr { function, .. }) => function.body.as_ref().map(|body| body.stmts.clone()),
        Expr::Arrow(arrow) => Some(arrow_body_stmts(arrow)),
        _ => None,
      }
    }
    _ => None,
  }
}

// typeof module, typeof exports
fn is_typeof_of(expr: &Expr, name: &str) -> bool {
  if let Expr::Unary(UnaryExpr {
    op: UnaryOp::TypeOf, arg, ..
  }) = expr
  {
    return is_ident(unwrap_paren(arg), name);
  }
  false
}

fn is_falsy_literal(expr: &Expr) -> bool {
  match unwrap_paren(expr) {
    Expr::Lit(Lit::Num(Number { value, .. })) => *value == 0.0,
    Expr::Lit(Lit::Bool(Bool { value, .. })) => !value,
    Expr::Lit(Lit::Null(_)) => true,
    Expr::Lit(Lit::Str(Str { value, .. })) => value.is_empty(),
    Expr::Ident(id) => id.sym.as_ref() == "undefined",
    Expr::Unary(UnaryExpr { op: UnaryOp::Void, .. }) => true,
    _ => false,
  }
}

fn assign_target_expr(assign: &AssignExpr) -> Option<&Expr> {
  match &assign.left {
    PatOrExpr::Expr(expr) => Some(expr.as_ref()),
    PatOrExpr::Pat(pat) => match pat.as_ref() {
      Pat::Expr(expr) => Some(expr.as_ref()),
      _ => None,
    },
  }
}

// the string value of a name argument; identifiers stand for their spelling
fn expr_to_string(expr: &Expr) -> Option<String> {
  match unwrap_paren(expr) {
    Expr::Lit(Lit::Str(Str { value, .. })) => non_empty(value.as_ref()),
    Expr::Ident(id) => non_empty(id.sym.as_ref()),
    _ => None,
  }
}

// the `value` entry of a property descriptor literal
fn descriptor_value(desc: &ObjectLit) -> Option<&Expr> {
  for prop in &desc.props {
    if let PropOrSpread::Prop(prop) = prop {
      if let Prop::KeyValue(KeyValueProp { key, value }) = prop.as_ref() {
        if stringify_prop_name(key).as_deref() == Some("value") {
          return Some(value.as_ref());
        }
      }
    }
  }
  None
}

fn descriptor_defines_value_or_getter(desc: &ObjectLit) -> bool {
  desc.props.iter().any(|prop| match prop {
    PropOrSpread::Prop(prop) => {
      let key = match prop.as_ref() {
        Prop::KeyValue(KeyValueProp { key, .. }) => stringify_prop_name(key),
        Prop::Method(MethodProp { key, .. }) => stringify_prop_name(key),
        Prop::Getter(GetterProp { key, .. }) => stringify_prop_name(key),
        _ => None,
      };
      matches!(key.as_deref(), Some("value") | Some("get"))
    }
    _ => false,
  })
}

fn class_static_names(class: &Class) -> Vec<String> {
  class
    .body
    .iter()
    .filter_map(|member| match member {
      ClassMember::Method(method) if method.is_static => stringify_prop_name(&method.key),
      ClassMember::ClassProp(prop) if prop.is_static => stringify_prop_name(&prop.key),
      _ => None,
    })
    .collect()
}
