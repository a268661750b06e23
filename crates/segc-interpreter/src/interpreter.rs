//! Main interpreter engine.

use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, warn};
use segc_syntax::ast::*;
use segc_syntax::error::{error, Error, ErrorKind, Result};

use crate::flow::{value_or_unwind, Flow};
use crate::scope::{ScopeId, Scopes};

/// Default limit on nested function calls.
pub const MAX_CALL_DEPTH: usize = 200;

pub struct Interpreter {
    /// Global function definitions, replaced wholesale on redeclaration
    functions: HashMap<String, Rc<Function>>,
    /// Global scope plus every block and call frame currently executing
    scopes: Scopes,
    /// Function calls currently active
    depth: usize,
    max_depth: usize,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_max_depth(MAX_CALL_DEPTH)
    }

    /// Creates an interpreter that fails with [`ErrorKind::RecursionLimit`]
    /// once more than `max_depth` calls are active. Each call uses native
    /// stack, so raise this only on a thread with a stack to match.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            functions: HashMap::new(),
            scopes: Scopes::new(),
            depth: 0,
            max_depth,
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Forget every function and global. The depth limit is kept.
    pub fn reset(&mut self) {
        self.functions.clear();
        self.scopes = Scopes::new();
        self.depth = 0;
    }

    /// Forget globals but keep registered functions.
    pub fn reset_globals(&mut self) {
        self.scopes.clear_globals();
    }

    pub fn function_names(&self) -> Vec<String> {
        let mut v: Vec<String> = self.functions.keys().cloned().collect();
        v.sort();
        v
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Parameter count of a registered function.
    pub fn arity(&self, name: &str) -> Option<usize> {
        self.functions.get(name).map(|f| f.params.len())
    }

    pub fn read_global(&self, name: &str) -> Option<i64> {
        self.scopes.get(ScopeId::GLOBAL, name)
    }

    pub fn set_global(&mut self, name: &str, value: i64) {
        self.scopes.set(ScopeId::GLOBAL, name, value);
    }

    /// All globals, sorted by name.
    pub fn globals(&self) -> Vec<(String, i64)> {
        self.scopes.globals()
    }

    /// Number of live scopes, the global one included. Back to 1 whenever
    /// nothing is executing.
    pub fn live_scopes(&self) -> usize {
        self.scopes.depth()
    }

    /// Runs the top-level items of `program` in source order: a function
    /// declaration registers (or replaces) that function, an assignment is
    /// evaluated against the global scope. A top-level call therefore only
    /// sees functions declared above it.
    ///
    /// Running a second program on the same interpreter is a reload: functions
    /// with the same name are replaced, globals are kept.
    pub fn run(&mut self, program: &Program) -> Result<()> {
        for item in &program.items {
            match item {
                Item::Function(f) => self.register(f),
                Item::Assign { name, value } => {
                    if let Flow::Return(v) = self.assign(ScopeId::GLOBAL, name, value)? {
                        warn!("'ret {}' outside of a function has no effect", v);
                    }
                }
            }
        }
        Ok(())
    }

    fn register(&mut self, f: &Function) {
        if self.functions.contains_key(&f.name) {
            debug!("replacing function '{}'", f.name);
        } else {
            debug!("registering function '{}' ({} params)", f.name, f.params.len());
        }
        self.functions.insert(f.name.clone(), Rc::new(f.clone()));
    }

    /// Tokenize, parse and [`run`](Self::run) a script. Used for the first load
    /// as well as for every reload.
    pub fn load(&mut self, source: &str) -> Result<()> {
        let tokens = segc_lexer::tokenize(source)?;
        let program = segc_parser::parse(tokens)?;
        self.run(&program)
    }

    /// Call a registered function with already-evaluated arguments.
    pub fn call(&mut self, name: &str, args: &[i64]) -> Result<i64> {
        let func = self.lookup(name, args.len())?;
        self.invoke(&func, args)
    }

    fn lookup(&self, name: &str, argc: usize) -> Result<Rc<Function>> {
        let func = match self.functions.get(name) {
            Some(f) => Rc::clone(f),
            None => {
                return error(
                    ErrorKind::UndefinedFunction,
                    format!("cannot call function '{}' because it is not defined", name),
                )
            }
        };
        if func.params.len() != argc {
            return error(
                ErrorKind::ArityMismatch,
                format!(
                    "function '{}' expected {} argument(s), got {}",
                    name,
                    func.params.len(),
                    argc
                ),
            );
        }
        Ok(func)
    }

    fn invoke(&mut self, func: &Function, args: &[i64]) -> Result<i64> {
        if self.depth >= self.max_depth {
            return error(
                ErrorKind::RecursionLimit,
                format!(
                    "cannot call '{}': more than {} calls are already active",
                    func.name, self.max_depth
                ),
            );
        }
        debug!("calling '{}' with {:?}", func.name, args);
        self.depth += 1;
        let frame = self.scopes.push(ScopeId::GLOBAL);
        for (param, value) in func.params.iter().zip(args) {
            self.scopes.set(frame, param, *value);
        }
        let flow = self.exec_block(frame, &func.body);
        self.scopes.pop(frame);
        self.depth -= 1;
        match flow? {
            Flow::Return(v) | Flow::Value(v) => Ok(v),
            Flow::Nil => {
                warn!("function '{}' finished without returning a value, using 0", func.name);
                Ok(0)
            }
        }
    }

    fn exec_block(&mut self, parent: ScopeId, block: &Block) -> Result<Flow> {
        let scope = self.scopes.push(parent);
        let flow = self.exec_statements(scope, &block.body);
        self.scopes.pop(scope);
        flow
    }

    fn exec_statements(&mut self, scope: ScopeId, body: &[Node]) -> Result<Flow> {
        for node in body {
            match self.eval(scope, node)? {
                Flow::Return(v) => return Ok(Flow::Return(v)),
                Flow::Value(v) if matches!(node, Node::Conditional(_) | Node::Block(_)) => {
                    return Ok(Flow::Value(v))
                }
                _ => {}
            }
        }
        Ok(Flow::Nil)
    }

    fn exec_conditional(&mut self, scope: ScopeId, cond: &Conditional) -> Result<Flow> {
        match cond.kind {
            CondKind::If | CondKind::Elsif => {
                let test = value_or_unwind!(self.eval_condition(scope, cond)?, nil_condition(cond));
                if test != 0 {
                    self.exec_block(scope, &cond.body)
                } else if let Some(next) = &cond.next {
                    self.exec_conditional(scope, next)
                } else {
                    Ok(Flow::Nil)
                }
            }
            CondKind::While => {
                loop {
                    let test = value_or_unwind!(self.eval_condition(scope, cond)?, nil_condition(cond));
                    if test == 0 {
                        break;
                    }
                    if let Flow::Return(v) = self.exec_block(scope, &cond.body)? {
                        return Ok(Flow::Return(v));
                    }
                }
                Ok(Flow::Nil)
            }
            CondKind::Else => self.exec_block(scope, &cond.body),
        }
    }

    fn eval_condition(&mut self, scope: ScopeId, cond: &Conditional) -> Result<Flow> {
        match &cond.cond {
            Some(node) => self.eval(scope, node),
            None => Ok(Flow::Value(1)),
        }
    }

    /// Writes into `scope` itself; outer bindings of `name` are shadowed, not updated.
    fn assign(&mut self, scope: ScopeId, name: &str, value: &Node) -> Result<Flow> {
        let v = value_or_unwind!(
            self.eval(scope, value)?,
            Error::new(
                ErrorKind::NilAssignment,
                format!("cannot set variable '{}' to a nil value", name),
            )
        );
        self.scopes.set(scope, name, v);
        Ok(Flow::Value(v))
    }

    fn eval(&mut self, scope: ScopeId, node: &Node) -> Result<Flow> {
        match node {
            Node::Number(n) => Ok(Flow::Value(*n)),
            Node::Ident(name) => match self.scopes.get(scope, name) {
                Some(v) => Ok(Flow::Value(v)),
                None => error(
                    ErrorKind::UndefinedVariable,
                    format!("cannot access variable '{}' because it does not exist", name),
                ),
            },
            Node::Assign { name, value } => self.assign(scope, name, value),
            Node::Call { name, args } => {
                let func = self.lookup(name, args.len())?;
                let mut values = Vec::with_capacity(args.len());
                for (i, arg) in args.iter().enumerate() {
                    let v = value_or_unwind!(
                        self.eval(scope, arg)?,
                        Error::new(
                            ErrorKind::NilOperand,
                            format!("cannot pass a nil value as argument {} of '{}'", i + 1, name),
                        )
                    );
                    values.push(v);
                }
                Ok(Flow::Value(self.invoke(&func, &values)?))
            }
            Node::Return(value) => {
                let v = value_or_unwind!(
                    self.eval(scope, value)?,
                    Error::new(ErrorKind::NilOperand, "cannot return a nil value")
                );
                Ok(Flow::Return(v))
            }
            Node::Block(block) => self.exec_block(scope, block),
            Node::Binary { left, op, right } => {
                let l = value_or_unwind!(self.eval(scope, left)?, nil_operand(op.symbol()));
                let r = value_or_unwind!(self.eval(scope, right)?, nil_operand(op.symbol()));
                Ok(Flow::Value(apply_binary(*op, l, r)?))
            }
            Node::Unary { op, operand } => {
                let v = value_or_unwind!(self.eval(scope, operand)?, nil_operand(op.symbol()));
                let result = match op {
                    UnaryOp::Not => (v == 0) as i64,
                    UnaryOp::Neg => v.wrapping_neg(),
                };
                Ok(Flow::Value(result))
            }
            Node::Conditional(cond) => self.exec_conditional(scope, cond),
        }
    }
}

fn nil_operand(symbol: &str) -> Error {
    Error::new(
        ErrorKind::NilOperand,
        format!("cannot operate on a nil value with '{}'", symbol),
    )
}

fn nil_condition(cond: &Conditional) -> Error {
    Error::new(
        ErrorKind::NilOperand,
        format!("cannot use a nil value as the condition of '{}'", cond.kind.keyword()),
    )
}

fn apply_binary(op: BinaryOp, l: i64, r: i64) -> Result<i64> {
    let v = match op {
        BinaryOp::Add => l.wrapping_add(r),
        BinaryOp::Sub => l.wrapping_sub(r),
        BinaryOp::Mul => l.wrapping_mul(r),
        BinaryOp::Div => {
            if r == 0 {
                return error(ErrorKind::DivisionByZero, format!("cannot divide {} by zero", l));
            }
            l.wrapping_div(r)
        }
        BinaryOp::Eq => (l == r) as i64,
        BinaryOp::Lt => (l < r) as i64,
        BinaryOp::Gt => (l > r) as i64,
        BinaryOp::And => (l != 0 && r != 0) as i64,
        BinaryOp::Or => (l != 0 || r != 0) as i64,
    };
    Ok(v)
}
