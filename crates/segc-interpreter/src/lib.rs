//! SEGC interpreter: evaluates AST nodes with a simple tree-walking interpreter.
//!
//! An [`Interpreter`] owns the function registry and the global scope. A host
//! loads a script once with [`Interpreter::run`] (or [`Interpreter::load`]),
//! then drives it by calling entry points and inspecting globals:
//!
//! ```rust
//! use segc_interpreter::run_source;
//!
//! let mut interp = run_source("speed = 3\nfn update(dt) { ret speed * dt }").unwrap();
//! assert_eq!(interp.call("update", &[4]).unwrap(), 12);
//! assert_eq!(interp.read_global("speed"), Some(3));
//! ```

mod flow;
pub mod interpreter;
pub mod scope;

pub use interpreter::{Interpreter, MAX_CALL_DEPTH};
pub use scope::{ScopeId, Scopes};

use segc_syntax::error::Result;

/// Build an interpreter and run `source` in it.
pub fn run_source(source: &str) -> Result<Interpreter> {
    let mut interp = Interpreter::new();
    interp.load(source)?;
    Ok(interp)
}
