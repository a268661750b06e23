//! Control flow for the interpreter.

/// Result of evaluating a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    /// The node produced no value (loops, untaken branches, empty blocks)
    Nil,
    /// A plain integer
    Value(i64),
    /// A `ret` on its way up to the nearest function call
    Return(i64),
}

/// Unwraps a numeric [`Flow`] or leaves the enclosing function.
///
/// `Return` keeps unwinding unchanged; `Nil` becomes the given error.
macro_rules! value_or_unwind {
    ($flow:expr, $nil:expr) => {
        match $flow {
            Flow::Value(v) => v,
            Flow::Return(v) => return Ok(Flow::Return(v)),
            Flow::Nil => return Err($nil),
        }
    };
}

pub(crate) use value_or_unwind;
