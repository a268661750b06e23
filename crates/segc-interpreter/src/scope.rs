//! Scope arena for the interpreter.
//!
//! Scopes live in a single vector and refer to their parent by index. They are
//! allocated in strict stack order: entering a block or a call pushes a frame,
//! leaving it pops that frame and anything above it. Frame 0 is the global
//! scope and is never popped.

use std::collections::HashMap;

/// Handle to a live scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeId(usize);

impl ScopeId {
    pub const GLOBAL: ScopeId = ScopeId(0);
}

#[derive(Debug, Default)]
struct Frame {
    vars: HashMap<String, i64>,
    parent: Option<ScopeId>,
}

#[derive(Debug)]
pub struct Scopes {
    frames: Vec<Frame>,
}

impl Default for Scopes {
    fn default() -> Self {
        Self::new()
    }
}

impl Scopes {
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::default()],
        }
    }

    /// Opens a child of `parent` on top of the stack.
    pub(crate) fn push(&mut self, parent: ScopeId) -> ScopeId {
        self.frames.push(Frame {
            vars: HashMap::new(),
            parent: Some(parent),
        });
        ScopeId(self.frames.len() - 1)
    }

    /// Discards `id` and every frame opened after it.
    pub(crate) fn pop(&mut self, id: ScopeId) {
        debug_assert!(id != ScopeId::GLOBAL, "the global scope is never popped");
        self.frames.truncate(id.0.max(1));
    }

    /// Resolves `name` from `id` outwards through the parent chain.
    pub fn get(&self, id: ScopeId, name: &str) -> Option<i64> {
        let mut cur = Some(id);
        while let Some(ScopeId(ix)) = cur {
            let frame = self.frames.get(ix)?;
            if let Some(v) = frame.vars.get(name) {
                return Some(*v);
            }
            cur = frame.parent;
        }
        None
    }

    /// Binds `name` in `id` itself, shadowing any outer binding.
    pub fn set(&mut self, id: ScopeId, name: &str, value: i64) {
        if let Some(frame) = self.frames.get_mut(id.0) {
            frame.vars.insert(name.to_string(), value);
        }
    }

    pub fn globals(&self) -> Vec<(String, i64)> {
        let mut vars: Vec<(String, i64)> = self.frames[0]
            .vars
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        vars.sort();
        vars
    }

    pub fn clear_globals(&mut self) {
        self.frames[0].vars.clear();
    }

    /// Number of live frames, the global one included.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_walks_parents_and_writes_stay_local() {
        let mut scopes = Scopes::new();
        scopes.set(ScopeId::GLOBAL, "x", 1);
        let block = scopes.push(ScopeId::GLOBAL);
        assert_eq!(scopes.get(block, "x"), Some(1));

        scopes.set(block, "x", 2);
        assert_eq!(scopes.get(block, "x"), Some(2));
        assert_eq!(scopes.get(ScopeId::GLOBAL, "x"), Some(1));

        scopes.pop(block);
        assert_eq!(scopes.depth(), 1);
        assert_eq!(scopes.get(ScopeId::GLOBAL, "x"), Some(1));
    }

    #[test]
    fn call_frames_skip_the_caller() {
        let mut scopes = Scopes::new();
        let caller = scopes.push(ScopeId::GLOBAL);
        scopes.set(caller, "local", 7);
        let callee = scopes.push(ScopeId::GLOBAL);
        assert_eq!(scopes.get(callee, "local"), None);
        scopes.pop(callee);
        assert_eq!(scopes.get(caller, "local"), Some(7));
    }

    #[test]
    fn popping_releases_frames_above() {
        let mut scopes = Scopes::new();
        let outer = scopes.push(ScopeId::GLOBAL);
        let _inner = scopes.push(outer);
        assert_eq!(scopes.depth(), 3);
        scopes.pop(outer);
        assert_eq!(scopes.depth(), 1);
    }

    #[test]
    fn globals_are_sorted() {
        let mut scopes = Scopes::new();
        scopes.set(ScopeId::GLOBAL, "b", 2);
        scopes.set(ScopeId::GLOBAL, "a", 1);
        assert_eq!(scopes.globals(), vec![("a".to_string(), 1), ("b".to_string(), 2)]);
        scopes.clear_globals();
        assert!(scopes.globals().is_empty());
    }
}
