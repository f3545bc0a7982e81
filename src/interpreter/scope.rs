use std::collections::HashMap;
use crate::interpreter::value::Value;

/// Runtime variable storage: a stack of frames, searched from the innermost one outwards.
///
/// Blocks and function calls both push a frame onto the same stack, so a function body can see
/// the variables of whoever called it.
#[derive(Debug)]
pub struct Scope {
    frames: Vec<HashMap<String, Value>>,
}

impl Scope {
    /// Creates a scope holding only the global frame.
    pub fn new() -> Scope {
        Scope { frames: vec![HashMap::new()] }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn push(&mut self) {
        self.frames.push(HashMap::new());
    }

    /// Drops the innermost frame. The global frame is never dropped.
    pub fn pop(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Declares a variable in the innermost frame, replacing one of the same name there.
    pub fn declare(&mut self, name: &str, value: Value) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.to_owned(), value);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.frames.iter_mut().rev().find_map(|frame| frame.get_mut(name))
    }
}

impl Default for Scope {
    fn default() -> Self {
        Scope::new()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn inner_frames_shadow_outer_ones() {
        let mut scope = Scope::new();
        scope.declare("x", Value::Int(1));

        scope.push();
        scope.declare("x", Value::String(String::from("inner")));
        assert_eq!(Some(&Value::String(String::from("inner"))), scope.get("x"));

        scope.pop();
        assert_eq!(Some(&Value::Int(1)), scope.get("x"));
    }

    #[test]
    fn assignment_goes_to_the_owning_frame() {
        let mut scope = Scope::new();
        scope.declare("x", Value::Int(1));
        scope.push();

        if let Some(value) = scope.get_mut("x") {
            *value = Value::Int(2);
        }

        scope.pop();
        assert_eq!(Some(&Value::Int(2)), scope.get("x"));
    }

    #[test]
    fn global_frame_survives() {
        let mut scope = Scope::new();
        scope.declare("g", Value::Bool(true));

        scope.pop();
        scope.pop();

        assert_eq!(1, scope.depth());
        assert_eq!(Some(&Value::Bool(true)), scope.get("g"));
        assert_eq!(None, scope.get("h"));
    }
}
