use std::collections::HashMap;

/// Values of the loop variables visible to one execution frame.
///
/// An environment is never mutated once handed to a frame. Entering a loop
/// iteration builds a new environment with [`Environment::with_binding`]:
/// a copy of the parent plus the loop variable, dropped when the iteration
/// body finishes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: HashMap<String, u64>,
}

impl Environment {
    /// An empty root environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value of a loop variable.
    pub fn get_var(&self, name: &str) -> Option<u64> {
        self.vars.get(name).copied()
    }

    /// Value of a variable resolved by the compiler.
    ///
    /// # Panics
    ///
    /// Panics if `name` is unbound, which only happens for a tree that did
    /// not come out of [`crate::parser::compile`].
    pub(crate) fn resolved(&self, name: &str) -> u64 {
        self.vars[name]
    }

    /// Copy this environment and bind `name` to `value` in the copy.
    pub fn with_binding(&self, name: impl Into<String>, value: u64) -> Self {
        let mut vars = self.vars.clone();
        vars.insert(name.into(), value);
        Self { vars }
    }

    /// Number of bound variables.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use crate::env::Environment;

    #[test]
    fn test_env_with_binding_and_get_var() {
        let root = Environment::new();

        // initially absent
        assert_eq!(root.get_var("i"), None);
        assert!(root.is_empty());

        let child = root.with_binding("i", 3);

        assert_eq!(child.get_var("i"), Some(3));
        assert_eq!(child.len(), 1);
    }

    #[test]
    fn test_env_parent_is_untouched() {
        let parent = Environment::new().with_binding("i", 1);
        let child = parent.with_binding("j", 7);

        assert_eq!(parent.get_var("j"), None);
        assert_eq!(child.get_var("i"), Some(1));
        assert_eq!(child.get_var("j"), Some(7));
    }

    #[test]
    fn test_env_siblings_do_not_share() {
        let parent = Environment::new();
        let first = parent.with_binding("i", 1);
        let second = parent.with_binding("i", 2);

        assert_eq!(first.get_var("i"), Some(1));
        assert_eq!(second.get_var("i"), Some(2));
        assert!(parent.is_empty());
    }
}
