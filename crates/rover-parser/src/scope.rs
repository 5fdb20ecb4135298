/// Root names a `Do` chain may start with without being qualified.
pub const CAPABILITY_NAMESPACES: &[&str] = &["memory", "lib", "roverApi", "context"];

/// Names seeded into every [`ScopeSet`].
const SEEDED: &[&str] = &["memory", "rover", "json"];

/// Identifiers the parser treats as local.
///
/// A name becomes local the first time it is assigned by `Set` or bound by
/// `For`, in parse order. There is no declaration syntax, so a `Do` that
/// comes before the first assignment still sees the name as unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeSet {
    names: Vec<String>,
}

impl ScopeSet {
    pub fn new() -> Self {
        Self {
            names: SEEDED.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Add a name. Returns `false` if it was already present.
    pub fn insert(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.names.push(name.to_string());
        true
    }

    /// Whether a `Do` chain rooted at `name` is emitted as written.
    pub fn resolves(&self, name: &str) -> bool {
        self.contains(name) || CAPABILITY_NAMESPACES.contains(&name)
    }

    /// Names in the order they became local.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl Default for ScopeSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_names() {
        let scope = ScopeSet::new();
        assert!(scope.contains("memory"));
        assert!(scope.contains("rover"));
        assert!(scope.contains("json"));
        assert!(!scope.contains("context"));
        assert!(scope.resolves("context"));
        assert!(scope.resolves("lib"));
        assert!(!scope.resolves("Move"));
    }

    #[test]
    fn insertion_order_is_kept() {
        let mut scope = ScopeSet::new();
        assert!(scope.insert("b"));
        assert!(scope.insert("a"));
        assert!(!scope.insert("b"));
        let names: Vec<_> = scope.iter().collect();
        assert_eq!(names, vec!["memory", "rover", "json", "b", "a"]);
    }
}
