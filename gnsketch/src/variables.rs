/// The ID of a variable which could be constrained,
/// whose value could be found by gnsketch.
/// It is an index into a [`Variables`] arena.
pub type Id = u32;

/// A scalar unknown.
/// Two variables with the same value are still different variables;
/// identity comes from the [`Id`] the arena handed out.
#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    /// Current value. Read as the initial guess before solving,
    /// overwritten with the solution afterwards.
    pub value: f64,
    /// Optional display name, e.g. `pa.x`.
    pub name: Option<String>,
}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name} = {}", self.value),
            None => write!(f, "{}", self.value),
        }
    }
}

/// Arena which owns every variable.
/// Hands out incrementing IDs starting from 0, and never removes variables,
/// so an ID stays valid for the arena's whole lifetime.
#[derive(Clone, Debug, Default)]
pub struct Variables {
    inner: Vec<Variable>,
}

impl Variables {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an unnamed variable with this initial value.
    pub fn push(&mut self, value: f64) -> Id {
        self.push_variable(Variable { value, name: None })
    }

    /// Add a named variable with this initial value.
    pub fn push_named(&mut self, name: impl Into<String>, value: f64) -> Id {
        self.push_variable(Variable {
            value,
            name: Some(name.into()),
        })
    }

    fn push_variable(&mut self, variable: Variable) -> Id {
        let id = Id::try_from(self.inner.len()).expect("more than u32::MAX variables");
        self.inner.push(variable);
        id
    }

    /// How many variables are stored?
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Is the arena empty?
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Look up a variable.
    pub fn get(&self, id: Id) -> Option<&Variable> {
        self.inner.get(id as usize)
    }

    /// Current value of this variable.
    /// Panics if the ID didn't come from this arena.
    #[inline(always)]
    pub fn value(&self, id: Id) -> f64 {
        self.inner[id as usize].value
    }

    /// Overwrite the value of this variable, e.g. to move a point while dragging.
    /// Panics if the ID didn't come from this arena.
    #[inline(always)]
    pub fn set_value(&mut self, id: Id, value: f64) {
        self.inner[id as usize].value = value;
    }

    /// Display name of this variable, if it has one.
    pub fn name(&self, id: Id) -> Option<&str> {
        self.inner[id as usize].name.as_deref()
    }

    /// All values, indexed by ID.
    pub fn values(&self) -> Vec<f64> {
        self.inner.iter().map(|v| v.value).collect()
    }

    /// Iterate over every (ID, variable) pair.
    pub fn iter(&self) -> impl Iterator<Item = (Id, &Variable)> {
        (0..).zip(self.inner.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_by_id_not_value() {
        let mut vars = Variables::new();
        let a = vars.push(1.0);
        let b = vars.push(1.0);
        assert_ne!(a, b);
        vars.set_value(a, 2.0);
        assert_eq!(vars.value(a), 2.0);
        assert_eq!(vars.value(b), 1.0);
    }

    #[test]
    fn display() {
        let mut vars = Variables::new();
        let named = vars.push_named("pa.x", 1.5);
        let unnamed = vars.push(3.0);
        assert_eq!(vars.get(named).unwrap().to_string(), "pa.x = 1.5");
        assert_eq!(vars.get(unnamed).unwrap().to_string(), "3");
        assert_eq!(vars.name(named), Some("pa.x"));
        assert!(vars.get(7).is_none());
    }
}
