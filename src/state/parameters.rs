use std::collections::BTreeMap;

/// Server-reported parameter names with their current slider values. The map
/// keys always equal the name list; any new list from the backend replaces
/// the whole set, it is never merged into the old one.
#[derive(Debug, Clone, Default)]
pub struct ParameterSet {
    names: Vec<String>,
    values: BTreeMap<String, f64>,
}

impl ParameterSet {
    /// Discards all prior state and initializes every name to `default_value`.
    pub fn rebuild(&mut self, names: &[String], default_value: f64) {
        self.names = names.to_vec();
        self.values = names
            .iter()
            .map(|name| (name.clone(), default_value))
            .collect();
    }

    /// Updates one entry. Unknown names are ignored; a stale slider event
    /// after a rebuild must not resurrect a removed parameter.
    pub fn set(&mut self, name: &str, value: f64) -> bool {
        match self.values.get_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn as_map(&self) -> &BTreeMap<String, f64> {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebuild_resets_every_value_to_the_default() {
        let mut set = ParameterSet::default();
        set.rebuild(&["a".into(), "b".into()], 1.0);
        assert!(set.set("a", 4.0));
        set.rebuild(&["a".into(), "b".into(), "c".into()], 1.0);
        assert_eq!(set.names(), ["a", "b", "c"]);
        assert!(set.as_map().values().all(|v| *v == 1.0));
    }

    #[test]
    fn set_rejects_unknown_names() {
        let mut set = ParameterSet::default();
        set.rebuild(&["a".into()], 1.0);
        assert!(!set.set("b", 2.0));
        assert_eq!(set.as_map().len(), 1);
    }
}
