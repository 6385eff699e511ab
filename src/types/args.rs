use super::error::SemanticError;

/// Values of a rule's named references, handed to its semantic action.
///
/// A binding whose capture group did not take part in the match is present
/// with value `None`; a binding that was never declared is simply absent.
#[derive(Debug, Clone, PartialEq)]
pub struct Args<V> {
    values: Vec<(String, Option<V>)>,
}

impl<V> Default for Args<V> {
    fn default() -> Self {
        Self { values: Vec::new() }
    }
}

impl<V> Args<V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, name: &str, value: Option<V>) {
        self.values.push((name.to_owned(), value));
    }

    /// Builder-style insertion, mostly useful for invoking actions in tests.
    #[must_use]
    pub fn with(mut self, name: &str, value: Option<V>) -> Self {
        self.insert(name, value);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&V> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.as_ref())
    }

    /// Remove and return the value bound to `name`.
    pub fn take(&mut self, name: &str) -> Option<V> {
        self.values
            .iter_mut()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.take())
    }

    /// Remove the value bound to `name` and convert it.
    ///
    /// # Errors
    ///
    /// Returns the conversion's [`SemanticError`] when the value has the wrong type.
    pub fn take_as<T>(&mut self, name: &str) -> Result<Option<T>, SemanticError>
    where
        T: TryFrom<V, Error = SemanticError>,
    {
        self.take(name).map(T::try_from).transpose()
    }

    /// Whether a value was captured under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Binding names in template order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(n, _)| n.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
