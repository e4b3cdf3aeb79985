use std::fmt;

/// Callback receiving the new externally visible path list of a controlled slice.
pub type ChangeCallback = Box<dyn FnMut(&[String])>;

/// Who owns a slice of tree state (expanded or selected paths).
///
/// Resolved once when the tree state is created.
pub enum StateSource {
    /// The tree owns the state and starts from `defaults`.
    Uncontrolled { defaults: Vec<String> },
    /// The caller owns the state; every change is reported through `on_change`.
    Controlled {
        current: Vec<String>,
        on_change: ChangeCallback,
    },
}

impl StateSource {
    pub fn uncontrolled<S: Into<String>>(defaults: impl IntoIterator<Item = S>) -> Self {
        StateSource::Uncontrolled {
            defaults: defaults.into_iter().map(Into::into).collect(),
        }
    }

    pub fn controlled<S: Into<String>>(
        current: impl IntoIterator<Item = S>,
        on_change: impl FnMut(&[String]) + 'static,
    ) -> Self {
        StateSource::Controlled {
            current: current.into_iter().map(Into::into).collect(),
            on_change: Box::new(on_change),
        }
    }

    /// Paths the slice starts with.
    pub fn initial(&self) -> &[String] {
        match self {
            StateSource::Uncontrolled { defaults } => defaults,
            StateSource::Controlled { current, .. } => current,
        }
    }

    pub fn is_controlled(&self) -> bool {
        matches!(self, StateSource::Controlled { .. })
    }

    /// Reports `paths` to the owner of a controlled slice.
    pub(crate) fn notify(&mut self, paths: &[String]) {
        if let StateSource::Controlled { current, on_change } = self {
            *current = paths.to_vec();
            on_change(paths);
        }
    }
}

impl Default for StateSource {
    fn default() -> Self {
        StateSource::Uncontrolled {
            defaults: Vec::new(),
        }
    }
}

impl fmt::Debug for StateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateSource::Uncontrolled { defaults } => f
                .debug_struct("Uncontrolled")
                .field("defaults", defaults)
                .finish(),
            StateSource::Controlled { current, .. } => f
                .debug_struct("Controlled")
                .field("current", current)
                .finish_non_exhaustive(),
        }
    }
}
