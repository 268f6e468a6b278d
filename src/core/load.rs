/// Loader state for a remote collection view.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Ready(Vec<T>),
    Errored(String),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        Self::Loading
    }
}

impl<T> LoadState<T> {
    pub fn items(&self) -> &[T] {
        match self {
            Self::Ready(items) => items,
            _ => &[],
        }
    }

    /// Mutable access to loaded items; `None` unless ready.
    pub fn items_mut(&mut self) -> Option<&mut Vec<T>> {
        match self {
            Self::Ready(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Errored(msg) => Some(msg),
            _ => None,
        }
    }
}
