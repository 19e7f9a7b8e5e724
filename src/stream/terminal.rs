use std::sync::Arc;

/// The signal that ends a stream, delivered at most once per observer.
///
/// An error payload is reference counted so one upstream failure can be
/// fanned out to every observer without an `E: Clone` bound.
#[derive(Debug)]
pub enum Terminal<E> {
    Completed,
    Error(Arc<E>),
}

impl<E> Terminal<E> {
    pub fn error(error: E) -> Self {
        Terminal::Error(Arc::new(error))
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Terminal::Completed)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Terminal::Error(_))
    }

    pub fn error_value(&self) -> Option<&E> {
        match self {
            Terminal::Completed => None,
            Terminal::Error(error) => Some(error),
        }
    }
}

impl<E> Clone for Terminal<E> {
    fn clone(&self) -> Self {
        match self {
            Self::Completed => Self::Completed,
            Self::Error(error) => Self::Error(Arc::clone(error)),
        }
    }
}

impl<E: PartialEq> PartialEq for Terminal<E> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Error(l0), Self::Error(r0)) => l0 == r0,
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}
