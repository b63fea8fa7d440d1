use std::fmt;

///
/// ErrorTree
///
/// Flat accumulator for schema validation failures, keyed by the route of
/// the offending node (`Model`, `Model.field`, ...).
///

#[derive(Clone, Debug, Default)]
pub struct ErrorTree {
    errors: Vec<(String, String)>,
}

impl ErrorTree {
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, route: impl Into<String>, message: impl Into<String>) {
        self.errors.push((route.into(), message.into()));
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors
            .iter()
            .map(|(route, message)| (route.as_str(), message.as_str()))
    }

    /// Consume the tree, returning `Err(self)` if any error was recorded.
    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ErrorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (route, message)) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{route}: {message}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorTree {}
