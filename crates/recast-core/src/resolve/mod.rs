//! Resolution of a declaration into assignments and a constructor.
//!
//! [`property`] merges explicit entries with same-name matches; [`constructor`] picks
//! the constructor that receives them. Recoverable validation problems go through
//! [`Diagnostics`], which either records a warning or fails, depending on the
//! configured [`InvalidMappingStrategy`].

pub mod constructor;
pub mod property;

pub use constructor::select_constructor;
pub use property::{
    AssignmentOrigin, AssignmentValue, PropertyResolution, PropertyResolver, ResolvedAssignment,
};

use crate::error::{Diagnostic, MappingError, Result};
use crate::options::InvalidMappingStrategy;
use tracing::warn;

/// Collector for recoverable problems of one declaration.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    strategy: InvalidMappingStrategy,
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new(strategy: InvalidMappingStrategy) -> Self {
        Diagnostics {
            strategy,
            items: Vec::new(),
        }
    }

    /// Record `error` as a warning, or return it under [`InvalidMappingStrategy::Fail`].
    pub fn recover(&mut self, error: MappingError) -> Result<()> {
        match self.strategy {
            InvalidMappingStrategy::Warn => {
                warn!("{}", error);
                self.items.push(Diagnostic::warning(&error));
                Ok(())
            }
            InvalidMappingStrategy::Fail => Err(error),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}
