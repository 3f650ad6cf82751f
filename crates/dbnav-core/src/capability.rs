//! Static capability tables

use strum::IntoEnumIterator;

use crate::Operation;

/// What a dialect can express.
///
/// Tables are `'static` and fixed at compile time, so the answer for a
/// given operation never changes at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capabilities {
    /// Every operation except those listed, each with a human reason
    AllExcept(&'static [(Operation, &'static str)]),
    /// No operation at all, for one reason
    Nothing(&'static str),
}

impl Capabilities {
    pub const fn all_except(unsupported: &'static [(Operation, &'static str)]) -> Self {
        Self::AllExcept(unsupported)
    }

    pub const fn nothing(reason: &'static str) -> Self {
        Self::Nothing(reason)
    }

    pub fn supports(&self, operation: Operation) -> bool {
        self.unsupported_reason(operation).is_none()
    }

    /// Why an operation is unsupported, or `None` if it is supported
    pub fn unsupported_reason(&self, operation: Operation) -> Option<&'static str> {
        match self {
            Self::AllExcept(unsupported) => unsupported
                .iter()
                .find(|(op, _)| *op == operation)
                .map(|(_, reason)| *reason),
            Self::Nothing(reason) => Some(*reason),
        }
    }

    /// Supported operations in declaration order
    pub fn supported(&self) -> impl Iterator<Item = Operation> + '_ {
        Operation::iter().filter(|op| self.supports(*op))
    }

    /// Unsupported operations with their reasons, in declaration order
    pub fn unsupported(&self) -> impl Iterator<Item = (Operation, &'static str)> + '_ {
        Operation::iter().filter_map(|op| self.unsupported_reason(op).map(|reason| (op, reason)))
    }
}
