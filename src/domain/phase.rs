//! Deployment phases.

use std::fmt;

/// A single linear pass over the deploy order.
///
/// `Create` and `Start` walk the order forwards; `Stop` and `Delete` walk it
/// in reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Create,
    Start,
    Stop,
    Delete,
}

impl Phase {
    /// Lowercase phase name, as accepted on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Delete => "delete",
        }
    }

    /// Whether this phase visits nodes in reverse deploy order.
    #[must_use]
    pub const fn is_reverse(self) -> bool {
        matches!(self, Self::Stop | Self::Delete)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn teardown_phases_run_in_reverse() {
        assert!(!Phase::Create.is_reverse());
        assert!(!Phase::Start.is_reverse());
        assert!(Phase::Stop.is_reverse());
        assert!(Phase::Delete.is_reverse());
    }

    #[test]
    fn display_uses_lowercase_name() {
        assert_eq!(Phase::Delete.to_string(), "delete");
    }
}
