//! Explicit nesting counter for recursive analysis

use sqlscope_diagnostics::{AnalysisError, Result};

/// Number of nested analysis calls on the current path
///
/// Passed by value into every recursive analysis entry point. Leaving a call
/// restores the caller's depth because the caller still holds its own copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct CallDepth(usize);

impl CallDepth {
    /// Depth before any analysis call
    pub const fn root() -> Self {
        Self(0)
    }

    pub const fn get(&self) -> usize {
        self.0
    }

    /// Enter one nested call, failing once `limit` would be exceeded
    pub fn enter(self, limit: usize) -> Result<Self> {
        let next = self.0 + 1;
        if next > limit {
            return Err(AnalysisError::MaxRecursion { limit });
        }
        Ok(Self(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_past_ceiling_fails() {
        let mut depth = CallDepth::root();
        for _ in 0..128 {
            depth = depth.enter(128).unwrap();
        }
        assert_eq!(depth.get(), 128);
        assert_eq!(
            depth.enter(128),
            Err(AnalysisError::MaxRecursion { limit: 128 })
        );
    }

    #[test]
    fn test_sibling_calls_do_not_accumulate() {
        let parent = CallDepth::root().enter(2).unwrap();
        for _ in 0..10 {
            assert!(parent.enter(2).is_ok());
        }
    }
}
