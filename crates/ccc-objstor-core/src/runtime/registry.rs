// crates/ccc-objstor-core/src/runtime/registry.rs
// ============================================================================
// Module: Tactic Registry
// Description: Named, ordered lists of test requirements.
// Purpose: Resolve a tactic name into the requirements to execute.
// Dependencies: crate::runtime::requirement
// ============================================================================

//! ## Overview
//! The registry is populated once at startup and read-only during a run.
//! Tactic order and requirement order are preserved as registered.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::runtime::requirement::TrDefinition;

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Mapping from tactic name to an ordered list of requirements.
pub struct TacticRegistry<C: 'static> {
    /// Tactics in registration order.
    tactics: Vec<(String, Vec<&'static TrDefinition<C>>)>,
}

impl<C> Default for TacticRegistry<C> {
    fn default() -> Self {
        Self {
            tactics: Vec::new(),
        }
    }
}

impl<C> TacticRegistry<C> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tactic, replacing any earlier tactic of the same name.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        requirements: Vec<&'static TrDefinition<C>>,
    ) {
        let name = name.into();
        if let Some(entry) = self.tactics.iter_mut().find(|(existing, _)| *existing == name) {
            entry.1 = requirements;
        } else {
            self.tactics.push((name, requirements));
        }
    }

    /// Returns the requirements of a tactic.
    #[must_use]
    pub fn tactic(&self, name: &str) -> Option<&[&'static TrDefinition<C>]> {
        self.tactics
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, requirements)| requirements.as_slice())
    }

    /// Iterates tactic names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tactics.iter().map(|(name, _)| name.as_str())
    }
}
