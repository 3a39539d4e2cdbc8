// crates/ccc-objstor-azure/src/names.rs
// ============================================================================
// Module: Random Names
// Description: Random lowercase names and GUIDs for throwaway resources.
// Purpose: Keep invasive probes from colliding with existing resources.
// Dependencies: ccc-objstor-core, rand, uuid
// ============================================================================

//! ## Overview
//! Lowercase names draw letters from `rand` so they are valid storage account
//! and container names. GUIDs come from `uuid`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use ccc_objstor_core::RandomNames;
use rand::Rng;
use uuid::Uuid;

// ============================================================================
// SECTION: Generator
// ============================================================================

/// Thread-local random name generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomNameGenerator;

impl RandomNames for RandomNameGenerator {
    fn lowercase(&self, length: usize) -> String {
        let mut rng = rand::thread_rng();
        (0..length).map(|_| char::from(rng.gen_range(b'a'..=b'z'))).collect()
    }

    fn guid(&self) -> String {
        Uuid::new_v4().hyphenated().to_string()
    }
}
