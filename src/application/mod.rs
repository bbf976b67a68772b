// SPDX-License-Identifier: MPL-2.0
//! Application layer - Port definitions.
//!
//! The application layer sits between the domain layer (pure types) and the
//! infrastructure/presentation layers. It defines the **ports**: abstract
//! interfaces for the external collaborators of the overlay pipeline (camera,
//! landmark detector, drawing surface, catalog service, share target).
//!
//! # Dependency Rule
//!
//! - Application layer depends on domain layer (uses domain types)
//! - Infrastructure layer implements application layer ports
//! - Presentation layer wires concrete adapters into the pipeline

pub mod port;
