//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The frame loop has no degraded mode: every failure reported here is
//! fatal to the frame (or to construction). The point of [`RenderError`] is
//! to turn those fatal paths into early, diagnosable termination instead of
//! undefined GPU state:
//!
//! - Resource allocation failures reported by the device
//! - Pass / shader lookups that cannot be resolved
//! - Invalid settings handed to a constructor
//! - Sub-generator dispatch failures
//!
//! # Usage
//!
//! All public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, RenderError>`.
//!
//! ```rust,ignore
//! use prism::errors::{RenderError, Result};
//!
//! fn build() -> Result<()> {
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::renderer::graph::generator::GeneratorId;

/// Error reported by a [`RenderDevice`](crate::renderer::core::RenderDevice)
/// implementation.
///
/// The device layer is external; it only needs to describe what went wrong.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct DeviceError {
    /// Human readable failure description.
    pub message: String,
}

impl DeviceError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The main error type for frame orchestration.
#[derive(Error, Debug)]
pub enum RenderError {
    // ========================================================================
    // Construction & Configuration Errors
    // ========================================================================
    /// The device refused to create a resource.
    #[error("Failed to create resource '{label}': {source}")]
    ResourceCreationFailure {
        /// Debug label of the resource that failed
        label: &'static str,
        /// Underlying device error
        #[source]
        source: DeviceError,
    },

    /// A render pass or full-screen shader could not be found in the
    /// shader library.
    #[error("Render pass or shader not found: {0}")]
    PassNotFound(String),

    /// Settings or arguments that can never produce a valid frame.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    // ========================================================================
    // Resource Errors
    // ========================================================================
    /// A view refers to an allocation that has already been released.
    #[error("Stale resource: {0}")]
    StaleResource(String),

    /// A view role was requested that the allocation was not created for.
    #[error("Invalid view '{role}' for resource '{label}'")]
    InvalidView {
        /// Debug label of the allocation
        label: &'static str,
        /// Requested role
        role: &'static str,
    },

    // ========================================================================
    // Generator Errors
    // ========================================================================
    /// No sub-generator is registered under the requested identifier.
    #[error("No generator registered for '{}'", .0.name())]
    GeneratorNotRegistered(GeneratorId),

    /// A sub-generator failed while producing its output.
    #[error("Generator '{}' failed: {message}", .id.name())]
    GeneratorFailure {
        /// Generator that failed
        id: GeneratorId,
        /// Failure description
        message: String,
    },
}

/// Alias for `Result<T, RenderError>`.
pub type Result<T> = std::result::Result<T, RenderError>;
