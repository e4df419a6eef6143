// Copyright 2026 the Lazyview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! The engine itself has no failure modes: stale targets and empty markers
//! are ordinary outcomes. The only error that leaves an activation pass is a
//! caller action returning `Err`, which is surfaced unchanged as
//! [`ActivationError::Action`].

use alloc::boxed::Box;

use crate::unit::UnitKind;

/// Error type returned by caller actions.
pub type BoxError = Box<dyn core::error::Error + Send + Sync + 'static>;

/// Return type of a [`CallbackUnit`](crate::unit::CallbackUnit) action.
pub type ActionResult = Result<(), BoxError>;

/// An activation pass stopped early.
///
/// Units processed before the failing one stay removed; the failing unit is
/// dropped; every unit after it stays pending.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ActivationError {
    /// A caller-supplied action returned an error.
    #[error("{kind:?} unit at position {position} failed to activate")]
    Action {
        /// Kind of the failing unit.
        kind: UnitKind,
        /// Position of the unit in its pending set when the pass started.
        position: usize,
        /// The error returned by the action.
        #[source]
        source: BoxError,
    },
}
