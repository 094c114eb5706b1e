// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error taxonomy for property shops.

use alloc::string::String;
use thiserror::Error;

/// Errors surfaced by [`Shop`](crate::Shop) operations.
///
/// Failures raised inside read transforms, write transforms, and producers
/// are returned unchanged to the caller of the access that triggered them.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ShopError {
    /// A read, write, remove, or documentation lookup named a property that is
    /// not defined on the shop.
    #[error("no property named `{name}`")]
    UnknownProperty {
        /// The name that was looked up.
        name: String,
    },

    /// [`Shop::make_alias`](crate::Shop::make_alias) was asked to alias a name
    /// that is not defined on the source shop.
    #[error("cannot alias `{name}`: no such property on the source shop")]
    AliasSourceMissing {
        /// The missing source name.
        name: String,
    },

    /// A recalculation member has no registered producer.
    ///
    /// Producers are only registered for properties defined with a write
    /// transform.
    #[error("property `{name}` is flagged for recalculation but has no producer")]
    MissingProducer {
        /// The recalculation member without a producer.
        name: String,
    },

    /// A value did not hold the requested type.
    #[error("expected a value of type `{expected}`, found `{found}`")]
    TypeMismatch {
        /// The requested type.
        expected: &'static str,
        /// The type actually held.
        found: &'static str,
    },

    /// A user-supplied transform or producer failed.
    #[error("{message}")]
    Transform {
        /// Description supplied by the transform.
        message: String,
    },
}

impl ShopError {
    /// Creates a [`ShopError::Transform`] for failures raised by user code.
    #[must_use]
    pub fn transform(message: impl Into<String>) -> Self {
        Self::Transform {
            message: message.into(),
        }
    }

    pub(crate) fn unknown(name: &str) -> Self {
        Self::UnknownProperty { name: name.into() }
    }
}
