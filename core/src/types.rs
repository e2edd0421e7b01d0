//! Shared primitive types used across the pipeline.

/// Stable customer identifier (`c-NNNNNN`).
pub type CustomerId = String;

/// Stable subscription identifier (`s-NNNNNN`).
pub type SubscriptionId = String;

/// Stable catalog service identifier.
pub type ServiceId = String;

/// Identifier of one seeded dataset (UUID v4).
pub type DatasetId = String;
