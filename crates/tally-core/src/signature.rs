//! # Record Signature
//!
//! Builds the canonical string representation of a closing record used to
//! detect unsaved changes and to gate reload/save behavior.
//!
//! ## Canonical Form
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Signature Construction                               │
//! │                                                                         │
//! │  draft record                      server record                        │
//! │       │                                 │                               │
//! │       ▼                                 ▼                               │
//! │  canonical_signature()            canonical_signature()                 │
//! │       │                                 │                               │
//! │       └────────────► equal? ◄───────────┘                               │
//! │                        │                                                │
//! │                 no ──► record is DIRTY (save enabled, reload gated)     │
//! │                 yes ─► record is clean                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The encoding is JSON over [`ClosingRecord`]: struct fields serialize in
//! declaration order and the denomination maps are `BTreeMap`s, so two
//! records that differ only in map insertion order produce the same
//! signature (order-independent within each field). All numeric fields are
//! already whole currency units; no rounding is applied here.

use crate::types::ClosingRecord;

/// Signature format version, bumped if the canonical encoding changes.
const SIGNATURE_VERSION: &str = "v1";

/// Canonical signature of a record snapshot.
///
/// Equal signatures mean "nothing the operator can edit differs".
pub fn canonical_signature(record: &ClosingRecord) -> String {
    // Serialization of these plain data types cannot fail.
    let body = serde_json::to_string(record).expect("closing record serializes");
    format!("{SIGNATURE_VERSION}:{body}")
}
