//! # Propagation Messages
//!
//! The closed set of typed messages carried between sessions. Payloads are
//! primitive fields only: receivers adopt the delivered value as the new
//! source of truth, never merge.
//!
//! ## Wire Format (JSON)
//! Messages are serialized as tagged JSON using serde's adjacently tagged
//! enum:
//! ```json
//! { "type": "FloatTargetChanged", "payload": { "branchId": "b-7", "value": 3000000 } }
//! ```

use serde::{Deserialize, Serialize};

/// Current propagation protocol version.
pub const PROTOCOL_VERSION: u32 = 1;

/// All cross-session configuration messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ConfigBroadcast {
    /// A branch's cash float target changed.
    FloatTargetChanged(FloatTargetChanged),
}

/// Payload for [`ConfigBroadcast::FloatTargetChanged`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloatTargetChanged {
    /// Branch whose configuration changed.
    pub branch_id: String,

    /// The new float target, whole currency units.
    pub value: i64,
}

impl FloatTargetChanged {
    pub fn new(branch_id: impl Into<String>, value: i64) -> Self {
        FloatTargetChanged {
            branch_id: branch_id.into(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_json_shape() {
        let msg = ConfigBroadcast::FloatTargetChanged(FloatTargetChanged::new("b-7", 3_000_000));
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(
            json,
            r#"{"type":"FloatTargetChanged","payload":{"branchId":"b-7","value":3000000}}"#
        );

        let back: ConfigBroadcast = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }
}
