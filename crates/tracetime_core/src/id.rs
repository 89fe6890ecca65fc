//! Identifiers for recorded trace entities.
//!
//! All IDs were minted by the recorder (`page@a1b2`, `frame@c3d4`,
//! `snapshot@5`, ...). They are opaque strings here: equality is the only
//! operation replay needs, and they must round-trip bit-for-bit into
//! generated hyperlinks.

use serde::{Deserialize, Serialize};

macro_rules! recorded_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a recorded identifier
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Get as string slice
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Check if the recorded value is empty
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

recorded_id!(
    /// Page identifier - also the frame id of the page's main frame
    PageId
);

recorded_id!(
    /// Frame identifier - main frame or child frame of a page
    FrameId
);

recorded_id!(
    /// Snapshot identifier - unique within one frame
    SnapshotId
);

recorded_id!(
    /// Resource identifier - unique across the whole recording
    ResourceId
);

recorded_id!(
    /// Action identifier - one recorded user or API action
    ActionId
);

impl PageId {
    /// Frame id of this page's main frame
    #[must_use]
    pub fn main_frame(&self) -> FrameId {
        FrameId(self.0.clone())
    }
}
