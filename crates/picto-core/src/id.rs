//! Interned board identifiers.
//!
//! Node and connection ids are strings in save files but `Spur` indices in
//! memory: 4 bytes, `Copy`, O(1) hash and compare.

use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Shared by both id kinds.
static COUNTER: AtomicU64 = AtomicU64::new(1);

macro_rules! interned_id {
    ($(#[$meta:meta])* $name:ident, prefix = $prefix:literal, sigil = $sigil:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(Spur);

        impl $name {
            /// Intern `s`, or return the id it already maps to.
            pub fn intern(s: &str) -> Self {
                Self(INTERNER.get_or_intern(s))
            }

            pub fn as_str(&self) -> &str {
                INTERNER.resolve(&self.0)
            }

            /// A `prefix_<n>` id whose string has never been interned in this
            /// session, so loaded or deleted ids are never handed out again.
            pub fn generate() -> Self {
                loop {
                    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
                    let candidate = format!(concat!($prefix, "_{}"), n);
                    if INTERNER.get(&candidate).is_none() {
                        return Self::intern(&candidate);
                    }
                }
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($sigil, "{}"), self.as_str())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Ok(Self::intern(&s))
            }
        }
    };
}

interned_id!(
    /// A node placed on the board.
    NodeId, prefix = "node", sigil = "#"
);

interned_id!(
    /// A connection drawn between two nodes.
    ConnectionId, prefix = "conn", sigil = "~"
);
