use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for canvas ids.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

macro_rules! interned_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(Spur);

        impl $name {
            /// Intern a string as an id, or return the existing handle.
            pub fn intern(s: &str) -> Self {
                $name(INTERNER.get_or_intern(s))
            }

            /// The handle for `s` if it was interned before. Never interns.
            pub fn lookup(s: &str) -> Option<Self> {
                INTERNER.get(s).map($name)
            }

            /// Resolve back to a string slice.
            pub fn as_str(&self) -> &str {
                INTERNER.resolve(&self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.as_str())
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
                Ok($name::intern(&s))
            }
        }
    };
}

interned_id! {
    /// Identifier of a placed node. Internally a `Spur` index (4 bytes,
    /// Copy, Eq, Hash in O(1)).
    NodeId
}

interned_id! {
    /// Identifier of a connection between two nodes.
    EdgeId
}

impl NodeId {
    /// Build the id of a node placed from `machine_id` at `timestamp_ms`.
    pub fn for_placement(machine_id: &str, timestamp_ms: u64) -> Self {
        Self::intern(&format!("{machine_id}-{timestamp_ms}"))
    }
}

impl EdgeId {
    /// Derive the id of the connection `source → target`.
    pub fn for_connection(source: NodeId, target: NodeId) -> Self {
        Self::intern(&format!("edge-{source}-{target}"))
    }
}
