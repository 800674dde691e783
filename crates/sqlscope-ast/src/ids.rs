//! Opaque identities issued during analysis
//!
//! Identities are unique across one analysis tree, handed out in increasing
//! order and never reused.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

/// Common behaviour of analysis identities
pub trait Id: Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display {
    /// Build the identity from its raw value
    fn from_raw(raw: u32) -> Self;
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Create an identity from a raw value
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            /// The raw integer value
            pub const fn as_u32(&self) -> u32 {
                self.0
            }
        }

        impl Id for $name {
            fn from_raw(raw: u32) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

define_id!(
    /// Identity of a row source (table, inline view or derived tuple)
    TupleId,
    "t"
);
define_id!(
    /// Identity of one column value within a tuple
    SlotId,
    "s"
);
define_id!(
    /// Identity of a registered predicate
    ConjunctId,
    "c"
);
define_id!(
    /// Identity of one query block (scope node)
    ScopeId,
    "b"
);

/// Monotonic generator for one kind of identity
#[derive(Debug, Clone)]
pub struct IdGenerator<T> {
    next: u32,
    _kind: PhantomData<T>,
}

impl<T: Id> IdGenerator<T> {
    /// Create a generator starting at zero
    pub const fn new() -> Self {
        Self {
            next: 0,
            _kind: PhantomData,
        }
    }

    /// Issue the next identity
    pub fn next_id(&mut self) -> T {
        let id = T::from_raw(self.next);
        self.next += 1;
        id
    }

    /// Number of identities issued so far
    pub const fn issued(&self) -> u32 {
        self.next
    }
}

impl<T: Id> Default for IdGenerator<T> {
    fn default() -> Self {
        Self::new()
    }
}
