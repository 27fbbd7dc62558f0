//! `serde` support.
//!
//! All pointers serialize as their pointee, or as `None` when empty, the same
//! shape `serde` uses for `Option<Box<T>>`. Deserializing produces a fresh
//! sole owner; shared groups are not reconstructed.

use crate::dispose::{DefaultDisposer, Dispose};
use crate::ptr::{ScopedPtr, SharedPtr, TransferPtr};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

impl<T: Serialize, D: Dispose<T>> Serialize for TransferPtr<T, D> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_ref().serialize(serializer)
    }
}

impl<T: Serialize, D: Dispose<T>> Serialize for ScopedPtr<T, D> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_ref().serialize(serializer)
    }
}

impl<T: Serialize, D: Dispose<T>> Serialize for SharedPtr<T, D> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_ref().serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for TransferPtr<T, DefaultDisposer> {
    fn deserialize<De: Deserializer<'de>>(deserializer: De) -> Result<Self, De::Error> {
        Ok(Option::<T>::deserialize(deserializer)?.map_or_else(Self::empty, Self::new))
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for ScopedPtr<T, DefaultDisposer> {
    fn deserialize<De: Deserializer<'de>>(deserializer: De) -> Result<Self, De::Error> {
        Ok(Option::<T>::deserialize(deserializer)?.map_or_else(Self::empty, Self::new))
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for SharedPtr<T, DefaultDisposer> {
    fn deserialize<De: Deserializer<'de>>(deserializer: De) -> Result<Self, De::Error> {
        Ok(Option::<T>::deserialize(deserializer)?.map_or_else(Self::empty, Self::new))
    }
}
