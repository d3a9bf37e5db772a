//! Typed representation of an unordered group

use crate::hash::{canonical_hash, CanonicalRecord, GroupHash};
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::collections::BTreeMap;

/// Members of an unordered group keyed by their canonical hash.
///
/// Serializes as a JSON array in ascending hash order and accepts any member
/// order when deserializing. Two sets are equal when they hold the same
/// members, however those members were supplied. Members are told apart by
/// their serialized form, so a hash collision never drops one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnorderedSet<T> {
    members: BTreeMap<(GroupHash, String), T>,
}

impl<T> Default for UnorderedSet<T> {
    fn default() -> Self {
        Self {
            members: BTreeMap::new(),
        }
    }
}

impl<T: CanonicalRecord> UnorderedSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from members in any order
    pub fn from_members(
        members: impl IntoIterator<Item = T>,
    ) -> Result<Self, serde_json::Error> {
        let mut set = Self::new();
        for member in members {
            set.insert(member)?;
        }
        Ok(set)
    }

    /// Insert a member, returning its key. An equal member is replaced.
    pub fn insert(&mut self, member: T) -> Result<GroupHash, serde_json::Error> {
        let key = canonical_hash(&member)?;
        let identity = serde_json::to_value(&member)?.to_string();
        self.members.insert((key, identity), member);
        Ok(key)
    }
}

impl<T> UnorderedSet<T> {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members stored under `key`; more than one only on a hash collision
    pub fn get(&self, key: GroupHash) -> impl Iterator<Item = &T> {
        self.members
            .range((key, String::new())..)
            .take_while(move |((k, _), _)| *k == key)
            .map(|(_, member)| member)
    }

    pub fn contains_key(&self, key: GroupHash) -> bool {
        self.get(key).next().is_some()
    }

    /// One key per member in ascending order; the set-level identity of the
    /// group
    pub fn keys(&self) -> impl Iterator<Item = GroupHash> + '_ {
        self.members.keys().map(|(k, _)| *k)
    }

    /// Members in canonical order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.members.values()
    }

    pub fn entries(&self) -> impl Iterator<Item = (GroupHash, &T)> {
        self.members.iter().map(|((k, _), v)| (*k, v))
    }
}

impl<T: Serialize> Serialize for UnorderedSet<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.members.len()))?;
        for member in self.members.values() {
            seq.serialize_element(member)?;
        }
        seq.end()
    }
}

impl<'de, T> Deserialize<'de> for UnorderedSet<T>
where
    T: Deserialize<'de> + CanonicalRecord,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let members = Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default();
        Self::from_members(members).map_err(serde::de::Error::custom)
    }
}
