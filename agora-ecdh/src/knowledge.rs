use agora_curve::{BigUint, CurveGroup, CurvePoint};
use serde::{Serialize, Serializer};

use std::collections::btree_map::{BTreeMap, Iter};
use std::fmt;

/// A value an agent can learn, either in private or from a broadcast.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Knowledge {
    Integer(#[serde(serialize_with = "serialize_decimal")] BigUint),
    Point(CurvePoint),
    Group(CurveGroup),
}

fn serialize_decimal<S: Serializer>(number: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(number)
}

impl From<u64> for Knowledge {
    fn from(number: u64) -> Self {
        Self::Integer(BigUint::from(number))
    }
}

impl From<BigUint> for Knowledge {
    fn from(number: BigUint) -> Self {
        Self::Integer(number)
    }
}

impl From<CurvePoint> for Knowledge {
    fn from(point: CurvePoint) -> Self {
        Self::Point(point)
    }
}

impl From<CurveGroup> for Knowledge {
    fn from(group: CurveGroup) -> Self {
        Self::Group(group)
    }
}

impl fmt::Display for Knowledge {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Integer(number) => write!(f, "{}", number),
            Self::Point(point) => write!(f, "{}", point),
            Self::Group(group) => write!(f, "<group of order {}>", group.order()),
        }
    }
}

/// Tagged values known to a single agent. Inserting under an existing tag
/// replaces the old value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct KnowledgeStore {
    entries: BTreeMap<String, Knowledge>,
}

impl KnowledgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tag: impl Into<String>, value: impl Into<Knowledge>) -> Option<Knowledge> {
        self.entries.insert(tag.into(), value.into())
    }

    pub fn get(&self, tag: &str) -> Option<&Knowledge> {
        self.entries.get(tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.entries.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, String, Knowledge> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a KnowledgeStore {
    type Item = (&'a String, &'a Knowledge);
    type IntoIter = Iter<'a, String, Knowledge>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for KnowledgeStore {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (tag, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", tag, value)?;
        }
        write!(f, "}}")
    }
}
