use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{Type, TypeParseError, TYPE_COUNT};

/// Unordered set of one or two types. Stored canonically (lower index first) so
/// that `fire/water` and `water/fire` compare and hash equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeSet {
    first: Type,
    second: Option<Type>,
}

impl TypeSet {
    pub fn mono(ty: Type) -> Self {
        Self {
            first: ty,
            second: None,
        }
    }

    /// A dual of two equal types collapses to the mono set.
    pub fn dual(a: Type, b: Type) -> Self {
        match a.cmp(&b) {
            std::cmp::Ordering::Equal => Self::mono(a),
            std::cmp::Ordering::Less => Self {
                first: a,
                second: Some(b),
            },
            std::cmp::Ordering::Greater => Self {
                first: b,
                second: Some(a),
            },
        }
    }

    pub fn from_parts(primary: Type, secondary: Option<Type>) -> Self {
        match secondary {
            Some(secondary) => Self::dual(primary, secondary),
            None => Self::mono(primary),
        }
    }

    pub fn is_mono(&self) -> bool {
        self.second.is_none()
    }

    pub fn contains(&self, ty: Type) -> bool {
        self.first == ty || self.second == Some(ty)
    }

    pub fn types(&self) -> impl Iterator<Item = Type> {
        std::iter::once(self.first).chain(self.second)
    }

    /// Every distinct set in canonical order: for i <= j over [Type::ALL],
    /// the set {ALL[i], ALL[j]} (mono when i == j). 171 sets in total.
    pub fn all() -> impl Iterator<Item = TypeSet> {
        (0..TYPE_COUNT).flat_map(|i| {
            (i..TYPE_COUNT).map(move |j| TypeSet::dual(Type::ALL[i], Type::ALL[j]))
        })
    }
}

impl From<Type> for TypeSet {
    fn from(ty: Type) -> Self {
        Self::mono(ty)
    }
}

impl fmt::Display for TypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.second {
            Some(second) => write!(f, "{}/{}", self.first, second),
            None => write!(f, "{}", self.first),
        }
    }
}

impl FromStr for TypeSet {
    type Err = TypeParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut parts = raw.split(['/', ',']);
        let first: Type = parts.next().unwrap_or_default().parse()?;
        let second = match parts.next() {
            Some(part) => Some(part.parse::<Type>()?),
            None => None,
        };
        if parts.next().is_some() {
            return Err(TypeParseError(raw.trim().to_string()));
        }
        Ok(Self::from_parts(first, second))
    }
}

impl Serialize for TypeSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TypeSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
