use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Suit {
    Hearts = 0,
    Diamonds = 1,
    Clubs = 2,
    Spades = 3,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Suit::Hearts),
            1 => Some(Suit::Diamonds),
            2 => Some(Suit::Clubs),
            3 => Some(Suit::Spades),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Suit::Hearts => "Hearts",
            Suit::Diamonds => "Diamonds",
            Suit::Clubs => "Clubs",
            Suit::Spades => "Spades",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Suit::ALL.iter().copied().find(|s| s.name() == name)
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed-size map keyed by suit; the four jobs of a year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuitMap<T> {
    values: [T; 4],
}

impl<T> SuitMap<T> {
    pub fn from_fn(mut f: impl FnMut(Suit) -> T) -> Self {
        Self {
            values: [
                f(Suit::Hearts),
                f(Suit::Diamonds),
                f(Suit::Clubs),
                f(Suit::Spades),
            ],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Suit, &T)> {
        Suit::ALL.iter().copied().zip(self.values.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Suit, &mut T)> {
        Suit::ALL.iter().copied().zip(self.values.iter_mut())
    }
}

impl<T: Default> SuitMap<T> {
    pub fn new() -> Self {
        Self::from_fn(|_| T::default())
    }
}

impl<T: Serialize> Serialize for SuitMap<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(4))?;
        for (suit, value) in self.iter() {
            map.serialize_entry(suit.name(), value)?;
        }
        map.end()
    }
}

impl<'de, T: Deserialize<'de> + Default> Deserialize<'de> for SuitMap<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = std::collections::BTreeMap::<String, T>::deserialize(deserializer)?;
        let mut map = SuitMap::from_fn(|_| T::default());
        for (name, value) in entries {
            let suit = Suit::from_name(&name)
                .ok_or_else(|| serde::de::Error::custom(format!("unknown suit {name:?}")))?;
            map[suit] = value;
        }
        Ok(map)
    }
}

impl<T> core::ops::Index<Suit> for SuitMap<T> {
    type Output = T;

    fn index(&self, suit: Suit) -> &T {
        &self.values[suit.index()]
    }
}

impl<T> core::ops::IndexMut<Suit> for SuitMap<T> {
    fn index_mut(&mut self, suit: Suit) -> &mut T {
        &mut self.values[suit.index()]
    }
}
