use serde::{Deserialize, Serialize};

/// Strand of a feature or read relative to the reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Strand {
    #[serde(rename = "+")]
    Forward,
    #[serde(rename = "-")]
    Reverse,
}

impl Strand {
    /// Parse a strand from its GFF representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "+" => Some(Self::Forward),
            "-" => Some(Self::Reverse),
            _ => None,
        }
    }

    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Self::Forward => '+',
            Self::Reverse => '-',
        }
    }
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Per-strand pair of values, e.g. depth arrays or low-coverage regions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stranded<T> {
    pub forward: T,
    pub reverse: T,
}

impl<T> Stranded<T> {
    pub fn new(forward: T, reverse: T) -> Self {
        Self { forward, reverse }
    }

    pub fn get(&self, strand: Strand) -> &T {
        match strand {
            Strand::Forward => &self.forward,
            Strand::Reverse => &self.reverse,
        }
    }

    pub fn get_mut(&mut self, strand: Strand) -> &mut T {
        match strand {
            Strand::Forward => &mut self.forward,
            Strand::Reverse => &mut self.reverse,
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> Stranded<U> {
        Stranded {
            forward: f(&self.forward),
            reverse: f(&self.reverse),
        }
    }
}
