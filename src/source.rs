//! Generation sources and data structures indexed by them.
use crate::units::{EmissionFactor, MoneyPerEnergy};
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};
use strum::{Display, EnumCount, EnumIter, IntoEnumIterator};

/// A generation source.
///
/// The order of the variants is significant: it defines the layout of every per-source vector and
/// is used to break ties between sources with equal costs.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumCount,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Solar photovoltaic generation
    Solar,
    /// Wind generation
    Wind,
    /// Hydroelectric generation
    Hydro,
    /// Gas-fired generation
    Gas,
    /// Nuclear generation
    Nuclear,
}

impl Source {
    /// The position of this source in the fixed source ordering
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// A value for every [`Source`], stored in source order.
///
/// Because the storage is a fixed-size array, a `SourceMap` can never be missing an entry or
/// contain too many.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceMap<T>([T; Source::COUNT]);

impl<T> SourceMap<T> {
    /// Create a new map by calling `f` for each source, in source order
    pub fn from_fn<F: FnMut(Source) -> T>(mut f: F) -> Self {
        let mut sources = Source::iter();
        Self(std::array::from_fn(|_| {
            f(sources.next().expect("Source::COUNT matches number of variants"))
        }))
    }

    /// Iterate over sources and their values, in source order
    pub fn iter(&self) -> impl Iterator<Item = (Source, &T)> {
        Source::iter().zip(self.0.iter())
    }

    /// Iterate over the values, in source order
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }

    /// Create a new map by applying `f` to every value
    pub fn map<U, F: FnMut(&T) -> U>(&self, mut f: F) -> SourceMap<U> {
        SourceMap::from_fn(|source| f(&self[source]))
    }
}

impl<T: Default> Default for SourceMap<T> {
    fn default() -> Self {
        Self::from_fn(|_| T::default())
    }
}

impl<T> Index<Source> for SourceMap<T> {
    type Output = T;

    fn index(&self, source: Source) -> &T {
        &self.0[source.index()]
    }
}

impl<T> IndexMut<Source> for SourceMap<T> {
    fn index_mut(&mut self, source: Source) -> &mut T {
        &mut self.0[source.index()]
    }
}

impl<T> From<[T; Source::COUNT]> for SourceMap<T> {
    fn from(values: [T; Source::COUNT]) -> Self {
        Self(values)
    }
}

/// Fixed cost and emissions attributes of a source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceParameters {
    /// Cost of generating one MWh
    pub unit_cost: MoneyPerEnergy,
    /// CO2 emitted per unit of generation
    pub emission_factor: EmissionFactor,
}

/// Cost and emissions attributes for every source
pub type SourceParameterMap = SourceMap<SourceParameters>;

/// The reference source table: (unit cost, emission factor) in source order
const REFERENCE_SOURCE_PARAMETERS: [(f64, f64); Source::COUNT] = [
    (30.0, 0.0),
    (25.0, 0.0),
    (40.0, 10.0),
    (80.0, 450.0),
    (90.0, 900.0),
];

/// The reference configuration of costs and emission factors.
///
/// Used by the `dispatch` command when no model is given.
pub fn reference_source_parameters() -> SourceParameterMap {
    SourceParameterMap::from(REFERENCE_SOURCE_PARAMETERS.map(|(cost, emissions)| {
        SourceParameters {
            unit_cost: MoneyPerEnergy(cost),
            emission_factor: EmissionFactor(emissions),
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_index_matches_order() {
        for (expected, source) in Source::iter().enumerate() {
            assert_eq!(source.index(), expected);
        }
        assert_eq!(Source::Nuclear.index(), Source::COUNT - 1);
    }

    #[test]
    fn test_source_map_from_fn() {
        let map = SourceMap::from_fn(Source::index);
        assert_eq!(map, SourceMap::from([0, 1, 2, 3, 4]));
        assert_eq!(map[Source::Hydro], 2);
    }

    #[test]
    fn test_source_map_iter_in_order() {
        let map = SourceMap::from(['s', 'w', 'h', 'g', 'n']);
        let pairs: Vec<_> = map.iter().map(|(source, c)| (source, *c)).collect();
        assert_eq!(
            pairs,
            [
                (Source::Solar, 's'),
                (Source::Wind, 'w'),
                (Source::Hydro, 'h'),
                (Source::Gas, 'g'),
                (Source::Nuclear, 'n')
            ]
        );
    }

    #[test]
    fn test_source_map_index_mut() {
        let mut map = SourceMap::<u32>::default();
        map[Source::Gas] += 7;
        assert_eq!(map, SourceMap::from([0, 0, 0, 7, 0]));
    }

    #[test]
    fn test_reference_source_parameters() {
        let params = reference_source_parameters();
        assert_eq!(params[Source::Wind].unit_cost, MoneyPerEnergy(25.0));
        assert_eq!(params[Source::Nuclear].emission_factor, EmissionFactor(900.0));
    }

    #[test]
    fn test_source_deserialise_lowercase() {
        #[derive(Deserialize)]
        struct Row {
            source: Source,
        }
        let row: Row = toml::from_str("source = \"hydro\"").unwrap();
        assert_eq!(row.source, Source::Hydro);
    }
}
