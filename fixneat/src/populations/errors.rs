use super::SpeciesID;

use std::error::Error;
use std::fmt;

/// An error type indicating that a generational
/// turnover could not be carried out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvolutionError {
    /// The population has no individuals to evolve.
    EmptyPopulation,
    /// No champion exists to be reported or carried over.
    NoChampion,
    /// A species was asked for offspring while having no members.
    EmptySpecies(SpeciesID),
}

impl fmt::Display for EvolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPopulation => write!(f, "attempted evolution of an empty population"),
            Self::NoChampion => write!(f, "no champion has been recorded"),
            Self::EmptySpecies(id) => {
                write!(f, "attempted reproduction of empty species {:?}", id)
            }
        }
    }
}

impl Error for EvolutionError {}
