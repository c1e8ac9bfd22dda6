// crates/tdf-core/src/grammar/keyword.rs
// ============================================================================
// Module: TDF Keyword Tables
// Description: Closed keyword sets for group lines and per-protocol clauses.
// Purpose: Replace string-keyed dispatch with exhaustive matches.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Every keyword the grammar understands is a variant here. Clause keywords
//! carry their arity: the number of words the clause consumes including the
//! keyword itself.

// ============================================================================
// SECTION: Group Lines
// ============================================================================

/// Word that must open the `TEST:` clause list.
pub const EXPECT: &str = "EXPECT";

/// Leading keyword of each line in a test group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKeyword {
    /// `TYPE:` selects the protocol family.
    Type,
    /// `NAME:` carries the free-text test name.
    Name,
    /// `TEST:` carries the clauses.
    Test,
}

impl LineKeyword {
    /// Returns the keyword as written in files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Type => "TYPE:",
            Self::Name => "NAME:",
            Self::Test => "TEST:",
        }
    }
}

// ============================================================================
// SECTION: Signal-Inclusion Clauses
// ============================================================================

/// Clause keywords accepted on `DLEP` tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKeyword {
    /// `SIGNAL <name>`.
    Signal,
    /// `TO_INCLUDE <marker> <item>`.
    ToInclude,
    /// `TO_NOT_INCLUDE <marker> <item>`.
    ToNotInclude,
}

impl SignalKeyword {
    /// Human-readable list used in error messages.
    pub const EXPECTED: &'static str = "SIGNAL, TO_INCLUDE, or TO_NOT_INCLUDE";

    /// Resolves a clause keyword.
    #[must_use]
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "SIGNAL" => Some(Self::Signal),
            "TO_INCLUDE" => Some(Self::ToInclude),
            "TO_NOT_INCLUDE" => Some(Self::ToNotInclude),
            _ => None,
        }
    }

    /// Returns the keyword as written in files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Signal => "SIGNAL",
            Self::ToInclude => "TO_INCLUDE",
            Self::ToNotInclude => "TO_NOT_INCLUDE",
        }
    }

    /// Number of words the clause consumes.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::Signal => 2,
            Self::ToInclude | Self::ToNotInclude => 3,
        }
    }
}

/// Marker word that follows an inclusion keyword.
///
/// The marker is checked for spelling only. Nesting is decided by the
/// position of the directive, not by the marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemMarker {
    /// `DATA_ITEM`.
    DataItem,
    /// `SUB_DATA_ITEM`.
    SubDataItem,
}

impl ItemMarker {
    /// Human-readable list used in error messages.
    pub const EXPECTED: &'static str = "DATA_ITEM or SUB_DATA_ITEM";

    /// Resolves a marker word.
    #[must_use]
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "DATA_ITEM" => Some(Self::DataItem),
            "SUB_DATA_ITEM" => Some(Self::SubDataItem),
            _ => None,
        }
    }
}

// ============================================================================
// SECTION: Device-Query Clauses
// ============================================================================

/// Clause keywords accepted on `SNMP` tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKeyword {
    /// `OID <oid>`.
    Oid,
    /// `TO_BE <READONLY|SETTABLE|READABLE>`.
    ToBe,
    /// `OF_TYPE <type>`.
    OfType,
    /// `WITH_VALUE <value>`.
    WithValue,
}

impl QueryKeyword {
    /// Human-readable list used in error messages.
    pub const EXPECTED: &'static str = "OID, TO_BE, OF_TYPE, or WITH_VALUE";

    /// Resolves a clause keyword.
    #[must_use]
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "OID" => Some(Self::Oid),
            "TO_BE" => Some(Self::ToBe),
            "OF_TYPE" => Some(Self::OfType),
            "WITH_VALUE" => Some(Self::WithValue),
            _ => None,
        }
    }

    /// Returns the keyword as written in files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Oid => "OID",
            Self::ToBe => "TO_BE",
            Self::OfType => "OF_TYPE",
            Self::WithValue => "WITH_VALUE",
        }
    }

    /// Number of words the clause consumes.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::Oid | Self::ToBe | Self::OfType | Self::WithValue => 2,
        }
    }
}
