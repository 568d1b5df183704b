//! Measurement records and the record builder.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use super::{Candidates, Classifier};

/// The five measurement categories, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementKind {
    /// Number tagged "sq m"
    ExplicitSqM,
    /// Number tagged "mm"
    ExplicitMm,
    /// Number tagged "m"
    ExplicitM,
    /// Loose number reclassified as millimetres by magnitude
    AssumedMm,
    /// Loose number of unknown unit
    Unknown,
}

impl MeasurementKind {
    /// All kinds in report order.
    pub const ALL: [MeasurementKind; 5] = [
        MeasurementKind::ExplicitSqM,
        MeasurementKind::ExplicitMm,
        MeasurementKind::ExplicitM,
        MeasurementKind::AssumedMm,
        MeasurementKind::Unknown,
    ];

    /// Unit of the category.
    pub fn unit(self) -> Unit {
        match self {
            MeasurementKind::ExplicitSqM => Unit::SqM,
            MeasurementKind::ExplicitMm => Unit::Mm,
            MeasurementKind::ExplicitM => Unit::M,
            MeasurementKind::AssumedMm => Unit::MmAssumed,
            MeasurementKind::Unknown => Unit::Unknown,
        }
    }

    /// How the unit was determined.
    pub fn source(self) -> Source {
        match self {
            MeasurementKind::ExplicitSqM | MeasurementKind::ExplicitMm | MeasurementKind::ExplicitM => {
                Source::Explicit
            }
            MeasurementKind::AssumedMm => Source::Assumed,
            MeasurementKind::Unknown => Source::Unknown,
        }
    }
}

/// Unit of a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    SqM,
    Mm,
    M,
    MmAssumed,
    Unknown,
}

impl Unit {
    /// Label used in reports.
    pub fn label(self) -> &'static str {
        match self {
            Unit::SqM => "sq m",
            Unit::Mm => "mm",
            Unit::M => "m",
            Unit::MmAssumed => "mm (assumed)",
            Unit::Unknown => "unknown (confirm)",
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// How a measurement's unit was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Unit marker present in the text
    Explicit,
    /// Unit assumed from magnitude
    Assumed,
    /// Unit unknown
    Unknown,
}

impl Source {
    /// Label used in reports.
    pub fn label(self) -> &'static str {
        match self {
            Source::Explicit => "explicit",
            Source::Assumed => "assumed",
            Source::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One measurement found on a page.
///
/// Unit and source are derived from the kind, so a record can never carry
/// an inconsistent pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementRecord {
    value: f64,
    kind: MeasurementKind,
}

impl MeasurementRecord {
    /// Create a record.
    pub fn new(value: f64, kind: MeasurementKind) -> Self {
        Self { value, kind }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn kind(&self) -> MeasurementKind {
        self.kind
    }

    pub fn unit(&self) -> Unit {
        self.kind.unit()
    }

    pub fn source(&self) -> Source {
        self.kind.source()
    }
}

impl Serialize for MeasurementRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("MeasurementRecord", 3)?;
        state.serialize_field("value", &self.value)?;
        state.serialize_field("unit", &self.unit())?;
        state.serialize_field("source", &self.source())?;
        state.end()
    }
}

/// Build the records of one page.
///
/// Order is explicit sq m, explicit mm, explicit m, assumed mm, unknown;
/// within each category values keep their text order.
pub fn build_records(candidates: &Candidates, classifier: &Classifier) -> Vec<MeasurementRecord> {
    let (assumed, unknown) = classifier.split(&candidates.loose);

    let groups: [(&[f64], MeasurementKind); 5] = [
        (candidates.sq_m.as_slice(), MeasurementKind::ExplicitSqM),
        (candidates.mm.as_slice(), MeasurementKind::ExplicitMm),
        (candidates.m.as_slice(), MeasurementKind::ExplicitM),
        (assumed.as_slice(), MeasurementKind::AssumedMm),
        (unknown.as_slice(), MeasurementKind::Unknown),
    ];

    groups
        .iter()
        .flat_map(|(values, kind)| values.iter().map(|&v| MeasurementRecord::new(v, *kind)))
        .collect()
}
