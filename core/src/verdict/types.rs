use std::fmt;

use serde::{Deserialize, Serialize};

/// Prior classification recorded for a job in Treeherder.
///
/// The integer ids are Treeherder's `failure_classification_id` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Classification {
    #[default]
    NotClassified,
    FixedByCommit,
    ExpectedFail,
    Intermittent,
    Infra,
    IntermittentNeedsFiling,
    AutoclassifiedIntermittent,
}

impl Classification {
    pub const ALL: [Classification; 7] = [
        Classification::NotClassified,
        Classification::FixedByCommit,
        Classification::ExpectedFail,
        Classification::Intermittent,
        Classification::Infra,
        Classification::IntermittentNeedsFiling,
        Classification::AutoclassifiedIntermittent,
    ];

    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(Self::NotClassified),
            2 => Some(Self::FixedByCommit),
            3 => Some(Self::ExpectedFail),
            4 => Some(Self::Intermittent),
            5 => Some(Self::Infra),
            6 => Some(Self::IntermittentNeedsFiling),
            7 => Some(Self::AutoclassifiedIntermittent),
            _ => None,
        }
    }

    pub fn id(self) -> i64 {
        match self {
            Self::NotClassified => 1,
            Self::FixedByCommit => 2,
            Self::ExpectedFail => 3,
            Self::Intermittent => 4,
            Self::Infra => 5,
            Self::IntermittentNeedsFiling => 6,
            Self::AutoclassifiedIntermittent => 7,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::NotClassified => "not classified",
            Self::FixedByCommit => "fixed by commit",
            Self::ExpectedFail => "expected fail",
            Self::Intermittent => "intermittent",
            Self::Infra => "infra",
            Self::IntermittentNeedsFiling => "intermittent needs filing",
            Self::AutoclassifiedIntermittent => "autoclassified intermittent",
        }
    }

    /// True once a human or the autoclassifier has looked at the job.
    pub fn is_triaged(self) -> bool {
        self != Self::NotClassified
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("unknown classification id {0}")]
pub struct UnknownClassification(pub i64);

impl TryFrom<i64> for Classification {
    type Error = UnknownClassification;

    fn try_from(id: i64) -> Result<Self, Self::Error> {
        Self::from_id(id).ok_or(UnknownClassification(id))
    }
}

impl From<Classification> for i64 {
    fn from(c: Classification) -> Self {
        c.id()
    }
}

/// Inputs to the verdict engine. Every field has a default so partially
/// specified JSON still produces a complete tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalTuple {
    pub is_alpha: bool,
    pub version_differs: bool,
    pub autoland_failures: u32,
    pub central_failures: u32,
    pub classification_id: Classification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerdictKind {
    CodeRegression,
    ImageRegression,
    Intermittent,
    Infra,
    NeedsInvestigation,
}

impl VerdictKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CodeRegression => "CODE_REGRESSION",
            Self::ImageRegression => "IMAGE_REGRESSION",
            Self::Intermittent => "INTERMITTENT",
            Self::Infra => "INFRA",
            Self::NeedsInvestigation => "NEEDS_INVESTIGATION",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::CodeRegression => "Likely caused by code change",
            Self::ImageRegression => "Likely caused by image change",
            Self::Intermittent => "Known flaky test",
            Self::Infra => "Infrastructure issue",
            Self::NeedsInvestigation => "Unclear cause",
        }
    }
}

impl fmt::Display for VerdictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub verdict: VerdictKind,
    pub confidence: Confidence,
    pub rationale: String,
}

impl Verdict {
    pub(crate) fn new(verdict: VerdictKind, confidence: Confidence, rationale: impl Into<String>) -> Self {
        Self {
            verdict,
            confidence,
            rationale: rationale.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_ids_round_trip_through_table() {
        for c in Classification::ALL {
            assert_eq!(Classification::from_id(c.id()), Some(c));
        }
        assert_eq!(Classification::from_id(0), None);
        assert_eq!(Classification::from_id(8), None);
    }

    #[test]
    fn test_only_not_classified_is_untriaged() {
        for c in Classification::ALL {
            assert_eq!(c.is_triaged(), c != Classification::NotClassified, "{c}");
        }
        assert_eq!(
            Classification::try_from(42).unwrap_err().to_string(),
            "unknown classification id 42"
        );
    }

    #[test]
    fn test_classification_serializes_as_integer() {
        let json = serde_json::to_string(&Classification::Infra).unwrap();
        assert_eq!(json, "5");
        let back: Classification = serde_json::from_str("7").unwrap();
        assert_eq!(back, Classification::AutoclassifiedIntermittent);
        assert!(serde_json::from_str::<Classification>("42").is_err());
    }

    #[test]
    fn test_signal_tuple_missing_fields_default() {
        let s: SignalTuple = serde_json::from_str(r#"{"is_alpha": true}"#).unwrap();
        assert!(s.is_alpha);
        assert!(!s.version_differs);
        assert_eq!(s.autoland_failures, 0);
        assert_eq!(s.central_failures, 0);
        assert_eq!(s.classification_id, Classification::NotClassified);
    }

    #[test]
    fn test_verdict_labels() {
        let v = Verdict::new(VerdictKind::NeedsInvestigation, Confidence::Low, "x");
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["verdict"], "NEEDS_INVESTIGATION");
        assert_eq!(json["confidence"], "Low");
        assert_eq!(VerdictKind::ImageRegression.to_string(), "IMAGE_REGRESSION");
    }
}
