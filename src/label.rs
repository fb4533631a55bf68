//! Association labels
//!
//! Maps a verb's significance and log-odds ratio onto one of six
//! attraction/repulsion categories.

use serde::{Serialize, Serializer};
use std::fmt;

/// Chi-square p-values at or above this are not significant
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Category of a verb's preference for the causative frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssociationLabel {
    NotSignificant,
    StrongAttractor,
    WeakAttractor,
    Neutral,
    SlightRepeller,
    StrongRepeller,
}

impl AssociationLabel {
    /// Every label, in report order
    pub const ALL: [AssociationLabel; 6] = [
        AssociationLabel::NotSignificant,
        AssociationLabel::StrongAttractor,
        AssociationLabel::WeakAttractor,
        AssociationLabel::Neutral,
        AssociationLabel::SlightRepeller,
        AssociationLabel::StrongRepeller,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssociationLabel::NotSignificant => "not significant",
            AssociationLabel::StrongAttractor => "strong attractor",
            AssociationLabel::WeakAttractor => "weak attractor",
            AssociationLabel::Neutral => "neutral",
            AssociationLabel::SlightRepeller => "slight repeller",
            AssociationLabel::StrongRepeller => "strong repeller",
        }
    }

    pub fn is_significant(&self) -> bool {
        *self != AssociationLabel::NotSignificant
    }

    /// Inverse of [`AssociationLabel::as_str`]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|label| label.as_str() == s)
    }
}

impl fmt::Display for AssociationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AssociationLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Assign a label from a log-odds ratio and a chi-square p-value
///
/// Branches are checked in order; the first that holds wins.
pub fn assign_label(log_odds_ratio: f64, p_value: f64) -> AssociationLabel {
    if p_value >= SIGNIFICANCE_LEVEL {
        AssociationLabel::NotSignificant
    } else if log_odds_ratio >= 2.0 {
        AssociationLabel::StrongAttractor
    } else if (1.0..2.0).contains(&log_odds_ratio) {
        AssociationLabel::WeakAttractor
    } else if -1.0 < log_odds_ratio && log_odds_ratio < 1.0 {
        AssociationLabel::Neutral
    } else if -2.0 < log_odds_ratio && log_odds_ratio <= -1.0 {
        AssociationLabel::SlightRepeller
    } else {
        AssociationLabel::StrongRepeller
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIG: f64 = 0.01;

    #[test]
    fn test_not_significant_wins() {
        assert_eq!(assign_label(5.0, 0.05), AssociationLabel::NotSignificant);
        assert_eq!(assign_label(-5.0, 0.5), AssociationLabel::NotSignificant);
        assert_eq!(assign_label(0.0, 1.0), AssociationLabel::NotSignificant);
    }

    #[test]
    fn test_significance_boundary() {
        assert_eq!(assign_label(3.0, 0.05), AssociationLabel::NotSignificant);
        assert_eq!(
            assign_label(3.0, 0.049_999_999),
            AssociationLabel::StrongAttractor
        );
    }

    #[test]
    fn test_each_branch() {
        assert_eq!(assign_label(2.5, SIG), AssociationLabel::StrongAttractor);
        assert_eq!(assign_label(1.45, SIG), AssociationLabel::WeakAttractor);
        assert_eq!(assign_label(0.3, SIG), AssociationLabel::Neutral);
        assert_eq!(assign_label(-1.5, SIG), AssociationLabel::SlightRepeller);
        assert_eq!(assign_label(-23.0, SIG), AssociationLabel::StrongRepeller);
    }

    #[test]
    fn test_log_odds_boundaries() {
        assert_eq!(assign_label(2.0, SIG), AssociationLabel::StrongAttractor);
        assert_eq!(assign_label(1.0, SIG), AssociationLabel::WeakAttractor);
        assert_eq!(assign_label(-1.0, SIG), AssociationLabel::SlightRepeller);
        assert_eq!(assign_label(-2.0, SIG), AssociationLabel::StrongRepeller);

        assert_eq!(assign_label(1.999_999, SIG), AssociationLabel::WeakAttractor);
        assert_eq!(assign_label(0.999_999, SIG), AssociationLabel::Neutral);
        assert_eq!(assign_label(-0.999_999, SIG), AssociationLabel::Neutral);
        assert_eq!(
            assign_label(-1.999_999, SIG),
            AssociationLabel::SlightRepeller
        );
    }

    #[test]
    fn test_label_strings() {
        for label in AssociationLabel::ALL {
            assert_eq!(AssociationLabel::parse(label.as_str()), Some(label));
            assert_eq!(label.to_string(), label.as_str());
        }
        assert_eq!(AssociationLabel::parse("attractor"), None);
        assert!(!AssociationLabel::NotSignificant.is_significant());
        assert!(AssociationLabel::Neutral.is_significant());
    }
}
