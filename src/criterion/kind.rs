//! Named criterion presets and the composition they stand for.

use crate::core::error::{Result, SplitError};
use crate::split::{Impurity, MaxCutStrategy, WeightLaw};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How attributes are ordered before split search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RankerKind {
    /// Every valid attribute competes on its criterion value
    Identity,
    /// Conditional-inference ordering by permutation test
    PermutationTest,
}

/// How the values of a nominal attribute are partitioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FinderKind {
    Twoing,
    LargestClassAlone,
    HypercubeCover,
    PcExt,
    MaxCut { strategy: MaxCutStrategy, law: WeightLaw },
}

/// A ranker, a finder and the impurity every candidate is measured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CriterionSpec {
    pub ranker: RankerKind,
    pub finder: FinderKind,
    pub impurity: Impurity,
}

impl CriterionSpec {
    /// Composition with the identity ranker.
    pub fn new(finder: FinderKind, impurity: Impurity) -> Self {
        CriterionSpec {
            ranker: RankerKind::Identity,
            finder,
            impurity,
        }
    }

    /// Same finder and impurity behind a permutation-test ranking.
    pub fn conditional_inference(self) -> Self {
        CriterionSpec {
            ranker: RankerKind::PermutationTest,
            ..self
        }
    }
}

/// The criteria shipped with the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CriterionKind {
    Twoing,
    LargestClassAlone,
    HypercubeCover,
    PcExt,
    PcExtEntropy,
    GwSquaredGini,
    GwChiSquare,
    LsSquaredGini,
    LsChiSquare,
    CiTwoing,
    CiLargestClassAlone,
    CiHypercubeCover,
    CiPcExt,
    CiPcExtEntropy,
    CiGwSquaredGini,
    CiGwChiSquare,
    CiLsSquaredGini,
    CiLsChiSquare,
}

impl CriterionKind {
    /// Every preset, plain ones first.
    pub fn all() -> [CriterionKind; 18] {
        use CriterionKind::*;
        [
            Twoing,
            LargestClassAlone,
            HypercubeCover,
            PcExt,
            PcExtEntropy,
            GwSquaredGini,
            GwChiSquare,
            LsSquaredGini,
            LsChiSquare,
            CiTwoing,
            CiLargestClassAlone,
            CiHypercubeCover,
            CiPcExt,
            CiPcExtEntropy,
            CiGwSquaredGini,
            CiGwChiSquare,
            CiLsSquaredGini,
            CiLsChiSquare,
        ]
    }

    /// Stable kebab-case name.
    pub fn name(self) -> &'static str {
        use CriterionKind::*;
        match self {
            Twoing => "twoing",
            LargestClassAlone => "largest-class-alone",
            HypercubeCover => "hypercube-cover",
            PcExt => "pc-ext",
            PcExtEntropy => "pc-ext-entropy",
            GwSquaredGini => "gw-squared-gini",
            GwChiSquare => "gw-chi-square",
            LsSquaredGini => "ls-squared-gini",
            LsChiSquare => "ls-chi-square",
            CiTwoing => "ci-twoing",
            CiLargestClassAlone => "ci-largest-class-alone",
            CiHypercubeCover => "ci-hypercube-cover",
            CiPcExt => "ci-pc-ext",
            CiPcExtEntropy => "ci-pc-ext-entropy",
            CiGwSquaredGini => "ci-gw-squared-gini",
            CiGwChiSquare => "ci-gw-chi-square",
            CiLsSquaredGini => "ci-ls-squared-gini",
            CiLsChiSquare => "ci-ls-chi-square",
        }
    }

    /// Whether attributes are ranked by permutation test first.
    pub fn is_conditional_inference(self) -> bool {
        self.spec().ranker == RankerKind::PermutationTest
    }

    /// Composition this preset stands for.
    pub fn spec(self) -> CriterionSpec {
        use CriterionKind::*;
        let max_cut = |strategy, law| FinderKind::MaxCut { strategy, law };
        let gw = MaxCutStrategy::GoemansWilliamson;
        let ls = MaxCutStrategy::LocalSearch;

        let plain = |kind: CriterionKind| match kind {
            Twoing | CiTwoing => CriterionSpec::new(FinderKind::Twoing, Impurity::Gini),
            LargestClassAlone | CiLargestClassAlone => {
                CriterionSpec::new(FinderKind::LargestClassAlone, Impurity::Gini)
            }
            HypercubeCover | CiHypercubeCover => CriterionSpec::new(FinderKind::HypercubeCover, Impurity::Gini),
            PcExt | CiPcExt => CriterionSpec::new(FinderKind::PcExt, Impurity::Gini),
            PcExtEntropy | CiPcExtEntropy => CriterionSpec::new(FinderKind::PcExt, Impurity::Entropy),
            GwSquaredGini | CiGwSquaredGini => CriterionSpec::new(max_cut(gw, WeightLaw::SquaredGini), Impurity::Gini),
            GwChiSquare | CiGwChiSquare => CriterionSpec::new(max_cut(gw, WeightLaw::ChiSquare), Impurity::Gini),
            LsSquaredGini | CiLsSquaredGini => CriterionSpec::new(max_cut(ls, WeightLaw::SquaredGini), Impurity::Gini),
            LsChiSquare | CiLsChiSquare => CriterionSpec::new(max_cut(ls, WeightLaw::ChiSquare), Impurity::Gini),
        };

        let spec = plain(self);
        let ranked = matches!(
            self,
            CiTwoing
                | CiLargestClassAlone
                | CiHypercubeCover
                | CiPcExt
                | CiPcExtEntropy
                | CiGwSquaredGini
                | CiGwChiSquare
                | CiLsSquaredGini
                | CiLsChiSquare
        );
        if ranked {
            spec.conditional_inference()
        } else {
            spec
        }
    }
}

impl fmt::Display for CriterionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for CriterionKind {
    type Err = SplitError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        CriterionKind::all()
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| SplitError::invalid_parameter("criterion", s, "unknown criterion name"))
    }
}
