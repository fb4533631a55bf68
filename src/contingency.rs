//! 2×2 contingency tables
//!
//! Rows are "this verb" vs. "all other verbs", columns are the causative and
//! intransitive frames:
//!
//! ```text
//!          causative   intransitive
//! verb       O11           O12
//! other      O21           O22
//! ```
//!
//! Provides the Pearson chi-square test (Yates-corrected, 1 df), the
//! two-sided Fisher exact test and the smoothed odds ratio.

use statrs::function::erf::erfc;
use statrs::function::factorial::ln_binomial;

/// Added to the odds-ratio denominator and before taking the logarithm
pub const SMOOTHING: f64 = 1e-10;

/// Tables whose probability is within this relative distance of the observed
/// one count as "at least as extreme" in the Fisher test
const FISHER_RELATIVE_TOLERANCE: f64 = 1e-7;

/// Observed counts of a 2×2 table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContingencyTable {
    pub o11: u64,
    pub o12: u64,
    pub o21: u64,
    pub o22: u64,
}

/// Result of a chi-square test of independence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiSquareTest {
    pub statistic: f64,
    pub p_value: f64,
}

impl ChiSquareTest {
    /// Reported when the test is undefined (an expected frequency is zero)
    pub const UNDEFINED: ChiSquareTest = ChiSquareTest {
        statistic: 0.0,
        p_value: 1.0,
    };
}

impl ContingencyTable {
    pub fn new(o11: u64, o12: u64, o21: u64, o22: u64) -> Self {
        Self { o11, o12, o21, o22 }
    }

    fn cells(&self) -> [[u64; 2]; 2] {
        [[self.o11, self.o12], [self.o21, self.o22]]
    }

    pub fn row_totals(&self) -> [u64; 2] {
        [self.o11 + self.o12, self.o21 + self.o22]
    }

    pub fn column_totals(&self) -> [u64; 2] {
        [self.o11 + self.o21, self.o12 + self.o22]
    }

    pub fn total(&self) -> u64 {
        self.o11 + self.o12 + self.o21 + self.o22
    }

    /// True when a row or column sums to zero
    pub fn is_degenerate(&self) -> bool {
        self.row_totals().contains(&0) || self.column_totals().contains(&0)
    }

    /// Expected frequencies under independence
    pub fn expected(&self) -> [[f64; 2]; 2] {
        let rows = self.row_totals();
        let cols = self.column_totals();
        let total = self.total() as f64;
        let mut expected = [[0.0; 2]; 2];
        for (i, row) in rows.iter().enumerate() {
            for (j, col) in cols.iter().enumerate() {
                expected[i][j] = (*row as f64) * (*col as f64) / total;
            }
        }
        expected
    }

    /// Chi-square test of independence with Yates' continuity correction
    ///
    /// Each observed cell is moved toward its expected value by at most 0.5
    /// before the statistic is summed. The p-value is the upper tail of the
    /// chi-square distribution with one degree of freedom.
    pub fn chi_square(&self) -> ChiSquareTest {
        if self.is_degenerate() {
            return ChiSquareTest::UNDEFINED;
        }

        let expected = self.expected();
        let mut statistic = 0.0;
        for (observed_row, expected_row) in self.cells().iter().zip(expected.iter()) {
            for (&observed, &expected) in observed_row.iter().zip(expected_row.iter()) {
                let observed = observed as f64;
                let diff = expected - observed;
                let corrected = observed + diff.signum() * diff.abs().min(0.5);
                statistic += (corrected - expected).powi(2) / expected;
            }
        }

        ChiSquareTest {
            statistic,
            p_value: chi2_1df_survival(statistic),
        }
    }

    /// Two-sided Fisher exact test
    ///
    /// Sums the hypergeometric probabilities of every table with the same
    /// margins that is no more probable than the observed one.
    pub fn fisher_exact(&self) -> f64 {
        if self.is_degenerate() {
            return 1.0;
        }

        let [n1, n2] = self.row_totals();
        let n = self.column_totals()[0];
        let population = n1 + n2;
        let ln_norm = ln_binomial(population, n);
        let ln_pmf = |x: u64| ln_binomial(n1, x) + ln_binomial(n2, n - x) - ln_norm;

        let threshold = ln_pmf(self.o11) + FISHER_RELATIVE_TOLERANCE.ln_1p();
        let lo = n.saturating_sub(n2);
        let hi = n.min(n1);

        let p: f64 = (lo..=hi)
            .map(ln_pmf)
            .filter(|&lp| lp <= threshold)
            .map(f64::exp)
            .sum();
        p.min(1.0)
    }

    /// `(O11·O22) / (O12·O21 + ε)`
    pub fn odds_ratio(&self) -> f64 {
        (self.o11 as f64 * self.o22 as f64) / (self.o12 as f64 * self.o21 as f64 + SMOOTHING)
    }

    /// `ln(odds_ratio + ε)`
    pub fn log_odds_ratio(&self) -> f64 {
        (self.odds_ratio() + SMOOTHING).ln()
    }
}

/// Upper tail of χ²(1) at `x`
#[inline]
pub fn chi2_1df_survival(x: f64) -> f64 {
    if x <= 0.0 {
        return 1.0;
    }
    erfc((x / 2.0).sqrt())
}
