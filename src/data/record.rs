use std::fmt;
use std::str::FromStr;

/// Selection algorithm a record store belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Algorithm {
    QuickSelect,
    LazySelect,
}

impl Algorithm {
    /// Panel order in every figure: QuickSelect on top, LazySelect below.
    pub const ALL: [Algorithm; 2] = [Algorithm::QuickSelect, Algorithm::LazySelect];

    /// Asymptotic constant of the expected comparison count `c * n`.
    pub fn comparison_constant(self) -> f64 {
        match self {
            Algorithm::QuickSelect => 3.386,
            Algorithm::LazySelect => 2.0,
        }
    }

    pub fn expected_comparisons(self, array_size: u64) -> f64 {
        self.comparison_constant() * array_size as f64
    }

    /// Formula text used in legends.
    pub fn formula(self) -> &'static str {
        match self {
            Algorithm::QuickSelect => "3.386 * n",
            Algorithm::LazySelect => "2 * n",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::QuickSelect => "QuickSelect",
            Algorithm::LazySelect => "LazySelect",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which order statistic was requested.
///
/// The derived ordering is the plotting order (`First`, `25%`, `Median`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kth {
    First,
    P25,
    Median,
}

impl Kth {
    pub const ALL: [Kth; 3] = [Kth::First, Kth::P25, Kth::Median];

    /// Label as written in the CSV sources and shown in legends.
    pub fn label(self) -> &'static str {
        match self {
            Kth::First => "First",
            Kth::P25 => "25%",
            Kth::Median => "Median",
        }
    }
}

impl fmt::Display for Kth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKth(pub String);

impl FromStr for Kth {
    type Err = UnknownKth;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "First" => Ok(Kth::First),
            "25%" => Ok(Kth::P25),
            "Median" => Ok(Kth::Median),
            other => Err(UnknownKth(other.to_string())),
        }
    }
}

/// Trial identifier, or the `Average` sentinel marking a row aggregated upstream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Run {
    Trial(u32),
    Average,
}

impl Run {
    pub fn is_average(self) -> bool {
        matches!(self, Run::Average)
    }
}

impl fmt::Display for Run {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Run::Trial(id) => write!(f, "{}", id),
            Run::Average => f.write_str("Average"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRun(pub String);

impl FromStr for Run {
    type Err = UnknownRun;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "Average" {
            return Ok(Run::Average);
        }
        s.parse::<u32>()
            .map(Run::Trial)
            .map_err(|_| UnknownRun(s.to_string()))
    }
}

/// One row of a benchmark CSV: a single trial or an upstream `Average` row.
#[derive(Clone, Debug, PartialEq)]
pub struct BenchmarkRecord {
    pub array_size: u64,
    pub kth: Kth,
    pub run: Run,
    pub empirical_comparisons: f64,
    pub running_time_micros: f64,
    pub expected_comparisons: f64,
}

impl BenchmarkRecord {
    /// Grouping key used by the aggregator.
    pub fn key(&self) -> (u64, Kth) {
        (self.array_size, self.kth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kth_parses_csv_labels() {
        assert_eq!("First".parse::<Kth>(), Ok(Kth::First));
        assert_eq!("25%".parse::<Kth>(), Ok(Kth::P25));
        assert_eq!(" Median ".parse::<Kth>(), Ok(Kth::Median));
        assert_eq!("75%".parse::<Kth>(), Err(UnknownKth("75%".into())));
    }

    #[test]
    fn kth_order_is_plot_order() {
        let mut ks = vec![Kth::Median, Kth::First, Kth::P25];
        ks.sort();
        assert_eq!(ks, Kth::ALL.to_vec());
    }

    #[test]
    fn run_distinguishes_sentinel() {
        assert_eq!("Average".parse::<Run>(), Ok(Run::Average));
        assert_eq!("17".parse::<Run>(), Ok(Run::Trial(17)));
        assert!("avg".parse::<Run>().is_err());
        assert!(Run::Average.is_average());
        assert!(!Run::Trial(1).is_average());
    }

    #[test]
    fn expected_formula_per_algorithm() {
        assert!((Algorithm::QuickSelect.expected_comparisons(1000) - 3386.0).abs() < 1e-9);
        assert!((Algorithm::LazySelect.expected_comparisons(1000) - 2000.0).abs() < 1e-9);
        assert_eq!(Algorithm::QuickSelect.formula(), "3.386 * n");
    }
}
