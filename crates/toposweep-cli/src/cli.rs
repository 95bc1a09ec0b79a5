//! Clap CLI definition: the flat flag set of the volume transformer.
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// How long arcs are cut down after the sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SplitKind {
    /// Split arcs whose function-value span exceeds the limit (default).
    Length,
    /// Split arcs holding more vertices than the limit.
    Size,
}

/// The per-vertex metric written to the output volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MetricKind {
    /// The vertex's own function value.
    Threshold,
    /// Closeness of the vertex to its subtree's extremum, in `[0, 1]`
    /// (default).
    Relevance,
    /// Relevance computed inline during its own sweep, without building the
    /// tree.
    Local,
    /// Straight-line fit quality of each arc's value profile.
    #[value(name = "R2", alias = "r2")]
    RSquared,
}

impl MetricKind {
    /// The metric name recorded in exported topology files.
    pub fn export_name(self) -> &'static str {
        match self {
            Self::Threshold => "Threshold",
            Self::Relevance => "Relevance",
            Self::Local => "LocalThreshold",
            Self::RSquared => "RSquared",
        }
    }
}

/// Transforms a raw scalar volume into a per-voxel metric volume via a merge
/// or split tree.
///
/// The input is `W*H*D` little-endian 32-bit floats; the output has the same
/// layout and goes to `--o` or standard output.
#[derive(Debug, Parser)]
#[command(name = "toposweep", version, about)]
pub struct Cli {
    /// Input raw volume.
    #[arg(long = "i", value_name = "PATH")]
    pub input: PathBuf,

    /// Output volume path; standard output when omitted.
    #[arg(long = "o", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Grid dimensions.
    #[arg(long = "dim", num_args = 3, value_names = ["W", "H", "D"], required = true)]
    pub dim: Vec<usize>,

    /// Tree type: 0 computes the merge tree, 1 the split tree.
    #[arg(
        long = "tree-type",
        value_name = "TYPE",
        default_value_t = 0,
        value_parser = clap::value_parser!(u8).range(0..=1)
    )]
    pub tree_type: u8,

    /// Ignore all data beyond this cut-off (below it for merge trees, above
    /// it for split trees).
    #[arg(
        long = "threshold",
        value_name = "VALUE",
        default_value_t = 0.0,
        allow_negative_numbers = true
    )]
    pub threshold: f32,

    /// How to split long arcs after the sweep.
    #[arg(long = "split-type", value_enum, default_value = "length")]
    pub split_type: SplitKind,

    /// Split limit; splitting is skipped unless positive.
    #[arg(long = "split", value_name = "LIMIT", default_value_t = -1.0, allow_hyphen_values = true)]
    pub split: f32,

    /// Per-vertex metric written to the output volume.
    #[arg(long = "metric", value_enum, default_value = "relevance")]
    pub metric: MetricKind,

    /// Also write `<BASE>.family` and `<BASE>.seg` topology files.
    #[arg(long = "family", value_name = "BASE")]
    pub family: Option<PathBuf>,

    /// Report progress on standard error.
    #[arg(long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use clap::Parser;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("toposweep").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn minimal_invocation_parses() {
        let cli = parse(&["--i", "in.raw", "--dim", "4", "4", "2"]);
        assert_eq!(cli.dim, vec![4, 4, 2]);
        assert_eq!(cli.tree_type, 0);
        assert_eq!(cli.metric, MetricKind::Relevance);
        assert_eq!(cli.split_type, SplitKind::Length);
        assert!(cli.split < 0.0, "splitting is off by default");
        assert!(cli.output.is_none());
        assert!(cli.family.is_none());
    }

    #[test]
    fn dim_requires_three_values() {
        let err = Cli::try_parse_from(["toposweep", "--i", "in.raw", "--dim", "4", "4"]);
        assert!(err.is_err());
    }

    #[test]
    fn input_is_required() {
        let err = Cli::try_parse_from(["toposweep", "--dim", "4", "4", "2"]);
        assert!(err.is_err());
    }

    #[test]
    fn tree_type_rejects_other_values() {
        let err = Cli::try_parse_from([
            "toposweep",
            "--i",
            "in.raw",
            "--dim",
            "4",
            "4",
            "2",
            "--tree-type",
            "2",
        ]);
        assert!(err.is_err());
    }

    #[test]
    fn metric_accepts_the_documented_spellings() {
        for (spelling, expected) in [
            ("threshold", MetricKind::Threshold),
            ("relevance", MetricKind::Relevance),
            ("local", MetricKind::Local),
            ("R2", MetricKind::RSquared),
        ] {
            let cli = parse(&["--i", "in.raw", "--dim", "2", "2", "1", "--metric", spelling]);
            assert_eq!(cli.metric, expected, "spelling {spelling}");
        }
    }

    #[test]
    fn split_flags_parse() {
        let cli = parse(&[
            "--i", "in.raw", "--dim", "2", "2", "1", "--split-type", "size", "--split", "8",
        ]);
        assert_eq!(cli.split_type, SplitKind::Size);
        assert_eq!(cli.split, 8.0);
    }

    #[test]
    fn export_names_match_the_file_format() {
        assert_eq!(MetricKind::Threshold.export_name(), "Threshold");
        assert_eq!(MetricKind::Relevance.export_name(), "Relevance");
        assert_eq!(MetricKind::Local.export_name(), "LocalThreshold");
        assert_eq!(MetricKind::RSquared.export_name(), "RSquared");
    }
}
