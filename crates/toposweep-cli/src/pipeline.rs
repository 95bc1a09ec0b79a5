//! The end-to-end transform: read volume, sweep, split, evaluate, write.
use toposweep_core::{
    Connectivity, Dims, FunctionType, GridNeighborhood, MergeTree, Metric, RSquared, Relevance,
    Threshold, TreeKind, VertexLabel, build_family, build_segmentation, local_threshold_sweep,
    sorted_sweep,
};

use crate::cli::{Cli, MetricKind, SplitKind};
use crate::error::CliError;
use crate::io;

/// How per-vertex output values are produced for the selected metric.
enum Evaluator {
    /// A tree-based metric object.
    Tree(Box<dyn Metric>),
    /// The inline local-threshold volume, computed by its own sweep.
    Local(Vec<FunctionType>),
}

impl Evaluator {
    fn explicit_arcs(&self) -> bool {
        match self {
            Self::Tree(metric) => metric.explicit_arcs(),
            Self::Local(_) => false,
        }
    }
}

/// Runs the whole pipeline for one parsed command line.
///
/// # Errors
///
/// Returns [`CliError`] for I/O failures, overflowing dimensions, and failed
/// topology exports. A sweep that labels nothing is not an error; the output
/// volume is all fill values.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    let dims = Dims::new(cli.dim[0], cli.dim[1], cli.dim[2]);
    let count = dims.vertex_count().ok_or(CliError::DimensionOverflow {
        dims: [dims.w, dims.h, dims.d],
    })?;

    if cli.verbose {
        eprintln!("reading {} ({count} vertices, {dims})", cli.input.display());
    }
    let field = io::read_volume(&cli.input, dims)?;

    let kind = if cli.tree_type == 0 {
        TreeKind::Merge
    } else {
        TreeKind::Split
    };
    let neighborhood = GridNeighborhood::new(dims, Connectivity::TwentySix);

    let evaluator = match cli.metric {
        MetricKind::Threshold => Evaluator::Tree(Box::new(Threshold)),
        MetricKind::Relevance => Evaluator::Tree(Box::new(Relevance)),
        MetricKind::RSquared => Evaluator::Tree(Box::new(RSquared)),
        MetricKind::Local => {
            if cli.verbose {
                eprintln!("computing local thresholds");
            }
            let mut out = vec![0.0; count];
            local_threshold_sweep(&field, kind, &neighborhood, cli.threshold, &mut out);
            Evaluator::Local(out)
        }
    };

    // The local metric needs no tree; without an export request its volume
    // is the whole answer.
    if cli.family.is_none() {
        if let Evaluator::Local(out) = &evaluator {
            return io::write_volume(cli.output.as_deref(), dims, out);
        }
    }

    let augmented = cli.family.is_some() || evaluator.explicit_arcs();

    let mut tree = MergeTree::new();
    let mut labels: Vec<VertexLabel> = vec![None; count];
    let swept = sorted_sweep(
        &field,
        kind,
        &neighborhood,
        cli.threshold,
        augmented,
        &mut tree,
        &mut labels,
    );
    if cli.verbose {
        eprintln!("swept {swept} of {count} vertices into {} nodes", tree.len());
    }

    // The export wants an explicit node at the rootward end of every trunk.
    if cli.family.is_some() {
        tree.materialize_root_minima();
    }

    if cli.split > 0.0 {
        match cli.split_type {
            SplitKind::Length => tree.split_by_length(&field, cli.split),
            SplitKind::Size => tree.split_by_size(cli.split as usize),
        }
        if cli.verbose {
            eprintln!("split pass left {} arcs", tree.len());
        }
    }

    // Store per-node metric values whenever something will read them: the
    // augmented output path and the export both do.
    if augmented {
        match &evaluator {
            Evaluator::Tree(metric) => metric.eval_tree(&field, &mut tree),
            Evaluator::Local(local) => {
                for id in tree.node_ids().collect::<Vec<_>>() {
                    let v = tree.node(id).index();
                    tree.set_metric(id, local[v]);
                }
            }
        }
    }

    // Arc-based metrics only exist per node, so their output reads the node
    // value through the label; pointwise metrics stay pointwise even when an
    // export forced the augmented sweep.
    let transformed: Vec<FunctionType>;
    let out: &[FunctionType] = match &evaluator {
        Evaluator::Local(local) => local,
        Evaluator::Tree(metric) if metric.explicit_arcs() => {
            let fill = metric.fill_value();
            transformed = (0..count)
                .map(|v| labels[v].map_or(fill, |label| tree.node(label).metric()))
                .collect();
            &transformed
        }
        Evaluator::Tree(metric) => {
            transformed = (0..count)
                .map(|v| metric.eval(&field, &tree, v, labels[v]))
                .collect();
            &transformed
        }
    };
    io::write_volume(cli.output.as_deref(), dims, out)?;

    if let Some(base) = &cli.family {
        export_topology(&tree, kind, cli.metric, dims, base)?;
    }

    Ok(())
}

/// Writes the `<base>.family` and `<base>.seg` documents.
fn export_topology(
    tree: &MergeTree,
    kind: TreeKind,
    metric: MetricKind,
    dims: Dims,
    base: &std::path::Path,
) -> Result<(), CliError> {
    let to_export_error = |e: toposweep_core::FamilyError| CliError::ExportFailed {
        detail: e.to_string(),
    };

    let family = build_family(tree, kind, metric.export_name()).map_err(to_export_error)?;
    let segmentation = build_segmentation(tree, dims).map_err(to_export_error)?;

    let family_path = std::path::PathBuf::from(format!("{}.family", base.display()));
    let seg_path = std::path::PathBuf::from(format!("{}.seg", base.display()));
    io::write_json(&family_path, &family)?;
    io::write_json(&seg_path, &segmentation)
}
