use crate::core::models::ids::{IsotopologueId, MoleculeId};
use crate::core::models::line::{LineRecord, ScaledLine};
use crate::core::molecules::resolver::MoleculeResolver;
use crate::core::partition::provider::PartitionFunctionProvider;
use crate::engine::config::ScalingConfig;
use crate::engine::error::ScaleError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::scaler::{LinestrengthScaler, validate_temperatures};
use std::collections::{BTreeSet, HashMap};
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq)]
pub struct MoleculeSummary {
    pub molecule_id: MoleculeId,
    pub molecule: String,
    pub line_count: usize,
    pub isotopologues: Vec<IsotopologueId>,
}

#[derive(Debug, Clone)]
pub struct ScalingResult {
    /// One entry per input line, in input order.
    pub lines: Vec<ScaledLine>,
    /// Per-molecule breakdown, in order of first appearance.
    pub molecules: Vec<MoleculeSummary>,
}

/// Scales a line list that may contain several molecules.
///
/// The table is split by molecule id, every group goes through the same
/// [`LinestrengthScaler`] (so its partition function cache is shared) and the
/// results are put back into the original line order.
#[instrument(skip_all, name = "scaling_workflow", fields(lines = lines.len()))]
pub fn run<R, P>(
    lines: &[LineRecord],
    config: &ScalingConfig,
    resolver: R,
    provider: P,
    reporter: &ProgressReporter,
) -> Result<ScalingResult, ScaleError>
where
    R: MoleculeResolver,
    P: PartitionFunctionProvider,
{
    let (t_ref, t_gas) = (config.reference_temperature, config.gas_temperature);
    validate_temperatures(t_ref, t_gas)?;
    if lines.is_empty() {
        return Err(ScaleError::EmptyLineSet);
    }

    let groups = group_by_molecule(lines);
    info!(
        molecules = groups.len(),
        "Scaling {} line(s) from {} K to {} K.",
        lines.len(),
        t_ref,
        t_gas
    );

    let scaler = LinestrengthScaler::new(resolver, provider).with_constants(config.constants);
    let mut slots: Vec<Option<ScaledLine>> = vec![None; lines.len()];
    let mut molecules = Vec::with_capacity(groups.len());

    for (molecule_id, indices) in groups {
        let batch: Vec<LineRecord> = indices.iter().map(|&i| lines[i]).collect();
        let molecule = scaler.resolver().resolve(molecule_id)?;
        reporter.report(Progress::Message(format!(
            "{molecule}: {} line(s)",
            batch.len()
        )));

        let scaled = scaler.scale_with_progress(&batch, t_ref, t_gas, reporter)?;
        for (&i, line) in indices.iter().zip(scaled) {
            slots[i] = Some(line);
        }

        let isotopologues: BTreeSet<IsotopologueId> =
            batch.iter().map(|l| l.isotopologue_id).collect();
        molecules.push(MoleculeSummary {
            molecule_id,
            molecule,
            line_count: batch.len(),
            isotopologues: isotopologues.into_iter().collect(),
        });
    }

    let lines = slots
        .into_iter()
        .enumerate()
        .map(|(i, slot)| {
            slot.ok_or_else(|| ScaleError::Internal(format!("line {i} was not scaled")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    info!(
        cached_partition_functions = scaler.cache().len(),
        "Scaling workflow finished."
    );
    Ok(ScalingResult { lines, molecules })
}

fn group_by_molecule(lines: &[LineRecord]) -> Vec<(MoleculeId, Vec<usize>)> {
    let mut position: HashMap<MoleculeId, usize> = HashMap::new();
    let mut groups: Vec<(MoleculeId, Vec<usize>)> = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let slot = *position.entry(line.molecule_id).or_insert_with(|| {
            groups.push((line.molecule_id, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(i);
    }
    groups
}
