use super::cache::PartitionCache;
use super::error::ScaleError;
use super::progress::{Progress, ProgressReporter};
use crate::core::models::ids::{IsotopologueId, MoleculeId};
use crate::core::models::line::{LineRecord, ScaledLine};
use crate::core::molecules::resolver::MoleculeResolver;
use crate::core::partition::provider::PartitionFunctionProvider;
use crate::core::physics::constants::RadiationConstants;
use crate::core::physics::scaling::scaled_linestrength;
use std::collections::BTreeSet;
use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Phase reported while partition functions are resolved, one step per isotopologue.
pub const PARTITION_PHASE: &str = "Partition functions";
/// Phase reported while the scaling law is applied, one step per [`LINES_PER_STEP`] lines.
pub const SCALING_PHASE: &str = "Linestrength scaling";
pub const LINES_PER_STEP: usize = 4096;

/// Partition functions of one isotopologue at the reference and gas temperatures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsotopologuePartition {
    pub q_ref: f64,
    pub q_gas: f64,
}

/// Rejects non-positive and non-finite temperatures before any work is done.
pub fn validate_temperatures(t_ref: f64, t_gas: f64) -> Result<(), ScaleError> {
    for (which, value) in [("reference", t_ref), ("gas", t_gas)] {
        if !(value.is_finite() && value > 0.0) {
            return Err(ScaleError::InvalidTemperature { which, value });
        }
    }
    Ok(())
}

/// Scales a single-molecule batch of lines from `t_ref` to `t_gas` with a fresh cache
/// and the CODATA radiation constants.
pub fn scale<R, P>(
    lines: &[LineRecord],
    resolver: R,
    provider: P,
    t_ref: f64,
    t_gas: f64,
) -> Result<Vec<ScaledLine>, ScaleError>
where
    R: MoleculeResolver,
    P: PartitionFunctionProvider,
{
    LinestrengthScaler::new(resolver, provider).scale(lines, t_ref, t_gas)
}

/// Equilibrium linestrength scaler.
///
/// Partition functions are looked up once per isotopologue present in a batch
/// (never per line) and memoized in a cache owned by the scaler, so a scaler
/// reused across batches at the same temperatures does not query the provider again.
pub struct LinestrengthScaler<R, P> {
    resolver: R,
    provider: P,
    constants: RadiationConstants,
    cache: PartitionCache,
}

impl<R, P> LinestrengthScaler<R, P>
where
    R: MoleculeResolver,
    P: PartitionFunctionProvider,
{
    pub fn new(resolver: R, provider: P) -> Self {
        Self {
            resolver,
            provider,
            constants: RadiationConstants::default(),
            cache: PartitionCache::new(),
        }
    }

    pub fn with_constants(mut self, constants: RadiationConstants) -> Self {
        self.constants = constants;
        self
    }

    pub fn constants(&self) -> &RadiationConstants {
        &self.constants
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn cache(&self) -> &PartitionCache {
        &self.cache
    }

    /// Drops every memoized partition function, e.g. after the provider's data changed.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn scale(
        &self,
        lines: &[LineRecord],
        t_ref: f64,
        t_gas: f64,
    ) -> Result<Vec<ScaledLine>, ScaleError> {
        self.scale_with_progress(lines, t_ref, t_gas, &ProgressReporter::new())
    }

    /// Returns one [`ScaledLine`] per input line, in input order. Either every
    /// line is scaled or an error is returned; there is no partial output.
    #[instrument(skip_all, name = "linestrength_scaling", fields(lines = lines.len(), t_ref = t_ref, t_gas = t_gas))]
    pub fn scale_with_progress(
        &self,
        lines: &[LineRecord],
        t_ref: f64,
        t_gas: f64,
        reporter: &ProgressReporter,
    ) -> Result<Vec<ScaledLine>, ScaleError> {
        validate_temperatures(t_ref, t_gas)?;
        let molecule_id = single_molecule(lines)?;
        let molecule = self.resolver.resolve(molecule_id)?;

        let active: BTreeSet<IsotopologueId> = lines.iter().map(|l| l.isotopologue_id).collect();
        info!(
            %molecule,
            isotopologues = active.len(),
            "Scaling {} line(s) from {} K to {} K.",
            lines.len(),
            t_ref,
            t_gas
        );

        let partitions = reporter.task(PARTITION_PHASE, active.len(), || {
            self.partition_table(&molecule, &active, t_ref, t_gas, reporter)
        })?;

        let steps = lines.len().div_ceil(LINES_PER_STEP);
        let scaled = reporter.task(SCALING_PHASE, steps, || {
            self.apply(lines, &partitions, t_ref, t_gas, reporter)
        })?;

        debug!(cached = self.cache.len(), "Scaling finished.");
        Ok(scaled)
    }

    /// Builds a table indexed directly by isotopologue number. Ids absent from
    /// the batch hold `None` and are never sent to the provider.
    fn partition_table(
        &self,
        molecule: &str,
        active: &BTreeSet<IsotopologueId>,
        t_ref: f64,
        t_gas: f64,
        reporter: &ProgressReporter,
    ) -> Result<Vec<Option<IsotopologuePartition>>, ScaleError> {
        let max_iso = active.last().map_or(0, |iso| iso.index() + 1);
        let ids: Vec<IsotopologueId> = active.iter().copied().collect();

        #[cfg(not(feature = "parallel"))]
        let iterator = ids.iter();

        #[cfg(feature = "parallel")]
        let iterator = ids.par_iter();

        let computed: Vec<(IsotopologueId, IsotopologuePartition)> = iterator
            .map(|&iso| -> Result<(IsotopologueId, IsotopologuePartition), ScaleError> {
                let partition = IsotopologuePartition {
                    q_ref: self.partition_function(molecule, iso, t_ref)?,
                    q_gas: self.partition_function(molecule, iso, t_gas)?,
                };
                debug!(
                    %iso,
                    q_ref = partition.q_ref,
                    q_gas = partition.q_gas,
                    "Resolved partition functions."
                );
                reporter.report(Progress::TaskIncrement);
                Ok((iso, partition))
            })
            .collect::<Result<_, _>>()?;

        let mut table = vec![None; max_iso];
        for (iso, partition) in computed {
            table[iso.index()] = Some(partition);
        }
        Ok(table)
    }

    fn partition_function(
        &self,
        molecule: &str,
        isotopologue: IsotopologueId,
        temperature: f64,
    ) -> Result<f64, ScaleError> {
        let value = self
            .cache
            .get_or_compute(&self.provider, molecule, isotopologue, temperature)
            .map_err(|source| ScaleError::MissingPartitionFunction {
                molecule: molecule.to_string(),
                isotopologue,
                temperature,
                source,
            })?;

        if value.is_finite() && value > 0.0 {
            Ok(value)
        } else {
            Err(ScaleError::InvalidPartitionFunction {
                molecule: molecule.to_string(),
                isotopologue,
                temperature,
                value,
            })
        }
    }

    fn apply(
        &self,
        lines: &[LineRecord],
        partitions: &[Option<IsotopologuePartition>],
        t_ref: f64,
        t_gas: f64,
        reporter: &ProgressReporter,
    ) -> Result<Vec<ScaledLine>, ScaleError> {
        #[cfg(not(feature = "parallel"))]
        let iterator = lines.chunks(LINES_PER_STEP);

        #[cfg(feature = "parallel")]
        let iterator = lines.par_chunks(LINES_PER_STEP);

        let chunks: Vec<Vec<ScaledLine>> = iterator
            .map(|chunk| -> Result<Vec<ScaledLine>, ScaleError> {
                let scaled = chunk
                    .iter()
                    .map(|line| self.scale_line(line, partitions, t_ref, t_gas))
                    .collect::<Result<Vec<_>, _>>()?;
                reporter.report(Progress::TaskIncrement);
                Ok(scaled)
            })
            .collect::<Result<_, _>>()?;

        Ok(chunks.into_iter().flatten().collect())
    }

    fn scale_line(
        &self,
        line: &LineRecord,
        partitions: &[Option<IsotopologuePartition>],
        t_ref: f64,
        t_gas: f64,
    ) -> Result<ScaledLine, ScaleError> {
        let partition = partitions
            .get(line.isotopologue_id.index())
            .copied()
            .flatten()
            .ok_or_else(|| {
                ScaleError::Internal(format!(
                    "no partition functions resolved for isotopologue {}",
                    line.isotopologue_id
                ))
            })?;
        Ok(ScaledLine {
            record: *line,
            q_ref: partition.q_ref,
            q_gas: partition.q_gas,
            linestrength: scaled_linestrength(
                &self.constants,
                line,
                partition.q_ref,
                partition.q_gas,
                t_ref,
                t_gas,
            ),
        })
    }
}

fn single_molecule(lines: &[LineRecord]) -> Result<MoleculeId, ScaleError> {
    let first = lines.first().ok_or(ScaleError::EmptyLineSet)?.molecule_id;
    match lines.iter().position(|l| l.molecule_id != first) {
        Some(index) => Err(ScaleError::MixedMolecules {
            index,
            expected: first,
            found: lines[index].molecule_id,
        }),
        None => Ok(first),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::molecules::hitran::HitranMolecules;
    use crate::core::partition::provider::PartitionError;
    use crate::core::partition::tabulated::TabulatedPartitionFunction;
    use std::collections::HashMap;
    use std::sync::Mutex;

    const C2: f64 = 1.4387769;

    /// Serves fixed Q values and records every query it receives.
    #[derive(Default)]
    struct StubProvider {
        values: HashMap<(u16, u64), f64>,
        queries: Mutex<Vec<(String, IsotopologueId, f64)>>,
    }

    impl StubProvider {
        fn with(mut self, iso: u16, temperature: f64, q: f64) -> Self {
            self.values.insert((iso, temperature.to_bits()), q);
            self
        }

        fn queried_isotopologues(&self) -> BTreeSet<u16> {
            self.queries.lock().unwrap().iter().map(|(_, iso, _)| iso.0).collect()
        }

        fn query_count(&self) -> usize {
            self.queries.lock().unwrap().len()
        }
    }

    impl PartitionFunctionProvider for StubProvider {
        fn at(
            &self,
            molecule: &str,
            isotopologue: IsotopologueId,
            temperature: f64,
        ) -> Result<f64, PartitionError> {
            self.queries
                .lock()
                .unwrap()
                .push((molecule.to_string(), isotopologue, temperature));
            self.values
                .get(&(isotopologue.0, temperature.to_bits()))
                .copied()
                .ok_or_else(|| PartitionError::UnsupportedIsotopologue {
                    molecule: molecule.to_string(),
                    isotopologue,
                })
        }
    }

    fn co2_provider() -> StubProvider {
        StubProvider::default()
            .with(0, 296.0, 10.0)
            .with(0, 1000.0, 40.0)
            .with(1, 296.0, 286.09)
            .with(1, 1000.0, 1187.3)
            .with(2, 296.0, 576.64)
            .with(2, 1000.0, 2407.9)
    }

    fn co2_lines() -> Vec<LineRecord> {
        vec![
            LineRecord::new(2u16, 1u16, 3.5e-18, 0.0, 2349.14),
            LineRecord::new(2u16, 2u16, 3.7e-20, 2.34, 2283.49),
            LineRecord::new(2u16, 1u16, 1.2e-19, 1500.2, 2300.01),
            LineRecord::new(2u16, 0u16, 5.0e-23, 667.4, 720.8),
            LineRecord::new(2u16, 2u16, 8.1e-21, 960.0, 2250.0),
        ]
    }

    fn relative_error(a: f64, b: f64) -> f64 {
        ((a - b) / b).abs()
    }

    #[test]
    fn identity_at_equal_temperatures() {
        let provider = co2_provider();
        let lines = co2_lines();
        let scaled = scale(&lines, HitranMolecules, &provider, 296.0, 296.0).unwrap();

        for (line, out) in lines.iter().zip(&scaled) {
            assert!(relative_error(out.linestrength, line.reference_intensity) < 1e-10);
            assert_eq!(out.q_ref, out.q_gas);
        }
    }

    #[test]
    fn concrete_scenario_reproduces_direct_formula() {
        let provider = StubProvider::default().with(1, 296.0, 1.0).with(1, 300.0, 1.02);
        let lines = [LineRecord::new(6u16, 1u16, 1.0e-22, 1000.0, 2000.0)];
        let scaler = LinestrengthScaler::new(HitranMolecules, &provider)
            .with_constants(RadiationConstants::new(C2));

        let scaled = scaler.scale(&lines, 296.0, 300.0).unwrap();

        let (t_ref, t_gas) = (296.0_f64, 300.0_f64);
        let expected = 1.0e-22 * (1.0 / 1.02)
            * (-C2 * 1000.0 * (1.0 / t_gas - 1.0 / t_ref)).exp()
            * (1.0 - (-C2 * 2000.0 / t_gas).exp())
            / (1.0 - (-C2 * 2000.0 / t_ref).exp());
        assert_eq!(scaled.len(), 1);
        assert_eq!(scaled[0].q_ref, 1.0);
        assert_eq!(scaled[0].q_gas, 1.02);
        assert!(relative_error(scaled[0].linestrength, expected) < 1e-12);
    }

    #[test]
    fn output_is_positive_and_aligned_with_input() {
        let provider = co2_provider();
        let lines = co2_lines();
        let scaled = scale(&lines, HitranMolecules, &provider, 296.0, 1000.0).unwrap();

        assert_eq!(scaled.len(), lines.len());
        for (line, out) in lines.iter().zip(&scaled) {
            assert_eq!(&out.record, line);
            assert!(out.linestrength > 0.0);
        }
    }

    #[test]
    fn lines_of_one_isotopologue_share_partition_functions() {
        let provider = co2_provider();
        let scaled = scale(&co2_lines(), HitranMolecules, &provider, 296.0, 1000.0).unwrap();

        let mut seen: HashMap<IsotopologueId, (f64, f64)> = HashMap::new();
        for out in &scaled {
            let pair = (out.q_ref, out.q_gas);
            assert_eq!(*seen.entry(out.isotopologue_id()).or_insert(pair), pair);
        }
        assert_eq!(seen[&IsotopologueId(1)], (286.09, 1187.3));
        assert_eq!(seen[&IsotopologueId(2)], (576.64, 2407.9));
    }

    #[test]
    fn provider_is_queried_once_per_isotopologue_and_temperature() {
        let provider = co2_provider();
        let mut lines = co2_lines();
        lines.extend(co2_lines());

        let scaler = LinestrengthScaler::new(HitranMolecules, &provider);
        scaler.scale(&lines, 296.0, 1000.0).unwrap();
        assert_eq!(provider.query_count(), 6);

        // A second batch at the same temperatures is served from the cache.
        scaler.scale(&lines, 296.0, 1000.0).unwrap();
        assert_eq!(provider.query_count(), 6);

        scaler.clear_cache();
        scaler.scale(&lines, 296.0, 1000.0).unwrap();
        assert_eq!(provider.query_count(), 12);
    }

    #[test]
    fn progress_advances_once_per_isotopologue_and_line_chunk() {
        let provider = co2_provider();
        let template = co2_lines();
        let lines: Vec<LineRecord> = template
            .iter()
            .cycle()
            .take(2 * LINES_PER_STEP + 1)
            .copied()
            .collect();
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            events.lock().unwrap().push(event);
        }));

        let scaler = LinestrengthScaler::new(HitranMolecules, &provider);
        let scaled = scaler
            .scale_with_progress(&lines, 296.0, 1000.0, &reporter)
            .unwrap();
        drop(reporter);
        assert_eq!(scaled.len(), lines.len());
        assert_eq!(scaled[LINES_PER_STEP].record, lines[LINES_PER_STEP]);

        let events = events.into_inner().unwrap();
        let phase_of = |name: &str| -> (Option<u64>, usize) {
            let start = events
                .iter()
                .position(|e| matches!(e, Progress::PhaseStart { name: n } if *n == name))
                .unwrap();
            let end = start
                + events[start..]
                    .iter()
                    .position(|e| matches!(e, Progress::PhaseFinish))
                    .unwrap();
            let total = events[start..end].iter().find_map(|e| match e {
                Progress::TaskStart { total_steps } => Some(*total_steps),
                _ => None,
            });
            let increments = events[start..end]
                .iter()
                .filter(|e| matches!(e, Progress::TaskIncrement))
                .count();
            (total, increments)
        };

        assert_eq!(phase_of(PARTITION_PHASE), (Some(2), 2));
        assert_eq!(phase_of(SCALING_PHASE), (Some(3), 3));
    }

    #[test]
    fn permuting_input_permutes_output() {
        let provider = co2_provider();
        let lines = co2_lines();
        let mut reversed = lines.clone();
        reversed.reverse();

        let forward = scale(&lines, HitranMolecules, &provider, 296.0, 1000.0).unwrap();
        let mut backward = scale(&reversed, HitranMolecules, &provider, 296.0, 1000.0).unwrap();
        backward.reverse();

        assert_eq!(forward, backward);
    }

    #[test]
    fn sparse_isotopologue_ids_never_query_the_gaps() {
        let provider = StubProvider::default()
            .with(0, 296.0, 10.0)
            .with(0, 500.0, 20.0)
            .with(2, 296.0, 30.0)
            .with(2, 500.0, 60.0);
        let lines = [
            LineRecord::new(5u16, 2u16, 1e-20, 100.0, 2100.0),
            LineRecord::new(5u16, 0u16, 1e-21, 50.0, 2050.0),
        ];

        let scaled = scale(&lines, HitranMolecules, &provider, 296.0, 500.0).unwrap();

        assert_eq!(provider.queried_isotopologues(), BTreeSet::from([0, 2]));
        assert_eq!(scaled[0].q_gas, 60.0);
        assert_eq!(scaled[1].q_gas, 20.0);
    }

    #[test]
    fn missing_partition_function_fails_the_whole_batch() {
        let provider = co2_provider();
        let mut lines = co2_lines();
        lines.push(LineRecord::new(2u16, 3u16, 1e-22, 10.0, 2200.0));

        let err = scale(&lines, HitranMolecules, &provider, 296.0, 1000.0).unwrap_err();
        match err {
            ScaleError::MissingPartitionFunction {
                molecule,
                isotopologue,
                temperature,
                source: PartitionError::UnsupportedIsotopologue { .. },
            } => {
                assert_eq!(molecule, "CO2");
                assert_eq!(isotopologue, IsotopologueId(3));
                assert_eq!(temperature, 296.0);
            }
            other => panic!("expected MissingPartitionFunction, got {other:?}"),
        }
    }

    #[test]
    fn out_of_range_temperature_is_wrapped_with_context() {
        let mut table = TabulatedPartitionFunction::new();
        table
            .insert("CO", IsotopologueId(1), vec![(70.0, 25.0), (3000.0, 1100.0)])
            .unwrap();
        let lines = [LineRecord::new(5u16, 1u16, 1e-20, 100.0, 2143.0)];

        let err = scale(&lines, HitranMolecules, &table, 296.0, 5000.0).unwrap_err();
        assert!(matches!(
            err,
            ScaleError::MissingPartitionFunction {
                temperature,
                source: PartitionError::TemperatureOutOfRange { .. },
                ..
            } if temperature == 5000.0
        ));
    }

    #[test]
    fn invalid_temperatures_fail_before_any_provider_call() {
        let provider = co2_provider();
        let lines = co2_lines();
        let cases = [
            (0.0, 300.0),
            (296.0, -1.0),
            (f64::NAN, 300.0),
            (296.0, f64::INFINITY),
        ];
        for (t_ref, t_gas) in cases {
            let err = scale(&lines, HitranMolecules, &provider, t_ref, t_gas).unwrap_err();
            assert!(matches!(err, ScaleError::InvalidTemperature { .. }));
        }
        assert_eq!(provider.query_count(), 0);
    }

    #[test]
    fn non_positive_partition_function_is_an_error() {
        let provider = StubProvider::default().with(1, 296.0, 1.0).with(1, 300.0, 0.0);
        let lines = [LineRecord::new(6u16, 1u16, 1e-22, 10.0, 3000.0)];
        let err = scale(&lines, HitranMolecules, &provider, 296.0, 300.0).unwrap_err();
        assert!(matches!(
            err,
            ScaleError::InvalidPartitionFunction { value, .. } if value == 0.0
        ));
    }

    #[test]
    fn unknown_molecule_is_fatal() {
        let provider = co2_provider();
        let lines = [LineRecord::new(250u16, 1u16, 1e-22, 10.0, 3000.0)];
        let err = scale(&lines, HitranMolecules, &provider, 296.0, 1000.0).unwrap_err();
        assert!(matches!(
            err,
            ScaleError::UnknownMolecule { molecule_id: MoleculeId(250) }
        ));
        assert_eq!(provider.query_count(), 0);
    }

    #[test]
    fn empty_and_mixed_batches_are_rejected() {
        let provider = co2_provider();
        assert!(matches!(
            scale(&[], HitranMolecules, &provider, 296.0, 1000.0),
            Err(ScaleError::EmptyLineSet)
        ));

        let mut lines = co2_lines();
        lines.push(LineRecord::new(6u16, 1u16, 1e-22, 10.0, 3000.0));
        assert!(matches!(
            scale(&lines, HitranMolecules, &provider, 296.0, 1000.0),
            Err(ScaleError::MixedMolecules { index: 5, .. })
        ));
    }
}
