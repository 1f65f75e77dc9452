//! Main extractor API
//!
//! The `Extractor` owns an ordered, immutable run collection and turns one
//! logical-event request into a feature table plus an invocation summary.
//! Per run, it walks the event log, matches entries against the resolved
//! search name, applies the skip rules, cuts the channel window, and reduces
//! it to the dominant-peak feature.

use crate::config::ExtractionConfig;
use crate::policy::{EventPolicy, LogicalEvent};
use crate::signal::{cut_section, dominant_peak};
use crate::table::{FeatureRecord, FeatureTable};
use crate::types::{ExtractError, Result, RunRecord};
use std::collections::HashMap;
use std::fmt;

/// The main extractor struct - entry point for all extraction operations
pub struct Extractor {
    /// Run collection in processing order (oldest-started first)
    runs: Vec<(String, RunRecord)>,
}

/// The result of one logical-event extraction call
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// One record per matched occurrence, in (run, event-log) order
    pub table: FeatureTable,
    /// Matched / skipped / dropped accounting for this invocation
    pub summary: ExtractionSummary,
}

/// Per-invocation accounting of how occurrences were handled
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionSummary {
    /// Occurrences that produced a feature record
    pub matched: usize,
    /// First occurrences consumed by `skip_first_event`
    pub skipped_first: usize,
    /// Occurrences discarded by `skip_duplicates`
    pub skipped_duplicates: usize,
    /// Occurrences dropped by a recoverable cut/peak failure
    pub dropped: usize,
    /// Runs abandoned because their record was malformed
    pub run_failures: Vec<RunFailure>,
}

/// A run abandoned mid-invocation, with the reason
#[derive(Debug, Clone, PartialEq)]
pub struct RunFailure {
    pub uuid: String,
    pub reason: String,
}

impl ExtractionSummary {
    /// Total occurrences consumed by a skip rule
    pub fn skipped(&self) -> usize {
        self.skipped_first + self.skipped_duplicates
    }
}

impl fmt::Display for ExtractionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} matched, {} skipped ({} first, {} duplicate), {} dropped, {} failed runs",
            self.matched,
            self.skipped(),
            self.skipped_first,
            self.skipped_duplicates,
            self.dropped,
            self.run_failures.len()
        )
    }
}

impl Extractor {
    /// Create an extractor over a run collection already in processing order
    ///
    /// The caller is trusted to supply runs oldest-started first; output
    /// ordering follows this order.
    pub fn new(runs: Vec<(String, RunRecord)>) -> Self {
        Self { runs }
    }

    /// Create an extractor from an unordered run mapping
    ///
    /// Runs are sorted by start time ascending (ties broken by run id) so the
    /// output ordering is reproducible regardless of map iteration order.
    pub fn from_map(runs: HashMap<String, RunRecord>) -> Self {
        let mut runs: Vec<(String, RunRecord)> = runs.into_iter().collect();
        runs.sort_by(|a, b| {
            a.1.start_time
                .cmp(&b.1.start_time)
                .then_with(|| a.0.cmp(&b.0))
        });
        Self::new(runs)
    }

    /// Number of runs in the collection
    pub fn num_runs(&self) -> usize {
        self.runs.len()
    }

    /// Run identifiers in processing order
    pub fn run_ids(&self) -> impl Iterator<Item = &str> {
        self.runs.iter().map(|(uuid, _)| uuid.as_str())
    }

    /// Extract the named logical event across all runs
    ///
    /// Occurrence-level failures drop the single occurrence; a malformed run
    /// abandons that run's remaining events and is reported in the summary.
    /// Neither aborts the invocation, and an empty table is a valid outcome.
    pub fn extract(&self, event: LogicalEvent, config: &ExtractionConfig) -> Extraction {
        let policy = event.policy();
        log::debug!(
            "Extracting '{}' from {}/{} (search name '{}', span {}, buffer {})",
            event,
            policy.family,
            policy.sub_channel,
            policy.search_name,
            config.span,
            policy.buffer
        );

        let mut table = FeatureTable::new();
        let mut summary = ExtractionSummary::default();
        let mut index_counter: u64 = 0;

        for (uuid, run) in &self.runs {
            let outcome = process_run(
                uuid,
                run,
                &policy,
                config,
                &mut table,
                &mut summary,
                &mut index_counter,
            );
            if let Err(error) = outcome {
                log::warn!("Abandoning run {}: {}", uuid, error);
                summary.run_failures.push(RunFailure {
                    uuid: uuid.clone(),
                    reason: error.to_string(),
                });
            }
        }

        log::info!("Extracted '{}': {}", event, summary);
        Extraction { table, summary }
    }
}

/// Walk one run's event log and append its feature records
///
/// Returns `Err` only for run-fatal conditions (malformed record); all
/// occurrence-level failures are absorbed into the summary.
fn process_run(
    uuid: &str,
    run: &RunRecord,
    policy: &EventPolicy,
    config: &ExtractionConfig,
    table: &mut FeatureTable,
    summary: &mut ExtractionSummary,
    index_counter: &mut u64,
) -> Result<()> {
    let samples = run
        .channel_samples(policy.family, policy.sub_channel)
        .ok_or_else(|| ExtractError::MalformedRun {
            uuid: uuid.to_string(),
            reason: format!(
                "missing channel {}/{}",
                policy.family, policy.sub_channel
            ),
        })?;

    if samples.len() != run.time.len() {
        return Err(ExtractError::MalformedRun {
            uuid: uuid.to_string(),
            reason: format!(
                "channel {}/{} has {} samples but the time axis has {}",
                policy.family,
                policy.sub_channel,
                samples.len(),
                run.time.len()
            ),
        });
    }

    let mut skip_first = config.skip_first_event;
    let mut step: u32 = 1;

    for (event_index, entry) in run.event_log.iter().enumerate() {
        if entry.name != policy.search_name {
            continue;
        }
        if skip_first {
            skip_first = false;
            summary.skipped_first += 1;
            continue;
        }
        if config.skip_duplicates && entry.kwargs.id.is_some_and(|id| id >= 2) {
            summary.skipped_duplicates += 1;
            continue;
        }

        let (window_time, mut window_amp) = match cut_section(
            &run.time,
            samples,
            &run.event_log,
            event_index,
            config.span,
            policy.buffer,
        ) {
            Ok(window) => window,
            Err(error) => {
                log::debug!(
                    "Dropping occurrence at event {} of run {}: {}",
                    event_index,
                    uuid,
                    error
                );
                summary.dropped += 1;
                continue;
            }
        };

        if window_amp.is_empty() {
            log::debug!(
                "Dropping occurrence at event {} of run {}: window empty after gap filtering",
                event_index,
                uuid
            );
            summary.dropped += 1;
            continue;
        }

        // Transform order matters: absolute reshapes the signal before the
        // baseline is measured, and both change what counts as a peak
        if config.absolute {
            for value in &mut window_amp {
                *value = value.abs();
            }
        }
        if config.baseline {
            let min = window_amp.iter().copied().fold(f64::INFINITY, f64::min);
            for value in &mut window_amp {
                *value -= min;
            }
        }

        let shape = match dominant_peak(&window_amp) {
            Ok(shape) => shape,
            Err(error) => {
                log::debug!(
                    "Dropping occurrence at event {} of run {}: {}",
                    event_index,
                    uuid,
                    error
                );
                summary.dropped += 1;
                continue;
            }
        };

        let key = match entry.kwargs.ia {
            Some(ia) => run
                .amino_label(ia)
                .ok_or_else(|| ExtractError::MalformedRun {
                    uuid: uuid.to_string(),
                    reason: format!(
                        "amino index {} outside residue list of length {}",
                        ia,
                        run.peptide.aminos.len()
                    ),
                })?
                .to_string(),
            None => String::new(),
        };

        let offset_seconds = shape.center() + window_time[0];
        let time = run.start_time
            + chrono::Duration::microseconds((offset_seconds * 1e6).round() as i64);

        table.push(FeatureRecord {
            value: shape.width * shape.half_height,
            time,
            uuid: uuid.to_string(),
            key,
            step,
            color: color_tag(uuid),
            index: *index_counter,
        });
        *index_counter += 1;
        step += 1;
        summary.matched += 1;
    }

    Ok(())
}

/// Display tag for a run: '#' plus the first six characters of its id
fn color_tag(uuid: &str) -> String {
    let prefix: String = uuid.chars().take(6).collect();
    format!("#{}", prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AminoResidue, EventEntry, EventKwargs, Peptide, Timestamp};
    use chrono::{TimeZone, Utc};

    fn start_time() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
    }

    fn event(name: &str, time: f64, id: Option<u32>, ia: Option<usize>) -> EventEntry {
        EventEntry {
            name: name.to_string(),
            time,
            kwargs: EventKwargs { id, ia },
        }
    }

    /// Run with a uv/uv310 channel sampled at 1 Hz
    fn uv_run(start: Timestamp, uv310: Vec<f64>, event_log: Vec<EventEntry>) -> RunRecord {
        let time: Vec<Option<f64>> = (0..uv310.len()).map(|i| Some(i as f64)).collect();
        let mut channels = HashMap::new();
        let mut uv = HashMap::new();
        uv.insert(
            "uv310".to_string(),
            uv310.into_iter().map(Some).collect::<Vec<_>>(),
        );
        channels.insert("uv".to_string(), uv);
        RunRecord {
            start_time: start,
            time,
            channels,
            event_log,
            peptide: Peptide::default(),
        }
    }

    fn extractor_with(runs: Vec<(&str, RunRecord)>) -> Extractor {
        Extractor::new(
            runs.into_iter()
                .map(|(uuid, run)| (uuid.to_string(), run))
                .collect(),
        )
    }

    #[test]
    fn test_single_triangular_pulse_scenario() {
        // One Couple window over a triangular pulse of height 10 centered at
        // t=5: half-height width 2 at level 5 gives the feature value 10
        let run = uv_run(
            start_time(),
            vec![0.0, 0.0, 0.0, 0.0, 5.0, 10.0, 5.0, 0.0, 0.0, 0.0, 0.0],
            vec![
                event("Couple", 0.0, Some(1), None),
                event("Couple", 10.0, Some(1), None),
            ],
        );
        let extractor = extractor_with(vec![("abcdef12-3456", run)]);

        let extraction = extractor.extract(LogicalEvent::Couple, &ExtractionConfig::new());

        assert_eq!(extraction.table.len(), 1);
        let record = extraction.table.record(0).unwrap();
        assert!((record.value - 10.0).abs() < 1e-9);
        assert_eq!(record.step, 1);
        assert_eq!(record.index, 0);
        assert_eq!(record.uuid, "abcdef12-3456");
        assert_eq!(record.key, "");
        assert_eq!(record.color, "#abcdef");
        // Peak center at sample 5 of a window starting at t=0
        assert_eq!(record.time, start_time() + chrono::Duration::seconds(5));

        // The second occurrence has no closing event and is dropped
        assert_eq!(extraction.summary.matched, 1);
        assert_eq!(extraction.summary.dropped, 1);
        assert!(extraction.summary.run_failures.is_empty());
    }

    /// Pulse train: a [0, 5, 0] triangle in each 3-second window
    fn pulse_train_run(event_log: Vec<EventEntry>) -> RunRecord {
        uv_run(
            start_time(),
            vec![0.0, 5.0, 0.0, 0.0, 5.0, 0.0, 0.0, 5.0, 0.0, 0.0],
            event_log,
        )
    }

    #[test]
    fn test_skip_first_event_emits_n_minus_one_records() {
        let run = pulse_train_run(vec![
            event("Couple", 0.0, Some(1), None),
            event("Couple", 3.0, Some(1), None),
            event("Couple", 6.0, Some(1), None),
            event("End", 9.0, None, None),
        ]);
        let extractor = extractor_with(vec![("run-a", run)]);
        let config = ExtractionConfig::new().with_skip_first_event(true);

        let extraction = extractor.extract(LogicalEvent::Couple, &config);

        assert_eq!(extraction.table.len(), 2);
        assert_eq!(extraction.table.step, vec![1, 2]);
        assert_eq!(extraction.summary.matched, 2);
        assert_eq!(extraction.summary.skipped_first, 1);
        assert_eq!(extraction.summary.dropped, 0);
    }

    #[test]
    fn test_skip_duplicates_discards_repeated_ids() {
        let run = pulse_train_run(vec![
            event("Couple", 0.0, Some(1), None),
            event("Couple", 3.0, Some(2), None),
            event("Couple", 6.0, Some(1), None),
            event("End", 9.0, None, None),
        ]);
        let extractor = extractor_with(vec![("run-a", run)]);
        let config = ExtractionConfig::new().with_skip_duplicates(true);

        let extraction = extractor.extract(LogicalEvent::Couple, &config);

        // The id=2 occurrence neither emits a record nor consumes a step
        assert_eq!(extraction.table.len(), 2);
        assert_eq!(extraction.table.step, vec![1, 2]);
        assert_eq!(extraction.summary.skipped_duplicates, 1);
    }

    #[test]
    fn test_flat_window_is_dropped_not_fatal() {
        // Second window is flat: no peak, occurrence dropped, run continues
        let run = uv_run(
            start_time(),
            vec![0.0, 5.0, 0.0, 0.0, 0.0, 0.0, 0.0, 5.0, 0.0, 0.0],
            vec![
                event("Couple", 0.0, Some(1), None),
                event("Couple", 3.0, Some(1), None),
                event("Couple", 6.0, Some(1), None),
                event("End", 9.0, None, None),
            ],
        );
        let extractor = extractor_with(vec![("run-a", run)]);

        let extraction = extractor.extract(LogicalEvent::Couple, &ExtractionConfig::new());

        assert_eq!(extraction.table.len(), 2);
        assert_eq!(extraction.table.step, vec![1, 2]);
        assert_eq!(extraction.summary.matched, 2);
        assert_eq!(extraction.summary.dropped, 1);
    }

    #[test]
    fn test_absolute_then_baseline_transform_order() {
        // Window [-1, -5, -1, 0]: without absolute there is no peak at all;
        // absolute turns it into [1, 5, 1], baseline then re-measures from 0
        let extractor = extractor_with(vec![(
            "run-a",
            uv_run(
                start_time(),
                vec![-1.0, -5.0, -1.0, 0.0],
                vec![
                    event("Couple", 0.0, Some(1), None),
                    event("Couple", 3.0, Some(1), None),
                ],
            ),
        )]);

        let plain = extractor.extract(LogicalEvent::Couple, &ExtractionConfig::new());
        assert!(plain.table.is_empty());
        assert_eq!(plain.summary.dropped, 1);

        let absolute = extractor.extract(
            LogicalEvent::Couple,
            &ExtractionConfig::new().with_absolute(true),
        );
        assert_eq!(absolute.table.len(), 1);
        assert!((absolute.table.value[0] - 3.0).abs() < 1e-9);

        let both = extractor.extract(
            LogicalEvent::Couple,
            &ExtractionConfig::new().with_absolute(true).with_baseline(true),
        );
        assert_eq!(both.table.len(), 1);
        assert!((both.table.value[0] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_malformed_run_does_not_affect_siblings() {
        let good = pulse_train_run(vec![
            event("Couple", 0.0, Some(1), None),
            event("Couple", 3.0, Some(1), None),
        ]);
        let mut bad = pulse_train_run(vec![
            event("Couple", 0.0, Some(1), None),
            event("Couple", 3.0, Some(1), None),
        ]);
        bad.channels.clear();

        let extractor = extractor_with(vec![("bad-run", bad), ("good-run", good)]);
        let extraction = extractor.extract(LogicalEvent::Couple, &ExtractionConfig::new());

        assert_eq!(extraction.table.len(), 1);
        assert_eq!(extraction.table.uuid, vec!["good-run"]);
        assert_eq!(extraction.summary.run_failures.len(), 1);
        assert_eq!(extraction.summary.run_failures[0].uuid, "bad-run");
    }

    #[test]
    fn test_length_mismatch_is_run_fatal() {
        let mut run = pulse_train_run(vec![
            event("Couple", 0.0, Some(1), None),
            event("Couple", 3.0, Some(1), None),
        ]);
        run.channels
            .get_mut("uv")
            .unwrap()
            .get_mut("uv310")
            .unwrap()
            .pop();

        let extractor = extractor_with(vec![("run-a", run)]);
        let extraction = extractor.extract(LogicalEvent::Couple, &ExtractionConfig::new());

        assert!(extraction.table.is_empty());
        assert_eq!(extraction.summary.run_failures.len(), 1);
        assert!(extraction.summary.run_failures[0]
            .reason
            .contains("time axis"));
    }

    #[test]
    fn test_amino_key_resolution() {
        let mut run = pulse_train_run(vec![
            event("Couple", 0.0, Some(1), Some(2)),
            event("Couple", 3.0, Some(1), None),
        ]);
        run.peptide = Peptide {
            aminos: vec![
                AminoResidue { aa: "GG".to_string() },
                AminoResidue { aa: "FF".to_string() },
            ],
        };

        let extractor = extractor_with(vec![("run-a", run)]);
        let extraction = extractor.extract(LogicalEvent::Couple, &ExtractionConfig::new());

        assert_eq!(extraction.table.len(), 1);
        assert_eq!(extraction.table.key, vec!["FF"]);
    }

    #[test]
    fn test_amino_index_out_of_range_abandons_run_keeping_prior_records() {
        let mut run = pulse_train_run(vec![
            event("Couple", 0.0, Some(1), None),
            event("Couple", 3.0, Some(1), Some(9)),
            event("Couple", 6.0, Some(1), None),
            event("End", 9.0, None, None),
        ]);
        run.peptide = Peptide {
            aminos: vec![AminoResidue { aa: "GG".to_string() }],
        };

        let extractor = extractor_with(vec![("run-a", run)]);
        let extraction = extractor.extract(LogicalEvent::Couple, &ExtractionConfig::new());

        // The first occurrence was already recorded; the bad reference stops
        // the rest of the run
        assert_eq!(extraction.table.len(), 1);
        assert_eq!(extraction.summary.run_failures.len(), 1);
        assert!(extraction.summary.run_failures[0]
            .reason
            .contains("amino index 9"));
    }

    #[test]
    fn test_from_map_orders_runs_by_start_time() {
        let event_log = vec![
            event("Couple", 0.0, Some(1), None),
            event("Couple", 3.0, Some(1), None),
        ];
        let older = uv_run(
            Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap(),
            vec![0.0, 5.0, 0.0, 0.0],
            event_log.clone(),
        );
        let newer = uv_run(
            Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
            vec![0.0, 5.0, 0.0, 0.0],
            event_log,
        );

        let mut runs = HashMap::new();
        runs.insert("zz-newer".to_string(), newer);
        runs.insert("aa-older".to_string(), older);

        let extractor = Extractor::from_map(runs);
        assert_eq!(
            extractor.run_ids().collect::<Vec<_>>(),
            vec!["aa-older", "zz-newer"]
        );

        let extraction = extractor.extract(LogicalEvent::Couple, &ExtractionConfig::new());
        assert_eq!(extraction.table.uuid, vec!["aa-older", "zz-newer"]);
        assert_eq!(extraction.table.index, vec![0, 1]);
        // Step counters are per run
        assert_eq!(extraction.table.step, vec![1, 1]);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let run = pulse_train_run(vec![
            event("Couple", 0.0, Some(1), None),
            event("Couple", 3.0, Some(1), None),
            event("Couple", 6.0, Some(1), None),
            event("End", 9.0, None, None),
        ]);
        let extractor = extractor_with(vec![("run-a", run)]);
        let config = ExtractionConfig::new();

        let first = extractor.extract(LogicalEvent::Couple, &config);
        let second = extractor.extract(LogicalEvent::Couple, &config);
        assert_eq!(first.table, second.table);
        assert_eq!(first.summary, second.summary);
    }

    #[test]
    fn test_no_matches_yields_valid_empty_table() {
        let run = pulse_train_run(vec![event("Deprotect", 0.0, Some(1), None)]);
        let extractor = extractor_with(vec![("run-a", run)]);

        let extraction = extractor.extract(LogicalEvent::Couple, &ExtractionConfig::new());
        assert!(extraction.table.is_empty());
        assert_eq!(extraction.summary, ExtractionSummary::default());
    }
}
