//! Integration tests for the young/old noise marker analysis.

use noise_markers::prelude::*;
use std::collections::BTreeSet;
use std::io::Write;
use tempfile::NamedTempFile;

const N_PROTEINS: usize = 12;
const N_NOISY: usize = 4;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Age labels per sample: 10 young, 10 old, 2 unassigned, 1 ambiguous.
fn sample_ages() -> Vec<&'static str> {
    let mut ages = Vec::new();
    for i in 0..20 {
        ages.push(match i % 2 {
            0 => "20-29",
            _ if i % 4 == 1 => "60-69",
            _ => "70-79",
        });
    }
    ages.push("40-49");
    ages.push("40-49");
    ages.push("2060");
    ages
}

/// Write a synthetic GCT-style file, samples x (age, proteins).
///
/// - Proteins 0-3: old samples are five times as noisy as young ones
/// - Proteins 4-11: same noise in both cohorts
/// - Protein 5 has one missing young value, protein 7 one `N/A` old value
fn write_synthetic_gct() -> NamedTempFile {
    let ages = sample_ages();

    let mut rng_seed = 42u64;
    let mut simple_rand = || -> f64 {
        rng_seed = rng_seed.wrapping_mul(1103515245).wrapping_add(12345);
        ((rng_seed >> 16) & 0x7FFF) as f64 / 32768.0
    };

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "#1.3").unwrap();
    writeln!(file, "{}\t{}", ages.len(), N_PROTEINS + 1).unwrap();

    // Column names carry stray whitespace
    write!(file, "sample_id\t age ").unwrap();
    for p in 0..N_PROTEINS {
        write!(file, "\t P{} ", p).unwrap();
    }
    writeln!(file).unwrap();

    let mut young_seen = 0;
    let mut old_seen = 0;
    for (s, age) in ages.iter().enumerate() {
        write!(file, "sample_{}\t{}", s, age).unwrap();
        let old = is_old(age) && !is_young(age);
        if is_young(age) && !old {
            young_seen += 1;
        }
        if old {
            old_seen += 1;
        }
        for p in 0..N_PROTEINS {
            let amplitude = if p < N_NOISY && old { 0.5 } else { 0.1 };
            let value = 100.0 * (1.0 + amplitude * (simple_rand() - 0.5) * 2.0);
            if p == 5 && young_seen == 1 && is_young(age) {
                write!(file, "\tNA").unwrap();
            } else if p == 7 && old_seen == 1 && old {
                write!(file, "\tN/A").unwrap();
            } else {
                write!(file, "\t{:.4}", value).unwrap();
            }
        }
        writeln!(file).unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn test_full_analysis_from_file() {
    init_logging();
    let file = write_synthetic_gct();

    let results = NoiseAnalysis::new()
        .name("synthetic")
        .index_column("sample_id")
        .age_order(&["20-29", "60-69", "70-79"])
        .run_file(file.path())
        .unwrap();

    assert_eq!(results.len(), N_PROTEINS);
    assert_eq!(results.n_young, 10);
    assert_eq!(results.n_old, 10);
    assert_eq!(results.correction, Correction::None);

    for r in results.iter() {
        assert!((0.0..=1.0).contains(&r.p_value), "{}: p = {}", r.feature_id, r.p_value);
        assert!(r.q_value.is_none());
    }

    for p in 0..N_NOISY {
        let r = results.get_feature(&format!("P{}", p)).unwrap();
        assert!(r.cv_ratio > 1.5, "{} ratio {}", r.feature_id, r.cv_ratio);
        assert_eq!(r.direction, NoiseDirection::Increased);
        assert!(r.p_value < 0.05, "{} p {}", r.feature_id, r.p_value);
    }

    let top: BTreeSet<&str> = results
        .sorted_by_pvalue()
        .iter()
        .take(N_NOISY)
        .map(|r| r.feature_id.as_str())
        .collect();
    assert_eq!(top, ["P0", "P1", "P2", "P3"].into_iter().collect());
}

#[test]
fn test_step_by_step_matches_runner() {
    let file = write_synthetic_gct();
    let raw = read_table(file.path()).unwrap();

    assert_eq!(raw.columns()[0], "sample_id");
    assert_eq!(raw.columns()[1], "age");
    assert_eq!(raw.columns()[2], "P0");

    let samples = raw.set_index("sample_id").unwrap();
    let ordered = order_by_age(&samples, &["20-29", "60-69", "70-79"]).unwrap();
    let cohorts = split_cohorts(&ordered, AGE_COLUMN).unwrap();
    // "2060" is not an ordered category, so it is missing after ordering
    assert!(cohorts.ambiguous.is_empty());
    assert_eq!(cohorts.unassigned.len(), 3);

    let levene = levene_pvalues(&cohorts.young, &cohorts.old).unwrap();
    let ratios = cv_ratio(&cohorts.young, &cohorts.old).unwrap();
    assert_eq!(levene.len(), cohorts.young.n_rows());
    assert_eq!(ratios.len(), cohorts.young.n_rows());

    let results = NoiseAnalysis::new()
        .index_column("sample_id")
        .age_order(&["20-29", "60-69", "70-79"])
        .run(&raw)
        .unwrap();
    for (i, r) in results.iter().enumerate() {
        assert_eq!(r.feature_id, levene.results[i].feature_id);
        assert_eq!(r.p_value.to_bits(), levene.results[i].p_value.to_bits());
        assert_eq!(r.cv_ratio.to_bits(), ratios[i].to_bits());
    }

    assert_eq!(levene.get_feature("P5").unwrap().n_young, 9);
    assert_eq!(levene.get_feature("P7").unwrap().n_old, 9);
}

#[test]
fn test_unordered_split_keeps_ambiguous_label() {
    let file = write_synthetic_gct();
    let samples = read_table(file.path())
        .unwrap()
        .set_index("sample_id")
        .unwrap();
    let cohorts = split_cohorts(&samples, AGE_COLUMN).unwrap();
    assert_eq!(cohorts.ambiguous, vec!["sample_22".to_string()]);
    assert_eq!(cohorts.unassigned.len(), 2);
    assert_eq!(cohorts.n_young(), 10);
    assert_eq!(cohorts.n_old(), 10);
}

#[test]
fn test_feature_ids_survive_split() {
    let file = write_synthetic_gct();
    let samples = read_table(file.path()).unwrap();
    let cohorts = split_cohorts(&samples, "age").unwrap();

    let recombined: BTreeSet<String> = cohorts
        .young
        .index()
        .iter()
        .chain(cohorts.old.index())
        .cloned()
        .collect();
    let proteins: BTreeSet<String> = (0..N_PROTEINS).map(|p| format!("P{}", p)).collect();
    assert_eq!(recombined, proteins);
    assert_eq!(cohorts.young.n_rows(), N_PROTEINS);
    assert_eq!(cohorts.old.n_rows(), N_PROTEINS);
}

#[test]
fn test_fdr_correction_is_opt_in() {
    let file = write_synthetic_gct();
    let samples = read_table(file.path()).unwrap();

    let raw = NoiseAnalysis::new().run(&samples).unwrap();
    let corrected = NoiseAnalysis::new().correct_bh().run(&samples).unwrap();

    assert!(raw.iter().all(|r| r.q_value.is_none()));
    assert_eq!(corrected.correction, Correction::fdr_bh());
    for (r, c) in raw.iter().zip(corrected.iter()) {
        assert_eq!(r.p_value.to_bits(), c.p_value.to_bits());
        assert!(c.q_value.unwrap() >= c.p_value);
    }
    assert!(corrected.summary().corrected);
}

#[test]
fn test_insufficient_observations_propagate() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "#1.3\n4\t2").unwrap();
    writeln!(file, "sample_id\tage\tP1").unwrap();
    writeln!(file, "a\t20-29\t1.0").unwrap();
    writeln!(file, "b\t20-29\tNA").unwrap();
    writeln!(file, "c\t60-69\t2.0").unwrap();
    writeln!(file, "d\t60-69\t3.0").unwrap();
    file.flush().unwrap();

    let err = NoiseAnalysis::new().run_file(file.path()).unwrap_err();
    assert!(err.is_numerical_error());
    assert!(matches!(
        err,
        MarkerError::InsufficientData { ref group, n: 1, .. } if group == "young"
    ));
}

#[test]
fn test_missing_file_is_parse_error() {
    let err = NoiseAnalysis::new()
        .run_file("/nonexistent/expression.gct")
        .unwrap_err();
    assert!(err.is_parse_error());
}

#[test]
fn test_config_driven_run() {
    let file = write_synthetic_gct();
    let yaml = "name: from_yaml\nindex_column: sample_id\nage_column: age\n\
                age_order: ['20-29', '60-69', '70-79']\n";
    let config = AnalysisConfig::from_yaml(yaml).unwrap();
    assert_eq!(config.correction, Correction::None);
    assert_eq!(config.index_column.as_deref(), Some("sample_id"));

    let results = NoiseAnalysis::from_config(&config)
        .run_file(file.path())
        .unwrap();
    assert_eq!(results.len(), N_PROTEINS);

    let out = NamedTempFile::new().unwrap();
    results.to_tsv(out.path()).unwrap();
    let text = std::fs::read_to_string(out.path()).unwrap();
    assert_eq!(text.lines().count(), N_PROTEINS + 1);
}
