//! data/utils.rs — Label parsing and row/index selection over results mappings.

use crate::data::{ModelResults, ResultsError, RowResults, ScalarResults};

const PEAK_ATTRIBUTES: [&str; 3] = ["cf", "pw", "bw"];

/// Periodic parameter keys found in a results mapping, grouped by attribute.
///
/// Lists hold the full key names in the mapping's iteration order; a
/// single-band fit contributes the bare keys themselves.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PeriodicLabels {
    pub cf: Vec<String>,
    pub pw: Vec<String>,
    pub bw: Vec<String>,
}

impl PeriodicLabels {
    /// Number of bands encoded by the mapping.
    pub fn n_bands(&self) -> usize {
        self.cf.len()
    }
}

fn matches_attribute(key: &str, attr: &str) -> bool {
    key == attr
        || key.ends_with(&format!("_{attr}"))
        || key.starts_with(&format!("{attr}_"))
}

/// Collect the periodic parameter keys of a results mapping.
///
/// Keys match an attribute when it appears as a name component: the bare
/// key (`cf`), the band-suffixed form (`alpha_cf`), or the indexed form
/// (`cf_0`). Everything else (`offset`, `error`, ...) is ignored. A mapping
/// with no peaks fit yields empty lists.
pub fn periodic_labels(results: &ModelResults) -> PeriodicLabels {
    let mut labels = PeriodicLabels::default();
    for key in results.keys() {
        for (attr, bucket) in PEAK_ATTRIBUTES
            .into_iter()
            .zip([&mut labels.cf, &mut labels.pw, &mut labels.bw])
        {
            if matches_attribute(key, attr) {
                bucket.push(key.to_string());
            }
        }
    }
    labels
}

fn strip_attribute(key: &str, attr: &str) -> String {
    if key == attr {
        // Bare single-band key: the band name is the empty string.
        String::new()
    } else {
        key.strip_suffix(&format!("_{attr}")).unwrap_or(key).to_string()
    }
}

/// Band names encoded by a periodic-labels grouping, deduplicated in
/// first-seen order.
pub fn band_labels(labels: &PeriodicLabels) -> Vec<String> {
    let mut bands: Vec<String> = Vec::new();
    for key in &labels.cf {
        let band = strip_attribute(key, "cf");
        if !bands.contains(&band) {
            bands.push(band);
        }
    }
    bands
}

/// Band names of a raw results mapping (parse, then strip).
pub fn band_labels_of(results: &ModelResults) -> Vec<String> {
    band_labels(&periodic_labels(results))
}

/// Project the scalar at `index` out of every column.
///
/// Every column must be a one-dimensional series long enough to hold
/// `index`; otherwise the whole call fails.
pub fn results_by_ind(
    results: &ModelResults,
    index: usize,
) -> Result<ScalarResults, ResultsError> {
    let mut out = ScalarResults::new();
    for (key, value) in results.iter() {
        let series = value.series().ok_or_else(|| ResultsError::NotSeries {
            key: key.to_string(),
        })?;
        let v = *series
            .get(index)
            .ok_or_else(|| ResultsError::IndexOutOfBounds {
                key: key.to_string(),
                index,
                len: series.len(),
            })?;
        out.insert(key, v);
    }
    Ok(out)
}

/// Project row `row_index` out of every two-dimensional column.
///
/// Rows are cloned out of the source; the returned mapping never aliases
/// the input, so downstream mutation cannot touch shared state.
pub fn results_by_row(
    results: &ModelResults,
    row_index: usize,
) -> Result<RowResults, ResultsError> {
    let mut out = RowResults::new();
    for (key, value) in results.iter() {
        let matrix = value.matrix().ok_or_else(|| ResultsError::NotMatrix {
            key: key.to_string(),
        })?;
        let row = matrix
            .get(row_index)
            .ok_or_else(|| ResultsError::IndexOutOfBounds {
                key: key.to_string(),
                index: row_index,
                len: matrix.len(),
            })?;
        out.insert(key, row.clone());
    }
    Ok(out)
}

/// Explicit per-band view of a results mapping: one record per band with
/// named columns, replacing suffix sniffing for downstream code.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BandRecord {
    pub label: String,
    pub cf: Vec<f32>,
    pub pw: Vec<f32>,
    pub bw: Vec<f32>,
}

fn band_key(band: &str, attr: &str) -> String {
    if band.is_empty() {
        attr.to_string()
    } else {
        format!("{band}_{attr}")
    }
}

fn band_series(
    results: &ModelResults,
    band: &str,
    attr: &str,
) -> Result<Vec<f32>, ResultsError> {
    let key = band_key(band, attr);
    let value = results
        .get(&key)
        .ok_or_else(|| ResultsError::MissingKey { key: key.clone() })?;
    let series = value
        .series()
        .ok_or_else(|| ResultsError::NotSeries { key })?;
    Ok(series.to_vec())
}

/// Convert the flat-key wire format into tagged band records.
///
/// Fails if the mapping violates the shared-band-set invariant (a band seen
/// in the `cf` keys lacking its `pw`/`bw` counterpart).
pub fn band_records(results: &ModelResults) -> Result<Vec<BandRecord>, ResultsError> {
    band_labels_of(results)
        .into_iter()
        .map(|label| {
            let cf = band_series(results, &label, "cf")?;
            let pw = band_series(results, &label, "pw")?;
            let bw = band_series(results, &label, "bw")?;
            Ok(BandRecord { label, cf, pw, bw })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ResultsValue;

    fn series(vals: &[f32]) -> ResultsValue {
        ResultsValue::Series(vals.to_vec())
    }

    fn base_results() -> ModelResults {
        let mut results = ModelResults::new();
        results.insert("offset", series(&[1.0, 1.0]));
        results.insert("exponent", series(&[1.0, 1.0]));
        results.insert("error", series(&[1.0, 1.0]));
        results.insert("r_squared", series(&[1.0, 1.0]));
        results
    }

    #[test]
    fn no_periodic_keys_yield_empty_labels() {
        let labels = periodic_labels(&base_results());
        assert!(labels.cf.is_empty());
        assert!(labels.pw.is_empty());
        assert!(labels.bw.is_empty());
        assert_eq!(labels.n_bands(), 0);
        assert!(band_labels(&labels).is_empty());
    }

    #[test]
    fn numbered_band_keys_group_per_attribute() {
        let mut results = base_results();
        results.insert("cf_0", series(&[1.0, 1.0]));
        results.insert("pw_0", series(&[1.0, 1.0]));
        results.insert("bw_0", series(&[1.0, 1.0]));

        let labels = periodic_labels(&results);
        assert_eq!(labels.cf, vec!["cf_0"]);
        assert_eq!(labels.pw, vec!["pw_0"]);
        assert_eq!(labels.bw, vec!["bw_0"]);
    }

    #[test]
    fn two_bands_keep_insertion_order() {
        let mut results = base_results();
        for band in ["alpha", "beta"] {
            for attr in ["cf", "pw", "bw"] {
                results.insert(format!("{band}_{attr}"), series(&[1.0, 1.0]));
            }
        }

        let labels = periodic_labels(&results);
        assert_eq!(labels.cf, vec!["alpha_cf", "beta_cf"]);
        assert_eq!(labels.pw, vec!["alpha_pw", "beta_pw"]);
        assert_eq!(labels.bw, vec!["alpha_bw", "beta_bw"]);
        assert_eq!(band_labels(&labels), vec!["alpha", "beta"]);
        assert_eq!(band_labels_of(&results), vec!["alpha", "beta"]);
    }

    #[test]
    fn bare_keys_give_the_empty_band() {
        let mut results = base_results();
        results.insert("cf", series(&[10.0]));
        results.insert("pw", series(&[0.5]));
        results.insert("bw", series(&[2.0]));

        let labels = periodic_labels(&results);
        assert_eq!(labels.cf, vec!["cf"]);
        assert_eq!(band_labels(&labels), vec![String::new()]);
    }

    #[test]
    fn results_by_ind_projects_every_key() {
        let mut results = base_results();
        results.insert("alpha_cf", series(&[9.5, 10.5]));

        for ind in 0..2 {
            let out = results_by_ind(&results, ind).unwrap();
            assert_eq!(out.len(), results.len());
            for (key, value) in results.iter() {
                let expected = value.series().unwrap()[ind];
                assert_eq!(out.get(key), Some(&expected), "key {key} ind {ind}");
            }
        }
    }

    #[test]
    fn results_by_ind_rejects_out_of_bounds() {
        let results = base_results();
        let err = results_by_ind(&results, 2).unwrap_err();
        assert!(matches!(err, ResultsError::IndexOutOfBounds { index: 2, .. }));
    }

    #[test]
    fn results_by_row_clones_rows() {
        let mut results = ModelResults::new();
        let m = vec![vec![0.0, 1.0], vec![2.0, 3.0]];
        for key in ["offset", "exponent", "alpha_cf"] {
            results.insert(key, ResultsValue::Matrix(m.clone()));
        }

        for ind in 0..2 {
            let out = results_by_row(&results, ind).unwrap();
            for (key, value) in results.iter() {
                assert_eq!(
                    out.get(key).unwrap(),
                    &value.matrix().unwrap()[ind],
                    "key {key} row {ind}"
                );
            }
        }
    }

    #[test]
    fn results_by_row_rejects_series_columns() {
        let results = base_results();
        let err = results_by_row(&results, 0).unwrap_err();
        assert!(matches!(err, ResultsError::NotMatrix { .. }));
    }

    #[test]
    fn band_records_collect_named_columns() {
        let mut results = base_results();
        results.insert("alpha_cf", series(&[9.5, f32::NAN]));
        results.insert("alpha_pw", series(&[0.6, f32::NAN]));
        results.insert("alpha_bw", series(&[2.0, f32::NAN]));

        let records = band_records(&results).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].label, "alpha");
        assert_eq!(records[0].cf[0], 9.5);
        assert!(records[0].cf[1].is_nan());
    }

    #[test]
    fn band_records_fail_on_missing_counterpart() {
        let mut results = base_results();
        results.insert("alpha_cf", series(&[9.5]));

        let err = band_records(&results).unwrap_err();
        assert!(matches!(err, ResultsError::MissingKey { .. }));
    }
}
