//! Generic one-at-a-time finite-difference sensitivity analysis.
//!
//! Works on any serde-serializable parameter tree: the tree is lowered to
//! `serde_json::Value`, every numeric leaf is discovered by traversal (no
//! schema required), and each leaf is perturbed in isolation on a clone of
//! the tree before re-running the objective. A leaf whose perturbed
//! evaluation fails is recorded and skipped; one pathological parameter
//! never aborts the scan.

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A numeric leaf of the parameter tree, addressed by dotted path.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarLeaf {
    pub path: String,
    pub value: f64,
}

/// Finite-difference scheme. Forward differencing halves the evaluation
/// count; central differencing trades throughput for truncation error on
/// ill-conditioned parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Differencing {
    #[default]
    Forward,
    Central,
}

/// Result row for one successfully analyzed parameter.
#[derive(Debug, Clone, Serialize)]
pub struct SensitivityEntry {
    pub path: String,
    /// Baseline parameter value
    pub value: f64,
    /// Absolute step applied to the parameter
    pub delta: f64,
    /// Objective at the perturbed point
    pub perturbed_objective: f64,
    /// Finite-difference derivative d(objective)/d(parameter)
    pub derivative: f64,
    /// Dimensionless elasticity: % objective change per % parameter change
    pub elasticity: f64,
}

/// A parameter whose perturbed evaluation failed.
#[derive(Debug, Clone, Serialize)]
pub struct LeafFailure {
    pub path: String,
    pub value: f64,
    pub error: String,
}

/// Outcome of perturbing a single leaf.
#[derive(Debug, Clone)]
pub enum LeafOutcome {
    Analyzed(SensitivityEntry),
    Failed(LeafFailure),
}

/// Full scan result, entries ranked by |elasticity| descending.
#[derive(Debug, Clone, Serialize)]
pub struct SensitivityResult {
    pub baseline_objective: f64,
    pub fraction: f64,
    pub entries: Vec<SensitivityEntry>,
    pub failures: Vec<LeafFailure>,
}

/// Collect every finite numeric leaf of a JSON tree in traversal order.
/// Booleans, strings, nulls, and arrays are skipped; objects recurse.
pub fn scalar_leaves(root: &Value) -> Vec<ScalarLeaf> {
    let mut out = Vec::new();
    collect_leaves("", root, &mut out);
    out
}

fn collect_leaves(prefix: &str, value: &Value, out: &mut Vec<ScalarLeaf>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                collect_leaves(&path, child, out);
            }
        }
        Value::Number(n) => {
            if let Some(v) = n.as_f64() {
                if v.is_finite() {
                    out.push(ScalarLeaf {
                        path: prefix.to_string(),
                        value: v,
                    });
                }
            }
        }
        // Bools, strings, nulls, and arrays are not tunable scalars
        _ => {}
    }
}

/// Overwrite the numeric leaf at `path` in place. Fails if the path does not
/// resolve to an existing number.
pub fn set_leaf(root: &mut Value, path: &str, new_value: f64) -> Result<()> {
    let mut node = root;
    for segment in path.split('.') {
        node = node
            .get_mut(segment)
            .with_context(|| format!("no field `{segment}` while resolving `{path}`"))?;
    }
    if !node.is_number() {
        bail!("`{path}` is not a numeric leaf");
    }
    let n = serde_json::Number::from_f64(new_value)
        .with_context(|| format!("perturbed value {new_value} is not representable"))?;
    *node = Value::Number(n);
    Ok(())
}

/// Absolute perturbation step: `fraction` of the magnitude, with a unit step
/// for exact zeros so they still register.
pub fn perturbation_delta(value: f64, fraction: f64) -> f64 {
    if value == 0.0 {
        1.0
    } else {
        value.abs() * fraction
    }
}

fn evaluate_at<T, F>(tree: &Value, path: &str, value: f64, objective: &F) -> Result<f64>
where
    T: DeserializeOwned,
    F: Fn(&T) -> Result<f64>,
{
    let mut perturbed = tree.clone();
    set_leaf(&mut perturbed, path, value)?;
    let typed: T = serde_json::from_value(perturbed)
        .with_context(|| format!("perturbed tree no longer deserializes at `{path}`"))?;
    let l = objective(&typed)?;
    if !l.is_finite() {
        bail!("objective is not finite ({l})");
    }
    Ok(l)
}

fn analyze_leaf<T, F>(
    tree: &Value,
    leaf: &ScalarLeaf,
    objective: &F,
    l0: f64,
    fraction: f64,
    scheme: Differencing,
) -> LeafOutcome
where
    T: DeserializeOwned,
    F: Fn(&T) -> Result<f64>,
{
    let delta = perturbation_delta(leaf.value, fraction);
    let run = || -> Result<(f64, f64)> {
        let l1 = evaluate_at::<T, F>(tree, &leaf.path, leaf.value + delta, objective)?;
        let derivative = match scheme {
            Differencing::Forward => (l1 - l0) / delta,
            Differencing::Central => {
                let l_minus = evaluate_at::<T, F>(tree, &leaf.path, leaf.value - delta, objective)?;
                (l1 - l_minus) / (2.0 * delta)
            }
        };
        Ok((l1, derivative))
    };
    match run() {
        Ok((l1, derivative)) => LeafOutcome::Analyzed(SensitivityEntry {
            path: leaf.path.clone(),
            value: leaf.value,
            delta,
            perturbed_objective: l1,
            derivative,
            elasticity: derivative * leaf.value / l0,
        }),
        Err(err) => LeafOutcome::Failed(LeafFailure {
            path: leaf.path.clone(),
            value: leaf.value,
            error: format!("{err:#}"),
        }),
    }
}

/// Run a full one-at-a-time scan of `baseline` against `objective`.
///
/// The baseline objective must evaluate to a finite non-zero value
/// (elasticities are normalized by it). Individual leaf failures are
/// collected, not propagated.
pub fn analyze<T, F>(
    baseline: &T,
    objective: F,
    fraction: f64,
    scheme: Differencing,
    quiet: bool,
) -> Result<SensitivityResult>
where
    T: Serialize + DeserializeOwned,
    F: Fn(&T) -> Result<f64> + Sync,
{
    if !(fraction.is_finite() && fraction > 0.0) {
        bail!("perturbation fraction must be positive, got {fraction}");
    }

    let l0 = objective(baseline).context("baseline evaluation failed")?;
    if !l0.is_finite() {
        bail!("baseline objective is not finite ({l0})");
    }
    if l0 == 0.0 {
        bail!("baseline objective is zero; elasticities are undefined");
    }

    let tree = serde_json::to_value(baseline).context("parameter tree is not serializable")?;
    let leaves = scalar_leaves(&tree);
    if !quiet {
        eprintln!("[fusecost] scanning {} numeric parameters", leaves.len());
    }

    #[cfg(feature = "parallel")]
    let outcomes: Vec<LeafOutcome> = leaves
        .par_iter()
        .map(|leaf| analyze_leaf::<T, F>(&tree, leaf, &objective, l0, fraction, scheme))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let outcomes: Vec<LeafOutcome> = leaves
        .iter()
        .map(|leaf| analyze_leaf::<T, F>(&tree, leaf, &objective, l0, fraction, scheme))
        .collect();

    let mut entries = Vec::new();
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            LeafOutcome::Analyzed(entry) => {
                if !quiet {
                    eprintln!(
                        "[fusecost]   {} = {:.6} -> d(objective)/d = {:.6e}",
                        entry.path, entry.value, entry.derivative
                    );
                }
                entries.push(entry);
            }
            LeafOutcome::Failed(failure) => failures.push(failure),
        }
    }

    // Rank by influence, path as a deterministic tie-break
    entries.sort_by(|a, b| {
        b.elasticity
            .abs()
            .partial_cmp(&a.elasticity.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.path.cmp(&b.path))
    });

    if !quiet {
        for failure in &failures {
            eprintln!("[fusecost] warning: skipped `{}`: {}", failure.path, failure.error);
        }
    }

    Ok(SensitivityResult {
        baseline_objective: l0,
        fraction,
        entries,
        failures,
    })
}
