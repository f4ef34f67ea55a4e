//! Timing side-channel validation for `constant_time_eq`.
//!
//! Uses Welch's t-test to compare the timing of a 32-byte comparison that
//! matches (class A) against one that differs in the first byte (class B),
//! which is where an early-exit comparison would be fastest. |t| < 4.5 means
//! no statistically significant difference.
//!
//! The measurement is statistical and sensitive to scheduler noise, so the
//! test is ignored by default. Run with `cargo test -- --ignored`.

use std::time::Instant;

use cofre_crypto_core::constant_time_eq;

/// Number of timing samples per class.
const SAMPLES: usize = 20_000;

/// Welch's t-test threshold. |t| < 4.5 means no detectable timing difference.
const T_THRESHOLD: f64 = 4.5;

#[inline(never)]
fn black_box_compare(a: &[u8], b: &[u8]) -> bool {
    std::hint::black_box(constant_time_eq(
        std::hint::black_box(a),
        std::hint::black_box(b),
    ))
}

/// Compute Welch's t-statistic for two independent samples.
///
/// `t = (mean_a - mean_b) / sqrt(var_a/n_a + var_b/n_b)`
#[allow(clippy::cast_precision_loss)]
fn welch_t_statistic(a: &[f64], b: &[f64]) -> f64 {
    if a.len() < 2 || b.len() < 2 {
        return f64::NAN;
    }

    let n_a = a.len() as f64;
    let n_b = b.len() as f64;

    let mean_a: f64 = a.iter().sum::<f64>() / n_a;
    let mean_b: f64 = b.iter().sum::<f64>() / n_b;

    let var_a: f64 = a.iter().map(|x| (x - mean_a).powi(2)).sum::<f64>() / (n_a - 1.0);
    let var_b: f64 = b.iter().map(|x| (x - mean_b).powi(2)).sum::<f64>() / (n_b - 1.0);

    let denominator = (var_a / n_a + var_b / n_b).sqrt();
    if denominator == 0.0 {
        return 0.0; // Both distributions are constant; no timing difference.
    }

    (mean_a - mean_b) / denominator
}

#[test]
#[ignore = "statistical timing measurement; run explicitly"]
fn constant_time_eq_no_timing_leak() {
    let stored = [0x5Au8; 32];
    let matching = stored;
    let mut first_byte_differs = stored;
    first_byte_differs[0] ^= 0xFF;

    for _ in 0..1_000 {
        black_box_compare(&stored, &matching);
        black_box_compare(&stored, &first_byte_differs);
    }

    let mut times_a = Vec::with_capacity(SAMPLES);
    let mut times_b = Vec::with_capacity(SAMPLES);

    // Interleave and alternate order to cancel drift.
    for i in 0..SAMPLES {
        let (first, second) = if i % 2 == 0 {
            (&matching, &first_byte_differs)
        } else {
            (&first_byte_differs, &matching)
        };

        let start = Instant::now();
        black_box_compare(&stored, first);
        let elapsed_first = start.elapsed().as_nanos();

        let start = Instant::now();
        black_box_compare(&stored, second);
        let elapsed_second = start.elapsed().as_nanos();

        #[allow(clippy::cast_precision_loss)]
        let (t_first, t_second) = (elapsed_first as f64, elapsed_second as f64);
        if i % 2 == 0 {
            times_a.push(t_first);
            times_b.push(t_second);
        } else {
            times_b.push(t_first);
            times_a.push(t_second);
        }
    }

    let abs_t = welch_t_statistic(&times_a, &times_b).abs();
    eprintln!("constant_time_eq timing: |t| = {abs_t:.2} (threshold: {T_THRESHOLD})");
    assert!(
        abs_t < T_THRESHOLD,
        "timing difference detected: |t| = {abs_t:.2} exceeds {T_THRESHOLD}"
    );
}

#[test]
fn welch_t_test_identical_distributions() {
    let a = vec![1.0; 100];
    let b = vec![1.0; 100];
    assert!(welch_t_statistic(&a, &b).abs() < 0.001);
}

#[test]
fn welch_t_test_different_distributions() {
    let a: Vec<f64> = (0..1000).map(|i| 100.0 + f64::from(i % 3)).collect();
    let b: Vec<f64> = (0..1000).map(|i| 200.0 + f64::from(i % 3)).collect();
    assert!(welch_t_statistic(&a, &b).abs() > 100.0);
}
