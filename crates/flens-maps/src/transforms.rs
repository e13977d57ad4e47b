#![deny(unsafe_code)]

//! Unnormalized 2D FFT kernels on complex arrays.
//!
//! Row/column axis decomposition over `rustfft` plans. Conventions follow
//! the usual discrete-transform pair: the forward transform is unscaled and
//! the inverse carries the `1/(nx*ny)` factor, so `ifft2(fft2(x)) == x`.

use ndarray::Array2;
use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};

use std::sync::Arc;

/// In-place forward 2D FFT (unscaled).
pub fn fft2_inplace(data: &mut Array2<Complex64>) {
    transform_2d(data, false);
}

/// In-place inverse 2D FFT, scaled by `1/(nx*ny)`.
pub fn ifft2_inplace(data: &mut Array2<Complex64>) {
    transform_2d(data, true);
    let scale = 1.0 / (data.len() as f64);
    data.mapv_inplace(|value| value * scale);
}

fn transform_2d(data: &mut Array2<Complex64>, inverse: bool) {
    let (ny, nx) = data.dim();
    if ny == 0 || nx == 0 {
        return;
    }

    let mut planner = FftPlanner::<f64>::new();
    let row_plan = plan_axis(&mut planner, nx, inverse);
    let col_plan = plan_axis(&mut planner, ny, inverse);

    let mut scratch = vec![Complex64::new(0.0, 0.0); nx.max(ny)];

    for mut row in data.rows_mut() {
        let line = &mut scratch[..nx];
        for (slot, value) in line.iter_mut().zip(row.iter()) {
            *slot = *value;
        }
        row_plan.process(line);
        for (value, slot) in row.iter_mut().zip(line.iter()) {
            *value = *slot;
        }
    }

    for mut col in data.columns_mut() {
        let line = &mut scratch[..ny];
        for (slot, value) in line.iter_mut().zip(col.iter()) {
            *slot = *value;
        }
        col_plan.process(line);
        for (value, slot) in col.iter_mut().zip(line.iter()) {
            *value = *slot;
        }
    }
}

fn plan_axis(planner: &mut FftPlanner<f64>, len: usize, inverse: bool) -> Arc<dyn Fft<f64>> {
    if inverse {
        planner.plan_fft_inverse(len)
    } else {
        planner.plan_fft_forward(len)
    }
}
