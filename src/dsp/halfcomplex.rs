//! Inverse transform for half-complex packed spectra.

/*
Half-Complex Packing
====================

The spectrum of a real signal of length n is conjugate-symmetric:

    z[n-k] = conj(z[k])

so only the first half of the bins carries information. The half-complex
layout stores those bins in a real array of the same length n:

    index:   0      1      2     ...   n/2   ...   n-2    n-1
    value:   Re z0  Re z1  Re z2 ...   Re z(n/2)   Im z2  Im z1

  - data[0]      real part of the DC bin (its imaginary part is always 0)
  - data[k]      real part of bin k, for 1 <= k <= n/2
  - data[n-k]    imaginary part of bin k, for 1 <= k < n-k

For even n the Nyquist bin z(n/2) is purely real and sits at data[n/2].
For odd n there is no Nyquist bin and every k in 1..=(n-1)/2 has both parts.


Inverse Transform
-----------------

    x[j] = (1/n) * sum_k z[k] * exp(+2*pi*i * j*k / n)

Unpacking rebuilds the full conjugate-symmetric spectrum, one complex
inverse FFT runs over it, and the real parts are scaled by 1/n. The
imaginary parts of the result are zero up to rounding and are discarded.

A single bin shows the sign convention:

    data[k] = a       ->  x[j] =  2a/n * cos(2*pi*j*k/n)
    data[n-k] = b     ->  x[j] = -2b/n * sin(2*pi*j*k/n)
*/

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::error::{try_with_capacity, Error, Result};

const COMPLEX_ZERO: Complex<f64> = Complex::new(0.0, 0.0);

/// Expand a half-complex array into its full conjugate-symmetric spectrum.
pub fn unpack(data: &[f64], spectrum: &mut [Complex<f64>]) {
    let n = data.len();
    debug_assert_eq!(spectrum.len(), n);
    if n == 0 {
        return;
    }

    spectrum[0] = Complex::new(data[0], 0.0);
    for k in 1..n.div_ceil(2) {
        let bin = Complex::new(data[k], data[n - k]);
        spectrum[k] = bin;
        spectrum[n - k] = bin.conj();
    }
    if n % 2 == 0 {
        spectrum[n / 2] = Complex::new(data[n / 2], 0.0);
    }
}

/// Planned inverse transform for one fixed length, with its own work buffers.
pub struct HalfComplexInverse {
    fft: Arc<dyn Fft<f64>>,
    spectrum: Vec<Complex<f64>>,
    scratch: Vec<Complex<f64>>,
}

impl HalfComplexInverse {
    pub fn new(len: usize) -> Result<Self> {
        if len == 0 {
            return Err(Error::Config("transform length must be non-zero".into()));
        }

        let fft = FftPlanner::new().plan_fft_inverse(len);

        let mut spectrum = try_with_capacity("transform spectrum", len)?;
        spectrum.resize(len, COMPLEX_ZERO);
        let scratch_len = fft.get_inplace_scratch_len();
        let mut scratch = try_with_capacity("transform scratch", scratch_len)?;
        scratch.resize(scratch_len, COMPLEX_ZERO);

        Ok(Self {
            fft,
            spectrum,
            scratch,
        })
    }

    pub fn len(&self) -> usize {
        self.spectrum.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spectrum.is_empty()
    }

    /// Replace `data` (half-complex spectrum) with its time-domain signal.
    pub fn process(&mut self, data: &mut [f64]) {
        debug_assert_eq!(data.len(), self.len());
        if data.is_empty() {
            return;
        }

        unpack(data, &mut self.spectrum);
        self.fft
            .process_with_scratch(&mut self.spectrum, &mut self.scratch);

        let scale = 1.0 / data.len() as f64;
        for (x, z) in data.iter_mut().zip(&self.spectrum) {
            *x = z.re * scale;
        }
    }
}
