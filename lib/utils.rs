//! Miscellaneous tools.

use ndarray::{ self as nd, concatenate };
use num_complex::Complex64 as C64;

/// Calculate the discrete L2 norm of a wavefunction over all of its grid
/// points, i.e. `sqrt(Σ |q|²)`.
///
/// No grid-spacing weight is applied; this matches the norm that the
/// propagation engine pins to its initial value.
///
/// ```
/// use ndarray as nd;
/// use num_complex::Complex64 as C64;
/// use fresnel::utils::wf_norm;
///
/// let q: nd::Array1<C64> = nd::array![C64::new(3.0, 0.0), C64::new(0.0, 4.0)];
/// assert!((wf_norm(&q) - 5.0).abs() < 1e-12);
/// ```
pub fn wf_norm<S, D>(q: &nd::ArrayBase<S, D>) -> f64
where
    S: nd::Data<Elem = C64>,
    D: nd::Dimension,
{
    q.iter().map(|qk| qk.norm_sqr()).sum::<f64>().sqrt()
}

/// Rescale a wavefunction in place so that its [norm][wf_norm] is `target`.
///
/// Returns the norm before rescaling.
pub fn wf_renormalize<S, D>(q: &mut nd::ArrayBase<S, D>, target: f64) -> f64
where
    S: nd::DataMut<Elem = C64>,
    D: nd::Dimension,
{
    let norm = wf_norm(q);
    let scale = target / norm;
    q.map_inplace(|qk| { *qk *= scale; });
    norm
}

/// Calculate the discrete inner product `Σ conj(q) p` of two wavefunctions.
pub fn wf_dot<S, T, D>(q: &nd::ArrayBase<S, D>, p: &nd::ArrayBase<T, D>) -> C64
where
    S: nd::Data<Elem = C64>,
    T: nd::Data<Elem = C64>,
    D: nd::Dimension,
{
    nd::Zip::from(q).and(p)
        .fold(C64::from(0.0), |acc, qk, pk| acc + qk.conj() * pk)
}

/// Generate an array of frequency-space coordinates to accompany a FFT of `n`
/// points for sampling interval `dt`, in the FFT's native ordering (zero
/// frequency first, negative frequencies in the upper half).
pub fn fft_freq(n: usize, dt: f64) -> nd::Array1<f64> {
    let m = if n % 2 == 0 { n / 2 } else { (n + 1) / 2 };
    let fp: nd::Array1<f64>
        = (0..m)
        .map(|k| k as f64 / (n as f64 * dt))
        .collect();
    let fm: nd::Array1<f64>
        = (1..n - m + 1).rev()
        .map(|k| -(k as f64) / (n as f64 * dt))
        .collect();
    concatenate!(nd::Axis(0), fp, fm)
}

/// Generate an array of frequency-space coordinates for a FFT of `n` points
/// for sampling interval `dt`, in centered ordering (monotonically
/// increasing, zero frequency at index `n / 2`).
///
/// This is the [`fft_shift`] of [`fft_freq`].
pub fn fft_freq_centered(n: usize, dt: f64) -> nd::Array1<f64> {
    let h = (n / 2) as f64;
    (0..n)
        .map(|k| (k as f64 - h) / (n as f64 * dt))
        .collect()
}

// rotate the elements of `x` along `axis` by `k` places, so that element `i`
// moves to `(i + k) mod n`
fn roll_axis<A, S, D>(x: &nd::ArrayBase<S, D>, axis: nd::Axis, k: usize)
    -> nd::Array<A, D>
where
    S: nd::Data<Elem = A>,
    D: nd::Dimension,
    A: Clone,
{
    let mut out = x.to_owned();
    let n = x.len_of(axis);
    if n == 0 { return out; }
    let k = k % n;
    out.slice_axis_mut(axis, nd::Slice::from(k..))
        .assign(&x.slice_axis(axis, nd::Slice::from(..n - k)));
    out.slice_axis_mut(axis, nd::Slice::from(..k))
        .assign(&x.slice_axis(axis, nd::Slice::from(n - k..)));
    out
}

/// Return a copy of `x` with every axis rearranged to map the FFT's native
/// ordering to centered ordering (super-Nyquist frequency components moved
/// to negative frequencies).
pub fn fft_shift<A, S, D>(x: &nd::ArrayBase<S, D>) -> nd::Array<A, D>
where
    S: nd::Data<Elem = A>,
    D: nd::Dimension,
    A: Clone,
{
    let mut out = x.to_owned();
    for ax in 0..x.ndim() {
        let n = out.len_of(nd::Axis(ax));
        out = roll_axis(&out, nd::Axis(ax), n / 2);
    }
    out
}

/// Inverse of [`fft_shift`]: return a copy of `x` with every axis rearranged
/// to map centered ordering back to the FFT's native ordering.
///
/// The two only coincide for even axis lengths.
///
/// ```
/// use ndarray as nd;
/// use fresnel::utils::{ fft_freq, fft_freq_centered, ifft_shift };
///
/// let centered = fft_freq_centered(5, 0.5);
/// assert_eq!(ifft_shift(&centered), fft_freq(5, 0.5));
/// ```
pub fn ifft_shift<A, S, D>(x: &nd::ArrayBase<S, D>) -> nd::Array<A, D>
where
    S: nd::Data<Elem = A>,
    D: nd::Dimension,
    A: Clone,
{
    let mut out = x.to_owned();
    for ax in 0..x.ndim() {
        let n = out.len_of(nd::Axis(ax));
        out = roll_axis(&out, nd::Axis(ax), n - n / 2);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freq_orderings_agree() {
        for n in [1, 2, 7, 8, 9, 64] {
            let native = fft_freq(n, 0.1);
            let centered = fft_freq_centered(n, 0.1);
            assert_eq!(native.len(), n);
            assert_eq!(native[0], 0.0);
            assert_eq!(centered[n / 2], 0.0);
            assert_eq!(fft_shift(&native), centered);
            assert_eq!(ifft_shift(&centered), native);
        }
    }

    #[test]
    fn shifts_are_inverse_2d() {
        let a: nd::Array2<usize>
            = nd::Array2::from_shape_fn((5, 6), |(i, j)| 10 * i + j);
        let b = ifft_shift(&fft_shift(&a));
        assert_eq!(a, b);
        // zero-frequency corner lands in the center
        assert_eq!(fft_shift(&a)[[2, 3]], 0);
    }

    #[test]
    fn renormalize_hits_target() {
        let mut q: nd::Array1<C64>
            = (0..10).map(|k| C64::new(k as f64, -1.0)).collect();
        wf_renormalize(&mut q, 2.5);
        assert!((wf_norm(&q) - 2.5).abs() < 1e-12);
        assert!((wf_dot(&q, &q).re - 6.25).abs() < 1e-12);
    }
}
