//! Theoretical background.
//!
//! # Contents
//! - [Background](#background)
//! - [Imaginary time](#imaginary-time)
//! - [Absorbing boundaries](#absorbing-boundaries)
//! - [Frequency ordering](#frequency-ordering)
//!
//! # Background
//! The equation solved here is a nonlinear Schrödinger equation (NLSE) with a
//! potential that may depend on time and on the wavefunction itself:
//! ```text
//!   ∂ψ     1
//! i -- = - - ∇²ψ + V(t, x, ψ) ψ
//!   ∂t     2
//! ```
//! which is also the paraxial wave equation of optics when *t* is read as the
//! propagation distance along the beam axis (hence "beam propagation method",
//! BPM). The right-hand side splits into a kinetic operator
//! *H*<sub>*k*</sub> = -∇²/2 and a potential operator *H*<sub>*v*</sub> = *V*,
//! and a single step *dt* is approximated by applying the two one after the
//! other:
//! ```text
//!               -i H_k dt  -i H_v dt
//! ψ(t + dt) ≈ [e          e         ] ψ(t)
//! ```
//! Since *V* is diagonal in position space, the potential factor is a
//! pointwise phase. The kinetic factor is diagonal in frequency space, where
//! ∇² becomes *L*(*k*) = -(2π*k*)², and is applied as a pointwise phase
//! between a forward and an inverse discrete Fourier transform. Taking a step
//! then looks like this:
//! ```text
//!        ψ(t, x)
//!           |
//!           V
//!      -i V(t, x) dt
//!     e
//!           |
//!           '--> FFT ---.
//!                       |
//!                       V
//!                 σ L(k) dt/2
//!                e
//!                       |
//!           .-- iFFT <--'
//!           |
//!           V
//!     absorbing mask
//!           |
//!           V
//!     renormalize
//!           |
//!           V
//!     ψ(t + dt, x)
//! ```
//! where σ = *i* for ordinary evolution. Over many steps, the sequence of
//! alternating factors is equivalent to the symmetric (Strang) splitting up to
//! the treatment of the first and last half-steps.
//!
//! The potential is re-evaluated at the start of every step at *t* = *n*
//! *dt* and from the current ψ, which is how nonlinear terms (e.g. a Kerr-type
//! *V* = -|ψ|²) enter.
//!
//! # Imaginary time
//! Substituting *t* → -*i* *τ* turns the oscillating phases of each energy
//! eigencomponent into decaying exponentials, exp(-*E* *τ*), so that repeated
//! steps followed by renormalization suppress everything but the lowest-energy
//! component. Here this is done for the kinetic factor only, by taking σ = 1:
//! ```text
//!  σ L(k) dt/2      -(2πk)² dt/2
//! e            →   e
//! ```
//! The potential factor is kept as a pure phase. The resulting fixed point is
//! therefore not the exact eigenstate of -∇²/2 + *V*: for *V* = *x*², for
//! example, the profile reached is |ψ|² ∝ exp(-*x*²) rather than
//! exp(-√2 *x*²). Damping the kinetic term alone still suppresses
//! high-frequency content, and the procedure converges to the same profile
//! from any initial guess with non-zero overlap.
//!
//! Because the kinetic factor no longer conserves the norm in this mode, the
//! norm is restored to its initial value after every step. The same
//! renormalization is applied in real-time mode, where it compensates for what
//! the absorbing mask removes; a run therefore describes the shape of ψ, not
//! its total probability.
//!
//! # Absorbing boundaries
//! The discrete Fourier transform makes the grid periodic, so that any
//! outgoing wave would re-enter from the opposite side. To suppress this, ψ is
//! multiplied after every step by a real mask that is 1 in the interior and
//! decays near the edges. Along a single axis with half-width *x*<sub>max</sub>
//! and edge width *w* = *x*<sub>max</sub>/20,
//! ```text
//! s(x) = 2 - tanh((x + x_max) / w) + tanh((x - x_max) / w)
//!
//! mask(x) = exp(-a s(x) dt)
//! ```
//! where *a* is the absorption coefficient. *s* is ≈ 0 well inside the window
//! and ≈ 1 at the edges. In 2D the shells of the two axes are added before
//! exponentiating. With *a* = 0 the mask is identically 1.
//!
//! # Frequency ordering
//! FFT output places the zero frequency at index 0, followed by the positive
//! and then the negative frequencies. The Laplacian is built on the centered
//! frequency axis
//! ```text
//! k[j] = (j - ⌊N/2⌋) / (2 x_max),  j ∊ {0, ..., N - 1}
//! ```
//! and moved into the native ordering with an inverse shift (a rotation by
//! ⌊*N*/2⌋ to the left). For even *N* this coincides with a forward shift, but
//! for odd *N* only the inverse shift puts *k* = 0 at index 0.
