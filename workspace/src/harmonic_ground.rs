use ndarray as nd;
use fresnel::{
    grid::{ Grid1D, GridProvider },
    problem::Problem,
    problems::Harmonic,
    propagate::{ Mode, Propagator },
};
use tracing::info;

const BLOCKS: usize = 20;
const STEPS_PER_BLOCK: usize = 200;

// largest deviation of the peak-normalized density from exp(-x²)
fn residual(x: &nd::Array1<f64>, rho: &nd::Array1<f64>) -> f64 {
    let peak = rho.iter().copied().fold(0.0_f64, f64::max);
    x.iter().zip(rho)
        .map(|(xk, rk)| (rk / peak - (-xk.powi(2)).exp()).abs())
        .fold(0.0, f64::max)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let prob = Harmonic;
    let params = prob.params();
    let grid = Grid1D::from_params(&params)?;
    let x = grid.coords().x.clone();
    let psi0 = prob.initial_condition(&params, grid.coords());
    let mut prop = Propagator::new(&grid, params, Mode::GroundState, psi0)?;

    for block in 0..BLOCKS {
        let rho_prev = prop.psi().mapv(|q| q.norm_sqr());
        for _ in 0..STEPS_PER_BLOCK {
            prop.step(&prob)?;
        }
        let rho = prop.psi().mapv(|q| q.norm_sqr());
        let change
            = rho.iter().zip(&rho_prev)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);
        info!(
            block,
            t = prop.time(),
            change,
            residual = residual(&x, &rho),
            "relaxing"
        );
    }
    println!(
        "after {} steps: max |ρ/ρ_max - exp(-x²)| = {:.3e}",
        prop.step_count(),
        residual(&x, &prop.psi().mapv(|q| q.norm_sqr())),
    );
    Ok(())
}
