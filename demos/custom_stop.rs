use sdpath::nalgebra as na;
use sdpath::{algo::PrimalDual, CentralPath, SdpProblem, SolverDriver};
use na::{dmatrix, dvector};

fn main() -> Result<(), String> {
    env_logger::init();

    // The smallest eigenvalue of C is the optimal y.
    let problem = SdpProblem::new(
        vec![dmatrix![1.0, 0.0, 0.0; 0.0, 1.0, 0.0; 0.0, 0.0, 1.0]],
        dvector![1.0],
        dmatrix![2.0, 1.0, 0.0; 1.0, 3.0, 1.0; 0.0, 1.0, 4.0],
    )
    .map_err(|error| format!("{error}"))?;

    let mut solver = SolverDriver::builder(&problem)
        .with_initial(CentralPath::identity(3, 1))
        .with_algo(PrimalDual::new)
        .build()
        .map_err(|error| format!("{error}"))?;

    let tolerance = 1e-6;

    let solution = solver
        .find(|state| {
            println!(
                "iter = {}\tdelta = {:e}\tphi = {:e}\ty = {}",
                state.iter(),
                state.delta(),
                state.phi(),
                state.path().y()[0]
            );
            state.phi() <= tolerance || state.iter() >= 100
        })
        .map_err(|error| format!("{error}"))?;

    println!("{:?}: y = {}", solution.termination(), solution.path().y()[0]);

    if solution.phi() <= tolerance {
        Ok(())
    } else {
        Err("did not converge".to_string())
    }
}
