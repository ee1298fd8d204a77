use sdpath::nalgebra as na;
use sdpath::{
    algo::{homogeneous::Infeasibility, HomogeneousSelfDual},
    CentralPath, SdpProblem, Solver,
};
use na::{dmatrix, dvector};

fn solve(problem: &SdpProblem<f64>) -> Result<(), String> {
    // The start is neither primal nor dual feasible.
    let initial = CentralPath::scaled_identity(problem.n(), problem.p(), 100.0);
    let mut solver =
        HomogeneousSelfDual::new(problem, initial).map_err(|error| format!("{error}"))?;

    let termination = solver.search().map_err(|error| format!("{error}"))?;

    println!(
        "{:?} after {} iterations, tau = {:e}, kappa = {:e}",
        termination,
        solver.iter(),
        solver.tau(),
        solver.kappa()
    );

    match solver.infeasibility() {
        Some(Infeasibility::Primal) => println!("primal problem is infeasible"),
        Some(Infeasibility::Dual) => println!("dual problem is infeasible"),
        None => {
            let solution = solver.solution();
            println!(
                "optimal value = {}\tX = {}",
                problem.primal_objective(solution.x()),
                solution.x()
            );
        }
    }

    Ok(())
}

fn main() -> Result<(), String> {
    env_logger::init();

    // minimize x11 + x22 + x12 subject to x11 = 1, x22 = 1.
    let feasible = SdpProblem::new(
        vec![dmatrix![1.0, 0.0; 0.0, 0.0], dmatrix![0.0, 0.0; 0.0, 1.0]],
        dvector![1.0, 1.0],
        dmatrix![1.0, 0.5; 0.5, 1.0],
    )
    .map_err(|error| format!("{error}"))?;

    // x = -1 with x ⪰ 0.
    let infeasible = SdpProblem::new(vec![dmatrix![1.0]], dvector![-1.0], dmatrix![1.0])
        .map_err(|error| format!("{error}"))?;

    solve(&feasible)?;
    solve(&infeasible)
}
