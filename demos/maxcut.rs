use sdpath::{
    algo::{homogeneous::HomogeneousOptions, HomogeneousSelfDual},
    newton::Scaling,
    testing::{MaxCut, TestProblem},
    SolverDriver,
};

fn main() -> Result<(), String> {
    env_logger::init();

    let f = MaxCut::cycle(7);
    let problem = f.problem();

    let mut solver = SolverDriver::builder(&problem)
        .with_algo(|problem, initial| {
            let mut options = HomogeneousOptions::default();
            options.set_scaling(Scaling::Hkm);
            HomogeneousSelfDual::with_options(problem, initial, options)
        })
        .build()
        .map_err(|error| format!("{error}"))?;

    let solution = solver.solve().map_err(|error| format!("{error}"))?;
    let report = solver.report();

    println!(
        "{}: {:?} after {} iterations",
        solver.name(),
        solution.termination(),
        solution.iterations()
    );
    println!(
        "primal = {}\tdual = {}\tknown optimum = {}",
        report.primal_objective(),
        report.dual_objective(),
        f.optimum()
    );

    if report.is_optimal(1e-6) {
        Ok(())
    } else {
        Err("did not converge".to_string())
    }
}
