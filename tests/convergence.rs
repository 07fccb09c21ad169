// tests/convergence.rs
//
// End-to-end sweeps on the benchmark problem and on manufactured solutions.
// The full reference sweep (p = 1..=8, 30 trials) is slow and ignored by default:
//   cargo test --test convergence -- --ignored

use fdfe_bench::boundary::bc2d::BoundaryConditions2D;
use fdfe_bench::domain::grid2d::{Grid2D, StepSize2D};
use fdfe_bench::domain::problem::EllipticProblem;
use fdfe_bench::numerical::stencil::Discretization;
use fdfe_bench::scenario::{benchmark_domain, benchmark_problem, radial_problem, Constant, RadiusSquared};
use fdfe_bench::solver::benchmark::{records, ErrorBenchmark, ErrorRecord};

const METHODS: [Discretization; 2] = [Discretization::FiniteDifference, Discretization::FiniteElement];

fn sweep(
    problem: &EllipticProblem,
    reference: &RadiusSquared,
    method: Discretization,
    exponents: &[i32],
    trials: usize,
) -> Vec<ErrorRecord> {
    let bench = ErrorBenchmark::new(benchmark_domain(), problem, reference, method, trials).unwrap();
    records(&bench.run(exponents).unwrap())
}

#[test]
fn benchmark_grid_dimensions() {
    let grid = Grid2D::new(benchmark_domain(), StepSize2D::from_exponent(3)).unwrap();
    assert_eq!((grid.m(), grid.n()), (17, 9));
}

#[test]
fn benchmark_sweep_reduces_element_error() {
    let problem = benchmark_problem();
    let exponents = [1, 2, 3, 4, 5];

    for method in METHODS {
        let records = sweep(&problem, &RadiusSquared, method, &exponents, 3);
        assert_eq!(records.len(), exponents.len());
        for (record, &p) in records.iter().zip(&exponents) {
            assert_eq!(record.p, p);
            assert_eq!(record.num_trials, 3);
            assert!(record.error_abs_mean >= 0.0);
            assert!(record.t_avg >= 0.0);
        }

        let coarse = records.first().unwrap().error_abs_mean;
        let fine = records.last().unwrap().error_abs_mean;
        match method {
            // exact on x² + y², so only rounding is left
            Discretization::FiniteDifference => {
                assert!(records.iter().all(|r| r.error_abs_mean < 1e-9), "{:?}", records);
            }
            Discretization::FiniteElement => {
                assert!(fine < coarse, "fine {} not below coarse {}", fine, coarse);
            }
        }
    }
}

#[test]
fn manufactured_quadratic_without_reaction() {
    let problem = radial_problem(&benchmark_domain(), Constant(0.0));
    for method in METHODS {
        for record in sweep(&problem, &RadiusSquared, method, &[1, 2, 3, 4], 1) {
            assert!(record.error_abs_mean < 1e-9, "{}: {:?}", method, record);
        }
    }
}

#[test]
fn manufactured_harmonic_solution_converges() {
    // u = e^x sin(y) is harmonic, so r = 0 and f = 0
    struct Harmonic;
    impl fdfe_bench::domain::field::FieldFunction for Harmonic {
        fn value(&self, x: f64, y: f64) -> f64 {
            x.exp() * y.sin()
        }
    }

    let domain = benchmark_domain();
    let (x_min, x_max, y_min, y_max) = (domain.x_min, domain.x_max, domain.y_min, domain.y_max);
    let problem = EllipticProblem::new(
        BoundaryConditions2D::new(
            move |x: f64| x.exp() * y_max.sin(),
            move |x: f64| x.exp() * y_min.sin(),
            move |y: f64| x_min.exp() * y.sin(),
            move |y: f64| x_max.exp() * y.sin(),
        ),
        |_: f64, _: f64| 0.0,
        |_: f64, _: f64| 0.0,
    );

    for method in METHODS {
        let bench = ErrorBenchmark::new(domain, &problem, &Harmonic, method, 1).unwrap();
        let errors: Vec<f64> = records(&bench.run(&[2, 3, 4, 5]).unwrap())
            .iter()
            .map(|r| r.error_abs_mean)
            .collect();
        for pair in errors.windows(2) {
            assert!(pair[1] < pair[0], "{}: errors {:?} do not decrease", method, errors);
        }
        assert!(errors[3] < 1e-2, "{}: {:?}", method, errors);
    }
}

#[test]
fn repeated_trials_match_single_trial() {
    let problem = benchmark_problem();
    for method in METHODS {
        let one = sweep(&problem, &RadiusSquared, method, &[3], 1);
        let many = sweep(&problem, &RadiusSquared, method, &[3], 4);
        assert!((one[0].error_avg - many[0].error_avg).abs() < 1e-12);
        assert!((one[0].error_abs_mean - many[0].error_abs_mean).abs() < 1e-12);
    }
}

#[test]
#[ignore]
fn full_reference_sweep() {
    let problem = benchmark_problem();
    let exponents: Vec<i32> = (1..=8).collect();
    for method in METHODS {
        let records = sweep(&problem, &RadiusSquared, method, &exponents, 30);
        assert_eq!(records.len(), 8);
        assert!(records.iter().all(|r| r.error_abs_mean >= 0.0));
        let (first, last) = (&records[0], &records[7]);
        match method {
            Discretization::FiniteDifference => assert!(last.error_abs_mean < 1e-8),
            Discretization::FiniteElement => assert!(last.error_abs_mean < first.error_abs_mean),
        }
    }
}
