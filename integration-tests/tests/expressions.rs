use std::thread;

use approx::assert_relative_eq;
use hone_expr::{EvalError, Expression, cache_len};
use hone_signal::{CaptureSignals, FailureToSignal, Level};
use hone_solve::improve::{Error, Improve};
use integration_tests::init_tracing;

fn expr(source: &str) -> Expression {
    Expression::compile(source).expect("test expressions are valid")
}

#[test]
fn accepts_after_three_updates() {
    init_tracing();
    let mut engine = Improve::new(expr("$0 >= 4"), expr("$0 + 1"));

    let accepted = engine.invoke(1.0).expect("accepted");

    assert_eq!(accepted, 4.0);
    assert_eq!(engine.trajectory().as_slice(), [1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn stops_at_the_ceiling() {
    let mut engine = Improve::new(expr("false"), expr("$0"));
    engine.set_max_iters(Some(10)).expect("valid ceiling");

    let error = engine.invoke(1.0).expect_err("never accepted");

    assert!(error.is_max_iters());
    assert_eq!(error.to_string(), "reached the iteration limit of 10");
    assert_eq!(engine.trajectory().as_slice(), [1.0; 11]);
}

#[test]
fn accepts_initial_guess_without_updating() {
    let mut engine = Improve::new(expr("$0 >= 4"), expr("$0 + 1"));

    assert_eq!(engine.invoke(4.0).expect("accepted"), 4.0);
    assert_eq!(engine.trajectory().as_slice(), [4.0]);
}

#[test]
fn update_sees_completed_iterations() {
    let mut engine = Improve::new(expr("$0 >= 6"), expr("$0 + $1"));

    engine.invoke(0.0).expect("accepted");

    assert_eq!(engine.trajectory().as_slice(), [0.0, 0.0, 1.0, 3.0, 6.0]);
}

#[test]
fn converges_to_golden_ratio() {
    let mut engine = Improve::new(expr("abs($0 ** 2 - $0 - 1) < 1e-12"), expr("1 / $0 + 1"));
    engine.set_max_iters_str("100").expect("valid ceiling");

    let phi = engine.invoke(1.0).expect("converges well within the ceiling");

    assert_relative_eq!(phi, (1.0 + 5.0_f64.sqrt()) / 2.0, epsilon = 1e-10);
    assert!(engine.trajectory().len() < 100);
}

#[test]
fn evaluation_failures_reach_the_caller() {
    let mut engine = Improve::new(expr("$0 + 1"), expr("$0 + 1"));

    let error = engine.invoke(1.0).expect_err("decision yields a number");

    assert!(matches!(
        error,
        Error::Decide(EvalError::TypeMismatch {
            expected: "bool",
            found: "number"
        })
    ));
    assert_eq!(engine.trajectory().as_slice(), [1.0]);
}

#[test]
fn evaluation_failures_can_become_signals() {
    // `$2` is never bound, so every update fails and keeps the guess.
    let mut update = FailureToSignal::new(expr("$0 + $2"));
    update.set_level(Level::Warning);

    let mut engine = Improve::new(expr("$0 > 0"), update);
    engine.set_max_iters(Some(3)).expect("valid ceiling");

    let mut capture = CaptureSignals::new(engine);
    let error = capture
        .run(|engine| engine.invoke(-1.0))
        .expect_err("the guess never changes");

    assert!(error.is_max_iters());
    assert_eq!(capture.get_ref().trajectory().as_slice(), [-1.0; 4]);

    let signals = capture.captured();
    assert_eq!(signals.len(), 3);
    assert!(signals.iter().all(|signal| signal.level() == Level::Warning));
    assert_eq!(signals[0].context()["kind"], "EvalError");
}

#[test]
fn repeated_invocations_share_one_history() {
    let mut engine = Improve::new(expr("$0 >= 2"), expr("$0 + 1"));

    engine.invoke(0.0).expect("accepted");
    engine.invoke(1.0).expect("accepted");

    assert_eq!(
        engine.into_trajectory().into_vec(),
        vec![0.0, 1.0, 2.0, 1.0, 2.0]
    );
}

#[test]
fn cache_is_shared_across_threads() {
    let source = "max($0, 1) * 3";

    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4_i32)
            .map(|i| {
                scope.spawn(move || {
                    let update = expr(source);
                    let mut engine = Improve::new(expr("$0 >= 9"), update);
                    engine.invoke(f64::from(i)).expect("accepted")
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().expect("thread finished"))
            .collect()
    });

    assert_eq!(results, [9.0, 9.0, 18.0, 9.0]);
    assert!(cache_len() >= 2);
}
