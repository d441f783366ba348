use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempograph::{
    CachePolicy, Config, Evaluator, EvaluatorBuilder, Formula, GraphError, NodeId, Timestamp,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn counting(counter: &Arc<AtomicUsize>, formula: Formula) -> Formula {
    let counter = Arc::clone(counter);
    Formula::custom(move |values| {
        counter.fetch_add(1, Ordering::SeqCst);
        formula.apply(values)
    })
}

#[test]
fn test_income_scenario() {
    init_logger();
    let calls = Arc::new(AtomicUsize::new(0));
    let mut eval = Evaluator::new();
    eval.add_source("Salary", 1000.0).unwrap();
    eval.add_source("Bonus", 500.0).unwrap();
    eval.add_computed("RendaTotal", counting(&calls, Formula::sum()))
        .unwrap();
    eval.depend_on("RendaTotal", "Salary", 0, None).unwrap();
    eval.depend_on("RendaTotal", "Bonus", 11, None).unwrap();

    assert_eq!(eval.value_at("RendaTotal", 5).unwrap(), 1000.0);
    assert_eq!(eval.value_at("RendaTotal", 15).unwrap(), 1500.0);
    assert_eq!(eval.value_at("RendaTotal", 5).unwrap(), 1000.0);
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    // The boundary instant itself includes the bonus.
    assert_eq!(eval.value_at("RendaTotal", 11).unwrap(), 1500.0);
    assert_eq!(eval.value_at("RendaTotal", 10).unwrap(), 1000.0);
}

#[test]
fn test_each_pair_computed_once_across_queries() {
    init_logger();
    let calls = Arc::new(AtomicUsize::new(0));
    let mut eval = Evaluator::new();
    eval.add_source("rate", 0.5).unwrap();
    eval.add_source("principal", 20.0).unwrap();
    eval.add_computed("interest", counting(&calls, Formula::product()))
        .unwrap();
    eval.add_computed("balance", Formula::sum()).unwrap();
    eval.add_computed("report", Formula::max()).unwrap();
    eval.depend_on("interest", "rate", 0, None).unwrap();
    eval.depend_on("interest", "principal", 0, None).unwrap();
    eval.depend_on("balance", "principal", 0, None).unwrap();
    eval.depend_on("balance", "interest", 0, None).unwrap();
    eval.depend_on("report", "interest", 0, None).unwrap();
    eval.depend_on("report", "balance", 0, None).unwrap();

    let times: [Timestamp; 3] = [0, 30, 60];
    for &t in &times {
        assert_eq!(eval.value_at("report", t).unwrap(), 30.0);
        assert_eq!(eval.value_at("balance", t).unwrap(), 30.0);
        assert_eq!(eval.value_at("interest", t).unwrap(), 10.0);
    }
    assert_eq!(calls.load(Ordering::SeqCst), times.len());
}

#[test]
fn test_no_active_dependencies_applies_formula_to_empty_set() {
    let mut eval = Evaluator::new();
    eval.add_source("late", 4.0).unwrap();
    eval.add_computed("total", Formula::sum()).unwrap();
    eval.add_computed("avg", Formula::mean()).unwrap();
    eval.depend_on("total", "late", 100, None).unwrap();
    eval.depend_on("avg", "late", 100, None).unwrap();

    assert_eq!(eval.value_at("total", 0).unwrap(), 0.0);
    assert_eq!(eval.value_at("avg", 0).unwrap(), 0.0);
    assert_eq!(eval.value_at("avg", 100).unwrap(), 4.0);
}

#[test]
fn test_cycle_reports_participants() {
    init_logger();
    let mut eval = Evaluator::new();
    eval.add_source("seed", 1.0).unwrap();
    for name in ["a", "b", "c"] {
        eval.add_computed(name, Formula::sum()).unwrap();
    }
    eval.depend_on("a", "seed", 0, None).unwrap();
    eval.depend_on("a", "b", 0, None).unwrap();
    eval.depend_on("b", "c", 0, None).unwrap();
    eval.depend_on("c", "b", 5, Some(9)).unwrap();

    assert_eq!(eval.value_at("a", 0).unwrap(), 1.0);

    let err = eval.value_at("a", 7).unwrap_err();
    match err {
        GraphError::CyclicDependency { at, ref cycle } => {
            assert_eq!(at, 7);
            let names: Vec<_> = cycle.iter().map(NodeId::as_str).collect();
            assert_eq!(names, vec!["b", "c", "b"]);
        }
        other => panic!("expected cycle, got {:?}", other),
    }
    assert!(!eval.is_cached("a", 7));
    assert!(!eval.is_cached("b", 7));

    assert_eq!(eval.value_at("a", 10).unwrap(), 1.0);
}

#[test]
fn test_cascade_after_dependency_change() {
    init_logger();
    let calls = Arc::new(AtomicUsize::new(0));
    let mut eval = Evaluator::new();
    eval.add_source("x", 2.0).unwrap();
    eval.add_source("y", 3.0).unwrap();
    eval.add_computed("sum", counting(&calls, Formula::sum()))
        .unwrap();
    eval.add_computed("double", Formula::custom(|v| v.iter().sum::<f64>() * 2.0))
        .unwrap();
    eval.depend_on("sum", "x", 0, None).unwrap();
    eval.depend_on("double", "sum", 0, None).unwrap();

    assert_eq!(eval.value_at("double", 20).unwrap(), 4.0);

    eval.depend_on("sum", "y", 10, None).unwrap();
    assert_eq!(eval.value_at("double", 20).unwrap(), 4.0);

    eval.invalidate_cascade("sum").unwrap();
    assert_eq!(eval.value_at("double", 20).unwrap(), 10.0);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_invalidate_all() {
    let mut eval = Evaluator::new();
    eval.add_source("s", 1.0).unwrap();
    eval.add_computed("c", Formula::sum()).unwrap();
    eval.depend_on("c", "s", 0, None).unwrap();
    for t in 0..4 {
        eval.value_at("c", t).unwrap();
    }

    assert_eq!(eval.invalidate_all(), 4);
    assert!(eval.cache().is_empty());
    assert_eq!(eval.stats().invalidated, 4);
}

#[test]
fn test_bounded_cache_keeps_results_correct() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut eval = EvaluatorBuilder::new()
        .cache_policy(CachePolicy::Bounded {
            max_entries_per_node: 1,
        })
        .build()
        .unwrap();
    eval.add_source("s", 5.0).unwrap();
    eval.add_computed("c", counting(&calls, Formula::sum()))
        .unwrap();
    eval.depend_on("c", "s", 0, None).unwrap();

    assert_eq!(eval.value_at("c", 1).unwrap(), 5.0);
    assert_eq!(eval.value_at("c", 2).unwrap(), 5.0);
    assert_eq!(eval.value_at("c", 1).unwrap(), 5.0);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(eval.stats().evictions, 2);
}

/// `length` computed nodes, each summing the previous one, on top of `base`.
fn chain(eval: &mut Evaluator, length: usize) -> String {
    eval.add_source("base", 1.0).unwrap();
    eval.add_computed("n0", Formula::sum()).unwrap();
    eval.depend_on("n0", "base", 0, None).unwrap();
    for i in 1..length {
        let name = format!("n{}", i);
        eval.add_computed(name.as_str(), Formula::sum()).unwrap();
        eval.depend_on(&name, &format!("n{}", i - 1), 0, None)
            .unwrap();
    }
    format!("n{}", length - 1)
}

#[test]
fn test_chain_as_deep_as_default_limit() {
    let mut eval = Evaluator::new();
    let depth = Config::default().max_eval_depth;
    let top = chain(&mut eval, depth);

    assert_eq!(eval.value_at(&top, 0).unwrap(), 1.0);
    assert_eq!(eval.stats().computations, depth as u64);
}

#[test]
fn test_chain_past_default_limit() {
    let mut eval = Evaluator::new();
    let depth = Config::default().max_eval_depth;
    let top = chain(&mut eval, depth + 1);

    assert!(matches!(
        eval.value_at(&top, 0),
        Err(GraphError::DepthLimitExceeded { at: 0, limit }) if limit == depth
    ));
    assert!(!eval.is_cached(&top, 0));

    // Nodes below the top still fit within the limit.
    assert_eq!(eval.value_at(&format!("n{}", depth - 1), 0).unwrap(), 1.0);
}

#[test]
fn test_deep_chain_across_times() {
    let mut eval = Evaluator::with_config(Config::default().with_max_eval_depth(100_000));
    let top = chain(&mut eval, 20_000);

    assert_eq!(eval.value_at(&top, 0).unwrap(), 1.0);
    assert_eq!(eval.value_at(&top, 1).unwrap(), 1.0);
    assert_eq!(eval.stats().computations, 40_000);
}

#[test]
fn test_interval_queries_on_dependency_graph() {
    let mut eval = Evaluator::new();
    eval.add_source("Salary", 1000.0).unwrap();
    eval.add_source("Bonus", 500.0).unwrap();
    eval.add_computed("RendaTotal", Formula::sum()).unwrap();
    eval.depend_on("RendaTotal", "Salary", 0, None).unwrap();
    let bonus = eval.depend_on("RendaTotal", "Bonus", 11, None).unwrap();
    eval.deactivate_dependency(&bonus, 20);

    let graph = eval.graph();
    assert_eq!(graph.active_at(15).len(), 2);
    assert_eq!(graph.active_at(25).len(), 1);
    assert_eq!(graph.edges_overlapping(20, 30).len(), 2);
    assert_eq!(graph.outgoing("RendaTotal").unwrap().len(), 2);
}
