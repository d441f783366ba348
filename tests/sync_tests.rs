use std::thread;
use tempograph::{Evaluator, Formula, NodeId, SyncEvaluator, SyncGraph, TemporalGraph};

#[test]
fn test_concurrent_edge_inserts() {
    let graph = SyncGraph::new(TemporalGraph::with_identity(|n: &u32| {
        NodeId::new(n.to_string())
    }));
    for n in 0..4u32 {
        graph.insert_node(n).unwrap();
    }

    let handles: Vec<_> = (0..4u32)
        .map(|worker| {
            let graph = graph.clone();
            thread::spawn(move || {
                for t in 0..50i64 {
                    let from = worker.to_string();
                    let to = ((worker + 1) % 4).to_string();
                    graph
                        .add_edge(tempograph::EdgeSpec::new(from.as_str(), to.as_str(), t))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(graph.read(|g| g.edge_count()), 200);
    assert_eq!(graph.active_at(49).len(), 200);
    assert_eq!(graph.outgoing("0").unwrap().len(), 50);
}

#[test]
fn test_deactivate_through_shared_graph() {
    let graph = SyncGraph::new(TemporalGraph::with_identity(|s: &String| {
        NodeId::from(s.as_str())
    }));
    graph.insert_node("a".to_string()).unwrap();
    graph.insert_node("b".to_string()).unwrap();
    let id = graph
        .add_edge(tempograph::EdgeSpec::new("a", "b", 0))
        .unwrap();

    let writer = graph.clone();
    thread::spawn(move || writer.deactivate_edge(&id, 5))
        .join()
        .unwrap();

    assert!(graph.active_at(6).is_empty());
    assert_eq!(graph.edges_overlapping(0, 5).len(), 1);
}

#[test]
fn test_shared_evaluator_computes_each_pair_once() {
    let eval = SyncEvaluator::new(Evaluator::new());
    eval.add_source("Salary", 1000.0).unwrap();
    eval.add_source("Bonus", 500.0).unwrap();
    eval.add_computed("RendaTotal", Formula::sum()).unwrap();
    eval.depend_on("RendaTotal", "Salary", 0, None).unwrap();
    eval.depend_on("RendaTotal", "Bonus", 11, None).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let eval = eval.clone();
            thread::spawn(move || {
                let t = if i % 2 == 0 { 5 } else { 15 };
                eval.value_at("RendaTotal", t).unwrap()
            })
        })
        .collect();

    let mut values: Vec<f64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    values.sort_by(f64::total_cmp);
    assert_eq!(values[..4], [1000.0; 4]);
    assert_eq!(values[4..], [1500.0; 4]);

    let stats = eval.stats();
    assert_eq!(stats.computations, 2);
    assert_eq!(stats.cache_hits, 6);
}

#[test]
fn test_shared_evaluator_invalidate() {
    let eval = SyncEvaluator::new(Evaluator::new());
    eval.add_source("s", 1.0).unwrap();
    eval.add_computed("c", Formula::sum()).unwrap();
    eval.depend_on("c", "s", 0, None).unwrap();

    assert_eq!(eval.value_at("c", 0).unwrap(), 1.0);
    eval.with(|e| e.set_source_value("s", 2.0)).unwrap();
    assert_eq!(eval.value_at("c", 0).unwrap(), 1.0);

    assert_eq!(eval.invalidate("c").unwrap(), 1);
    assert_eq!(eval.value_at("c", 0).unwrap(), 2.0);
}
