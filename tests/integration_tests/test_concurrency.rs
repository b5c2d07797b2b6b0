// rules are immutable once built, so one tree can be evaluated from many threads

use std::sync::Arc;
use std::thread;

use rulekit::rules::{combine_rules, create_rule, evaluate_rule, EvalContext};

#[test]
fn test_shared_rule_across_threads() {
    let rule = create_rule("age > 30 AND department = 'Sales'").unwrap();

    thread::scope(|s| {
        let handles: Vec<_> = (0..8i64)
            .map(|i| {
                let rule = &rule;
                s.spawn(move || {
                    let ctx = EvalContext::new()
                        .with("age", 26 + i)
                        .with("department", "Sales");
                    evaluate_rule(rule, &ctx).unwrap()
                })
            })
            .collect();

        let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(
            results,
            vec![false, false, false, false, false, true, true, true]
        );
    });
}

#[test]
fn test_combined_rule_moves_between_threads() {
    let left = create_rule("experience > 5").unwrap();
    let right = create_rule("salary < 100000").unwrap();
    let combined = combine_rules(&left, &right, "OR").unwrap();

    // the subtrees are shared, not copied
    assert_eq!(Arc::strong_count(&left), 2);

    let handle = thread::spawn(move || {
        let ctx = EvalContext::new()
            .with("experience", 2)
            .with("salary", 120000);
        evaluate_rule(&combined, &ctx)
    });

    assert_eq!(handle.join().unwrap(), Ok(false));
    assert_eq!(Arc::strong_count(&left), 1);
}
