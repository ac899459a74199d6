//! Property-based tests for the circular queue.
//!
//! ## Invariants
//!
//! 1. FIFO: values come out in the order they went in
//! 2. Capacity bound: never more than `N - 1` live values
//! 3. Empty iff `write == read`; full iff `next(write) == read`
//! 4. Failed enqueue/dequeue leave both indices untouched
//! 5. Independent instances never observe each other's mutations

use std::collections::VecDeque;

use proptest::prelude::*;
use ringbench_queue::{ByteQueue, CircularQueue, QueueError, QUEUE_SLOTS};

// ── Strategies ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum Op {
    Enqueue(u8),
    Dequeue,
    Init,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<u8>().prop_map(Op::Enqueue),
        3 => Just(Op::Dequeue),
        1 => Just(Op::Init),
    ]
}

fn arb_ops(max_n: usize) -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(arb_op(), 0..max_n)
}

fn arb_index() -> impl Strategy<Value = usize> {
    0..QUEUE_SLOTS
}

// ── 1 + 2 + 3. Model equivalence ──────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn matches_bounded_vecdeque_model(ops in arb_ops(200)) {
        let mut q = ByteQueue::new();
        let mut model: VecDeque<u8> = VecDeque::new();
        let cap = q.capacity();

        for op in ops {
            match op {
                Op::Enqueue(v) => {
                    let got = q.enqueue(v);
                    if model.len() == cap {
                        prop_assert_eq!(got, Err(QueueError::Full));
                    } else {
                        prop_assert_eq!(got, Ok(()));
                        model.push_back(v);
                    }
                }
                Op::Dequeue => {
                    let got = q.dequeue();
                    match model.pop_front() {
                        Some(expected) => prop_assert_eq!(got, Ok(expected)),
                        None => prop_assert_eq!(got, Err(QueueError::Empty)),
                    }
                }
                Op::Init => {
                    q.init();
                    model.clear();
                }
            }
            prop_assert_eq!(q.len(), model.len());
            prop_assert!(q.len() <= cap);
            prop_assert_eq!(q.is_empty(), q.write_index() == q.read_index());
            prop_assert_eq!(q.is_empty(), model.is_empty());
            prop_assert_eq!(q.is_full(), model.len() == cap);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn round_trip_preserves_order(values in prop::collection::vec(any::<u8>(), 0..QUEUE_SLOTS)) {
        let mut q = ByteQueue::new();
        for &v in &values {
            prop_assert_eq!(q.enqueue(v), Ok(()));
        }
        for &v in &values {
            prop_assert_eq!(q.dequeue(), Ok(v));
        }
        prop_assert!(q.is_empty());
    }

    #[test]
    fn round_trip_from_any_starting_offset(
        start in arb_index(),
        values in prop::collection::vec(any::<u8>(), 0..QUEUE_SLOTS),
    ) {
        let mut q = ByteQueue::new();
        q.set_indices(start, start).unwrap();
        for &v in &values {
            prop_assert_eq!(q.enqueue(v), Ok(()));
        }
        let drained: Vec<u8> = std::iter::from_fn(|| q.dequeue().ok()).collect();
        prop_assert_eq!(drained, values);
    }
}

// ── 4. Failure leaves indices untouched ───────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn rejected_enqueue_is_idempotent(read in arb_index(), value in any::<u8>()) {
        let mut q = ByteQueue::new();
        let write = (read + QUEUE_SLOTS - 1) % QUEUE_SLOTS;
        q.set_indices(write, read).unwrap();
        let before = q.clone();
        prop_assert_eq!(q.enqueue(value), Err(QueueError::Full));
        prop_assert_eq!(q.enqueue(value), Err(QueueError::Full));
        prop_assert_eq!(q, before);
    }

    #[test]
    fn rejected_dequeue_is_idempotent(index in arb_index()) {
        let mut q = ByteQueue::new();
        q.set_indices(index, index).unwrap();
        prop_assert_eq!(q.dequeue(), Err(QueueError::Empty));
        prop_assert_eq!(q.write_index(), index);
        prop_assert_eq!(q.read_index(), index);
    }
}

// ── 5. Isolation ──────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn instances_are_independent(
        ops in prop::collection::vec((0usize..2, arb_op()), 0..200),
    ) {
        let mut queues = [ByteQueue::new(), ByteQueue::new()];
        let mut models: [VecDeque<u8>; 2] = [VecDeque::new(), VecDeque::new()];

        for (target, op) in ops {
            let other = 1 - target;
            let untouched = queues[other].clone();
            match op {
                Op::Enqueue(v) => {
                    if queues[target].enqueue(v).is_ok() {
                        models[target].push_back(v);
                    }
                }
                Op::Dequeue => {
                    let got = queues[target].dequeue().ok();
                    prop_assert_eq!(got, models[target].pop_front());
                }
                Op::Init => {
                    queues[target].init();
                    models[target].clear();
                }
            }
            prop_assert_eq!(&queues[other], &untouched);
            for (queue, model) in queues.iter().zip(&models) {
                prop_assert_eq!(queue.len(), model.len());
                prop_assert_eq!(queue.is_empty(), model.is_empty());
                prop_assert_eq!(queue.peek(), model.front().copied());
            }
        }
    }
}

#[test]
fn small_queue_sizes_keep_one_sentinel() {
    fn fill<const N: usize>() -> usize {
        let mut q = CircularQueue::<u8, N>::new();
        let mut accepted = 0;
        while q.enqueue(1).is_ok() {
            accepted += 1;
        }
        accepted
    }
    assert_eq!(fill::<2>(), 1);
    assert_eq!(fill::<3>(), 2);
    assert_eq!(fill::<16>(), 15);
}
