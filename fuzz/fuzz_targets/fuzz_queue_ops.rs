#![no_main]

use std::collections::VecDeque;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use ringbench_queue::{ByteQueue, QueueError};

#[derive(Debug, Arbitrary)]
enum Op {
    Enqueue(u8),
    Dequeue,
    Peek,
    Init,
    SetIndices(u8, u8),
}

fuzz_target!(|ops: Vec<Op>| {
    let mut queue = ByteQueue::new();
    let mut model: VecDeque<u8> = VecDeque::new();
    let capacity = queue.capacity();

    for op in ops.into_iter().take(4096) {
        match op {
            Op::Enqueue(value) => match queue.enqueue(value) {
                Ok(()) => model.push_back(value),
                Err(err) => {
                    assert_eq!(err, QueueError::Full);
                    assert_eq!(model.len(), capacity);
                }
            },
            Op::Dequeue => assert_eq!(queue.dequeue().ok(), model.pop_front()),
            Op::Peek => assert_eq!(queue.peek(), model.front().copied()),
            Op::Init => {
                queue.init();
                model.clear();
            }
            Op::SetIndices(write, read) => {
                let slots = queue.slots();
                let (write, read) = (usize::from(write), usize::from(read));
                let result = queue.set_indices(write, read);
                if write >= slots || read >= slots {
                    assert!(result.is_err());
                    continue;
                }
                assert!(result.is_ok());
                // Occupied slots hold whatever was left behind; mirror them.
                model = (0..queue.len())
                    .map(|offset| queue.storage()[(read + offset) % slots])
                    .collect();
            }
        }

        // Post-conditions that must always hold:
        assert_eq!(queue.len(), model.len());
        assert!(queue.len() <= capacity);
        assert_eq!(queue.is_empty(), model.is_empty());
        assert_eq!(queue.is_full(), model.len() == capacity);
        assert!(queue.write_index() < queue.slots());
        assert!(queue.read_index() < queue.slots());
    }
});
