//! Random sequences of ownership operations on a handful of shared pointers,
//! checked against a simple model of which value each slot belongs to.

mod common;

use common::Tracked;
use holdfast::SharedPtr;
use proptest::prelude::*;
use std::cell::Cell;
use std::rc::Rc;

const SLOTS: usize = 4;

#[derive(Debug, Clone)]
enum Op {
    Fresh(usize),
    Clone(usize, usize),
    CloneFrom(usize, usize),
    Take(usize, usize),
    AssignMove(usize, usize),
    Drop(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let slot = 0..SLOTS;
    prop_oneof![
        slot.clone().prop_map(Op::Fresh),
        (slot.clone(), slot.clone()).prop_map(|(a, b)| Op::Clone(a, b)),
        (slot.clone(), slot.clone()).prop_map(|(a, b)| Op::CloneFrom(a, b)),
        (slot.clone(), slot.clone()).prop_map(|(a, b)| Op::Take(a, b)),
        (slot.clone(), slot.clone()).prop_map(|(a, b)| Op::AssignMove(a, b)),
        slot.prop_map(Op::Drop),
    ]
}

/// Which value id each slot co-owns; `None` for detached or vacant slots.
fn owners_of(model: &[Option<u32>], id: u32) -> usize {
    model.iter().filter(|m| **m == Some(id)).count()
}

proptest! {
    #[test]
    fn test_counts_follow_model(ops in proptest::collection::vec(op_strategy(), 0..64)) {
        let drops = Rc::new(Cell::new(0_usize));
        let mut next_id = 0_u32;
        let mut slots: Vec<Option<SharedPtr<Tracked>>> = (0..SLOTS).map(|_| None).collect();
        let mut model: Vec<Option<u32>> = vec![None; SLOTS];

        for op in ops {
            match op {
                Op::Fresh(i) => {
                    slots[i] = Some(SharedPtr::new(Tracked::new(next_id, &drops)));
                    model[i] = Some(next_id);
                    next_id += 1;
                }
                Op::Clone(src, dst) => {
                    if let Some(cloned) = slots[src].as_ref().map(SharedPtr::clone) {
                        slots[dst] = Some(cloned);
                        model[dst] = model[src];
                    }
                }
                Op::CloneFrom(src, dst) => {
                    if src == dst {
                        continue;
                    }
                    let source = match (&slots[src], &slots[dst]) {
                        (Some(source), Some(_)) => Some(source.clone()),
                        _ => None,
                    };
                    if let Some(source) = source {
                        if let Some(target) = slots[dst].as_mut() {
                            target.clone_from(&source);
                        }
                        model[dst] = model[src];
                    }
                }
                Op::Take(src, dst) => {
                    if src == dst {
                        continue;
                    }
                    if let Some(p) = slots[src].as_mut() {
                        let taken = SharedPtr::take_from(p);
                        slots[dst] = Some(taken);
                        model[dst] = model[src];
                        model[src] = None;
                    }
                }
                Op::AssignMove(src, dst) => {
                    if src == dst {
                        continue;
                    }
                    if slots[src].is_none() || slots[dst].is_none() {
                        continue;
                    }
                    if let (Some(mut source), Some(mut target)) = (slots[src].take(), slots[dst].take()) {
                        target.assign_move(&mut source);
                        slots[src] = Some(source);
                        slots[dst] = Some(target);
                        model[dst] = model[src];
                        model[src] = None;
                    }
                }
                Op::Drop(i) => {
                    slots[i] = None;
                    model[i] = None;
                }
            }

            for (slot, owned) in slots.iter().zip(&model) {
                if let Some(p) = slot {
                    match owned {
                        Some(id) => {
                            prop_assert_eq!(p.id, *id);
                            prop_assert_eq!(p.use_count(), owners_of(&model, *id));
                        }
                        None => {
                            prop_assert_eq!(p.use_count(), 0);
                        }
                    }
                }
            }

            let live: std::collections::HashSet<u32> = model.iter().flatten().copied().collect();
            prop_assert_eq!(drops.get(), next_id as usize - live.len());
        }

        drop(slots);
        prop_assert_eq!(drops.get(), next_id as usize);
    }
}
