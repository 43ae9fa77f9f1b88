//! Generation resolver
//!
//! Assigns every active member an integer generation: roots sit at 0,
//! a child sits at least one level below each of its parents, and
//! spouses share a level. The resolver runs as a full pass after every
//! mutation; at genealogy scale a whole-graph recompute is cheaper
//! than keeping an incremental scheme honest.

use crate::graph::core::MemberStore;
use rustc_hash::FxHashMap;
use std::collections::VecDeque;

/// Breadth-first propagation with monotonic relaxation
///
/// Generations start at 0 and only ever increase during propagation:
/// a child is raised to `parent + 1` whenever that is higher than its
/// current value, and the lower half of a couple is raised to its
/// partner's level. A member re-enters the worklist whenever its value
/// increases, which terminates because values are bounded by the
/// number of active members. Members unreachable from any root keep 0.
pub(crate) fn recalculate(store: &mut MemberStore) {
    let mut levels: FxHashMap<String, u32> = FxHashMap::default();
    let mut queue: VecDeque<String> = VecDeque::new();

    for member in store.iter().filter(|m| m.is_active) {
        levels.insert(member.id.clone(), 0);
        let parentless = !has_active_parent_ref(store, member.father_id.as_deref())
            && !has_active_parent_ref(store, member.mother_id.as_deref());
        if parentless {
            queue.push_back(member.id.clone());
        }
    }

    while let Some(id) = queue.pop_front() {
        let Some(member) = store.get(&id).filter(|m| m.is_active) else {
            continue;
        };
        let level = levels.get(&id).copied().unwrap_or(0);

        for child_id in &member.children_ids {
            if let Some(child_level) = levels.get_mut(child_id) {
                if *child_level < level + 1 {
                    *child_level = level + 1;
                    queue.push_back(child_id.clone());
                }
            }
        }

        if let Some(spouse_id) = member.spouse_id.as_deref() {
            if let Some(&spouse_level) = levels.get(spouse_id) {
                if spouse_level < level {
                    levels.insert(spouse_id.to_string(), level);
                    queue.push_back(spouse_id.to_string());
                } else if spouse_level > level {
                    levels.insert(id.clone(), spouse_level);
                    queue.push_back(id.clone());
                }
            }
        }
    }

    for member in store.iter_mut() {
        if member.is_active {
            member.generation = levels.get(&member.id).copied().unwrap_or(0);
        }
    }
}

fn has_active_parent_ref(store: &MemberStore, parent_id: Option<&str>) -> bool {
    parent_id
        .and_then(|id| store.get(id))
        .is_some_and(|parent| parent.is_active)
}
