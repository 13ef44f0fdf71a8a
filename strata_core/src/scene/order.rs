// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reordering algorithms over per-tier lists.
//!
//! Each list is ordered bottom to top. These functions know nothing about
//! surfaces or locking; membership is decided by the caller's predicates.

use std::mem;

/// Appends `item` to the top of tier `index`, growing the tier list as needed.
pub(super) fn push_top<T>(layers: &mut Vec<Vec<T>>, index: usize, item: T) {
    if layers.len() <= index {
        layers.resize_with(index + 1, Vec::new);
    }
    layers[index].push(item);
}

/// Moves the item with key `key` to the top of tier `to`.
///
/// Returns `false` if no item has that key.
pub(super) fn raise_one<T, K: PartialEq>(
    layers: &mut Vec<Vec<T>>,
    key: impl Fn(&T) -> K,
    wanted: K,
    to: usize,
) -> bool {
    let found = layers.iter().enumerate().find_map(|(index, layer)| {
        layer
            .iter()
            .position(|item| key(item) == wanted)
            .map(|pos| (index, pos))
    });
    let Some((index, pos)) = found else {
        return false;
    };
    let item = layers[index].remove(pos);
    push_top(layers, to, item);
    true
}

/// Moves every item for which `target` names a tier to the top of that
/// tier, keeping the relative order of the moved items.
///
/// Returns `true` if the resulting order differs from the previous one.
pub(super) fn raise_members<T, K: PartialEq>(
    layers: &mut Vec<Vec<T>>,
    key: impl Fn(&T) -> K,
    target: impl Fn(&T) -> Option<usize>,
) -> bool {
    let before = keys(layers, &key);
    for index in 0..layers.len() {
        let mut kept = Vec::with_capacity(layers[index].len());
        let mut raised = Vec::new();
        for item in mem::take(&mut layers[index]) {
            match target(&item) {
                Some(to) => raised.push((to, item)),
                None => kept.push(item),
            }
        }
        layers[index] = kept;
        for (to, item) in raised {
            push_top(layers, to, item);
        }
    }
    keys(layers, &key) != before
}

/// Exchanges the Z-order of two groups within one tier.
///
/// The affected span runs from the first member of either group to the last
/// one (or to the top of the tier if some members live elsewhere). Within
/// it, the group met second moves to the bottom and the group met first to
/// the top; everything else keeps its relative order between them.
pub(super) fn swap_z_order<T>(
    layer: &mut [T],
    in_first: impl Fn(&T) -> bool,
    in_second: impl Fn(&T) -> bool,
    first_len: usize,
    second_len: usize,
) {
    let mut begin = None;
    let mut end = layer.len();
    let (mut seen_first, mut seen_second) = (0, 0);
    let mut first_to_front = false;
    for (i, item) in layer.iter().enumerate() {
        if seen_first == first_len && seen_second == second_len {
            end = i;
            break;
        }
        if in_first(item) {
            begin.get_or_insert(i);
            seen_first += 1;
        } else if in_second(item) {
            if begin.is_none() {
                begin = Some(i);
                first_to_front = true;
            }
            seen_second += 1;
        }
    }
    let Some(begin) = begin else {
        return;
    };

    let rank = |item: &T| {
        let (front, back) = if first_to_front {
            (in_first(item), in_second(item))
        } else {
            (in_second(item), in_first(item))
        };
        if front {
            0
        } else if back {
            2
        } else {
            1
        }
    };
    layer[begin..end].sort_by_key(rank);
}

/// Moves the members of one tier to its bottom, preserving relative order
/// on both sides.
///
/// Returns `false`, leaving the tier untouched, if every member already sits
/// below every non-member.
pub(super) fn send_to_back<T>(layer: &mut Vec<T>, member: impl Fn(&T) -> bool) -> bool {
    let boundary = layer
        .iter()
        .position(|item| !member(item))
        .unwrap_or(layer.len());
    if !layer[boundary..].iter().any(&member) {
        return false;
    }
    let (mut back, front): (Vec<T>, Vec<T>) = mem::take(layer).into_iter().partition(&member);
    back.extend(front);
    *layer = back;
    true
}

fn keys<T, K>(layers: &[Vec<T>], key: impl Fn(&T) -> K) -> Vec<Vec<K>> {
    layers
        .iter()
        .map(|layer| layer.iter().map(&key).collect())
        .collect()
}
