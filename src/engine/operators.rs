//! Permutation recombination primitives.
//!
//! These work on plain index slices that are permutations of `0..n`. Every
//! function returns permutations again; the permutation alterers in
//! [`alterer`](super::alterer) build on them.
//!
//! - [`order_crossover`] (OX): Davis (1985), preserves relative order
//! - [`pmx_crossover`] (PMX): Goldberg & Lingle (1985), preserves absolute
//!   position
//! - [`cycle_crossover`] (CX): Oliver et al. (1987), every position keeps a
//!   parent's value
//! - [`invert_segment`]: reverse a random segment (2-opt move)
//!
//! # References
//!
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains"
//! - Goldberg & Lingle (1985), "Alleles, Loci, and the Traveling Salesman Problem"
//! - Oliver, Smith & Holland (1987), "A Study of Permutation Crossover
//!   Operators on the Traveling Salesman Problem"

use rand::Rng;

const EMPTY: usize = usize::MAX;

/// The inclusive index range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
}

impl Segment {
    /// Draws two positions in `0..n` and orders them.
    ///
    /// # Panics
    /// Panics if `n == 0`.
    pub fn random<R: Rng>(n: usize, rng: &mut R) -> Self {
        let a = rng.random_range(0..n);
        let b = rng.random_range(0..n);
        Segment {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.start..=self.end).contains(&index)
    }
}

/// `position[v]` is the index of value `v` in `perm`.
fn positions(perm: &[usize]) -> Vec<usize> {
    let mut position = vec![0; perm.len()];
    for (i, &v) in perm.iter().enumerate() {
        position[v] = i;
    }
    position
}

/// Order crossover over a random segment.
///
/// Each child keeps its own parent's segment and takes the remaining values
/// in the order they appear in the other parent, starting after the segment.
///
/// # Panics
/// Panics if parents have different lengths or are empty.
pub fn order_crossover<R: Rng>(
    parent1: &[usize],
    parent2: &[usize],
    rng: &mut R,
) -> (Vec<usize>, Vec<usize>) {
    assert_eq!(parent1.len(), parent2.len(), "parents must have equal length");
    let segment = Segment::random(parent1.len(), rng);
    (
        ox_child(parent1, parent2, segment),
        ox_child(parent2, parent1, segment),
    )
}

pub(crate) fn ox_child(template: &[usize], donor: &[usize], segment: Segment) -> Vec<usize> {
    let n = template.len();
    let mut child = vec![EMPTY; n];
    let mut taken = vec![false; n];
    for i in segment.start..=segment.end {
        child[i] = template[i];
        taken[template[i]] = true;
    }

    let mut free = (segment.end + 1..n).chain(0..segment.start);
    for offset in 1..=n {
        let value = donor[(segment.end + offset) % n];
        if taken[value] {
            continue;
        }
        if let Some(pos) = free.next() {
            child[pos] = value;
        }
    }
    child
}

/// Partially matched crossover over a random segment.
///
/// # Panics
/// Panics if parents have different lengths or are empty.
pub fn pmx_crossover<R: Rng>(
    parent1: &[usize],
    parent2: &[usize],
    rng: &mut R,
) -> (Vec<usize>, Vec<usize>) {
    assert_eq!(parent1.len(), parent2.len(), "parents must have equal length");
    let segment = Segment::random(parent1.len(), rng);
    (
        pmx_child(parent1, parent2, segment),
        pmx_child(parent2, parent1, segment),
    )
}

pub(crate) fn pmx_child(template: &[usize], donor: &[usize], segment: Segment) -> Vec<usize> {
    let n = template.len();
    let donor_position = positions(donor);
    let mut child = vec![EMPTY; n];
    let mut placed = vec![false; n];
    for i in segment.start..=segment.end {
        child[i] = template[i];
        placed[template[i]] = true;
    }

    // Donor values displaced by the segment follow the mapping chain until
    // they reach a position outside it.
    for i in segment.start..=segment.end {
        let value = donor[i];
        if placed[value] {
            continue;
        }
        let mut pos = i;
        loop {
            pos = donor_position[template[pos]];
            if !segment.contains(pos) {
                break;
            }
        }
        child[pos] = value;
        placed[value] = true;
    }

    for (slot, &value) in child.iter_mut().zip(donor) {
        if *slot == EMPTY {
            *slot = value;
        }
    }
    child
}

/// Cycle crossover. Deterministic.
///
/// Positions are partitioned into cycles; children inherit alternate cycles
/// from alternate parents, starting with the cycle through position 0.
///
/// # Panics
/// Panics if parents have different lengths.
pub fn cycle_crossover(parent1: &[usize], parent2: &[usize]) -> (Vec<usize>, Vec<usize>) {
    assert_eq!(parent1.len(), parent2.len(), "parents must have equal length");
    let n = parent1.len();
    let position1 = positions(parent1);
    let mut child1 = parent2.to_vec();
    let mut child2 = parent1.to_vec();
    let mut visited = vec![false; n];
    let mut keep = true;

    for start in 0..n {
        if visited[start] {
            continue;
        }
        let mut i = start;
        while !visited[i] {
            visited[i] = true;
            if keep {
                child1[i] = parent1[i];
                child2[i] = parent2[i];
            }
            i = position1[parent2[i]];
        }
        keep = !keep;
    }
    (child1, child2)
}

/// Reverses a random segment of `items`. Returns the segment.
///
/// Does nothing for fewer than two items.
pub fn invert_segment<T, R: Rng>(items: &mut [T], rng: &mut R) -> Option<Segment> {
    if items.len() < 2 {
        return None;
    }
    let segment = Segment::random(items.len(), rng);
    items[segment.start..=segment.end].reverse();
    Some(segment)
}
