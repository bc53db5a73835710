use rand::Rng;

use crate::RegexTree;

/// Characters the generator draws literals from. Kept clear of the
/// meta-characters since the dialect has no escaping.
const LITERALS: &[char] = &['a', 'b', 'c', 'd', 'e'];

/// Generates a random expression tree of at most the given depth, weighted
/// towards literals and concatenations. The canonical form of a generated
/// tree is always well-formed, which makes this suitable for round trip
/// property tests.
pub fn random_regex_tree(rng: &mut impl Rng, depth: usize) -> RegexTree {
    if depth == 0 {
        return random_leaf(rng);
    }

    match rng.random_range(0..8) {
        0 | 1 => random_leaf(rng),
        2..=4 => RegexTree::Concat(
            Box::new(random_regex_tree(rng, depth - 1)),
            Box::new(random_regex_tree(rng, depth - 1)),
        ),
        5 | 6 => RegexTree::Alternation(
            Box::new(random_regex_tree(rng, depth - 1)),
            Box::new(random_regex_tree(rng, depth - 1)),
        ),
        _ => RegexTree::Star(Box::new(random_regex_tree(rng, depth - 1))),
    }
}

fn random_leaf(rng: &mut impl Rng) -> RegexTree {
    if rng.random_bool(0.1) {
        return RegexTree::Empty;
    }

    RegexTree::Literal(LITERALS[rng.random_range(0..LITERALS.len())])
}
