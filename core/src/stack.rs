//! Walks chains of boxed outcomes.
//!
//! An outcome whose payload is another outcome forms a singly-linked chain.
//! The resolved state of the whole chain is the one of its terminal leaf,
//! the first node (scanning outer to inner) whose payload is a plain value.
//! Chains are assumed to be acyclic, which the ownership of `Payload::Boxed`
//! guarantees.
use crate::{outcome::Outcome, payload::Payload, tag::Tag};
use serde_json::Value;

/// Returns outcomes of the chain in outer to inner order. Boxed payloads
/// are followed until an outcome holding a plain value is reached, so an
/// outcome with a plain payload is a singleton sequence.
pub fn nodes(root: &Outcome) -> Vec<&Outcome> {
    let mut list = vec![root];
    let mut current = root;

    while let Payload::Boxed(inner) = &current.payload {
        current = inner;
        list.push(current);
    }
    list
}

/// Earliest node of the chain, the root itself.
pub fn first(root: &Outcome) -> &Outcome {
    root
}

/// Terminal leaf of the chain: the deepest outcome holding a plain value.
pub fn last(root: &Outcome) -> &Outcome {
    let mut current = root;
    while let Payload::Boxed(inner) = &current.payload {
        current = inner;
    }
    current
}

/// Owned state of a terminal leaf.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    pub success: bool,
    pub tag: Tag,
    pub value: Value,
}

/// Consumes the chain, returning state of its terminal leaf.
pub fn into_leaf(root: Outcome) -> Leaf {
    let Outcome {
        mut success,
        mut tag,
        mut payload,
        ..
    } = root;

    loop {
        match payload {
            Payload::Value(value) => return Leaf { success, tag, value },
            Payload::Boxed(inner) => {
                let inner = *inner;
                success = inner.success;
                tag = inner.tag;
                payload = inner.payload;
            }
        }
    }
}
