//! Ordered question list backed by an arena of linked slots.
//!
//! Nodes are addressed by [`NodeId`] handles that stay valid until the node is
//! removed, which gives O(1) removal of an arbitrary node and O(1) insertion
//! after an arbitrary node. Moving a node to another sequence removes it here
//! first, so a question is never linked into two sequences at once.

use std::collections::TryReserveError;
use std::fmt;

use thiserror::Error;

use crate::model::{NodeId, Question};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SequenceError {
    #[error("question sequence could not grow: {0}")]
    Capacity(#[from] TryReserveError),

    #[error("node {0:?} is not part of this sequence")]
    UnknownNode(NodeId),
}

#[derive(Debug, Clone)]
struct Node {
    question: Question,
    prev: Option<usize>,
    next: Option<usize>,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

#[derive(Clone, Default)]
pub struct QuestionSequence {
    slots: Vec<Slot>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl QuestionSequence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty sequence with room for `capacity` nodes.
    ///
    /// # Errors
    ///
    /// Returns `SequenceError::Capacity` if the allocation fails.
    pub fn with_capacity(capacity: usize) -> Result<Self, SequenceError> {
        let mut seq = Self::new();
        seq.slots.try_reserve(capacity)?;
        Ok(seq)
    }

    /// Reserves room for `additional` more nodes, so that the next
    /// `additional` insertions cannot fail on allocation.
    ///
    /// # Errors
    ///
    /// Returns `SequenceError::Capacity` if the allocation fails.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), SequenceError> {
        let needed = additional.saturating_sub(self.free.len());
        self.slots.try_reserve(needed)?;
        Ok(())
    }

    /// Builds a sequence holding `questions` in iteration order.
    ///
    /// # Errors
    ///
    /// Returns `SequenceError::Capacity` if the allocation fails.
    pub fn try_from_questions(
        questions: impl IntoIterator<Item = Question>,
    ) -> Result<Self, SequenceError> {
        let mut seq = Self::new();
        for question in questions {
            seq.push_back(question)?;
        }
        Ok(seq)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn front(&self) -> Option<NodeId> {
        self.head.map(|i| self.id_at(i))
    }

    #[must_use]
    pub fn back(&self) -> Option<NodeId> {
        self.tail.map(|i| self.id_at(i))
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Question> {
        self.node(id).map(|n| &n.question)
    }

    #[must_use]
    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.next.map(|i| self.id_at(i))
    }

    #[must_use]
    pub fn prev(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.prev.map(|i| self.id_at(i))
    }

    /// Node at zero-based position `offset`, found by walking from the head.
    #[must_use]
    pub fn nth_node(&self, offset: usize) -> Option<NodeId> {
        let mut cursor = self.head;
        for _ in 0..offset {
            cursor = self.slots[cursor?].node.as_ref()?.next;
        }
        cursor.map(|i| self.id_at(i))
    }

    /// Appends a question at the tail.
    ///
    /// # Errors
    ///
    /// Returns `SequenceError::Capacity` if the arena cannot grow.
    pub fn push_back(&mut self, question: Question) -> Result<NodeId, SequenceError> {
        match self.tail {
            Some(tail) => {
                let anchor = self.id_at(tail);
                self.insert_after(Some(anchor), question)
            }
            None => self.insert_after(None, question),
        }
    }

    /// Inserts a question immediately after `anchor`, or at the head when
    /// `anchor` is `None`.
    ///
    /// # Errors
    ///
    /// Returns `SequenceError::UnknownNode` if `anchor` is stale or foreign and
    /// `SequenceError::Capacity` if the arena cannot grow.
    pub fn insert_after(
        &mut self,
        anchor: Option<NodeId>,
        question: Question,
    ) -> Result<NodeId, SequenceError> {
        let anchor = match anchor {
            Some(id) => Some(self.checked_index(id)?),
            None => None,
        };
        let index = self.allocate(question)?;

        let next = match anchor {
            Some(a) => self.link(a).next,
            None => self.head,
        };
        {
            let node = self.link_mut(index);
            node.prev = anchor;
            node.next = next;
        }
        match anchor {
            Some(a) => self.link_mut(a).next = Some(index),
            None => self.head = Some(index),
        }
        match next {
            Some(n) => self.link_mut(n).prev = Some(index),
            None => self.tail = Some(index),
        }
        self.len += 1;
        Ok(self.id_at(index))
    }

    /// Unlinks a node and returns its question. Stale handles yield `None`.
    pub fn remove(&mut self, id: NodeId) -> Option<Question> {
        let index = self.checked_index(id).ok()?;
        let slot = &mut self.slots[index];
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);

        match node.prev {
            Some(p) => self.link_mut(p).next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(n) => self.link_mut(n).prev = node.prev,
            None => self.tail = node.prev,
        }
        self.len -= 1;
        Some(node.question)
    }

    pub fn pop_front(&mut self) -> Option<Question> {
        let front = self.front()?;
        self.remove(front)
    }

    /// Moves the node `id` out of this sequence and links it into `dest` right
    /// after `anchor` (or at the head of `dest` when `anchor` is `None`).
    ///
    /// `dest` reserves room before the node is unlinked here, so a failed move
    /// leaves both sequences untouched.
    ///
    /// # Errors
    ///
    /// Returns `SequenceError::UnknownNode` for a stale `id` or `anchor`, and
    /// `SequenceError::Capacity` if `dest` cannot grow.
    pub fn move_to(
        &mut self,
        id: NodeId,
        dest: &mut QuestionSequence,
        anchor: Option<NodeId>,
    ) -> Result<NodeId, SequenceError> {
        self.checked_index(id)?;
        if let Some(a) = anchor {
            dest.checked_index(a)?;
        }
        dest.reserve_one()?;
        let question = self.remove(id).ok_or(SequenceError::UnknownNode(id))?;
        dest.insert_after(anchor, question)
    }

    /// Returns true if a structurally equal question is already linked.
    #[must_use]
    pub fn contains_question(&self, question: &Question) -> bool {
        self.iter().any(|q| q.is_same_question(question))
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            seq: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    /// Node handles in list order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let index = cursor?;
            cursor = self.link(index).next;
            Some(self.id_at(index))
        })
    }

    /// Unlinks every node. Slots are kept and their generations advanced, so
    /// handles issued before the clear stay stale after slots are reused.
    pub fn clear(&mut self) {
        self.free.clear();
        for (index, slot) in self.slots.iter_mut().enumerate().rev() {
            if slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free.push(index);
        }
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Walks the list in both directions and checks that links agree.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let mut forward = Vec::with_capacity(self.len);
        let mut prev = None;
        let mut cursor = self.head;
        while let Some(index) = cursor {
            if forward.len() > self.len {
                return false;
            }
            let Some(node) = self.slots.get(index).and_then(|s| s.node.as_ref()) else {
                return false;
            };
            if node.prev != prev {
                return false;
            }
            forward.push(index);
            prev = Some(index);
            cursor = node.next;
        }
        forward.len() == self.len && self.tail == prev
    }

    fn reserve_one(&mut self) -> Result<(), SequenceError> {
        if self.free.is_empty() {
            self.slots.try_reserve(1)?;
        }
        Ok(())
    }

    fn allocate(&mut self, question: Question) -> Result<usize, SequenceError> {
        let node = Node {
            question,
            prev: None,
            next: None,
        };
        if let Some(index) = self.free.pop() {
            self.slots[index].node = Some(node);
            return Ok(index);
        }
        self.slots.try_reserve(1)?;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        Ok(self.slots.len() - 1)
    }

    fn checked_index(&self, id: NodeId) -> Result<usize, SequenceError> {
        match self.slots.get(id.index()) {
            Some(slot) if slot.generation == id.generation() && slot.node.is_some() => {
                Ok(id.index())
            }
            _ => Err(SequenceError::UnknownNode(id)),
        }
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        let index = self.checked_index(id).ok()?;
        self.slots[index].node.as_ref()
    }

    fn id_at(&self, index: usize) -> NodeId {
        NodeId::new(index, self.slots[index].generation)
    }

    // Only called with indices taken from live links.
    fn link(&self, index: usize) -> &Node {
        match self.slots[index].node.as_ref() {
            Some(node) => node,
            None => unreachable!("linked index {index} points at an empty slot"),
        }
    }

    fn link_mut(&mut self, index: usize) -> &mut Node {
        match self.slots[index].node.as_mut() {
            Some(node) => node,
            None => unreachable!("linked index {index} points at an empty slot"),
        }
    }
}

/// Iterator over the questions of a sequence, head to tail.
pub struct Iter<'a> {
    seq: &'a QuestionSequence,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Question;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.cursor?;
        let node = self.seq.link(index);
        self.cursor = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.question)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a> IntoIterator for &'a QuestionSequence {
    type Item = &'a Question;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for QuestionSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuestionSequence")
            .field("len", &self.len)
            .field("slots", &self.slots.len())
            .field("free", &self.free.len())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for QuestionSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} question(s)", self.len)?;
        for (position, question) in self.iter().enumerate() {
            write!(f, "\n{position:>4}: {question}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Format, Operation};

    fn add(a: i32, b: i32) -> Question {
        Question::new(a, b, Operation::Add, a + b, Format::AnswerLast)
    }

    fn firsts(seq: &QuestionSequence) -> Vec<i32> {
        seq.iter().map(Question::operand_a).collect()
    }

    #[test]
    fn push_back_keeps_order() {
        let seq = QuestionSequence::try_from_questions((1..=4).map(|i| add(i, 0))).unwrap();
        assert_eq!(seq.len(), 4);
        assert_eq!(firsts(&seq), vec![1, 2, 3, 4]);
        assert!(seq.is_consistent());
    }

    #[test]
    fn insert_after_head_middle_and_tail() {
        let mut seq = QuestionSequence::new();
        let a = seq.insert_after(None, add(1, 0)).unwrap();
        let c = seq.insert_after(Some(a), add(3, 0)).unwrap();
        seq.insert_after(Some(a), add(2, 0)).unwrap();
        seq.insert_after(Some(c), add(4, 0)).unwrap();
        seq.insert_after(None, add(0, 0)).unwrap();
        assert_eq!(firsts(&seq), vec![0, 1, 2, 3, 4]);
        assert!(seq.is_consistent());
        assert_eq!(seq.get(seq.back().unwrap()).unwrap().operand_a(), 4);
    }

    #[test]
    fn remove_arbitrary_nodes() {
        let mut seq = QuestionSequence::try_from_questions((1..=5).map(|i| add(i, 0))).unwrap();
        let ids: Vec<_> = seq.node_ids().collect();

        assert_eq!(seq.remove(ids[2]).unwrap().operand_a(), 3);
        assert_eq!(seq.remove(ids[0]).unwrap().operand_a(), 1);
        assert_eq!(seq.remove(ids[4]).unwrap().operand_a(), 5);
        assert_eq!(firsts(&seq), vec![2, 4]);
        assert!(seq.is_consistent());
        assert_eq!(seq.prev(ids[3]), Some(ids[1]));
        assert_eq!(seq.next(ids[1]), Some(ids[3]));
    }

    #[test]
    fn stale_handle_is_rejected_after_slot_reuse() {
        let mut seq = QuestionSequence::new();
        let old = seq.push_back(add(1, 1)).unwrap();
        assert!(seq.remove(old).is_some());
        let reused = seq.push_back(add(2, 2)).unwrap();

        assert_eq!(old.index(), reused.index());
        assert!(seq.get(old).is_none());
        assert!(seq.remove(old).is_none());
        assert!(matches!(
            seq.insert_after(Some(old), add(3, 3)),
            Err(SequenceError::UnknownNode(_))
        ));
        assert_eq!(seq.len(), 1);
    }

    #[test]
    fn stale_handle_is_rejected_after_clear() {
        let mut seq = QuestionSequence::new();
        let old = seq.push_back(add(1, 1)).unwrap();
        seq.clear();
        let fresh = seq.push_back(add(2, 2)).unwrap();

        assert_eq!(old.index(), fresh.index());
        assert_ne!(old, fresh);
        assert!(seq.get(old).is_none());
        assert!(seq.remove(old).is_none());
        assert_eq!(seq.len(), 1);
        assert_eq!(seq.get(fresh).unwrap().operand_a(), 2);
    }

    #[test]
    fn pop_front_drains_in_order() {
        let mut seq = QuestionSequence::try_from_questions([add(1, 0), add(2, 0)]).unwrap();
        assert_eq!(seq.pop_front().unwrap().operand_a(), 1);
        assert_eq!(seq.pop_front().unwrap().operand_a(), 2);
        assert!(seq.pop_front().is_none());
        assert!(seq.front().is_none() && seq.back().is_none());
        assert!(seq.is_consistent());
    }

    #[test]
    fn nth_node_walks_from_head() {
        let seq = QuestionSequence::try_from_questions((0..3).map(|i| add(i, 0))).unwrap();
        assert_eq!(seq.get(seq.nth_node(0).unwrap()).unwrap().operand_a(), 0);
        assert_eq!(seq.get(seq.nth_node(2).unwrap()).unwrap().operand_a(), 2);
        assert!(seq.nth_node(3).is_none());
        assert!(QuestionSequence::new().nth_node(0).is_none());
    }

    #[test]
    fn move_to_transfers_ownership() {
        let mut from = QuestionSequence::try_from_questions([add(1, 0), add(2, 0)]).unwrap();
        let mut to = QuestionSequence::try_from_questions([add(9, 0)]).unwrap();
        let moving = from.front().unwrap();
        let anchor = to.front();

        let new_id = from.move_to(moving, &mut to, anchor).unwrap();
        assert_eq!(firsts(&from), vec![2]);
        assert_eq!(firsts(&to), vec![9, 1]);
        assert_eq!(to.get(new_id).unwrap().operand_a(), 1);
        assert!(from.get(moving).is_none());
        assert!(from.is_consistent() && to.is_consistent());
    }

    #[test]
    fn move_to_with_foreign_anchor_leaves_both_untouched() {
        let mut from = QuestionSequence::try_from_questions([add(1, 0)]).unwrap();
        let mut to = QuestionSequence::new();
        let moving = from.front().unwrap();
        let err = from.move_to(moving, &mut to, Some(moving)).unwrap_err();
        assert!(matches!(err, SequenceError::UnknownNode(_)));
        assert_eq!(from.len(), 1);
        assert!(to.is_empty());
    }

    #[test]
    fn contains_question_is_structural() {
        let seq = QuestionSequence::try_from_questions([add(2, 3)]).unwrap();
        assert!(seq.contains_question(&Question::new(2, 3, Operation::Add, 0, Format::AnswerLast)));
        assert!(!seq.contains_question(&Question::new(2, 3, Operation::Add, 5, Format::AnswerFirst)));
    }

    #[test]
    fn clear_resets_everything() {
        let mut seq = QuestionSequence::try_from_questions((0..3).map(|i| add(i, 0))).unwrap();
        seq.clear();
        assert!(seq.is_empty());
        assert_eq!(seq.iter().count(), 0);
        seq.push_back(add(7, 0)).unwrap();
        assert_eq!(firsts(&seq), vec![7]);
    }

    #[test]
    fn display_lists_questions() {
        let seq = QuestionSequence::try_from_questions([add(1, 2), add(3, 4)]).unwrap();
        let text = seq.to_string();
        assert!(text.starts_with("2 question(s)"));
        assert!(text.contains("0: 1 + 2 = ?"));
        assert!(text.contains("1: 3 + 4 = ?"));
    }
}
