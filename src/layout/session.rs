//! One live activation of a template

use std::fmt;

use crate::geometry::{Point, Rect, Size};
use crate::scene::NodeId;
use crate::template::Template;

/// Identity of a layout session; strictly increasing per editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl SessionId {
    pub fn next(self) -> SessionId {
        SessionId(self.0 + 1)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Template-authored geometry of one slot, captured before any margin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    origin: Rect,
}

impl Slot {
    pub fn origin_position(&self) -> Point {
        self.origin.origin()
    }

    pub fn origin_size(&self) -> Size {
        self.origin.size()
    }

    pub fn origin(&self) -> Rect {
        self.origin
    }
}

/// A placeholder bound to an image
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    pub id: NodeId,
    /// Image reference bound at assignment time
    pub image: String,
    /// Index of the slot whose origin geometry this placeholder occupies
    slot: usize,
}

impl Placeholder {
    pub fn slot(&self) -> usize {
        self.slot
    }
}

/// Placeholders, group and base geometry of the active template.
///
/// Slot origins are immutable for the lifetime of the session. Reordering
/// moves placeholders between slots instead of editing origins.
#[derive(Debug, Clone)]
pub struct LayoutSession {
    id: SessionId,
    template: &'static Template,
    placeholders: Vec<Placeholder>,
    slots: Vec<Slot>,
    group: NodeId,
    group_base_size: Size,
}

impl LayoutSession {
    /// Build a session from placeholders already sorted in visual order.
    /// `bound[i]` occupies slot `i`.
    pub(crate) fn new(
        id: SessionId,
        template: &'static Template,
        bound: Vec<(NodeId, String, Rect)>,
        group: NodeId,
        group_base_size: Size,
    ) -> Self {
        let mut placeholders = Vec::with_capacity(bound.len());
        let mut slots = Vec::with_capacity(bound.len());
        for (slot, (id, image, origin)) in bound.into_iter().enumerate() {
            placeholders.push(Placeholder { id, image, slot });
            slots.push(Slot { origin });
        }
        Self {
            id,
            template,
            placeholders,
            slots,
            group,
            group_base_size,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn template(&self) -> &'static Template {
        self.template
    }

    /// Placeholders in assignment order
    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    pub fn placeholder(&self, node: NodeId) -> Option<&Placeholder> {
        self.placeholders.iter().find(|p| p.id == node)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.placeholder(node).is_some()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Origin geometry of the slot a placeholder currently occupies
    pub fn origin_of(&self, placeholder: &Placeholder) -> Rect {
        self.slots[placeholder.slot].origin
    }

    pub fn group(&self) -> NodeId {
        self.group
    }

    /// Size of the group right after assignment, before any margin
    pub fn group_base_size(&self) -> Size {
        self.group_base_size
    }

    /// Exchange the slots of two placeholders. Returns `false` when either
    /// node is not part of this session or both are the same node.
    pub fn swap_slots(&mut self, a: NodeId, b: NodeId) -> bool {
        if a == b {
            return false;
        }
        let ia = self.placeholders.iter().position(|p| p.id == a);
        let ib = self.placeholders.iter().position(|p| p.id == b);
        match (ia, ib) {
            (Some(ia), Some(ib)) => {
                let slot_a = self.placeholders[ia].slot;
                self.placeholders[ia].slot = self.placeholders[ib].slot;
                self.placeholders[ib].slot = slot_a;
                true
            }
            _ => false,
        }
    }

    /// Slot of every placeholder, in assignment order
    pub fn slot_assignment(&self) -> Vec<usize> {
        self.placeholders.iter().map(|p| p.slot).collect()
    }

    /// Restore a slot assignment captured by [`LayoutSession::slot_assignment`].
    /// Ignored unless it is a permutation of this session's slots.
    pub(crate) fn restore_slot_assignment(&mut self, assignment: &[usize]) -> bool {
        let mut seen = vec![false; self.slots.len()];
        if assignment.len() != self.placeholders.len() {
            return false;
        }
        for slot in assignment {
            match seen.get_mut(*slot) {
                Some(flag) if !*flag => *flag = true,
                _ => return false,
            }
        }
        for (placeholder, slot) in self.placeholders.iter_mut().zip(assignment) {
            placeholder.slot = *slot;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::TemplateRegistry;

    fn session() -> LayoutSession {
        let template = TemplateRegistry::find("full-half-half").unwrap();
        LayoutSession::new(
            SessionId(1),
            template,
            vec![
                (NodeId(2), "a".into(), Rect::new(0.0, 0.0, 100.0, 50.0)),
                (NodeId(3), "b".into(), Rect::new(0.0, 50.0, 50.0, 50.0)),
                (NodeId(4), "c".into(), Rect::new(50.0, 50.0, 50.0, 50.0)),
            ],
            NodeId(5),
            Size::new(100.0, 100.0),
        )
    }

    #[test]
    fn test_swap_slots_exchanges_origins() {
        let mut s = session();
        assert!(s.swap_slots(NodeId(2), NodeId(4)));
        let a = s.placeholder(NodeId(2)).unwrap().clone();
        let c = s.placeholder(NodeId(4)).unwrap().clone();
        assert_eq!(s.origin_of(&a), Rect::new(50.0, 50.0, 50.0, 50.0));
        assert_eq!(s.origin_of(&c), Rect::new(0.0, 0.0, 100.0, 50.0));
        // Slot origins themselves never change
        assert_eq!(s.slots()[0].origin(), Rect::new(0.0, 0.0, 100.0, 50.0));
        // Images stay with their placeholders
        assert_eq!(a.image, "a");
    }

    #[test]
    fn test_swap_with_self_or_stranger_is_rejected() {
        let mut s = session();
        assert!(!s.swap_slots(NodeId(2), NodeId(2)));
        assert!(!s.swap_slots(NodeId(2), NodeId(42)));
        assert_eq!(s.slot_assignment(), vec![0, 1, 2]);
    }

    #[test]
    fn test_restore_slot_assignment_validates_permutation() {
        let mut s = session();
        assert!(!s.restore_slot_assignment(&[0, 0, 1]));
        assert!(!s.restore_slot_assignment(&[0, 1]));
        assert!(!s.restore_slot_assignment(&[0, 1, 3]));
        assert!(s.restore_slot_assignment(&[2, 0, 1]));
        assert_eq!(s.slot_assignment(), vec![2, 0, 1]);
    }

    #[test]
    fn test_session_ids_increase() {
        assert!(SessionId(1).next() > SessionId(1));
        assert_eq!(SessionId(7).to_string(), "session-7");
    }
}
