// Panel grid domain model - drag state machine and display order
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PanelId(String);

impl PanelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Panel {
    pub id: PanelId,
    pub title: String,
}

impl Panel {
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: PanelId::new(id),
            title: title.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Dragging {
        source: PanelId,
        /// Panel currently highlighted as the insertion point
        hint: Option<PanelId>,
    },
}

/// Fixed set of panels in display order plus the in-progress drag, if any.
#[derive(Debug, Clone)]
pub struct PanelGrid {
    panels: Vec<Panel>,
    drag: DragState,
}

impl PanelGrid {
    pub fn new(panels: Vec<Panel>) -> Self {
        Self {
            panels,
            drag: DragState::Idle,
        }
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    /// Panel identifiers in display order
    pub fn order(&self) -> Vec<PanelId> {
        self.panels.iter().map(|p| p.id.clone()).collect()
    }

    pub fn contains(&self, id: &PanelId) -> bool {
        self.position(id).is_some()
    }

    fn position(&self, id: &PanelId) -> Option<usize> {
        self.panels.iter().position(|p| &p.id == id)
    }

    /// Start dragging `id`. A leftover source from an earlier drag is replaced.
    /// Returns false when `id` is not a known panel.
    pub fn begin_drag(&mut self, id: &PanelId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.drag = DragState::Dragging {
            source: id.clone(),
            hint: None,
        };
        true
    }

    /// Hover hint only, the order is never touched here.
    pub fn drag_over(&mut self, candidate: &PanelId) {
        let valid = self.contains(candidate);
        if let DragState::Dragging { source, hint } = &mut self.drag {
            if valid && source != candidate {
                *hint = Some(candidate.clone());
            }
        }
    }

    pub fn drag_leave(&mut self, candidate: &PanelId) {
        if let DragState::Dragging { hint, .. } = &mut self.drag {
            if hint.as_ref() == Some(candidate) {
                *hint = None;
            }
        }
    }

    /// Move the drag source to just before `target`. Returns true when the
    /// order changed. Drag state is cleared either way.
    pub fn drop_on(&mut self, target: &PanelId) -> bool {
        let state = std::mem::replace(&mut self.drag, DragState::Idle);
        let DragState::Dragging { source, .. } = state else {
            return false;
        };
        if &source == target {
            return false;
        }
        let (Some(from), Some(_)) = (self.position(&source), self.position(target)) else {
            return false;
        };

        let panel = self.panels.remove(from);
        // Re-resolve after removal since indices past `from` shifted left
        let to = self.position(target).unwrap_or(self.panels.len());
        self.panels.insert(to, panel);
        true
    }

    pub fn cancel_drag(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Apply a persisted order: each known id is moved to the end in turn,
    /// unknown ids are skipped. Panels never mentioned keep their relative
    /// order ahead of the moved ones.
    pub fn restore_order(&mut self, saved: &[String]) {
        for id in saved {
            let id = PanelId::new(id.as_str());
            if let Some(idx) = self.position(&id) {
                let panel = self.panels.remove(idx);
                self.panels.push(panel);
            }
        }
    }
}
