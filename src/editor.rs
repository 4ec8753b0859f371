//! An editing session over the widgets of one trigger.
//!
//! Widgets are addressed by paths: the first index selects a top-level group, every following
//! index selects a child of the group reached so far.
use crate::{
    action::ActionSpec,
    builder::{build_elements, GroupWidget, SegmentWidget, Widget},
    config::CodecOptions,
    error::NestingError,
    expression::Operator,
    trigger::{EventMap, EventTrigger},
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error("no widget at {0:?}")]
    InvalidPath(Vec<usize>),
    #[error("widget at {0:?} is not a group")]
    NotAGroup(Vec<usize>),
    #[error("the last top-level group cannot be removed")]
    LastElement,
    #[error("widget at {0:?} is already a top-level group")]
    AlreadyTopLevel(Vec<usize>),
    #[error("widget at {0:?} has no group before it to move into")]
    MaximumIndent(Vec<usize>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Editor {
    path: String,
    groups: Vec<GroupWidget>,
}

impl Editor {
    /// A fresh session with one empty `and` group.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            groups: vec![empty_group(Operator::And)],
        }
    }

    /// A session showing an existing trigger.
    pub fn load(trigger: &EventTrigger) -> Self {
        let groups = trigger.elements.iter().map(GroupWidget::from).collect::<Vec<_>>();
        if groups.is_empty() {
            return Self::new(trigger.path.clone());
        }
        Self {
            path: trigger.path.clone(),
            groups,
        }
    }

    /// A session showing the trigger stored in `map`.
    pub fn open(map: &EventMap, options: &CodecOptions) -> Result<(Self, ActionSpec), NestingError> {
        let trigger = map.decode(options)?;
        Ok((Self::load(&trigger), trigger.action))
    }

    /// Like [`Editor::open()`], but a trigger that cannot be read gives a fresh session on the
    /// same event type instead of a partial tree.
    pub fn open_or_fresh(map: &EventMap, options: &CodecOptions) -> (Self, Option<ActionSpec>) {
        match Self::open(map, options) {
            Ok((editor, action)) => (editor, Some(action)),
            Err(error) => {
                tracing::warn!(%error, event = %map.event, "cannot read stored trigger, starting over");
                (Self::new(map.event.clone()), None)
            }
        }
    }

    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Change the event type the criteria are checked on.
    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    #[inline]
    pub fn groups(&self) -> &[GroupWidget] {
        &self.groups
    }

    /// The widget at `at`, a path into the children of a top-level group.
    ///
    /// Top-level groups are not widgets: a path of a single index gives `None`, read them through
    /// [`Editor::groups`] instead.
    pub fn widget(&self, at: &[usize]) -> Option<&Widget> {
        let (first, rest) = at.split_first()?;
        let (last, middle) = rest.split_last()?;
        let mut group = self.groups.get(*first)?;
        for index in middle {
            match group.children.get(*index)? {
                Widget::Group(nested) => group = nested,
                Widget::Segment(_) => return None,
            }
        }
        group.children.get(*last)
    }

    /// Append a new top-level group.
    pub fn add_top_level_group(&mut self, operator: Operator) -> Vec<usize> {
        self.groups.push(empty_group(operator));
        vec![self.groups.len() - 1]
    }

    /// Append a criterion row to the group at `at`.
    pub fn add_segment(
        &mut self,
        at: &[usize],
        segment: SegmentWidget,
    ) -> Result<Vec<usize>, EditorError> {
        self.append(at, Widget::Segment(segment))
    }

    /// Append an empty nested group to the group at `at`.
    pub fn add_group(&mut self, at: &[usize], operator: Operator) -> Result<Vec<usize>, EditorError> {
        self.append(at, Widget::Group(empty_group(operator)))
    }

    pub fn set_operator(&mut self, at: &[usize], operator: Operator) -> Result<(), EditorError> {
        self.group_mut(at)?.operator = Some(operator);
        Ok(())
    }

    pub fn set_segment(&mut self, at: &[usize], segment: SegmentWidget) -> Result<(), EditorError> {
        match self.child_mut(at)? {
            Widget::Segment(current) => {
                *current = segment;
                Ok(())
            }
            Widget::Group(_) => Err(EditorError::InvalidPath(at.to_vec())),
        }
    }

    /// Remove the widget at `at`.
    pub fn remove(&mut self, at: &[usize]) -> Result<Widget, EditorError> {
        match at {
            [] => Err(EditorError::InvalidPath(Vec::new())),
            [index] => {
                if *index >= self.groups.len() {
                    return Err(EditorError::InvalidPath(at.to_vec()));
                }
                if self.groups.len() == 1 {
                    return Err(EditorError::LastElement);
                }
                Ok(Widget::Group(self.groups.remove(*index)))
            }
            [parent @ .., index] => {
                let parent = self.group_mut(parent)?;
                if *index >= parent.children.len() {
                    return Err(EditorError::InvalidPath(at.to_vec()));
                }
                Ok(parent.children.remove(*index))
            }
        }
    }

    /// Move the group at `at` out of its parent, right after it.
    pub fn outdent(&mut self, at: &[usize]) -> Result<Vec<usize>, EditorError> {
        let [parent @ .., index] = at else {
            return Err(EditorError::InvalidPath(Vec::new()));
        };
        let [grand_parent @ .., parent_index] = parent else {
            return Err(EditorError::AlreadyTopLevel(at.to_vec()));
        };
        self.group(at)?;

        let widget = self.group_mut(parent)?.children.remove(*index);
        let destination = parent_index + 1;
        if grand_parent.is_empty() {
            if let Widget::Group(group) = widget {
                self.groups.insert(destination, group);
            }
        } else {
            self.group_mut(grand_parent)?
                .children
                .insert(destination, widget);
        }

        let mut moved = grand_parent.to_vec();
        moved.push(destination);
        Ok(moved)
    }

    /// Move the group at `at` into the group right before it.
    pub fn indent(&mut self, at: &[usize]) -> Result<Vec<usize>, EditorError> {
        let [parent @ .., index] = at else {
            return Err(EditorError::InvalidPath(Vec::new()));
        };
        self.group(at)?;
        let Some(previous) = index.checked_sub(1) else {
            return Err(EditorError::MaximumIndent(at.to_vec()));
        };
        let mut target = parent.to_vec();
        target.push(previous);
        if self.group(&target).is_err() {
            return Err(EditorError::MaximumIndent(at.to_vec()));
        }

        let widget = if parent.is_empty() {
            Widget::Group(self.groups.remove(*index))
        } else {
            self.group_mut(parent)?.children.remove(*index)
        };
        let destination = self.group_mut(&target)?;
        destination.children.push(widget);
        target.push(destination.children.len() - 1);
        Ok(target)
    }

    /// The trigger currently described by the session.
    pub fn trigger(&self, action: ActionSpec) -> EventTrigger {
        EventTrigger {
            path: self.path.clone(),
            elements: build_elements(&self.path, &self.groups),
            action,
        }
    }

    fn append(&mut self, at: &[usize], widget: Widget) -> Result<Vec<usize>, EditorError> {
        let group = self.group_mut(at)?;
        group.children.push(widget);
        let mut path = at.to_vec();
        path.push(group.children.len() - 1);
        Ok(path)
    }

    fn group(&self, at: &[usize]) -> Result<&GroupWidget, EditorError> {
        match at {
            [] => Err(EditorError::InvalidPath(Vec::new())),
            [index] => self
                .groups
                .get(*index)
                .ok_or_else(|| EditorError::InvalidPath(at.to_vec())),
            _ => match self.widget(at) {
                Some(Widget::Group(group)) => Ok(group),
                Some(Widget::Segment(_)) => Err(EditorError::NotAGroup(at.to_vec())),
                None => Err(EditorError::InvalidPath(at.to_vec())),
            },
        }
    }

    fn group_mut(&mut self, at: &[usize]) -> Result<&mut GroupWidget, EditorError> {
        match at {
            [] => Err(EditorError::InvalidPath(Vec::new())),
            [index] => self
                .groups
                .get_mut(*index)
                .ok_or_else(|| EditorError::InvalidPath(at.to_vec())),
            _ => match self.child_mut(at)? {
                Widget::Group(group) => Ok(group),
                Widget::Segment(_) => Err(EditorError::NotAGroup(at.to_vec())),
            },
        }
    }

    fn child_mut(&mut self, at: &[usize]) -> Result<&mut Widget, EditorError> {
        let invalid = || EditorError::InvalidPath(at.to_vec());
        let (first, rest) = at.split_first().ok_or_else(invalid)?;
        let (last, middle) = rest.split_last().ok_or_else(invalid)?;
        let mut group = self.groups.get_mut(*first).ok_or_else(invalid)?;
        for index in middle {
            match group.children.get_mut(*index).ok_or_else(invalid)? {
                Widget::Group(nested) => group = nested,
                Widget::Segment(_) => return Err(invalid()),
            }
        }
        group.children.get_mut(*last).ok_or_else(invalid)
    }
}

fn empty_group(operator: Operator) -> GroupWidget {
    GroupWidget {
        operator: Some(operator),
        children: Vec::new(),
    }
}
