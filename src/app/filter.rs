//! Two-state visibility filter over the rendered issue list.
//!
//! The toggle control stores its mode explicitly; its label is derived from
//! the mode and always names the mode that activating it switches *to*.

use crate::data::Issue;

pub const SHOW_ONLY_MERGED_LABEL: &str = "Show Only Merged PR Issues";
pub const SHOW_ALL_LABEL: &str = "Show All Issues";

/// Serialized values of the merged-PR attribute.
pub const ATTR_TRUE: &str = "true";
pub const ATTR_FALSE: &str = "false";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    #[default]
    AllShown,
    OnlyMergedShown,
}

impl FilterMode {
    pub fn toggled(self) -> Self {
        match self {
            FilterMode::AllShown => FilterMode::OnlyMergedShown,
            FilterMode::OnlyMergedShown => FilterMode::AllShown,
        }
    }

    /// Label of the control while this mode is active.
    pub fn control_label(self) -> &'static str {
        match self {
            FilterMode::AllShown => SHOW_ONLY_MERGED_LABEL,
            FilterMode::OnlyMergedShown => SHOW_ALL_LABEL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Shown,
    Hidden,
}

/// One rendered issue. Carries the merged-PR flag as the string attribute the
/// page serializes, not as a bool.
#[derive(Debug, Clone, PartialEq)]
pub struct IssueItem {
    pub issue: Issue,
    pub has_merged_pr: String,
    pub visibility: Visibility,
}

impl IssueItem {
    pub fn new(issue: Issue) -> Self {
        let attr = if issue.has_merged_pr {
            ATTR_TRUE
        } else {
            ATTR_FALSE
        };
        Self::with_attribute(issue, attr)
    }

    pub fn with_attribute(issue: Issue, has_merged_pr: impl Into<String>) -> Self {
        Self {
            issue,
            has_merged_pr: has_merged_pr.into(),
            visibility: Visibility::Shown,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Shown
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToggleControl {
    mode: FilterMode,
}

impl ToggleControl {
    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    pub fn label(&self) -> &'static str {
        self.mode.control_label()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct IssueList {
    pub items: Vec<IssueItem>,
}

impl IssueList {
    pub fn new(issues: impl IntoIterator<Item = Issue>) -> Self {
        Self {
            items: issues.into_iter().map(IssueItem::new).collect(),
        }
    }

    pub fn visible(&self) -> impl Iterator<Item = &IssueItem> {
        self.items.iter().filter(|item| item.is_visible())
    }
}

/// The elements of a page the filter works on. Either may be missing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    pub toggle_control: Option<ToggleControl>,
    pub issue_list: Option<IssueList>,
}

impl Page {
    /// A freshly rendered page: control present, every item shown.
    pub fn new(issues: impl IntoIterator<Item = Issue>) -> Self {
        Self {
            toggle_control: Some(ToggleControl::default()),
            issue_list: Some(IssueList::new(issues)),
        }
    }

    /// Activate the toggle control. Returns the new mode, or `None` if the
    /// filter could not attach.
    pub fn activate_toggle(&mut self) -> Option<FilterMode> {
        VisibilityFilter::attach(self).map(|mut filter| filter.activate())
    }

    pub fn mode(&self) -> FilterMode {
        self.toggle_control
            .map(|control| control.mode())
            .unwrap_or_default()
    }

    pub fn items(&self) -> &[IssueItem] {
        self.issue_list
            .as_ref()
            .map(|list| list.items.as_slice())
            .unwrap_or_default()
    }

    pub fn visible_items(&self) -> Vec<&IssueItem> {
        self.issue_list
            .as_ref()
            .map(|list| list.visible().collect())
            .unwrap_or_default()
    }
}

/// A filter attached to a page's control and list.
pub struct VisibilityFilter<'a> {
    control: &'a mut ToggleControl,
    list: &'a mut IssueList,
}

impl<'a> VisibilityFilter<'a> {
    /// Attach to a page. Yields nothing if the control or the list is absent.
    pub fn attach(page: &'a mut Page) -> Option<Self> {
        let control = page.toggle_control.as_mut()?;
        let list = page.issue_list.as_mut()?;
        Some(Self { control, list })
    }

    pub fn mode(&self) -> FilterMode {
        self.control.mode
    }

    /// Switch to the other mode: label first, then one pass over the items in
    /// document order.
    pub fn activate(&mut self) -> FilterMode {
        let next = self.control.mode.toggled();
        self.control.mode = next;

        for item in &mut self.list.items {
            item.visibility = match next {
                FilterMode::OnlyMergedShown if item.has_merged_pr == ATTR_FALSE => {
                    Visibility::Hidden
                }
                _ => Visibility::Shown,
            };
        }

        next
    }

    /// Activate only if not already in `mode`.
    pub fn set_mode(&mut self, mode: FilterMode) {
        if self.mode() != mode {
            self.activate();
        }
    }
}
