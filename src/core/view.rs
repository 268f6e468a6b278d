use std::fmt;
use std::str::FromStr;

use super::goal::Goal;
use super::item::Listed;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    DueDate,
    Priority,
    Completed,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        Self::Newest,
        Self::Oldest,
        Self::DueDate,
        Self::Priority,
        Self::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::DueDate => "due_date",
            Self::Priority => "priority",
            Self::Completed => "completed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Newest => "Newest Created",
            Self::Oldest => "Oldest Created",
            Self::DueDate => "Due Date",
            Self::Priority => "Priority",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" | "new" => Ok(Self::Newest),
            "oldest" | "old" => Ok(Self::Oldest),
            "due_date" | "due-date" | "due" => Ok(Self::DueDate),
            "priority" => Ok(Self::Priority),
            "completed" => Ok(Self::Completed),
            other => Err(format!("unknown sort key: {}", other)),
        }
    }
}

/// Sort and search state owned by a list view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewParameters {
    pub sort_key: SortKey,
    pub search_text: String,
}

impl ViewParameters {
    pub fn matches(&self, title: &str) -> bool {
        if self.search_text.is_empty() {
            return true;
        }
        title
            .to_lowercase()
            .contains(&self.search_text.to_lowercase())
    }
}

/// Stable sort of goals by `key`; ties keep their incoming order.
pub fn sort_goals(goals: &mut [&Goal], key: SortKey) {
    match key {
        SortKey::Newest => goals.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::Oldest => goals.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortKey::DueDate => goals.sort_by(|a, b| a.due_date.cmp(&b.due_date)),
        SortKey::Priority => goals.sort_by(|a, b| b.priority.cmp(&a.priority)),
        SortKey::Completed => goals.sort_by(|a, b| a.completed.cmp(&b.completed)),
    }
}

/// The ordered, filtered goals to render. Sorting happens on the full
/// collection before the search filter is applied.
pub fn compute_goal_view<'a>(goals: &'a [Goal], params: &ViewParameters) -> Vec<&'a Goal> {
    let mut sorted: Vec<&Goal> = goals.iter().collect();
    sort_goals(&mut sorted, params.sort_key);
    sorted.retain(|g| params.matches(&g.title));
    sorted
}

/// Search-only view for collections without a sort control.
pub fn filter_by_title<'a, T: Listed>(items: &'a [T], params: &ViewParameters) -> Vec<&'a T> {
    items.iter().filter(|item| params.matches(item.title())).collect()
}
