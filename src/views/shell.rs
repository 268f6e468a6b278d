use std::fmt;

use crate::message::{Command, Message};
use crate::storage::ClientStore;

use super::goals::GoalsView;
use super::projects::ProjectsView;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActiveView {
    /// The goals dashboard.
    #[default]
    Home,
    Projects,
}

impl ActiveView {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Projects => "Projects",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "home" | "goals" => Some(Self::Home),
            "projects" => Some(Self::Projects),
            _ => None,
        }
    }

    /// Stored value, falling back to `Home` when absent or unrecognised.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            None => Self::Home,
            Some(name) => Self::from_name(name).unwrap_or_else(|| {
                log::warn!("Unknown stored view {:?}, showing Home", name);
                Self::Home
            }),
        }
    }
}

impl fmt::Display for ActiveView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level client shell: persists the active view and mounts the view
/// it names.
#[derive(Debug)]
pub struct Shell {
    store: ClientStore,
    active: ActiveView,
    goals: GoalsView,
    projects: ProjectsView,
}

impl Shell {
    pub fn new(store: ClientStore) -> Self {
        let active = ActiveView::from_stored(store.active_view());
        Self {
            store,
            active,
            goals: GoalsView::new(),
            projects: ProjectsView::new(),
        }
    }

    /// Mount the active view.
    pub fn start(&mut self) -> Command {
        self.mount_active()
    }

    fn mount_active(&mut self) -> Command {
        match self.active {
            ActiveView::Home => self.goals.mount(),
            ActiveView::Projects => {
                let token = self.store.auth_token().map(str::to_string);
                self.projects.mount(token)
            }
        }
    }

    /// Switch views. Saves the choice; remounts only when it changes.
    pub fn select_view(&mut self, view: ActiveView) -> Option<Command> {
        self.store.set_active_view(view.as_str());
        if view == self.active {
            return None;
        }
        log::info!("Switching view {} -> {}", self.active, view);
        match self.active {
            ActiveView::Home => self.goals.unmount(),
            ActiveView::Projects => self.projects.unmount(),
        }
        self.active = view;
        Some(self.mount_active())
    }

    pub fn update(&mut self, message: Message) -> Option<Command> {
        match message {
            Message::SelectView(view) => self.select_view(view),
            Message::Goals(msg) => self.goals.update(msg),
            Message::Projects(msg) => self.projects.update(msg),
            Message::Signup(msg) => {
                log::debug!("Shell has no signup form, dropping {:?}", msg);
                None
            }
        }
    }

    pub fn active(&self) -> ActiveView {
        self.active
    }

    pub fn goals(&self) -> &GoalsView {
        &self.goals
    }

    pub fn projects(&self) -> &ProjectsView {
        &self.projects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::goal::Goal;
    use crate::core::item::ItemId;
    use crate::message::{Effect, GoalsMessage};
    use chrono::{TimeZone, Utc};

    #[test]
    fn stored_view_names() {
        assert_eq!(ActiveView::from_stored(None), ActiveView::Home);
        assert_eq!(ActiveView::from_stored(Some("Projects")), ActiveView::Projects);
        assert_eq!(ActiveView::from_stored(Some("Settings")), ActiveView::Home);
    }

    #[test]
    fn starts_on_stored_view_with_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let mut store = ClientStore::open(&path);
        store.set_active_view("Projects");
        store.set_auth_token(Some("jwt"));

        let mut shell = Shell::new(ClientStore::open(&path));
        assert_eq!(shell.active(), ActiveView::Projects);
        match shell.start().effect {
            Effect::LoadProjects { auth_token } => assert_eq!(auth_token.as_deref(), Some("jwt")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn switching_persists_and_cancels_previous() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let mut shell = Shell::new(ClientStore::open(&path));
        assert_eq!(shell.active(), ActiveView::Home);
        let goals_load = shell.start();

        let command = shell.update(Message::SelectView(ActiveView::Projects)).unwrap();
        assert!(matches!(command.effect, Effect::LoadProjects { .. }));
        assert!(goals_load.token.is_cancelled());
        assert!(!shell.goals().is_mounted());
        assert!(shell.projects().is_mounted());
        assert_eq!(ClientStore::open(&path).active_view(), Some("Projects"));

        // late goals completion is ignored
        shell.update(Message::Goals(GoalsMessage::Loaded(Ok(vec![]))));
        assert!(shell.goals().state().is_loading());

        assert!(shell.select_view(ActiveView::Projects).is_none());
    }

    #[test]
    fn returning_to_goals_starts_clean() {
        let dir = tempfile::tempdir().unwrap();
        let mut shell = Shell::new(ClientStore::open(&dir.path().join("state.json")));
        shell.start();

        let created_at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let goal = Goal {
            id: ItemId::from(1),
            title: "Run 5k".to_string(),
            current_value: 1.0,
            target_value: 5.0,
            unit: "km".to_string(),
            priority: 1,
            completed: false,
            created_at,
            due_date: created_at,
        };
        shell.update(Message::Goals(GoalsMessage::Loaded(Ok(vec![goal]))));
        shell.update(Message::Goals(GoalsMessage::SearchChanged("run".to_string())));
        shell.update(Message::Goals(GoalsMessage::Deleted(ItemId::from(1), Ok(()))));
        assert_eq!(shell.goals().status_message(), Some("Goal Deleted"));

        shell.update(Message::SelectView(ActiveView::Projects));
        shell.update(Message::SelectView(ActiveView::Home));
        assert_eq!(shell.goals().status_message(), None);
        assert_eq!(shell.goals().params().search_text, "");
        assert!(shell.goals().state().is_loading());
    }
}
