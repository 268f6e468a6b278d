use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use crate::api::Endpoint;
use crate::core::gate::ConfirmationGate;
use crate::core::goal::{Goal, ProgressTier};
use crate::core::item::{ItemId, remove_by_id};
use crate::core::load::LoadState;
use crate::core::status::StatusBanner;
use crate::core::view::{ViewParameters, compute_goal_view};
use crate::message::{Command, Effect, GoalsMessage};

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this goal?";

/// Everything a goal card displays, derived at render time.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalCard {
    pub id: ItemId,
    pub title: String,
    pub current_value: f64,
    pub target_value: f64,
    pub unit: String,
    pub progress: u8,
    pub tier: ProgressTier,
    pub due_label: String,
    pub created: String,
    pub due: String,
    pub completed: bool,
}

impl GoalCard {
    fn from_goal(goal: &Goal, now: DateTime<Utc>) -> Self {
        Self {
            id: goal.id.clone(),
            title: goal.title.clone(),
            current_value: goal.current_value,
            target_value: goal.target_value,
            unit: goal.unit.clone(),
            progress: goal.progress(),
            tier: goal.tier(),
            due_label: goal.due_label(now),
            created: goal.created_display(),
            due: goal.due_display(),
            completed: goal.completed,
        }
    }
}

/// Dashboard state: the goal list with sort, search and delete.
#[derive(Debug, Default)]
pub struct GoalsView {
    state: LoadState<Goal>,
    params: ViewParameters,
    gate: ConfirmationGate,
    status: StatusBanner,
    lifetime: Option<CancellationToken>,
}

impl GoalsView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh lifetime and request the initial load.
    pub fn mount(&mut self) -> Command {
        self.unmount();
        let token = CancellationToken::new();
        self.state = LoadState::Loading;
        self.params = ViewParameters::default();
        self.gate.cancel();
        self.status = StatusBanner::default();
        let command = Command::new(Effect::LoadGoals, &token);
        self.lifetime = Some(token);
        command
    }

    /// Cancel outstanding work; later completions are dropped.
    pub fn unmount(&mut self) {
        if let Some(token) = self.lifetime.take() {
            token.cancel();
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.lifetime.is_some()
    }

    pub fn update(&mut self, message: GoalsMessage) -> Option<Command> {
        let token = match &self.lifetime {
            Some(token) => token.clone(),
            None => {
                log::debug!("Goals view not mounted, dropping {:?}", message);
                return None;
            }
        };

        match message {
            GoalsMessage::Loaded(Ok(goals)) => {
                log::info!("Loaded {} goals", goals.len());
                self.state = LoadState::Ready(goals);
            }

            GoalsMessage::Loaded(Err(e)) => {
                log::error!("Error fetching goals: {}", e);
                self.state = LoadState::Errored(e.to_string());
            }

            GoalsMessage::SortChanged(key) => {
                if key != self.params.sort_key {
                    self.params.sort_key = key;
                    // refetch on sort change
                    return Some(Command::new(Effect::LoadGoals, &token));
                }
            }

            GoalsMessage::SearchChanged(text) => {
                self.params.search_text = text;
            }

            GoalsMessage::DeleteClicked(id) => {
                self.gate.request(id);
            }

            GoalsMessage::ConfirmDelete => {
                if let Some(id) = self.gate.confirm() {
                    return Some(Command::new(Effect::Delete(Endpoint::Goals, id), &token));
                }
            }

            GoalsMessage::CancelDelete => {
                self.gate.cancel();
            }

            GoalsMessage::Deleted(id, Ok(())) => {
                if let Some(goals) = self.state.items_mut() {
                    remove_by_id(goals, &id);
                }
                let generation = self.status.show("Goal Deleted");
                return Some(Command::new(
                    Effect::DismissStatus(Endpoint::Goals, generation),
                    &token,
                ));
            }

            GoalsMessage::Deleted(id, Err(e)) => {
                log::error!("Error deleting goal {}: {}", id, e);
            }

            GoalsMessage::StatusExpired(generation) => {
                self.status.dismiss(generation);
            }
        }

        None
    }

    pub fn state(&self) -> &LoadState<Goal> {
        &self.state
    }

    pub fn params(&self) -> &ViewParameters {
        &self.params
    }

    pub fn gate(&self) -> &ConfirmationGate {
        &self.gate
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status.message()
    }

    pub fn visible(&self) -> Vec<&Goal> {
        compute_goal_view(self.state.items(), &self.params)
    }

    pub fn cards(&self, now: DateTime<Utc>) -> Vec<GoalCard> {
        self.visible()
            .into_iter()
            .map(|goal| GoalCard::from_goal(goal, now))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{DeleteError, LoadError};
    use crate::core::view::SortKey;
    use chrono::{Duration, TimeZone};

    fn goal(id: u64, title: &str, created_day: i64) -> Goal {
        let base = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        Goal {
            id: ItemId::from(id),
            title: title.to_string(),
            current_value: 3.0,
            target_value: 5.0,
            unit: "km".to_string(),
            priority: 1,
            completed: false,
            created_at: base + Duration::days(created_day),
            due_date: base + Duration::days(created_day + 10),
        }
    }

    fn loaded_view(goals: Vec<Goal>) -> GoalsView {
        let mut view = GoalsView::new();
        let command = view.mount();
        assert!(matches!(command.effect, Effect::LoadGoals));
        assert!(view.state().is_loading());
        view.update(GoalsMessage::Loaded(Ok(goals)));
        view
    }

    #[test]
    fn load_success_and_failure() {
        let view = loaded_view(vec![goal(1, "Run 5k", 0)]);
        assert_eq!(view.state().items().len(), 1);

        let mut view = GoalsView::new();
        view.mount();
        view.update(GoalsMessage::Loaded(Err(LoadError::FetchFailed {
            collection: "goals",
            status: 500,
        })));
        assert_eq!(view.state().error(), Some("Failed to fetch goals"));
        assert!(view.visible().is_empty());
    }

    #[test]
    fn search_narrows_cards() {
        let mut view = loaded_view(vec![goal(1, "Run 5k", 0)]);
        view.update(GoalsMessage::SearchChanged("run".to_string()));
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let cards = view.cards(now);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].progress, 60);
        assert_eq!(cards[0].tier, ProgressTier::Medium);
        assert_eq!(cards[0].due_label, "10 days left");

        view.update(GoalsMessage::SearchChanged("swim".to_string()));
        assert!(view.cards(now).is_empty());
    }

    #[test]
    fn sort_change_reloads_only_on_change() {
        let mut view = loaded_view(vec![goal(1, "a", 0), goal(2, "b", 1)]);
        assert!(view.update(GoalsMessage::SortChanged(SortKey::Newest)).is_none());

        let command = view.update(GoalsMessage::SortChanged(SortKey::Oldest)).unwrap();
        assert!(matches!(command.effect, Effect::LoadGoals));
        // the current list stays up while the reload is outstanding
        let ids: Vec<_> = view.visible().iter().map(|g| g.id.to_string()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn confirm_dispatches_latest_target() {
        let mut view = loaded_view(vec![goal(1, "a", 0), goal(2, "b", 1)]);
        view.update(GoalsMessage::DeleteClicked(ItemId::from(1)));
        view.update(GoalsMessage::DeleteClicked(ItemId::from(2)));
        assert!(view.gate().is_visible());

        let command = view.update(GoalsMessage::ConfirmDelete).unwrap();
        match command.effect {
            Effect::Delete(Endpoint::Goals, id) => assert_eq!(id, ItemId::from(2)),
            other => panic!("unexpected {:?}", other),
        }
        assert!(!view.gate().is_visible());
    }

    #[test]
    fn cancel_dispatches_nothing() {
        let mut view = loaded_view(vec![goal(1, "a", 0)]);
        view.update(GoalsMessage::DeleteClicked(ItemId::from(1)));
        view.update(GoalsMessage::CancelDelete);
        assert!(view.update(GoalsMessage::ConfirmDelete).is_none());
        assert_eq!(view.state().items().len(), 1);
    }

    #[test]
    fn successful_delete_removes_and_notifies() {
        let mut view = loaded_view(vec![goal(1, "a", 0), goal(2, "b", 1)]);
        let command = view
            .update(GoalsMessage::Deleted(ItemId::from(1), Ok(())))
            .unwrap();
        assert_eq!(view.state().items().len(), 1);
        assert_eq!(view.status_message(), Some("Goal Deleted"));

        let generation = match command.effect {
            Effect::DismissStatus(Endpoint::Goals, generation) => generation,
            other => panic!("unexpected {:?}", other),
        };

        // a second completion for the same id changes nothing in the list
        view.update(GoalsMessage::Deleted(ItemId::from(1), Ok(())));
        assert_eq!(view.state().items().len(), 1);

        // first timer is stale now; the second banner stays up
        view.update(GoalsMessage::StatusExpired(generation));
        assert_eq!(view.status_message(), Some("Goal Deleted"));
        view.update(GoalsMessage::StatusExpired(generation + 1));
        assert_eq!(view.status_message(), None);
    }

    #[test]
    fn failed_delete_keeps_item_silently() {
        let mut view = loaded_view(vec![goal(1, "a", 0)]);
        let command = view.update(GoalsMessage::Deleted(
            ItemId::from(1),
            Err(DeleteError::DeleteFailed {
                noun: "goal",
                status: 500,
            }),
        ));
        assert!(command.is_none());
        assert_eq!(view.state().items().len(), 1);
        assert_eq!(view.status_message(), None);
    }

    #[test]
    fn unmounted_view_ignores_completions() {
        let mut view = GoalsView::new();
        let command = view.mount();
        view.unmount();
        assert!(command.token.is_cancelled());
        view.update(GoalsMessage::Loaded(Ok(vec![goal(1, "a", 0)])));
        assert!(view.state().is_loading());
        assert!(!view.is_mounted());
    }

    #[test]
    fn remount_clears_banner_and_search() {
        let mut view = loaded_view(vec![goal(1, "a", 0), goal(2, "b", 1)]);
        view.update(GoalsMessage::SortChanged(SortKey::Oldest));
        view.update(GoalsMessage::SearchChanged("a".to_string()));
        view.update(GoalsMessage::Deleted(ItemId::from(2), Ok(())));
        assert_eq!(view.status_message(), Some("Goal Deleted"));

        view.unmount();
        view.mount();
        assert_eq!(view.status_message(), None);
        assert_eq!(view.params(), &ViewParameters::default());
    }
}
