use tokio_util::sync::CancellationToken;

use crate::api::{CreateError, DeleteError, Endpoint, LoadError, RegisterError, Registration};
use crate::core::goal::Goal;
use crate::core::item::ItemId;
use crate::core::project::{NewProject, Project};
use crate::core::view::SortKey;
use crate::views::shell::ActiveView;

#[derive(Debug, Clone)]
pub enum GoalsMessage {
    Loaded(Result<Vec<Goal>, LoadError>),
    SortChanged(SortKey),
    SearchChanged(String),

    // Delete flow
    DeleteClicked(ItemId),
    ConfirmDelete,
    CancelDelete,
    Deleted(ItemId, Result<(), DeleteError>),

    StatusExpired(u64),
}

#[derive(Debug, Clone)]
pub enum ProjectsMessage {
    Loaded(Result<Vec<Project>, LoadError>),
    SearchChanged(String),

    // Delete flow
    DeleteClicked(ItemId),
    ConfirmDelete,
    CancelDelete,
    Deleted(ItemId, Result<(), DeleteError>),

    // Create flow
    ToggleCreateForm,
    CreateSubmitted(NewProject),
    Created(Result<Project, CreateError>),

    StatusExpired(u64),
}

#[derive(Debug, Clone)]
pub enum SignupMessage {
    NameChanged(String),
    EmailChanged(String),
    PasswordChanged(String),
    TogglePasswordVisible,
    Submit,
    Registered(Result<(), RegisterError>),
}

#[derive(Debug, Clone)]
pub enum Message {
    SelectView(ActiveView),
    Goals(GoalsMessage),
    Projects(ProjectsMessage),
    Signup(SignupMessage),
}

/// Side effect requested by a view.
#[derive(Debug, Clone)]
pub enum Effect {
    LoadGoals,
    LoadProjects { auth_token: Option<String> },
    Delete(Endpoint, ItemId),
    CreateProject { payload: NewProject, auth_token: Option<String> },
    Register(Registration),
    /// Fires the matching `StatusExpired` after the banner window.
    DismissStatus(Endpoint, u64),
}

/// An effect bound to the lifetime of the view that issued it.
#[derive(Debug, Clone)]
pub struct Command {
    pub effect: Effect,
    pub token: CancellationToken,
}

impl Command {
    pub fn new(effect: Effect, token: &CancellationToken) -> Self {
        Self {
            effect,
            token: token.clone(),
        }
    }
}
