use tokio_util::sync::CancellationToken;

use crate::api::Endpoint;
use crate::core::gate::ConfirmationGate;
use crate::core::item::{ItemId, remove_by_id};
use crate::core::load::LoadState;
use crate::core::project::Project;
use crate::core::status::StatusBanner;
use crate::core::view::{ViewParameters, filter_by_title};
use crate::message::{Command, Effect, ProjectsMessage};

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this project?";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectCard {
    pub id: ItemId,
    pub title: String,
    pub image_url: String,
}

/// Projects board: card grid, search, delete and the create form toggle.
#[derive(Debug, Default)]
pub struct ProjectsView {
    state: LoadState<Project>,
    params: ViewParameters,
    gate: ConfirmationGate,
    status: StatusBanner,
    show_create: bool,
    create_error: Option<String>,
    auth_token: Option<String>,
    lifetime: Option<CancellationToken>,
}

impl ProjectsView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh lifetime with the caller's credentials and request the
    /// initial load.
    pub fn mount(&mut self, auth_token: Option<String>) -> Command {
        self.unmount();
        let token = CancellationToken::new();
        self.state = LoadState::Loading;
        self.params = ViewParameters::default();
        self.gate.cancel();
        self.status = StatusBanner::default();
        self.show_create = false;
        self.create_error = None;
        self.auth_token = auth_token;
        let command = Command::new(
            Effect::LoadProjects {
                auth_token: self.auth_token.clone(),
            },
            &token,
        );
        self.lifetime = Some(token);
        command
    }

    pub fn unmount(&mut self) {
        if let Some(token) = self.lifetime.take() {
            token.cancel();
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.lifetime.is_some()
    }

    pub fn update(&mut self, message: ProjectsMessage) -> Option<Command> {
        let token = match &self.lifetime {
            Some(token) => token.clone(),
            None => {
                log::debug!("Projects view not mounted, dropping {:?}", message);
                return None;
            }
        };

        match message {
            ProjectsMessage::Loaded(Ok(projects)) => {
                log::info!("Loaded {} projects", projects.len());
                self.state = LoadState::Ready(projects);
            }

            ProjectsMessage::Loaded(Err(e)) => {
                log::error!("Error fetching projects: {}", e);
                self.state = LoadState::Errored(e.to_string());
            }

            ProjectsMessage::SearchChanged(text) => {
                self.params.search_text = text;
            }

            ProjectsMessage::DeleteClicked(id) => {
                self.gate.request(id);
            }

            ProjectsMessage::ConfirmDelete => {
                if let Some(id) = self.gate.confirm() {
                    return Some(Command::new(Effect::Delete(Endpoint::Projects, id), &token));
                }
            }

            ProjectsMessage::CancelDelete => {
                self.gate.cancel();
            }

            ProjectsMessage::Deleted(id, Ok(())) => {
                if let Some(projects) = self.state.items_mut() {
                    remove_by_id(projects, &id);
                }
                return Some(self.notify("Project Deleted", &token));
            }

            ProjectsMessage::Deleted(id, Err(e)) => {
                log::error!("Error deleting project {}: {}", id, e);
            }

            ProjectsMessage::ToggleCreateForm => {
                self.show_create = !self.show_create;
                self.create_error = None;
            }

            ProjectsMessage::CreateSubmitted(payload) => {
                self.create_error = None;
                if payload.title.trim().is_empty() || payload.image_bytes.is_empty() {
                    self.create_error = Some("A title and an image are required.".to_string());
                    return None;
                }
                return Some(Command::new(
                    Effect::CreateProject {
                        payload,
                        auth_token: self.auth_token.clone(),
                    },
                    &token,
                ));
            }

            ProjectsMessage::Created(Ok(project)) => {
                log::info!("Created project {} ({})", project.title, project.id);
                match self.state.items_mut() {
                    Some(projects) => projects.push(project),
                    None => log::warn!("Project created before the list loaded; it will show on next load"),
                }
                self.show_create = false;
                return Some(self.notify("Project Created", &token));
            }

            ProjectsMessage::Created(Err(e)) => {
                log::warn!("Project creation failed: {}", e);
                self.create_error = Some(e.to_string());
            }

            ProjectsMessage::StatusExpired(generation) => {
                self.status.dismiss(generation);
            }
        }

        None
    }

    fn notify(&mut self, message: &str, token: &CancellationToken) -> Command {
        let generation = self.status.show(message);
        Command::new(Effect::DismissStatus(Endpoint::Projects, generation), token)
    }

    pub fn state(&self) -> &LoadState<Project> {
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

    pub fn show_create(&self) -> bool {
        self.show_create
    }

    pub fn create_error(&self) -> Option<&str> {
        self.create_error.as_deref()
    }

    pub fn visible(&self) -> Vec<&Project> {
        filter_by_title(self.state.items(), &self.params)
    }

    pub fn cards(&self, upload_base: &str) -> Vec<ProjectCard> {
        self.visible()
            .into_iter()
            .map(|p| ProjectCard {
                id: p.id.clone(),
                title: p.title.clone(),
                image_url: p.image_url(upload_base),
            })
            .collect()
    }
}
