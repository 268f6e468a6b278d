use crate::api::{ApiClient, Endpoint};
use crate::core::status::STATUS_DISMISS_AFTER;
use crate::message::{Command, Effect, GoalsMessage, Message, ProjectsMessage, SignupMessage};

/// Run a command to completion and return the message it produces.
///
/// Returns `None` if the issuing view's token is cancelled before or while
/// the effect runs, so nothing is applied to a view that has gone away.
pub async fn perform(api: &ApiClient, command: Command) -> Option<Message> {
    let Command { effect, token } = command;
    if token.is_cancelled() {
        return None;
    }

    tokio::select! {
        biased;
        _ = token.cancelled() => {
            log::debug!("Command cancelled before completion");
            None
        }
        message = run(api, effect) => {
            if token.is_cancelled() {
                None
            } else {
                Some(message)
            }
        }
    }
}

async fn run(api: &ApiClient, effect: Effect) -> Message {
    match effect {
        Effect::LoadGoals => Message::Goals(GoalsMessage::Loaded(api.load_goals().await)),

        Effect::LoadProjects { auth_token } => Message::Projects(ProjectsMessage::Loaded(
            api.load_projects(auth_token.as_deref()).await,
        )),

        Effect::Delete(endpoint, id) => {
            let result = api.delete_item(endpoint, &id).await;
            match endpoint {
                Endpoint::Goals => Message::Goals(GoalsMessage::Deleted(id, result)),
                Endpoint::Projects => Message::Projects(ProjectsMessage::Deleted(id, result)),
            }
        }

        Effect::CreateProject { payload, auth_token } => Message::Projects(ProjectsMessage::Created(
            api.create_project(&payload, auth_token.as_deref()).await,
        )),

        Effect::Register(registration) => {
            Message::Signup(SignupMessage::Registered(api.register(&registration).await))
        }

        Effect::DismissStatus(endpoint, generation) => {
            tokio::time::sleep(STATUS_DISMISS_AFTER).await;
            match endpoint {
                Endpoint::Goals => Message::Goals(GoalsMessage::StatusExpired(generation)),
                Endpoint::Projects => Message::Projects(ProjectsMessage::StatusExpired(generation)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::item::ItemId;
    use crate::views::goals::GoalsView;
    use serde_json::json;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn goals_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/goals"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "goals": [{
                    "id": 1,
                    "title": "Run 5k",
                    "current_value": 3,
                    "target_value": 5,
                    "unit": "km",
                    "priority": 1,
                    "completed": false,
                    "created_at": "2025-01-10T08:00:00Z",
                    "due_date": "2025-02-10T08:00:00Z"
                }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/goals/1"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        server
    }

    fn apply(view: &mut GoalsView, message: Option<Message>) -> Option<Command> {
        match message {
            Some(Message::Goals(msg)) => view.update(msg),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn load_then_confirmed_delete() {
        let server = goals_server().await;
        let api = ApiClient::new(&server.uri()).unwrap();
        let mut view = GoalsView::new();

        let load = view.mount();
        apply(&mut view, perform(&api, load).await);
        assert_eq!(view.state().items().len(), 1);

        view.update(GoalsMessage::DeleteClicked(ItemId::from(1)));
        let delete = view.update(GoalsMessage::ConfirmDelete).unwrap();
        let dismiss = apply(&mut view, perform(&api, delete).await).unwrap();
        assert!(view.state().items().is_empty());
        assert_eq!(view.status_message(), Some("Goal Deleted"));
        assert!(matches!(dismiss.effect, Effect::DismissStatus(Endpoint::Goals, _)));
    }

    #[tokio::test]
    async fn cancelled_command_yields_nothing() {
        let server = goals_server().await;
        let api = ApiClient::new(&server.uri()).unwrap();
        let token = CancellationToken::new();
        token.cancel();
        let command = Command::new(Effect::LoadGoals, &token);
        assert!(perform(&api, command).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn dismissal_waits_for_window() {
        let api = ApiClient::new("http://127.0.0.1:9").unwrap();
        let token = CancellationToken::new();
        let command = Command::new(Effect::DismissStatus(Endpoint::Projects, 4), &token);

        let started = tokio::time::Instant::now();
        let message = perform(&api, command).await;
        assert!(started.elapsed() >= Duration::from_millis(3000));
        assert!(matches!(
            message,
            Some(Message::Projects(ProjectsMessage::StatusExpired(4)))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn unmount_during_dismissal_drops_it() {
        let api = ApiClient::new("http://127.0.0.1:9").unwrap();
        let token = CancellationToken::new();
        let command = Command::new(Effect::DismissStatus(Endpoint::Goals, 1), &token);

        let pending = tokio::spawn({
            let api = api.clone();
            async move { perform(&api, command).await }
        });
        tokio::time::sleep(Duration::from_millis(1000)).await;
        token.cancel();
        assert!(pending.await.unwrap().is_none());
    }
}
