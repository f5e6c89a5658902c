//! Article editor, for new articles and for editing existing ones.

use super::{Problem, Status, input, server_problems, slow_threshold, view_problems};
use crate::article::{Article, ArticleDraft, Slug};
use crate::environment::AppEnvironment;
use crate::error::ApiError;
use crate::page::{Document, Node};
use crate::route::{self, Route};
use crate::session::Session;
use conduit_core::{Effect, Effects, Reducer, Subscription, async_effect, smallvec};
use std::sync::Arc;

/// Editor form fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorForm {
    /// Title
    pub title: String,
    /// One-line description
    pub description: String,
    /// Markdown body
    pub body: String,
    /// Tags, separated by whitespace
    pub tags: String,
}

impl From<&Article> for EditorForm {
    fn from(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            description: article.description.clone(),
            body: article.body.clone(),
            tags: article.tag_list.join(" "),
        }
    }
}

impl EditorForm {
    fn validate(&self) -> Vec<Problem> {
        let mut problems = Vec::new();
        if self.title.trim().is_empty() {
            problems.push(Problem::InvalidEntry {
                field: "title",
                message: "title can't be blank.",
            });
        }
        if self.body.trim().is_empty() {
            problems.push(Problem::InvalidEntry {
                field: "body",
                message: "body can't be blank.",
            });
        }
        problems
    }

    fn draft(&self) -> ArticleDraft {
        ArticleDraft {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            body: self.body.trim().to_string(),
            tag_list: self.tags.split_whitespace().map(str::to_string).collect(),
        }
    }
}

/// Editor page state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    /// Current session
    pub session: Session,
    /// The article being edited, `None` for a new one
    pub slug: Option<Slug>,
    /// Problems from the last submission
    pub problems: Vec<Problem>,
    /// The form, once there is something to edit
    pub status: Status<EditorForm>,
    /// A save is in flight
    pub saving: bool,
}

impl EditorState {
    /// The session this page holds
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }
}

/// Editor page actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorAction {
    /// Publish button
    ClickedSave,
    /// Title field edited
    EnteredTitle(String),
    /// Description field edited
    EnteredDescription(String),
    /// Body field edited
    EnteredBody(String),
    /// Tags field edited
    EnteredTags(String),
    /// Reply to loading the article being edited
    CompletedArticleLoad(Slug, Result<Article, ApiError>),
    /// Save reply
    CompletedSave(Result<Article, ApiError>),
    /// The viewer signed in or out
    GotSession(Session),
    /// Loading is taking a while
    PassedSlowLoadThreshold,
}

/// Start a visit to the editor
///
/// A new article starts from an empty form. An existing one is loaded
/// first. Either way the viewer has to be signed in.
#[must_use]
pub fn init(
    session: Session,
    slug: Option<Slug>,
    env: &AppEnvironment,
) -> (EditorState, Effects<EditorAction>) {
    let mut state = EditorState {
        session,
        slug,
        problems: Vec::new(),
        status: Status::Failed,
        saving: false,
    };

    let Some(cred) = state.session.cred().cloned() else {
        return (state, smallvec![Effect::None]);
    };

    match state.slug.clone() {
        None => {
            state.status = Status::Loaded(EditorForm::default());
            (state, smallvec![Effect::None])
        },
        Some(slug) => {
            state.status = Status::Loading;
            let api = Arc::clone(&env.api);
            let effects = smallvec![
                async_effect! {
                    let result = api.article(Some(cred), slug.clone()).await;
                    Some(EditorAction::CompletedArticleLoad(slug, result))
                },
                slow_threshold(env, EditorAction::PassedSlowLoadThreshold),
            ];
            (state, effects)
        },
    }
}

/// Editor page reducer
#[derive(Debug, Clone, Copy, Default)]
pub struct EditorReducer;

impl EditorReducer {
    fn edit(state: &mut EditorState, edit: impl FnOnce(&mut EditorForm)) -> Effects<EditorAction> {
        if let Some(form) = state.status.loaded_mut() {
            edit(form);
        }
        smallvec![Effect::None]
    }

    fn save(state: &mut EditorState, env: &AppEnvironment) -> Effects<EditorAction> {
        if state.saving {
            return smallvec![Effect::None];
        }
        let (Some(form), Some(cred)) = (state.status.loaded(), state.session.cred()) else {
            return smallvec![Effect::None];
        };
        let problems = form.validate();
        if !problems.is_empty() {
            state.problems = problems;
            return smallvec![Effect::None];
        }

        let api = Arc::clone(&env.api);
        let cred = cred.clone();
        let draft = form.draft();
        let slug = state.slug.clone();
        state.problems.clear();
        state.saving = true;

        smallvec![async_effect! {
            let result = match slug {
                Some(slug) => api.update_article(cred, slug, draft).await,
                None => api.create_article(cred, draft).await,
            };
            Some(EditorAction::CompletedSave(result))
        }]
    }
}

impl Reducer for EditorReducer {
    type State = EditorState;
    type Action = EditorAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut EditorState,
        action: EditorAction,
        env: &AppEnvironment,
    ) -> Effects<EditorAction> {
        match action {
            EditorAction::ClickedSave => Self::save(state, env),
            EditorAction::EnteredTitle(title) => Self::edit(state, |form| form.title = title),
            EditorAction::EnteredDescription(description) => {
                Self::edit(state, |form| form.description = description)
            },
            EditorAction::EnteredBody(body) => Self::edit(state, |form| form.body = body),
            EditorAction::EnteredTags(tags) => Self::edit(state, |form| form.tags = tags),
            EditorAction::CompletedArticleLoad(requested, _)
                if state.slug.as_ref() != Some(&requested) =>
            {
                tracing::debug!(requested = %requested, "Discarding article loaded for another editor");
                smallvec![Effect::None]
            },
            EditorAction::CompletedArticleLoad(_, Ok(article)) => {
                let is_author = state
                    .session
                    .viewer()
                    .is_some_and(|viewer| viewer.username() == &article.author.username);
                state.status = if is_author {
                    Status::Loaded(EditorForm::from(&article))
                } else {
                    tracing::warn!(slug = %article.slug, "Refusing to edit another author's article");
                    Status::Failed
                };
                smallvec![Effect::None]
            },
            EditorAction::CompletedArticleLoad(_, Err(error)) => {
                state.status.complete("article", Err::<EditorForm, _>(error));
                smallvec![Effect::None]
            },
            EditorAction::CompletedSave(Ok(article)) => {
                state.saving = false;
                smallvec![route::replace_url(
                    state.session.nav_key(),
                    &Route::Article(article.slug),
                )]
            },
            EditorAction::CompletedSave(Err(error)) => {
                state.saving = false;
                state.problems = server_problems(&error);
                smallvec![Effect::None]
            },
            EditorAction::GotSession(session) => {
                let effect = route::replace_url(session.nav_key(), &Route::Home);
                state.session = session;
                smallvec![effect]
            },
            EditorAction::PassedSlowLoadThreshold => {
                state.status.passed_slow_threshold();
                smallvec![Effect::None]
            },
        }
    }

    fn subscriptions(
        &self,
        state: &EditorState,
        env: &AppEnvironment,
    ) -> Subscription<EditorAction> {
        Session::changes(
            EditorAction::GotSession,
            state.session.nav_key(),
            &env.credentials,
        )
    }
}

/// Render the editor
#[must_use]
pub fn view(state: &EditorState) -> Document {
    let title = if state.slug.is_some() {
        "Edit Article"
    } else {
        "New Article"
    };
    let button = if state.slug.is_some() {
        "Update Article"
    } else {
        "Publish Article"
    };

    let form = state.status.view("article", |form| {
        let mut save = Node::element("button").class("btn btn-lg pull-xs-right btn-primary");
        if state.saving {
            save = save.attr("disabled", "true");
        }
        Node::element("form")
            .child(input("text", "Article Title", &form.title))
            .child(input("text", "What's this article about?", &form.description))
            .child(
                Node::element("fieldset").class("form-group").child(
                    Node::element("textarea")
                        .class("form-control")
                        .attr("placeholder", "Write your article (in markdown)")
                        .child(Node::text(&form.body)),
                ),
            )
            .child(input("text", "Enter tags", &form.tags))
            .child(save.child(Node::text(button)))
    });

    Document::new(
        title,
        vec![
            Node::element("div").class("editor-page").child(
                Node::element("div")
                    .class("container page")
                    .child(view_problems(&state.problems))
                    .child(form),
            ),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{self, MockApi};
    use conduit_testing::{ReducerTest, assertions};

    fn slug() -> Slug {
        Slug::parse("hello-world").unwrap()
    }

    fn filled() -> EditorForm {
        EditorForm {
            title: "Ownership".to_string(),
            description: "borrowing explained".to_string(),
            body: "Values have one owner.".to_string(),
            tags: "rust  memory\tlanguages".to_string(),
        }
    }

    #[test]
    fn test_guest_cannot_edit() {
        let (env, _history, key) = mocks::environment(MockApi::with_fixtures());

        let (state, effects) = init(Session::Guest(key.clone()), None, &env);
        assert_eq!(state.status, Status::Failed);
        assertions::assert_no_effects(&effects);

        let (state, effects) = init(Session::Guest(key), Some(slug()), &env);
        assert_eq!(state.status, Status::Failed);
        assertions::assert_no_effects(&effects);
    }

    #[test]
    fn test_new_article_starts_blank() {
        let (env, _history, key) = mocks::environment(MockApi::with_fixtures());
        let (state, effects) = init(mocks::logged_in(key), None, &env);

        assert_eq!(state.status, Status::Loaded(EditorForm::default()));
        assertions::assert_no_effects(&effects);
    }

    #[tokio::test]
    async fn test_existing_article_is_loaded_into_form() {
        let (env, _history, key) = mocks::environment(MockApi::with_fixtures());
        let (mut state, mut effects) = init(mocks::logged_in(key), Some(slug()), &env);
        assert_eq!(state.status, Status::Loading);

        let Effect::Future(fut) = effects.remove(0) else {
            panic!("expected an article request");
        };
        let reply = fut.await.unwrap();
        EditorReducer.reduce(&mut state, reply, &env);

        assert_eq!(state.status, Status::Loaded(EditorForm::from(&mocks::article())));
    }

    #[test]
    fn test_other_authors_article_is_refused() {
        let (env, _history, key) = mocks::environment(MockApi::with_fixtures());
        let (state, _) = init(mocks::logged_in(key), Some(slug()), &env);
        let mut article = mocks::article();
        article.author = mocks::author("bob");

        ReducerTest::new(EditorReducer)
            .with_env(env)
            .given_state(state)
            .when_action(EditorAction::CompletedArticleLoad(slug(), Ok(article)))
            .then_state(|state| assert_eq!(state.status, Status::Failed))
            .run();
    }

    #[test]
    fn test_article_loaded_for_another_slug_is_discarded() {
        let (env, _history, key) = mocks::environment(MockApi::with_fixtures());
        let (editing, _) = init(mocks::logged_in(key.clone()), Some(mocks::slug("second-post")), &env);
        let (new_article, _) = init(mocks::logged_in(key), None, &env);

        ReducerTest::new(EditorReducer)
            .with_env(env.clone())
            .given_state(editing)
            .when_action(EditorAction::CompletedArticleLoad(slug(), Ok(mocks::article())))
            .then_state(|state| assert_eq!(state.status, Status::Loading))
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();

        ReducerTest::new(EditorReducer)
            .with_env(env)
            .given_state(new_article)
            .when_action(EditorAction::CompletedArticleLoad(slug(), Err(ApiError::NotFound)))
            .then_state(|state| {
                assert_eq!(state.status, Status::Loaded(EditorForm::default()));
            })
            .run();
    }

    #[test]
    fn test_title_and_body_are_required() {
        let (env, _history, key) = mocks::environment(MockApi::with_fixtures());
        let (state, _) = init(mocks::logged_in(key), None, &env);

        ReducerTest::new(EditorReducer)
            .with_env(env)
            .given_state(state)
            .when_action(EditorAction::EnteredDescription("only this".to_string()))
            .when_action(EditorAction::ClickedSave)
            .then_state(|state| {
                let messages: Vec<_> = state.problems.iter().map(Problem::message).collect();
                assert_eq!(messages, vec!["title can't be blank.", "body can't be blank."]);
                assert!(!state.saving);
            })
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[test]
    fn test_tags_split_on_whitespace() {
        assert_eq!(filled().draft().tag_list, vec!["rust", "memory", "languages"]);
    }

    #[tokio::test]
    async fn test_publish_creates_article() {
        let api = MockApi::with_fixtures();
        let (env, _history, key) = mocks::environment(api.clone());
        let (mut state, _) = init(mocks::logged_in(key), None, &env);
        state.status = Status::Loaded(filled());

        let mut effects = EditorReducer.reduce(&mut state, EditorAction::ClickedSave, &env);
        assert!(state.saving);
        let Some(Effect::Future(fut)) = effects.pop() else {
            panic!("expected a create request");
        };
        let Some(EditorAction::CompletedSave(Ok(article))) = fut.await else {
            panic!("expected a saved article");
        };

        assert_eq!(article.title, "Ownership");
        assert_eq!(api.calls(), vec!["create_article Ownership".to_string()]);
    }

    #[test]
    fn test_saved_article_is_shown() {
        let (env, _history, key) = mocks::environment(MockApi::with_fixtures());
        let (mut state, _) = init(mocks::logged_in(key), Some(slug()), &env);
        state.saving = true;

        ReducerTest::new(EditorReducer)
            .with_env(env)
            .given_state(state)
            .when_action(EditorAction::CompletedSave(Ok(mocks::article())))
            .then_state(|state| assert!(!state.saving))
            .then_effects(|effects| assertions::assert_replaces(effects, "#/article/hello-world"))
            .run();
    }

    #[test]
    fn test_view_titles() {
        let (env, _history, key) = mocks::environment(MockApi::with_fixtures());

        let (new, _) = init(mocks::logged_in(key.clone()), None, &env);
        let document = view(&new);
        assert_eq!(document.title, "New Article");
        assert!(document.text().contains("Publish Article"));

        let (edit, _) = init(mocks::logged_in(key), Some(slug()), &env);
        assert_eq!(view(&edit).title, "Edit Article");
    }
}
