//! A single article with its comments.

use super::{Status, slow_threshold};
use crate::article::{Article, Comment, Slug};
use crate::environment::AppEnvironment;
use crate::error::ApiError;
use crate::page::{Document, Node};
use crate::route::{self, Route};
use crate::session::Session;
use conduit_core::{Effect, Effects, Reducer, Subscription, async_effect, smallvec};
use std::sync::Arc;

/// The new-comment box
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentText {
    /// Being typed
    Editing(String),
    /// Posted, waiting for the reply
    Sending(String),
}

/// Article page state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleState {
    /// Current session
    pub session: Session,
    /// Which article
    pub slug: Slug,
    /// Errors from comment or delete requests, until dismissed
    pub errors: Vec<String>,
    /// The new-comment box
    pub comment_text: CommentText,
    /// The article
    pub article: Status<Article>,
    /// Its comments, newest first
    pub comments: Status<Vec<Comment>>,
}

impl ArticleState {
    /// The session this page holds
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }
}

/// Article page actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleAction {
    /// Error messages were dismissed
    ClickedDismissErrors,
    /// Delete button
    ClickedDeleteArticle,
    /// Post Comment button
    ClickedPostComment,
    /// The comment box was edited
    EnteredCommentText(String),
    /// Article reply
    CompletedLoadArticle(Slug, Result<Article, ApiError>),
    /// Comments reply
    CompletedLoadComments(Slug, Result<Vec<Comment>, ApiError>),
    /// Post comment reply
    CompletedPostComment(Slug, Result<Comment, ApiError>),
    /// Delete reply
    CompletedDeleteArticle(Slug, Result<(), ApiError>),
    /// The viewer signed in or out
    GotSession(Session),
    /// Loading is taking a while
    PassedSlowLoadThreshold,
}

impl ArticleAction {
    /// The article an API reply belongs to
    const fn requested_for(&self) -> Option<&Slug> {
        match self {
            Self::CompletedLoadArticle(slug, _)
            | Self::CompletedLoadComments(slug, _)
            | Self::CompletedPostComment(slug, _)
            | Self::CompletedDeleteArticle(slug, _) => Some(slug),
            _ => None,
        }
    }
}

/// Start a visit to the article at `slug`
#[must_use]
pub fn init(
    session: Session,
    slug: Slug,
    env: &AppEnvironment,
) -> (ArticleState, Effects<ArticleAction>) {
    let cred = session.cred().cloned();
    let (article_api, comments_api) = (Arc::clone(&env.api), Arc::clone(&env.api));
    let (article_cred, article_slug) = (cred.clone(), slug.clone());
    let comments_slug = slug.clone();

    let effects = smallvec![
        async_effect! {
            let result = article_api.article(article_cred, article_slug.clone()).await;
            Some(ArticleAction::CompletedLoadArticle(article_slug, result))
        },
        async_effect! {
            let result = comments_api.comments(cred, comments_slug.clone()).await;
            Some(ArticleAction::CompletedLoadComments(comments_slug, result))
        },
        slow_threshold(env, ArticleAction::PassedSlowLoadThreshold),
    ];

    let state = ArticleState {
        session,
        slug,
        errors: Vec::new(),
        comment_text: CommentText::Editing(String::new()),
        article: Status::Loading,
        comments: Status::Loading,
    };
    (state, effects)
}

/// Article page reducer
#[derive(Debug, Clone, Copy, Default)]
pub struct ArticleReducer;

impl Reducer for ArticleReducer {
    type State = ArticleState;
    type Action = ArticleAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut ArticleState,
        action: ArticleAction,
        env: &AppEnvironment,
    ) -> Effects<ArticleAction> {
        if let Some(requested) = action.requested_for().filter(|r| **r != state.slug) {
            tracing::debug!(
                requested = %requested,
                showing = %state.slug,
                "Discarding reply for another article"
            );
            return smallvec![Effect::None];
        }

        match action {
            ArticleAction::ClickedDismissErrors => {
                state.errors.clear();
                smallvec![Effect::None]
            },
            ArticleAction::ClickedDeleteArticle => {
                let Some(cred) = state.session.cred().cloned() else {
                    return smallvec![Effect::None];
                };
                let api = Arc::clone(&env.api);
                let slug = state.slug.clone();
                smallvec![async_effect! {
                    let result = api.delete_article(cred, slug.clone()).await;
                    Some(ArticleAction::CompletedDeleteArticle(slug, result))
                }]
            },
            ArticleAction::ClickedPostComment => {
                let CommentText::Editing(text) = &state.comment_text else {
                    return smallvec![Effect::None];
                };
                let text = text.clone();
                let body = text.trim().to_string();
                let Some(cred) = state.session.cred().cloned() else {
                    return smallvec![Effect::None];
                };
                if body.is_empty() {
                    return smallvec![Effect::None];
                }

                state.comment_text = CommentText::Sending(text);
                let api = Arc::clone(&env.api);
                let slug = state.slug.clone();
                smallvec![async_effect! {
                    let result = api.post_comment(cred, slug.clone(), body).await;
                    Some(ArticleAction::CompletedPostComment(slug, result))
                }]
            },
            ArticleAction::EnteredCommentText(text) => {
                if matches!(state.comment_text, CommentText::Editing(_)) {
                    state.comment_text = CommentText::Editing(text);
                }
                smallvec![Effect::None]
            },
            ArticleAction::CompletedLoadArticle(_, result) => {
                state.article.complete("article", result);
                smallvec![Effect::None]
            },
            ArticleAction::CompletedLoadComments(_, result) => {
                state.comments.complete("comments", result);
                smallvec![Effect::None]
            },
            ArticleAction::CompletedPostComment(_, Ok(comment)) => {
                state.comment_text = CommentText::Editing(String::new());
                if let Some(comments) = state.comments.loaded_mut() {
                    comments.insert(0, comment);
                }
                smallvec![Effect::None]
            },
            ArticleAction::CompletedPostComment(_, Err(error)) => {
                if let CommentText::Sending(text) = &state.comment_text {
                    state.comment_text = CommentText::Editing(text.clone());
                }
                state.errors.extend(error.messages());
                smallvec![Effect::None]
            },
            ArticleAction::CompletedDeleteArticle(_, Ok(())) => {
                tracing::info!(slug = %state.slug, "Deleted article");
                smallvec![route::replace_url(state.session.nav_key(), &Route::Home)]
            },
            ArticleAction::CompletedDeleteArticle(_, Err(error)) => {
                state.errors.extend(error.messages());
                smallvec![Effect::None]
            },
            ArticleAction::GotSession(session) => {
                state.session = session;
                smallvec![Effect::None]
            },
            ArticleAction::PassedSlowLoadThreshold => {
                state.article.passed_slow_threshold();
                state.comments.passed_slow_threshold();
                smallvec![Effect::None]
            },
        }
    }

    fn subscriptions(
        &self,
        state: &ArticleState,
        env: &AppEnvironment,
    ) -> Subscription<ArticleAction> {
        Session::changes(
            ArticleAction::GotSession,
            state.session.nav_key(),
            &env.credentials,
        )
    }
}

fn view_comment(comment: &Comment) -> Node {
    Node::element("div")
        .class("card")
        .child(
            Node::element("div")
                .class("card-block")
                .child(Node::element("p").class("card-text").child(Node::text(&comment.body))),
        )
        .child(
            Node::element("div")
                .class("card-footer")
                .child(Node::link(
                    Route::Profile(comment.author.username.clone()).href(),
                    comment.author.username.as_str(),
                ))
                .child(
                    Node::element("span")
                        .class("date-posted")
                        .child(Node::text(comment.created_at.format("%B %e, %Y").to_string())),
                ),
        )
}

fn comment_form(state: &ArticleState) -> Node {
    if state.session.viewer().is_none() {
        return Node::element("p")
            .child(Node::link(Route::Login.href(), "Sign in"))
            .child(Node::text(" or "))
            .child(Node::link(Route::Register.href(), "sign up"))
            .child(Node::text(" to add comments on this article."));
    }

    let (text, button) = match &state.comment_text {
        CommentText::Editing(text) => (text, Node::element("button")),
        CommentText::Sending(text) => (text, Node::element("button").attr("disabled", "true")),
    };
    Node::element("form")
        .class("card comment-form")
        .child(
            Node::element("textarea")
                .class("form-control")
                .attr("placeholder", "Write a comment...")
                .child(Node::text(text)),
        )
        .child(
            button
                .class("btn btn-sm btn-primary")
                .child(Node::text("Post Comment")),
        )
}

fn article_actions(state: &ArticleState, article: &Article) -> Node {
    let is_author = state
        .session
        .viewer()
        .is_some_and(|viewer| viewer.username() == &article.author.username);
    if !is_author {
        return Node::text("");
    }
    Node::element("span")
        .child(
            Node::link(Route::EditArticle(article.slug.clone()).href(), "Edit Article")
                .class("btn btn-outline-secondary btn-sm"),
        )
        .child(
            Node::element("button")
                .class("btn btn-outline-danger btn-sm")
                .child(Node::text("Delete Article")),
        )
}

/// Render the article page
#[must_use]
pub fn view(state: &ArticleState) -> Document {
    let title = state
        .article
        .loaded()
        .map_or_else(|| "Article".to_string(), |article| article.title.clone());

    let errors = Node::element("div").class("error-messages").children(
        state
            .errors
            .iter()
            .map(|error| Node::element("p").child(Node::text(error))),
    );

    let article = state.article.view("article", |article| {
        Node::element("div")
            .child(
                Node::element("div").class("banner").child(
                    Node::element("div")
                        .class("container")
                        .child(Node::element("h1").child(Node::text(&article.title)))
                        .child(Node::link(
                            Route::Profile(article.author.username.clone()).href(),
                            article.author.username.as_str(),
                        ))
                        .child(article_actions(state, article)),
                ),
            )
            .child(
                Node::element("div")
                    .class("article-content")
                    .child(Node::element("p").child(Node::text(&article.body)))
                    .child(Node::element("ul").class("tag-list").children(
                        article.tag_list.iter().map(|tag| {
                            Node::element("li")
                                .class("tag-default tag-pill tag-outline")
                                .child(Node::text(tag))
                        }),
                    )),
            )
    });

    let comments = state.comments.view("comments", |comments| {
        Node::element("div").children(comments.iter().map(view_comment))
    });

    Document::new(
        title,
        vec![
            Node::element("div")
                .class("article-page")
                .child(errors)
                .child(article)
                .child(
                    Node::element("div")
                        .class("row")
                        .child(comment_form(state))
                        .child(comments),
                ),
        ],
    )
}
