use super::{EMAIL, PASSWORD, TOKEN, article, author, comment, timestamp};
use crate::api::{Account, AccountUpdate, Api, ApiFuture, FeedQuery};
use crate::article::{Article, ArticleDraft, Author, Comment, Slug};
use crate::error::ApiError;
use crate::viewer::{Cred, Username, Viewer};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// An [`Api`] that answers from fixtures and records every call
///
/// Clones share the call log.
#[derive(Debug, Clone, Default)]
pub struct MockApi {
    latency: Duration,
    failure: Option<ApiError>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockApi {
    /// Answer every call from the fixtures, immediately
    #[must_use]
    pub fn with_fixtures() -> Self {
        Self::default()
    }

    /// Wait `latency` before every reply
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Fail every call with `error`
    #[must_use]
    pub fn failing_with(mut self, error: ApiError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Calls made so far, oldest first
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn reply<T: Send + 'static>(&self, call: String, value: Result<T, ApiError>) -> ApiFuture<'_, T> {
        tracing::debug!(%call, "Mock API call");
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);

        let latency = self.latency;
        let failure = self.failure.clone();
        Box::pin(async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            match failure {
                Some(error) => Err(error),
                None => value,
            }
        })
    }
}

fn slugify(title: &str) -> Result<Slug, ApiError> {
    let slug = title
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    Slug::parse(&slug).ok_or_else(|| ApiError::Validation(vec!["title is invalid".to_string()]))
}

fn published(cred: &Cred, slug: Slug, draft: ArticleDraft) -> Article {
    Article {
        slug,
        title: draft.title,
        description: draft.description,
        body: draft.body,
        tag_list: draft.tag_list,
        created_at: timestamp(),
        favorited: false,
        favorites_count: 0,
        author: author(cred.username().as_str()),
    }
}

fn following(username: &Username, following: bool) -> Author {
    Author {
        following,
        ..author(username.as_str())
    }
}

impl Api for MockApi {
    fn login(&self, email: String, password: String) -> ApiFuture<'_, Viewer> {
        let result = if email == EMAIL && password == PASSWORD {
            Ok(super::viewer())
        } else {
            Err(ApiError::Validation(vec![
                "email or password is invalid".to_string(),
            ]))
        };
        self.reply(format!("login {email}"), result)
    }

    fn register(&self, username: String, _email: String, _password: String) -> ApiFuture<'_, Viewer> {
        let result = Username::parse(&username)
            .map(|name| Viewer::new(Cred::new(name, TOKEN.to_string()), None))
            .ok_or_else(|| ApiError::Validation(vec!["username can't be blank".to_string()]));
        self.reply(format!("register {username}"), result)
    }

    fn current_user(&self, cred: Cred) -> ApiFuture<'_, Account> {
        let account = Account {
            email: EMAIL.to_string(),
            username: cred.username().to_string(),
            bio: Some("I write".to_string()),
            image: None,
        };
        self.reply(format!("current_user {}", cred.username()), Ok(account))
    }

    fn update_user(&self, cred: Cred, update: AccountUpdate) -> ApiFuture<'_, Viewer> {
        let username = update
            .username
            .as_deref()
            .and_then(Username::parse)
            .unwrap_or_else(|| cred.username().clone());
        let viewer = Viewer::new(Cred::new(username, cred.token().to_string()), update.image);
        self.reply(format!("update_user {}", cred.username()), Ok(viewer))
    }

    fn feed(&self, _cred: Option<Cred>, query: FeedQuery) -> ApiFuture<'_, Vec<Article>> {
        self.reply(format!("feed {query:?}"), Ok(vec![article()]))
    }

    fn tags(&self) -> ApiFuture<'_, Vec<String>> {
        self.reply("tags".to_string(), Ok(vec!["rust".to_string(), "elm".to_string()]))
    }

    fn profile(&self, _cred: Option<Cred>, username: Username) -> ApiFuture<'_, Author> {
        self.reply(format!("profile {username}"), Ok(following(&username, false)))
    }

    fn follow(&self, _cred: Cred, username: Username) -> ApiFuture<'_, Author> {
        self.reply(format!("follow {username}"), Ok(following(&username, true)))
    }

    fn unfollow(&self, _cred: Cred, username: Username) -> ApiFuture<'_, Author> {
        self.reply(format!("unfollow {username}"), Ok(following(&username, false)))
    }

    fn article(&self, _cred: Option<Cred>, slug: Slug) -> ApiFuture<'_, Article> {
        let fixture = article();
        let result = if slug == fixture.slug {
            Ok(fixture)
        } else {
            Err(ApiError::NotFound)
        };
        self.reply(format!("article {slug}"), result)
    }

    fn comments(&self, _cred: Option<Cred>, slug: Slug) -> ApiFuture<'_, Vec<Comment>> {
        self.reply(format!("comments {slug}"), Ok(vec![comment(1, "first")]))
    }

    fn post_comment(&self, cred: Cred, slug: Slug, body: String) -> ApiFuture<'_, Comment> {
        let posted = Comment {
            author: author(cred.username().as_str()),
            ..comment(2, &body)
        };
        self.reply(format!("post_comment {slug}"), Ok(posted))
    }

    fn delete_article(&self, _cred: Cred, slug: Slug) -> ApiFuture<'_, ()> {
        self.reply(format!("delete_article {slug}"), Ok(()))
    }

    fn create_article(&self, cred: Cred, draft: ArticleDraft) -> ApiFuture<'_, Article> {
        let call = format!("create_article {}", draft.title);
        let result = slugify(&draft.title).map(|slug| published(&cred, slug, draft));
        self.reply(call, result)
    }

    fn update_article(&self, cred: Cred, slug: Slug, draft: ArticleDraft) -> ApiFuture<'_, Article> {
        let call = format!("update_article {slug}");
        self.reply(call, Ok(published(&cred, slug, draft)))
    }
}
