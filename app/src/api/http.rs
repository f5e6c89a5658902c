//! RealWorld API client over `reqwest`.

use super::{Account, AccountUpdate, Api, ApiFuture, FeedQuery};
use crate::article::{Article, ArticleDraft, Author, Comment, Slug};
use crate::error::ApiError;
use crate::viewer::{Cred, Username, Viewer};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

/// Page size for article lists
const FEED_LIMIT: &str = "10";

/// RealWorld API client
#[derive(Clone, Debug)]
pub struct HttpApi {
    client: Client,
    base: Url,
}

impl HttpApi {
    /// Create a client for the API rooted at `base`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the HTTP client can't be built.
    pub fn new(base: Url, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self { client, base })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(
        &self,
        method: Method,
        segments: &[&str],
        cred: Option<&Cred>,
    ) -> Result<RequestBuilder, ApiError> {
        let request = self.client.request(method, self.endpoint(segments)?);
        Ok(match cred {
            Some(cred) => request.header(AUTHORIZATION, format!("Token {}", cred.token())),
            None => request,
        })
    }

    async fn execute(request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound),
            StatusCode::UNPROCESSABLE_ENTITY => {
                let body = response.text().await.unwrap_or_default();
                Err(ApiError::Validation(validation_messages(&body)))
            },
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(ApiError::Status {
                    status: status.as_u16(),
                    message: body,
                })
            },
        }
    }

    async fn fetch<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
        Self::execute(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Flatten a 422 body (`{"errors": {"email": ["is invalid"]}}`) into messages
fn validation_messages(body: &str) -> Vec<String> {
    #[derive(Deserialize)]
    struct Errors {
        errors: BTreeMap<String, Vec<String>>,
    }

    match serde_json::from_str::<Errors>(body) {
        Ok(parsed) => parsed
            .errors
            .into_iter()
            .flat_map(|(field, problems)| {
                problems
                    .into_iter()
                    .map(move |problem| format!("{field} {problem}"))
            })
            .collect(),
        Err(_) => vec![body.to_string()],
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Deserialize)]
struct UserEnvelope {
    user: UserJson,
}

#[derive(Deserialize)]
struct UserJson {
    email: String,
    token: String,
    username: Username,
    #[serde(default)]
    bio: Option<String>,
    #[serde(default)]
    image: Option<String>,
}

impl UserJson {
    fn into_viewer(self) -> Viewer {
        Viewer::new(Cred::new(self.username, self.token), self.image)
    }

    fn into_account(self) -> Account {
        Account {
            email: self.email,
            username: self.username.to_string(),
            bio: self.bio,
            image: self.image,
        }
    }
}

#[derive(Serialize)]
struct Wrapped<T> {
    #[serde(flatten)]
    inner: BTreeMap<&'static str, T>,
}

fn wrap<T>(key: &'static str, value: T) -> Wrapped<T> {
    Wrapped {
        inner: BTreeMap::from([(key, value)]),
    }
}

#[derive(Serialize)]
struct Credentials {
    email: String,
    password: String,
}

#[derive(Serialize)]
struct NewUser {
    username: String,
    email: String,
    password: String,
}

#[derive(Serialize)]
struct UserChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<String>,
}

#[derive(Serialize)]
struct NewComment {
    body: String,
}

#[derive(Deserialize)]
struct ArticlesEnvelope {
    articles: Vec<Article>,
}

#[derive(Deserialize)]
struct ArticleEnvelope {
    article: Article,
}

#[derive(Deserialize)]
struct TagsEnvelope {
    tags: Vec<String>,
}

#[derive(Deserialize)]
struct ProfileEnvelope {
    profile: Author,
}

#[derive(Deserialize)]
struct CommentsEnvelope {
    comments: Vec<Comment>,
}

#[derive(Deserialize)]
struct CommentEnvelope {
    comment: Comment,
}

impl Api for HttpApi {
    fn login(&self, email: String, password: String) -> ApiFuture<'_, Viewer> {
        Box::pin(async move {
            let request = self
                .request(Method::POST, &["users", "login"], None)?
                .json(&wrap("user", Credentials { email, password }));
            let envelope: UserEnvelope = Self::fetch(request).await?;
            Ok(envelope.user.into_viewer())
        })
    }

    fn register(
        &self,
        username: String,
        email: String,
        password: String,
    ) -> ApiFuture<'_, Viewer> {
        Box::pin(async move {
            let request = self.request(Method::POST, &["users"], None)?.json(&wrap(
                "user",
                NewUser {
                    username,
                    email,
                    password,
                },
            ));
            let envelope: UserEnvelope = Self::fetch(request).await?;
            Ok(envelope.user.into_viewer())
        })
    }

    fn current_user(&self, cred: Cred) -> ApiFuture<'_, Account> {
        Box::pin(async move {
            let request = self.request(Method::GET, &["user"], Some(&cred))?;
            let envelope: UserEnvelope = Self::fetch(request).await?;
            Ok(envelope.user.into_account())
        })
    }

    fn update_user(&self, cred: Cred, update: AccountUpdate) -> ApiFuture<'_, Viewer> {
        Box::pin(async move {
            let changes = UserChanges {
                email: update.email,
                username: update.username,
                bio: update.bio,
                image: update.image,
                password: update.password,
            };
            let request = self
                .request(Method::PUT, &["user"], Some(&cred))?
                .json(&wrap("user", changes));
            let envelope: UserEnvelope = Self::fetch(request).await?;
            Ok(envelope.user.into_viewer())
        })
    }

    fn feed(&self, cred: Option<Cred>, query: FeedQuery) -> ApiFuture<'_, Vec<Article>> {
        Box::pin(async move {
            let segments: &[&str] = match query {
                FeedQuery::Following => &["articles", "feed"],
                _ => &["articles"],
            };
            let mut request = self
                .request(Method::GET, segments, cred.as_ref())?
                .query(&[("limit", FEED_LIMIT)]);
            request = match &query {
                FeedQuery::Following | FeedQuery::Global => request,
                FeedQuery::Tag(tag) => request.query(&[("tag", tag.as_str())]),
                FeedQuery::Author(username) => request.query(&[("author", username.as_str())]),
                FeedQuery::FavoritedBy(username) => {
                    request.query(&[("favorited", username.as_str())])
                },
            };
            let envelope: ArticlesEnvelope = Self::fetch(request).await?;
            Ok(envelope.articles)
        })
    }

    fn tags(&self) -> ApiFuture<'_, Vec<String>> {
        Box::pin(async move {
            let request = self.request(Method::GET, &["tags"], None)?;
            let envelope: TagsEnvelope = Self::fetch(request).await?;
            Ok(envelope.tags)
        })
    }

    fn profile(&self, cred: Option<Cred>, username: Username) -> ApiFuture<'_, Author> {
        Box::pin(async move {
            let request =
                self.request(Method::GET, &["profiles", username.as_str()], cred.as_ref())?;
            let envelope: ProfileEnvelope = Self::fetch(request).await?;
            Ok(envelope.profile)
        })
    }

    fn follow(&self, cred: Cred, username: Username) -> ApiFuture<'_, Author> {
        Box::pin(async move {
            let request = self.request(
                Method::POST,
                &["profiles", username.as_str(), "follow"],
                Some(&cred),
            )?;
            let envelope: ProfileEnvelope = Self::fetch(request).await?;
            Ok(envelope.profile)
        })
    }

    fn unfollow(&self, cred: Cred, username: Username) -> ApiFuture<'_, Author> {
        Box::pin(async move {
            let request = self.request(
                Method::DELETE,
                &["profiles", username.as_str(), "follow"],
                Some(&cred),
            )?;
            let envelope: ProfileEnvelope = Self::fetch(request).await?;
            Ok(envelope.profile)
        })
    }

    fn article(&self, cred: Option<Cred>, slug: Slug) -> ApiFuture<'_, Article> {
        Box::pin(async move {
            let request = self.request(Method::GET, &["articles", slug.as_str()], cred.as_ref())?;
            let envelope: ArticleEnvelope = Self::fetch(request).await?;
            Ok(envelope.article)
        })
    }

    fn comments(&self, cred: Option<Cred>, slug: Slug) -> ApiFuture<'_, Vec<Comment>> {
        Box::pin(async move {
            let request = self.request(
                Method::GET,
                &["articles", slug.as_str(), "comments"],
                cred.as_ref(),
            )?;
            let envelope: CommentsEnvelope = Self::fetch(request).await?;
            Ok(envelope.comments)
        })
    }

    fn post_comment(&self, cred: Cred, slug: Slug, body: String) -> ApiFuture<'_, Comment> {
        Box::pin(async move {
            let request = self
                .request(
                    Method::POST,
                    &["articles", slug.as_str(), "comments"],
                    Some(&cred),
                )?
                .json(&wrap("comment", NewComment { body }));
            let envelope: CommentEnvelope = Self::fetch(request).await?;
            Ok(envelope.comment)
        })
    }

    fn delete_article(&self, cred: Cred, slug: Slug) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let request =
                self.request(Method::DELETE, &["articles", slug.as_str()], Some(&cred))?;
            Self::execute(request).await?;
            Ok(())
        })
    }

    fn create_article(&self, cred: Cred, draft: ArticleDraft) -> ApiFuture<'_, Article> {
        Box::pin(async move {
            let request = self
                .request(Method::POST, &["articles"], Some(&cred))?
                .json(&wrap("article", draft));
            let envelope: ArticleEnvelope = Self::fetch(request).await?;
            Ok(envelope.article)
        })
    }

    fn update_article(
        &self,
        cred: Cred,
        slug: Slug,
        draft: ArticleDraft,
    ) -> ApiFuture<'_, Article> {
        Box::pin(async move {
            let request = self
                .request(Method::PUT, &["articles", slug.as_str()], Some(&cred))?
                .json(&wrap("article", draft));
            let envelope: ArticleEnvelope = Self::fetch(request).await?;
            Ok(envelope.article)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> HttpApi {
        HttpApi::new(
            Url::parse("https://api.realworld.io/api/").unwrap(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_endpoint_appends_encoded_segments() {
        let url = api().endpoint(&["profiles", "jake doe", "follow"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.realworld.io/api/profiles/jake%20doe/follow"
        );
    }

    #[test]
    fn test_validation_messages_are_flattened() {
        let body = r#"{"errors":{"email":["has already been taken"],"username":["is too short","is invalid"]}}"#;
        assert_eq!(
            validation_messages(body),
            vec![
                "email has already been taken".to_string(),
                "username is too short".to_string(),
                "username is invalid".to_string(),
            ]
        );
    }

    #[test]
    fn test_unparseable_validation_body_is_kept() {
        assert_eq!(validation_messages("nope"), vec!["nope".to_string()]);
    }

    #[test]
    fn test_request_body_is_wrapped() {
        let body = serde_json::to_value(wrap(
            "user",
            Credentials {
                email: "a@b.c".to_string(),
                password: "pw".to_string(),
            },
        ))
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"user": {"email": "a@b.c", "password": "pw"}})
        );
    }

    #[test]
    fn test_user_json_becomes_viewer() {
        let envelope: UserEnvelope = serde_json::from_str(
            r#"{"user":{"email":"jake@jake.jake","token":"jwt","username":"jake","bio":null,"image":null}}"#,
        )
        .unwrap();
        let viewer = envelope.user.into_viewer();
        assert_eq!(viewer.username().as_str(), "jake");
        assert_eq!(viewer.cred().token(), "jwt");
    }
}
