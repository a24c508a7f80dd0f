//! REST client for the user-management API.
//!
//! Four endpoints, one entity. Responses for update and delete are
//! discarded; non-success statuses count as failures. Nothing here
//! retries, caches, or times out.

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::{Context, Result, simple_error};

/// A user as the server returns it. The id is server-assigned and
/// immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Request body shared by create and update. The id is never part of
/// the body; for updates it travels in the URL path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
}

/// Thin wrapper over a shared [`reqwest::Client`] bound to one API base.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    /// Build a client for the given API base URL.
    pub fn new(base: Url) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .with_ctx(|| "build http client".to_string())?;
        Ok(Self { http, base })
    }

    /// The base URL this client talks to.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Join path segments onto the base URL.
    fn endpoint<I>(&self, segments: I) -> Result<Url>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| simple_error("api base URL cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET `/users`: the full list.
    pub async fn list_users(&self) -> Result<Vec<User>> {
        let url = self.endpoint(["users"])?;
        debug!("GET {url}");
        let resp = self
            .http
            .get(url.clone())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .with_ctx(|| format!("GET {url}"))?;
        let users = resp
            .json::<Vec<User>>()
            .await
            .with_ctx(|| "decode user list".to_string())?;
        Ok(users)
    }

    /// POST `/users`: create a user, returning the server's copy with
    /// its assigned id.
    pub async fn create_user(&self, draft: &UserDraft) -> Result<User> {
        let url = self.endpoint(["users"])?;
        debug!("POST {url}");
        let resp = self
            .http
            .post(url.clone())
            .json(draft)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .with_ctx(|| format!("POST {url}"))?;
        let user = resp
            .json::<User>()
            .await
            .with_ctx(|| "decode created user".to_string())?;
        Ok(user)
    }

    /// PUT `/users/{id}`. The id goes into the path exactly as given;
    /// the response body is ignored.
    pub async fn update_user(&self, id: &str, draft: &UserDraft) -> Result<()> {
        let url = self.endpoint(["users", id])?;
        debug!("PUT {url}");
        self.http
            .put(url.clone())
            .json(draft)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .with_ctx(|| format!("PUT {url}"))?;
        Ok(())
    }

    /// DELETE `/users/{id}`. The response body is ignored.
    pub async fn delete_user(&self, id: i64) -> Result<()> {
        let id = id.to_string();
        let url = self.endpoint(["users", id.as_str()])?;
        debug!("DELETE {url}");
        self.http
            .delete(url.clone())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .with_ctx(|| format!("DELETE {url}"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(Url::parse(&server.base_url()).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn list_users_decodes_response() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/users");
            then.status(200)
                .json_body(json!([{"id": 1, "name": "A", "email": "a@x.com"}]));
        });

        let users = client_for(&server).list_users().await.unwrap();

        mock.assert();
        assert_eq!(
            users,
            vec![User {
                id: 1,
                name: "A".to_string(),
                email: "a@x.com".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn create_user_posts_draft_without_id() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/users")
                .json_body(json!({"name": "B", "email": "b@x.com"}));
            then.status(201)
                .json_body(json!({"id": 2, "name": "B", "email": "b@x.com"}));
        });

        let draft = UserDraft {
            name: "B".to_string(),
            email: "b@x.com".to_string(),
        };
        let user = client_for(&server).create_user(&draft).await.unwrap();

        mock.assert();
        assert_eq!(user.id, 2);
        assert_eq!(user.name, "B");
    }

    #[tokio::test]
    async fn update_user_puts_raw_id_in_path() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(PUT)
                .path("/users/7")
                .json_body(json!({"name": "C", "email": "c@x.com"}));
            then.status(200);
        });

        let draft = UserDraft {
            name: "C".to_string(),
            email: "c@x.com".to_string(),
        };
        client_for(&server).update_user("7", &draft).await.unwrap();

        mock.assert();
    }

    #[tokio::test]
    async fn delete_user_hits_id_path() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(DELETE).path("/users/3");
            then.status(204);
        });

        client_for(&server).delete_user(3).await.unwrap();

        mock.assert();
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start();
        let _mock = server.mock(|when, then| {
            when.method(GET).path("/users");
            then.status(500);
        });

        let err = client_for(&server).list_users().await.unwrap_err();
        assert!(err.to_string().contains("GET"));
    }

    #[tokio::test]
    async fn cannot_be_a_base_url_is_rejected() {
        let client = ApiClient::new(Url::parse("mailto:root@example.org").unwrap()).unwrap();
        let err = client.list_users().await.unwrap_err();
        assert!(err.to_string().contains("cannot be a base"));
    }
}
