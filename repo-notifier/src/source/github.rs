//! GitHub REST implementation of [`RepositorySource`].

use super::observation::RawRepository;
use super::{RepositoryObservation, RepositorySource, SourceError};
use async_trait::async_trait;
use octocrab::{Octocrab, Page};
use serde::Serialize;
use tracing::{debug, info, info_span, Instrument};

/// Results per page for repository listing.
const RESULTS_PER_PAGE: u8 = 100;

#[derive(Serialize)]
struct ListParams {
    per_page: u8,
}

/// Lists repositories through the GitHub REST API.
#[derive(Clone)]
pub struct GitHubSource {
    octocrab: Octocrab,
}

impl GitHubSource {
    /// Wraps an existing client.
    pub fn new(octocrab: Octocrab) -> Self {
        Self { octocrab }
    }

    /// Builds a client, authenticated if a token is given.
    ///
    /// `api_url` replaces `https://api.github.com` (GitHub Enterprise, tests).
    ///
    /// # Errors
    ///
    /// Returns [`octocrab::Error`] if the client can't be constructed.
    pub fn from_token(
        token: Option<String>,
        api_url: Option<&str>,
    ) -> Result<Self, octocrab::Error> {
        let mut builder = Octocrab::builder();
        if let Some(api_url) = api_url {
            builder = builder.base_uri(api_url)?;
        }
        let octocrab = match token {
            Some(token) => builder.personal_token(token).build()?,
            None => builder.build()?,
        };
        Ok(Self::new(octocrab))
    }
}

#[async_trait]
impl RepositorySource for GitHubSource {
    async fn fetch_all(&self, account: &str) -> Result<Vec<RepositoryObservation>, SourceError> {
        let span = info_span!("fetch", account = %account);

        async {
            let route = format!("/users/{account}/repos");
            let params = ListParams {
                per_page: RESULTS_PER_PAGE,
            };

            let first: Page<RawRepository> = self.octocrab.get(route, Some(&params)).await?;
            debug!(page = 1, count = first.items.len(), "Fetched repository page");

            let mut next = first.next;
            let mut repositories: Vec<RepositoryObservation> =
                first.items.into_iter().map(RepositoryObservation::from).collect();

            let mut page_number = 1;
            while let Some(page) = self.octocrab.get_page::<RawRepository>(&next).await? {
                page_number += 1;
                debug!(
                    page = page_number,
                    count = page.items.len(),
                    "Fetched repository page"
                );
                repositories.extend(page.items.into_iter().map(RepositoryObservation::from));
                next = page.next;
            }

            info!(
                count = repositories.len(),
                pages = page_number,
                "Fetched repositories"
            );
            Ok(repositories)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn repo_json(id: u64, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "description": null,
            "html_url": format!("https://github.com/octocat/{name}"),
            "stargazers_count": 1,
            "forks_count": 0,
            "watchers_count": 1,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-02T00:00:00Z",
            "language": "Rust",
            "license": null,
            "visibility": "public"
        })
    }

    fn full_page(page: u64) -> Vec<serde_json::Value> {
        let size = u64::from(RESULTS_PER_PAGE);
        (0..size)
            .map(|i| {
                let id = (page - 1) * size + i + 1;
                repo_json(id, &format!("repo-{id}"))
            })
            .collect()
    }

    /// Serves `body` as `page`, linking to `page + 1` unless it is the last.
    async fn mount_page(
        server: &MockServer,
        page: u64,
        body: Vec<serde_json::Value>,
        last: bool,
    ) {
        let mut response = ResponseTemplate::new(200).set_body_json(json!(body));
        if !last {
            let next = format!(
                "<{}/users/octocat/repos?per_page=100&page={}>; rel=\"next\"",
                server.uri(),
                page + 1
            );
            response = response.insert_header("Link", next.as_str());
        }

        let mock = Mock::given(method("GET")).and(path("/users/octocat/repos"));
        let mock = if page == 1 {
            mock.and(query_param("per_page", "100"))
                .and(query_param_is_missing("page"))
        } else {
            mock.and(query_param("page", page.to_string().as_str()))
        };
        mock.respond_with(response)
            .expect(1)
            .mount(server)
            .await;
    }

    async fn source_for(server: &MockServer) -> GitHubSource {
        GitHubSource::from_token(None, Some(server.uri().as_str())).unwrap()
    }

    #[tokio::test]
    async fn fetches_single_page() {
        let server = MockServer::start().await;
        mount_page(&server, 1, vec![repo_json(1, "one"), repo_json(2, "two")], true).await;

        let repos = source_for(&server).await.fetch_all("octocat").await.unwrap();

        assert_eq!(repos.len(), 2);
        assert_eq!(repos[0].name, "one");
        assert_eq!(repos[1].name, "two");
    }

    #[tokio::test]
    async fn follows_next_links_without_a_page_limit() {
        let server = MockServer::start().await;
        for page in 1..=11 {
            mount_page(&server, page, full_page(page), false).await;
        }
        mount_page(&server, 12, vec![repo_json(5_000, "newest")], true).await;

        let repos = source_for(&server).await.fetch_all("octocat").await.unwrap();

        assert_eq!(repos.len(), 11 * usize::from(RESULTS_PER_PAGE) + 1);
        assert_eq!(repos.last().unwrap().name, "newest");
    }

    #[tokio::test]
    async fn empty_account_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat/repos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let repos = source_for(&server).await.fetch_all("octocat").await.unwrap();
        assert!(repos.is_empty());
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/ghost/repos"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": "Not Found",
                "documentation_url": "https://docs.github.com/rest"
            })))
            .mount(&server)
            .await;

        let result = source_for(&server).await.fetch_all("ghost").await;
        assert!(matches!(result, Err(SourceError::GitHubError(_))));
    }
}
