use std::fmt::Debug;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client, ClientBuilder};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;
use tracing::{debug, instrument};

use crate::utils::time::{to_graphql_datetime, year_bounds};

use super::{
    entities::{
        ContributionWeek, GraphqlRequest, GraphqlResponse, RepositoryLanguages, UserData,
        ViewerData,
    },
    GithubSource,
};

pub const DEFAULT_ENDPOINT: &str = "https://api.github.com/graphql";

const REPOSITORY_LANGUAGES_QUERY: &str = r#"query {
  viewer {
    repositories(first: 100, ownerAffiliations: OWNER, isFork: false, orderBy: {field: PUSHED_AT, direction: DESC}) {
      nodes {
        name
        languages(first: 10, orderBy: {field: SIZE, direction: DESC}) {
          edges {
            size
            node {
              name
              color
            }
          }
        }
      }
    }
  }
}"#;

const CONTRIBUTION_CALENDAR_QUERY: &str = r#"query ($login: String!, $from: DateTime!, $to: DateTime!) {
  user(login: $login) {
    contributionsCollection(from: $from, to: $to) {
      contributionCalendar {
        weeks {
          contributionDays {
            date
            contributionCount
          }
        }
      }
    }
  }
}"#;

/// GitHub GraphQL client. One request per call, no retries.
pub struct GraphqlClient {
    http: Client,
    endpoint: String,
    token: String,
}

impl Debug for GraphqlClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphqlClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl GraphqlClient {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        Self::with_builder(endpoint, token, Client::builder())
    }

    fn with_builder(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        builder: ClientBuilder,
    ) -> Result<Self> {
        // GitHub rejects requests without a user agent.
        let http = builder
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            token: token.into(),
        })
    }

    #[instrument(skip(self, query, variables))]
    async fn query<V: Serialize, T: DeserializeOwned>(
        &self,
        query: &str,
        variables: V,
    ) -> Result<T> {
        debug!("Sending GraphQL request to {}", self.endpoint);
        let response = self
            .http
            .post(&self.endpoint)
            .header(header::AUTHORIZATION, format!("token {}", self.token))
            .json(&GraphqlRequest { query, variables })
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", self.endpoint))?;

        let status = response.status();
        let body = response.text().await?;
        debug!("Received {status} with {} bytes", body.len());

        if !status.is_success() {
            bail!("GitHub responded with {status}: {}", body.trim());
        }

        decode_response(&body)
    }
}

/// Unwraps the GraphQL envelope. Any reported error fails the whole request, even when partial
/// data is present.
pub(crate) fn decode_response<T: DeserializeOwned>(body: &str) -> Result<T> {
    let response: GraphqlResponse<T> =
        serde_json::from_str(body).context("Malformed GraphQL response")?;

    if !response.errors.is_empty() {
        let messages = response
            .errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        bail!("GraphQL query failed: {messages}");
    }

    response
        .data
        .ok_or_else(|| anyhow!("GraphQL response contains no data"))
}

#[async_trait]
impl GithubSource for GraphqlClient {
    async fn repository_languages(&self) -> Result<Vec<RepositoryLanguages>> {
        let data: ViewerData = self.query(REPOSITORY_LANGUAGES_QUERY, json!({})).await?;
        Ok(data.viewer.repositories.nodes)
    }

    async fn contribution_weeks(&self, login: &str, year: i32) -> Result<Vec<ContributionWeek>> {
        let (from, to) = year_bounds(year)?;
        let data: UserData = self
            .query(
                CONTRIBUTION_CALENDAR_QUERY,
                json!({
                    "login": login,
                    "from": to_graphql_datetime(from),
                    "to": to_graphql_datetime(to),
                }),
            )
            .await?;

        let user = data
            .user
            .ok_or_else(|| anyhow!("GitHub user {login} was not found"))?;
        Ok(user.contributions_collection.contribution_calendar.weeks)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use reqwest::Client;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
        task::JoinHandle,
    };

    use super::{decode_response, GraphqlClient, DEFAULT_ENDPOINT};
    use crate::github::{
        entities::{UserData, ViewerData},
        GithubSource,
    };

    /// Talks to the local test server directly even when a proxy is configured.
    fn local_client(endpoint: String) -> Result<GraphqlClient> {
        GraphqlClient::with_builder(endpoint, "ghp_x", Client::builder().no_proxy())
    }

    /// Answers one request on a local port with a canned response and hands back the raw
    /// request it received.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> Result<(String, JoinHandle<Result<String>>)> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let endpoint = format!("http://{}/graphql", listener.local_addr()?);

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await?;
            let mut request = Vec::new();
            let mut buffer = [0u8; 4096];
            while !request_complete(&request) {
                let read = stream.read(&mut buffer).await?;
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&buffer[..read]);
            }

            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await?;
            stream.shutdown().await?;
            Ok(String::from_utf8_lossy(&request).into_owned())
        });

        Ok((endpoint, handle))
    }

    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some((head, body)) = text.split_once("\r\n\r\n") else {
            return false;
        };
        let length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        body.len() >= length
    }

    #[tokio::test]
    async fn http_error_status_carries_server_body() -> Result<()> {
        let (endpoint, server) = serve_once("401 Unauthorized", "Bad credentials").await?;
        let client = local_client(endpoint)?;

        let error = client.repository_languages().await.unwrap_err();

        let message = error.to_string();
        assert!(message.contains("401"), "{message}");
        assert!(message.contains("Bad credentials"), "{message}");
        server.await??;
        Ok(())
    }

    #[tokio::test]
    async fn request_carries_token_and_user_agent() -> Result<()> {
        let (endpoint, server) = serve_once(
            "200 OK",
            r#"{ "data": { "viewer": { "repositories": { "nodes": [] } } } }"#,
        )
        .await?;
        let client = local_client(endpoint)?;

        let repositories = client.repository_languages().await?;
        assert!(repositories.is_empty());

        let request = server.await??.to_lowercase();
        assert!(request.starts_with("post /graphql "), "{request}");
        assert!(request.contains("authorization: token ghp_x"), "{request}");
        assert!(
            request.contains(concat!("user-agent: ", env!("CARGO_PKG_NAME"), "/")),
            "{request}"
        );
        assert!(request.contains(r#""query":"#), "{request}");
        Ok(())
    }

    #[tokio::test]
    async fn unknown_user_is_reported_by_login() -> Result<()> {
        let (endpoint, server) = serve_once("200 OK", r#"{ "data": { "user": null } }"#).await?;
        let client = local_client(endpoint)?;

        let error = client.contribution_weeks("ghost", 2025).await.unwrap_err();

        assert_eq!(error.to_string(), "GitHub user ghost was not found");
        let request = server.await??;
        assert!(request.contains(r#""login":"ghost""#), "{request}");
        assert!(request.contains("2025-01-01T00:00:00Z"), "{request}");
        assert!(request.contains("2025-12-31T23:59:59Z"), "{request}");
        Ok(())
    }

    #[tokio::test]
    async fn calendar_response_returns_weeks() -> Result<()> {
        let (endpoint, server) = serve_once(
            "200 OK",
            r#"{ "data": { "user": { "contributionsCollection": { "contributionCalendar": {
                "weeks": [
                    { "contributionDays": [ { "date": "2025-01-01", "contributionCount": 4 } ] },
                    { "contributionDays": [
                        { "date": "2025-01-05", "contributionCount": 0 },
                        { "date": "2025-01-06", "contributionCount": 7 }
                    ] }
                ]
            } } } } }"#,
        )
        .await?;
        let client = local_client(endpoint)?;

        let weeks = client.contribution_weeks("octocat", 2025).await?;

        assert_eq!(weeks.len(), 2);
        assert_eq!(weeks[0].contribution_days[0].contribution_count, 4);
        assert_eq!(weeks[1].contribution_days.len(), 2);
        server.await??;
        Ok(())
    }

    #[test]
    fn decode_surfaces_server_messages() {
        let error = decode_response::<ViewerData>(
            r#"{ "errors": [ { "message": "first" }, { "message": "second" } ] }"#,
        )
        .unwrap_err();

        assert_eq!(error.to_string(), "GraphQL query failed: first; second");
    }

    #[test]
    fn decode_rejects_missing_data() {
        let error = decode_response::<ViewerData>(r#"{ "data": null }"#).unwrap_err();
        assert!(error.to_string().contains("no data"));
    }

    #[test]
    fn decode_rejects_non_json_body() {
        assert!(decode_response::<ViewerData>("<html>rate limited</html>").is_err());
    }

    #[test]
    fn decode_keeps_null_user_for_caller() -> Result<()> {
        let data = decode_response::<UserData>(r#"{ "data": { "user": null } }"#)?;
        assert!(data.user.is_none());
        Ok(())
    }

    #[test]
    fn debug_output_hides_token() -> Result<()> {
        let client = GraphqlClient::new(DEFAULT_ENDPOINT, "ghp_secret")?;
        let printed = format!("{client:?}");
        assert!(!printed.contains("ghp_secret"));
        assert!(printed.contains(DEFAULT_ENDPOINT));
        Ok(())
    }
}
