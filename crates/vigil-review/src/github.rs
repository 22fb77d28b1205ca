use vigil_core::{GateError, GithubConfig};

/// GitHub client for posting the review comment to a pull request.
pub struct GitHubClient {
    http: reqwest::Client,
    token: String,
}

impl GitHubClient {
    /// Create a client from the configured token.
    pub fn new(config: &GithubConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            token: config.token.clone(),
        }
    }

    /// Post `body` as a new comment on the pull request.
    ///
    /// The comments endpoint answers 201 on creation; anything else is an
    /// error for the caller to log. Comment failures are deliberately
    /// non-fatal upstream: the computed status and exit code never depend on
    /// whether the notification landed.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Github`] on transport failures or any non-201
    /// response.
    pub async fn post_pr_comment(
        &self,
        repo: &str,
        pr_number: u64,
        body: &str,
    ) -> Result<(), GateError> {
        let url = format!("https://api.github.com/repos/{repo}/issues/{pr_number}/comments");

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", "application/vnd.github.v3+json")
            .header("User-Agent", "vigil")
            .json(&serde_json::json!({ "body": body }))
            .send()
            .await
            .map_err(|e| GateError::Github(format!("failed to post comment: {e}")))?;

        let status = response.status();
        if status != reqwest::StatusCode::CREATED {
            let body_text = response.text().await.unwrap_or_default();
            return Err(GateError::Github(format!(
                "GitHub API error {status}: {body_text}"
            )));
        }

        Ok(())
    }
}
