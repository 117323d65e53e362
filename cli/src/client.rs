use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Thin JSON client for the pantry HTTP API.
pub struct ApiClient {
    base_path: String,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
pub struct Welcome {
    pub message: String,
}

/// Any entity returned by the API; the CLI only needs its id.
#[derive(Debug, Deserialize)]
pub struct Created {
    pub id: String,
}

impl ApiClient {
    pub fn new(server: &str) -> Self {
        Self {
            base_path: server.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_path, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .with_context(|| format!("GET {} failed", path))?;
        decode(response).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .with_context(|| format!("POST {} failed", path))?;
        decode(response).await
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        let response = self
            .http
            .delete(self.url(path))
            .send()
            .await
            .with_context(|| format!("DELETE {} failed", path))?;
        decode::<serde_json::Value>(response).await?;
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("Request failed with status {}: {}", status, body);
    }

    Ok(response.json().await?)
}
