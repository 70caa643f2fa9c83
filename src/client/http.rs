use std::{sync::Arc, time::Duration};

use futures::future::BoxFuture;
use reqwest::{Client, Response};
use serde::{Deserialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::{
    claims::ClaimantCode,
    dto::{
        board::{BoardListItem, BoardMetadataResponse},
        claim::{ToggleClaimRequest, ToggleClaimResponse},
    },
};

use super::{
    ClaimMatrix,
    error::{ClientError, ClientResult},
    sync::ClaimSource,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// [`ClaimSource`] talking to the board REST API.
#[derive(Clone)]
pub struct HttpClaimSource {
    client: Client,
    base_url: Arc<str>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl HttpClaimSource {
    /// Source for the API served at `base_url`.
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| ClientError::Transport {
                url: base_url.to_owned(),
                source,
            })?;

        Ok(Self {
            client,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        })
    }

    /// Metadata of `board_id`, needed to size a [`BoardView`](super::BoardView).
    pub async fn board(&self, board_id: Uuid) -> ClientResult<BoardMetadataResponse> {
        let url = self.url(&format!("boards/{board_id}"));
        let response = self.send(self.client.get(&url), &url).await?;
        decode(response).await
    }

    /// Every board the server knows about.
    pub async fn list_boards(&self) -> ClientResult<Vec<BoardListItem>> {
        let url = self.url("boards");
        let response = self.send(self.client.get(&url), &url).await?;
        decode(response).await
    }

    async fn claims(&self, board_id: Uuid) -> ClientResult<ClaimMatrix> {
        let url = self.url(&format!("boards/{board_id}/claims"));
        let response = self.send(self.client.get(&url), &url).await?;
        decode(response).await
    }

    async fn toggle_claim(
        &self,
        board_id: Uuid,
        x: u32,
        y: u32,
        code: ClaimantCode,
    ) -> ClientResult<()> {
        let url = self.url(&format!("boards/{board_id}/claims"));
        let body = ToggleClaimRequest {
            x: i64::from(x),
            y: i64::from(y),
            claim: code.to_string(),
        };
        let response = self.send(self.client.post(&url).json(&body), &url).await?;
        let ack: ToggleClaimResponse = decode(response).await?;
        if ack.status != "success" {
            return Err(ClientError::Status {
                status: 200,
                message: ack.message,
            });
        }
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send(&self, builder: reqwest::RequestBuilder, url: &str) -> ClientResult<Response> {
        let response = builder.send().await.map_err(|source| ClientError::Transport {
            url: url.to_owned(),
            source,
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.message,
            Err(_) => status.canonical_reason().unwrap_or("unknown error").to_owned(),
        };
        Err(ClientError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let url = response.url().to_string();
    let bytes = response
        .bytes()
        .await
        .map_err(|source| ClientError::Transport { url, source })?;
    serde_json::from_slice(&bytes).map_err(|err| ClientError::Malformed(err.to_string()))
}

impl ClaimSource for HttpClaimSource {
    fn fetch_claims(&self, board_id: Uuid) -> BoxFuture<'static, ClientResult<ClaimMatrix>> {
        let source = self.clone();
        Box::pin(async move { source.claims(board_id).await })
    }

    fn toggle(
        &self,
        board_id: Uuid,
        x: u32,
        y: u32,
        code: ClaimantCode,
    ) -> BoxFuture<'static, ClientResult<()>> {
        let source = self.clone();
        Box::pin(async move { source.toggle_claim(board_id, x, y, code).await })
    }
}
