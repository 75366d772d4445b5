use std::{sync::Arc, time::Duration};

use reqwest::StatusCode;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::rpc::RpcReply;

/// Transport-level failures of an outbound RPC.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("{service} {method} exceeded its {deadline:?} deadline")]
    DeadlineExceeded {
        service: &'static str,
        method: &'static str,
        deadline: Duration,
    },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("peer answered with status {0}")]
    Status(StatusCode),
}

struct Inner {
    http: reqwest::Client,
    base_url: String,
    deadline: Duration,
    service: &'static str,
}

/// Client for one peer service. Cloning shares the connection pool.
#[derive(Clone)]
pub struct RpcClient {
    inner: Arc<Inner>,
}

impl RpcClient {
    pub fn new(service: &'static str, base_url: impl Into<String>, deadline: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            inner: Arc::new(Inner {
                http: reqwest::Client::new(),
                base_url,
                deadline,
                service,
            }),
        }
    }

    pub fn service(&self) -> &'static str {
        self.inner.service
    }

    /// Send `request` to `method` and wait at most the configured deadline.
    ///
    /// The whole exchange (connect, send, read body) counts against the
    /// deadline; when it expires the in-flight request is dropped. No retry.
    pub async fn call<Req, Resp>(
        &self,
        method: &'static str,
        request: &Req,
    ) -> Result<RpcReply<Resp>, RpcError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = format!("{}{}", self.inner.base_url, method);
        let exchange = async {
            let response = self.inner.http.post(&url).json(request).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(RpcError::Status(status));
            }
            Ok::<_, RpcError>(response.json::<RpcReply<Resp>>().await?)
        };

        match tokio::time::timeout(self.inner.deadline, exchange).await {
            Ok(result) => {
                if let Err(err) = &result {
                    tracing::warn!(service = self.inner.service, method, error = %err, "rpc failed");
                }
                result
            }
            Err(_) => {
                tracing::warn!(
                    service = self.inner.service,
                    method,
                    deadline_ms = self.inner.deadline.as_millis() as u64,
                    "rpc deadline exceeded"
                );
                Err(RpcError::DeadlineExceeded {
                    service: self.inner.service,
                    method,
                    deadline: self.inner.deadline,
                })
            }
        }
    }
}
