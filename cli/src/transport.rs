//! `reqwest` implementation of the Supabase HTTP transport.

use std::time::Duration;

use async_trait::async_trait;
use linkback::BackendError;
use linkback::supabase::http::{HttpRequest, HttpResponse, HttpTransport, Method};

const CONNECT_TIMEOUT_SECS: u64 = 5;

pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout_secs: u64,
}

impl ReqwestTransport {
    pub fn new(timeout_secs: u64) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(CONNECT_TIMEOUT_SECS)))
            .build()?;
        Ok(Self { client, timeout_secs })
    }

    fn backend_error(&self, error: &reqwest::Error) -> BackendError {
        if error.is_timeout() {
            BackendError::Timeout(self.timeout_secs)
        } else {
            BackendError::Transport(error.to_string())
        }
    }
}

pub(crate) fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
    }
}

#[async_trait(?Send)]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, BackendError> {
        let mut builder = self.client.request(reqwest_method(request.method), &request.url);
        for (name, value) in request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| self.backend_error(&e))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| self.backend_error(&e))?;
        tracing::debug!(status, url = %request.url, "supabase response");
        Ok(HttpResponse { status, body })
    }
}
