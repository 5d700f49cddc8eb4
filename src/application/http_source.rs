// HTTP source trait for third-party endpoints
use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    /// Send `Accept: application/json` (some endpoints default to HTML)
    pub accept_json: bool,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            accept_json: false,
        }
    }

    pub fn accepting_json(mut self) -> Self {
        self.accept_json = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    #[cfg(test)]
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("upstream returned status {0}")]
    Status(u16),
    #[error("resource not found")]
    NotFound,
    #[error("unexpected payload shape: {0}")]
    Shape(String),
    #[error("upstream returned no results")]
    Empty,
}

impl FetchError {
    pub fn shape(detail: impl Into<String>) -> Self {
        FetchError::Shape(detail.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound)
    }
}

#[async_trait]
pub trait HttpSource: Send + Sync {
    /// Issue a GET. Only transport failures are errors here, any status is
    /// returned as a response.
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse, FetchError>;
}

/// GET and require a 2xx status. 404 maps to `NotFound`.
pub async fn get_checked(
    http: &dyn HttpSource,
    request: &HttpRequest,
) -> Result<HttpResponse, FetchError> {
    let response = http.get(request).await?;
    match response.status {
        404 => Err(FetchError::NotFound),
        _ if response.is_success() => Ok(response),
        status => Err(FetchError::Status(status)),
    }
}

pub async fn get_json(
    http: &dyn HttpSource,
    request: &HttpRequest,
) -> Result<serde_json::Value, FetchError> {
    let response = get_checked(http, request).await?;
    serde_json::from_str(&response.body).map_err(|e| FetchError::shape(e.to_string()))
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned responses in order, then the fallback forever.
    /// Records every requested URL.
    pub struct ScriptedHttp {
        queue: Mutex<VecDeque<Result<HttpResponse, FetchError>>>,
        fallback: Option<Result<HttpResponse, FetchError>>,
        urls: Mutex<Vec<String>>,
    }

    impl ScriptedHttp {
        pub fn new(responses: Vec<Result<HttpResponse, FetchError>>) -> Self {
            Self {
                queue: Mutex::new(responses.into()),
                fallback: None,
                urls: Mutex::new(Vec::new()),
            }
        }

        pub fn always(response: Result<HttpResponse, FetchError>) -> Self {
            Self::new(Vec::new()).with_fallback(response)
        }

        pub fn with_fallback(mut self, response: Result<HttpResponse, FetchError>) -> Self {
            self.fallback = Some(response);
            self
        }

        pub fn calls(&self) -> usize {
            self.urls.lock().unwrap().len()
        }

        pub fn urls(&self) -> Vec<String> {
            self.urls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpSource for ScriptedHttp {
        async fn get(&self, request: &HttpRequest) -> Result<HttpResponse, FetchError> {
            self.urls.lock().unwrap().push(request.url.clone());
            let next = self.queue.lock().unwrap().pop_front();
            match next {
                Some(response) => response,
                None => self
                    .fallback
                    .clone()
                    .unwrap_or_else(|| Err(FetchError::Transport("no scripted response".into()))),
            }
        }
    }

    pub fn json(body: &str) -> Result<HttpResponse, FetchError> {
        Ok(HttpResponse::ok(body))
    }

    pub fn status(code: u16) -> Result<HttpResponse, FetchError> {
        Ok(HttpResponse::new(code, ""))
    }
}
