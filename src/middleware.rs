//! Middleware chain and the Accept negotiation step
//!
//! The chain is the seam the surrounding pipeline plugs into: each
//! middleware receives the request and a `next` continuation, and either
//! forwards or answers directly. [`AcceptMiddleware`] negotiates before
//! forwarding, records the chosen pair on the request, stamps the response
//! `Content-Type`, and in strict mode ends unmatched exchanges with 406
//! without ever invoking `next`.

use crate::catalog::{MediaCatalog, MediaDescriptor, MediaPair};
use crate::config::{self, NegotiationConfig};
use crate::http::{HttpRequest, HttpResponse};
use crate::negotiate::{negotiate, NegotiationResult};
use crate::Error;
use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{debug, trace};

/// Type alias for the next handler in the middleware chain
pub type Next = Box<
    dyn FnOnce(HttpRequest) -> Pin<Box<dyn Future<Output = Result<HttpResponse, Error>> + Send>>
        + Send,
>;

/// Type alias for handler functions
pub type HandlerFn = Arc<
    dyn Fn(HttpRequest) -> Pin<Box<dyn Future<Output = Result<HttpResponse, Error>> + Send>>
        + Send
        + Sync,
>;

/// Middleware trait for processing requests before they reach the handler
#[async_trait]
pub trait Middleware: Send + Sync {
    /// Process the request and optionally pass it to the next middleware
    async fn handle(&self, req: HttpRequest, next: Next) -> Result<HttpResponse, Error>;
}

/// Middleware chain executor
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    middlewares: Arc<Vec<Arc<dyn Middleware>>>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self {
            middlewares: Arc::new(Vec::new()),
        }
    }

    /// Add a middleware to the chain
    pub fn use_middleware<M: Middleware + 'static>(&mut self, middleware: M) {
        let mut middlewares = (*self.middlewares).clone();
        middlewares.push(Arc::new(middleware));
        self.middlewares = Arc::new(middlewares);
    }

    /// Execute the middleware chain, ending at the handler
    pub async fn apply(&self, req: HttpRequest, handler: HandlerFn) -> Result<HttpResponse, Error> {
        debug!(
            middleware_count = self.middlewares.len(),
            path = %req.path,
            method = %req.method,
            "executing middleware chain"
        );
        self.execute_from(0, req, handler).await
    }

    fn execute_from(
        &self,
        index: usize,
        req: HttpRequest,
        handler: HandlerFn,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, Error>> + Send>> {
        if index >= self.middlewares.len() {
            trace!("middleware chain complete, calling handler");
            handler(req)
        } else {
            let middleware = self.middlewares[index].clone();
            let chain = self.clone();
            let handler = handler.clone();

            Box::pin(async move {
                middleware
                    .handle(
                        req,
                        Box::new(move |req| chain.execute_from(index + 1, req, handler)),
                    )
                    .await
            })
        }
    }
}

/// The media pair chosen for a request, recorded as a request extension.
#[derive(Debug, Clone, PartialEq)]
pub struct NegotiatedMedia(pub MediaPair);

impl HttpRequest {
    /// The pair negotiated for this request, once [`AcceptMiddleware`] ran.
    pub fn negotiated_media(&self) -> Option<&MediaPair> {
        self.extensions.get::<NegotiatedMedia>().map(|media| &media.0)
    }
}

/// Accept-header negotiation middleware
///
/// Built from the server's declared media descriptors. The effective
/// options are resolved once here, at construction, never per request:
/// [`AcceptMiddleware::new`] freezes the current process-wide default and
/// [`AcceptMiddleware::with_config`] takes an explicit configuration.
///
/// # Example
///
/// ```
/// use mediate::{AcceptMiddleware, MediaDescriptor, NegotiationConfig};
///
/// let media = vec![
///     MediaDescriptor::new("application/vnd.shop.Order").with_formats(["json", "xml"]),
///     MediaDescriptor::new("text/plain"),
/// ];
///
/// let middleware = AcceptMiddleware::with_config(
///     &media,
///     NegotiationConfig::builder().strict_mode(true).build(),
/// )?;
/// # Ok::<(), mediate::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct AcceptMiddleware {
    catalog: MediaCatalog,
    config: NegotiationConfig,
}

impl AcceptMiddleware {
    /// Create a negotiation step using the process-wide default options.
    ///
    /// Fails when the descriptor list flattens to nothing producible.
    pub fn new(descriptors: &[MediaDescriptor]) -> Result<Self, Error> {
        Self::with_config(descriptors, config::default_config().as_ref().clone())
    }

    /// Create a negotiation step with an explicit configuration.
    pub fn with_config(
        descriptors: &[MediaDescriptor],
        config: NegotiationConfig,
    ) -> Result<Self, Error> {
        Ok(Self {
            catalog: MediaCatalog::build(descriptors)?,
            config,
        })
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &NegotiationConfig {
        &self.config
    }

    /// Get a reference to the flattened catalog
    pub fn catalog(&self) -> &MediaCatalog {
        &self.catalog
    }

    /// The 406 response that terminates a rejected exchange.
    fn reject() -> HttpResponse {
        let body = b"Not Acceptable".to_vec();
        HttpResponse::not_acceptable()
            .with_header("Content-Type".to_string(), "text/plain".to_string())
            .with_header("Content-Length".to_string(), body.len().to_string())
            .with_body(body)
    }
}

#[async_trait]
impl Middleware for AcceptMiddleware {
    async fn handle(&self, mut req: HttpRequest, next: Next) -> Result<HttpResponse, Error> {
        let accept_header = req.header("Accept").cloned();

        match negotiate(&self.catalog, accept_header.as_deref(), &self.config) {
            NegotiationResult::Rejected => {
                debug!(path = %req.path, "terminating exchange with 406 Not Acceptable");
                Ok(Self::reject())
            }
            NegotiationResult::Matched(pair) | NegotiationResult::FellBack(pair) => {
                let content_type = pair.header_value();
                req.extensions.insert(NegotiatedMedia(pair));

                let mut response = next(req).await?;

                response
                    .headers
                    .insert("Content-Type".to_string(), content_type);

                // The response depends on the Accept header, mark it for caches.
                let vary = response.headers.entry("Vary".to_string()).or_default();
                let has_accept = vary
                    .split(',')
                    .any(|member| member.trim().eq_ignore_ascii_case("accept"));
                if !has_accept {
                    if !vary.is_empty() {
                        vary.push_str(", ");
                    }
                    vary.push_str("Accept");
                }

                Ok(response)
            }
        }
    }
}
