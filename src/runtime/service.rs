//! # Render Service
//!
//! A [`HalView`] owns a definition cache that must not be shared mutably
//! between requests. [`HalService`] gives the view to a single Tokio task and
//! processes render requests sequentially; [`HalClient`] is the cloneable
//! handle the rest of the application talks to.

use crate::docs::{ResourceDocumentation, ResourceSummary};
use crate::error::{HalError, Result};
use crate::hal::HalResource;
use crate::object::Instance;
use crate::view::{HalDocument, HalView};
use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument, warn};

/// Type alias for the one-shot response channel used by the service.
pub type Response<T> = oneshot::Sender<Result<T>>;

/// Requests understood by the render service.
#[derive(Debug)]
pub enum HalRequest {
    Render {
        variables: IndexMap<String, Instance>,
        respond_to: Response<Option<HalDocument>>,
    },
    RenderResource {
        resource_name: String,
        instance: Instance,
        respond_to: Response<HalResource>,
    },
    Index {
        respond_to: Response<Vec<ResourceSummary>>,
    },
    Describe {
        resource_name: String,
        respond_to: Response<ResourceDocumentation>,
    },
}

/// The task that owns the view.
pub struct HalService {
    receiver: mpsc::Receiver<HalRequest>,
    view: HalView,
}

impl HalService {
    pub fn new(buffer_size: usize, view: HalView) -> (Self, HalClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        (Self { receiver, view }, HalClient { sender })
    }

    /// Spawns the service on the current runtime.
    pub fn spawn(buffer_size: usize, view: HalView) -> (HalClient, tokio::task::JoinHandle<()>) {
        let (service, client) = Self::new(buffer_size, view);
        let handle = tokio::spawn(service.run());
        (client, handle)
    }

    /// Processes requests until every client is dropped.
    pub async fn run(mut self) {
        info!("HAL service started");
        while let Some(request) = self.receiver.recv().await {
            match request {
                HalRequest::Render {
                    variables,
                    respond_to,
                } => {
                    self.view.set_variables(variables);
                    let result = self.view.render();
                    if let Err(e) = &result {
                        warn!(error = %e, "Render failed");
                    }
                    let _ = respond_to.send(result);
                }
                HalRequest::RenderResource {
                    resource_name,
                    instance,
                    respond_to,
                } => {
                    debug!(resource = %resource_name, "RenderResource");
                    let result = self.view.render_resource(&resource_name, &instance);
                    if let Err(e) = &result {
                        warn!(resource = %resource_name, error = %e, "Render failed");
                    }
                    let _ = respond_to.send(result);
                }
                HalRequest::Index { respond_to } => {
                    let _ = respond_to.send(self.view.index());
                }
                HalRequest::Describe {
                    resource_name,
                    respond_to,
                } => {
                    debug!(resource = %resource_name, "Describe");
                    let _ = respond_to.send(self.view.describe(&resource_name));
                }
            }
        }
        info!("HAL service stopped");
    }
}

/// Async rendering operations, implemented by [`HalClient`].
#[async_trait]
pub trait HalRenderer: Send + Sync {
    async fn render(&self, variables: IndexMap<String, Instance>) -> Result<Option<HalDocument>>;

    async fn render_resource(&self, resource_name: &str, instance: Instance) -> Result<HalResource>;

    async fn index(&self) -> Result<Vec<ResourceSummary>>;

    async fn describe(&self, resource_name: &str) -> Result<ResourceDocumentation>;
}

/// Cloneable handle to a running [`HalService`].
#[derive(Clone)]
pub struct HalClient {
    sender: mpsc::Sender<HalRequest>,
}

impl HalClient {
    async fn request<T>(&self, build: impl FnOnce(Response<T>) -> HalRequest) -> Result<T> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| HalError::ServiceClosed)?;
        response.await.map_err(|_| HalError::ServiceDropped)?
    }
}

#[async_trait]
impl HalRenderer for HalClient {
    #[instrument(skip(self, variables))]
    async fn render(&self, variables: IndexMap<String, Instance>) -> Result<Option<HalDocument>> {
        self.request(|respond_to| HalRequest::Render {
            variables,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self, instance))]
    async fn render_resource(&self, resource_name: &str, instance: Instance) -> Result<HalResource> {
        let resource_name = resource_name.to_owned();
        self.request(|respond_to| HalRequest::RenderResource {
            resource_name,
            instance,
            respond_to,
        })
        .await
    }

    async fn index(&self) -> Result<Vec<ResourceSummary>> {
        self.request(|respond_to| HalRequest::Index { respond_to }).await
    }

    #[instrument(skip(self))]
    async fn describe(&self, resource_name: &str) -> Result<ResourceDocumentation> {
        let resource_name = resource_name.to_owned();
        self.request(|respond_to| HalRequest::Describe {
            resource_name,
            respond_to,
        })
        .await
    }
}
