// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Raw list/get/watch/update access to a namespaced custom resource collection

use crate::error::{PeerSyncError, Result};
use crate::types::ResourceCollection;
use bytes::Bytes;
use futures::stream::{AbortHandle, Abortable, BoxStream};
use futures::{Stream, StreamExt, TryStreamExt};
use http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use kube::client::Body;
use kube::core::ErrorResponse;
use kube::{Client, Resource, ResourceExt};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;
use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::{debug, instrument};

/// Stateless client for one custom resource collection.
///
/// Holds only the transport and the `group/version/plural` naming, so it is cheap to
/// clone and safe to share between tasks. Every call is a single round trip; retries
/// are left to the caller (see [`crate::kubernetes::retry`]).
pub struct ResourceClient<K> {
    client: Client,
    group: String,
    version: String,
    plural: String,
    _kind: PhantomData<fn() -> K>,
}

impl<K> Clone for ResourceClient<K> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            group: self.group.clone(),
            version: self.version.clone(),
            plural: self.plural.clone(),
            _kind: PhantomData,
        }
    }
}

impl<K> ResourceClient<K>
where
    K: Resource<DynamicType = ()>,
{
    /// Create a client using the group, version and plural declared by `K`
    pub fn new(client: Client) -> Self {
        Self::with_names(
            client,
            &K::group(&()),
            &K::version(&()),
            &K::plural(&()),
        )
    }
}

impl<K> ResourceClient<K> {
    pub fn with_names(client: Client, group: &str, version: &str, plural: &str) -> Self {
        Self {
            client,
            group: group.to_string(),
            version: version.to_string(),
            plural: plural.to_string(),
            _kind: PhantomData,
        }
    }

    pub fn collection_path(&self, namespace: &str) -> String {
        format!(
            "/apis/{}/{}/namespaces/{}/{}",
            self.group, self.version, namespace, self.plural
        )
    }

    pub fn object_path(&self, namespace: &str, name: &str) -> String {
        format!("{}/{}", self.collection_path(namespace), name)
    }
}

impl<K> ResourceClient<K>
where
    K: Resource + Clone + Debug + DeserializeOwned + Serialize,
{
    /// List all objects in `namespace` together with the collection resource version
    #[instrument(skip(self), fields(plural = %self.plural))]
    pub async fn list(&self, namespace: &str) -> Result<ResourceCollection<K>> {
        let uri = self.collection_path(namespace);
        debug!("Listing {}", uri);

        let request = Request::get(uri.as_str()).body(Vec::new())?;
        Ok(self.client.request::<ResourceCollection<K>>(request).await?)
    }

    /// Fetch a single object; a missing object surfaces as [`PeerSyncError::NotFound`]
    #[instrument(skip(self), fields(plural = %self.plural))]
    pub async fn get(&self, namespace: &str, name: &str) -> Result<K> {
        let uri = self.object_path(namespace, name);
        debug!("Getting {}", uri);

        let request = Request::get(uri.as_str()).body(Vec::new())?;
        Ok(self.client.request::<K>(request).await?)
    }

    /// Open a watch on `namespace` starting at `resource_version`.
    ///
    /// An empty `resource_version` lets the server pick its latest state. The returned
    /// stream yields the raw response body; events are not decoded.
    #[instrument(skip(self), fields(plural = %self.plural))]
    pub async fn watch(&self, namespace: &str, resource_version: &str) -> Result<WatchStream> {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("watch", "true")
            .append_pair("resourceVersion", resource_version)
            .finish();
        let uri = format!("{}?{}", self.collection_path(namespace), query);
        debug!("Watching {}", uri);

        let request = Request::get(uri.as_str()).body(Body::from(Vec::new()))?;
        let response = self.client.send(request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(api_error(status, response.into_body()).await);
        }

        let body = response
            .into_body()
            .into_data_stream()
            .map_err(|e| PeerSyncError::Transport(kube::Error::Service(e.into())))
            .boxed();
        Ok(WatchStream::new(body))
    }

    /// Replace an object, guarded by its resource version.
    ///
    /// The object must carry the resource version last read from the store; an object
    /// without one is rejected before any request is made. A stale version comes back
    /// as [`PeerSyncError::Conflict`]. The returned object holds the new version.
    #[instrument(skip(self, resource), fields(plural = %self.plural, name = %resource.name_any()))]
    pub async fn update(&self, namespace: &str, resource: &K) -> Result<K> {
        let has_version = resource
            .meta()
            .resource_version
            .as_deref()
            .is_some_and(|v| !v.is_empty());
        if !has_version {
            return Err(PeerSyncError::Validation(
                "resource version is not provided".to_string(),
            ));
        }

        let Some(name) = resource.meta().name.as_deref().filter(|n| !n.is_empty()) else {
            return Err(PeerSyncError::Validation(
                "resource name is not provided".to_string(),
            ));
        };

        let uri = self.object_path(namespace, name);
        debug!("Updating {}", uri);

        let request = Request::put(uri.as_str())
            .header(header::CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(resource)?)?;
        Ok(self.client.request::<K>(request).await?)
    }
}

/// Turn a non-2xx response into an error, keeping the server's Status message if any
async fn api_error(status: StatusCode, body: Body) -> PeerSyncError {
    let bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => return PeerSyncError::Transport(kube::Error::Service(e.into())),
    };

    let response = serde_json::from_slice::<ErrorResponse>(&bytes).unwrap_or_else(|_| ErrorResponse {
        status: status.to_string(),
        message: String::from_utf8_lossy(&bytes).into_owned(),
        reason: "Failed to parse error data".to_string(),
        code: status.as_u16(),
    });
    PeerSyncError::from(kube::Error::Api(response))
}

/// Raw byte stream of an open watch.
///
/// Dropping the stream closes the connection. [`WatchStream::closer`] hands out a
/// handle that ends the stream from another task or thread.
pub struct WatchStream {
    inner: Abortable<BoxStream<'static, Result<Bytes>>>,
    handle: AbortHandle,
}

impl WatchStream {
    fn new(body: BoxStream<'static, Result<Bytes>>) -> Self {
        let (handle, registration) = AbortHandle::new_pair();
        Self {
            inner: Abortable::new(body, registration),
            handle,
        }
    }

    pub fn closer(&self) -> WatchCloser {
        WatchCloser(self.handle.clone())
    }

    pub fn close(&self) {
        self.handle.abort();
    }

    pub fn is_closed(&self) -> bool {
        self.handle.is_aborted()
    }
}

impl Stream for WatchStream {
    type Item = Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

/// Closes a [`WatchStream`]; the next poll of the stream returns `None`.
#[derive(Clone, Debug)]
pub struct WatchCloser(AbortHandle);

impl WatchCloser {
    pub fn close(&self) {
        self.0.abort();
    }
}
