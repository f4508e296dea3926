//! Sample service clients in generated-stub shape.

use std::collections::BTreeMap;
use std::sync::LazyLock;
use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use tokio::runtime::Handle;

use parlance_core::{
    await_with_deadline, Channel, Endpoint, Error, Method, PathTemplate, Request, Response,
    UrlBuilder,
};
use parlance_serde::{
    Deserializer, EmptyBodyDeserializer, PlainSerDe, ResourceIdentifier, Runtime, Serializer,
};

use crate::objects::Widget;

static CREATE_WIDGET_PATH: LazyLock<PathTemplate> = LazyLock::new(|| {
    PathTemplate::builder()
        .fixed("widgets")
        .variable("widgetId")
        .build()
});

struct CreateWidgetEndpoint;

impl Endpoint for CreateWidgetEndpoint {
    fn render_path(
        &self,
        params: &BTreeMap<String, String>,
        url: &mut UrlBuilder,
    ) -> Result<(), Error> {
        CREATE_WIDGET_PATH.fill(params, url)
    }

    fn http_method(&self) -> Method {
        Method::POST
    }
}

static CREATE_WIDGET: CreateWidgetEndpoint = CreateWidgetEndpoint;

static PING_PATH: LazyLock<PathTemplate> =
    LazyLock::new(|| PathTemplate::builder().fixed("ping").build());

struct PingEndpoint;

impl Endpoint for PingEndpoint {
    fn render_path(
        &self,
        params: &BTreeMap<String, String>,
        url: &mut UrlBuilder,
    ) -> Result<(), Error> {
        PING_PATH.fill(params, url)
    }

    fn http_method(&self) -> Method {
        Method::GET
    }
}

static PING: PingEndpoint = PingEndpoint;

/// Asynchronous facet of the widget service.
///
/// Required arguments are enforced by the signature itself; optional
/// arguments are omitted from the request when absent. Each method builds
/// a [`Request`], executes it on the channel, and decodes the response
/// inline on the future.
pub struct AsyncWidgetServiceClient<C> {
    channel: C,
    widget_serializer: Serializer<Widget>,
    widget_deserializer: Deserializer<Widget>,
    ping_deserializer: EmptyBodyDeserializer,
    plain: PlainSerDe,
}

impl<C: Channel> AsyncWidgetServiceClient<C> {
    pub fn new(channel: C, runtime: &Runtime) -> Self {
        Self {
            channel,
            widget_serializer: runtime.body_serde().serializer(),
            widget_deserializer: runtime.body_serde().deserializer(),
            ping_deserializer: runtime.empty_body_deserializer(),
            plain: *runtime.plain_serde(),
        }
    }

    /// `POST /widgets/{widgetId}`
    pub async fn create_widget(
        &self,
        widget_id: &str,
        modified: DateTime<FixedOffset>,
        tags: &[ResourceIdentifier],
        page_size: Option<i32>,
        widget: &Widget,
    ) -> Result<Widget, Error> {
        let mut request = Request::builder()
            .put_path_param("widgetId", self.plain.serialize_string(widget_id))
            .put_header_param("X-Modified-At", self.plain.serialize_date_time(&modified))
            .put_all_query_params("tag", self.plain.serialize_rid_list(tags));
        if let Some(page_size) = page_size {
            request = request.put_query_param("pageSize", self.plain.serialize_integer(page_size));
        }
        let request = request
            .body(self.widget_serializer.serialize(widget)?)
            .build();

        let response = self.channel.execute(&CREATE_WIDGET, &request).await?;
        self.widget_deserializer.deserialize(response).await
    }

    /// `GET /ping`
    pub async fn ping(&self) -> Result<(), Error> {
        let request = Request::builder().build();
        let response: Response = self.channel.execute(&PING, &request).await?;
        self.ping_deserializer.deserialize(response).await
    }
}

/// Blocking facet of the widget service.
///
/// A thin bounded await over the async facet: each call drives the same
/// future the async client would return, failing with
/// [`Error::Timeout`] once `call_timeout` elapses. Failures surface with
/// their underlying kind — transport, decode, or remote — not wrapped.
pub struct WidgetServiceClient<C> {
    inner: AsyncWidgetServiceClient<C>,
    handle: Handle,
    call_timeout: Duration,
}

impl<C: Channel> WidgetServiceClient<C> {
    /// `call_timeout` bounds the end-to-end lifetime of every blocking
    /// call made through this client.
    pub fn new(channel: C, runtime: &Runtime, handle: Handle, call_timeout: Duration) -> Self {
        Self {
            inner: AsyncWidgetServiceClient::new(channel, runtime),
            handle,
            call_timeout,
        }
    }

    pub fn create_widget(
        &self,
        widget_id: &str,
        modified: DateTime<FixedOffset>,
        tags: &[ResourceIdentifier],
        page_size: Option<i32>,
        widget: &Widget,
    ) -> Result<Widget, Error> {
        await_with_deadline(
            &self.handle,
            self.call_timeout,
            self.inner
                .create_widget(widget_id, modified, tags, page_size, widget),
        )
    }

    pub fn ping(&self) -> Result<(), Error> {
        await_with_deadline(&self.handle, self.call_timeout, self.inner.ping())
    }
}
