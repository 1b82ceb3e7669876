//! HTTP 传输层
//!
//! `HttpTransport` 抽象出一次请求/响应往返：
//! - `FetchTransport`：浏览器实现，基于 `gloo-net`
//! - `MockTransport`：测试实现，记录请求并返回预设响应

use gloo_net::http::{Method, RequestBuilder};
use sqlab_shared::protocol::{FormValue, HttpMethod, Payload, Upload};
use wasm_bindgen::JsValue;

use crate::error::{ClientError, ClientResult};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::HashMap;

// =========================================================
// 请求 / 响应
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub payload: Payload,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: Vec::new(),
            payload: Payload::Empty,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait::async_trait(?Send)]
pub trait HttpTransport {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse>;
}

#[async_trait::async_trait(?Send)]
impl<T: HttpTransport + ?Sized> HttpTransport for &T {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse> {
        (**self).send(req).await
    }
}

// =========================================================
// 实现层: 浏览器 fetch
// =========================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

fn js_error(context: &str, e: JsValue) -> ClientError {
    ClientError::network(format!("{}: {:?}", context, e))
}

fn method_of(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// 将内存中的文件转为 `Blob`
fn upload_blob(upload: &Upload) -> ClientResult<web_sys::Blob> {
    let bytes = js_sys::Uint8Array::from(upload.bytes.as_slice());
    let parts = js_sys::Array::of1(&bytes);
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(&upload.mime_type);
    web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
        .map_err(|e| js_error("blob", e))
}

fn form_data(fields: &[sqlab_shared::protocol::FormField]) -> ClientResult<web_sys::FormData> {
    let form = web_sys::FormData::new().map_err(|e| js_error("form", e))?;
    for field in fields {
        match &field.value {
            FormValue::Text(text) => form
                .append_with_str(&field.name, text)
                .map_err(|e| js_error("form field", e))?,
            FormValue::File(upload) => form
                .append_with_blob_and_filename(&field.name, &upload_blob(upload)?, &upload.file_name)
                .map_err(|e| js_error("form file", e))?,
        }
    }
    Ok(form)
}

#[async_trait::async_trait(?Send)]
impl HttpTransport for FetchTransport {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse> {
        let mut builder = RequestBuilder::new(&req.url).method(method_of(req.method));
        for (k, v) in &req.headers {
            builder = builder.header(k, v);
        }

        // multipart 的 Content-Type（含 boundary）由浏览器生成
        let request = match &req.payload {
            Payload::Empty => builder.build()?,
            Payload::Json(value) => builder
                .header("Content-Type", "application/json")
                .body(value.to_string())?,
            Payload::Multipart(fields) => builder.body(form_data(fields)?)?,
        };

        let response = request.send().await?;
        Ok(HttpResponse {
            status: response.status(),
            body: response.text().await?,
        })
    }
}

// =========================================================
// 测试工具: MockTransport
// =========================================================

#[cfg(test)]
#[derive(Default)]
pub struct MockTransport {
    // (Method, URL) -> (Status, Body)
    responses: RefCell<HashMap<(&'static str, String), (u16, String)>>,
    failures: RefCell<Vec<String>>,
    pending: RefCell<Vec<String>>,
    pub requests: RefCell<Vec<HttpRequest>>,
}

#[cfg(test)]
impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mock_response(&self, method: HttpMethod, url: &str, status: u16, body: serde_json::Value) {
        self.mock_raw(method, url, status, &body.to_string());
    }

    pub fn mock_raw(&self, method: HttpMethod, url: &str, status: u16, body: &str) {
        self.responses
            .borrow_mut()
            .insert((method.as_str(), url.to_string()), (status, body.to_string()));
    }

    /// 该 URL 的请求将以网络错误结束
    pub fn mock_network_failure(&self, url: &str) {
        self.failures.borrow_mut().push(url.to_string());
    }

    /// 该 URL 的请求永远不会返回
    pub fn mock_pending(&self, url: &str) {
        self.pending.borrow_mut().push(url.to_string());
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.borrow().last().cloned()
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpTransport for MockTransport {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse> {
        self.requests.borrow_mut().push(req.clone());

        if self.failures.borrow().contains(&req.url) {
            return Err(ClientError::network("connection refused"));
        }
        if self.pending.borrow().contains(&req.url) {
            futures::future::pending::<()>().await;
        }

        let responses = self.responses.borrow();
        match responses.get(&(req.method.as_str(), req.url.clone())) {
            Some((status, body)) => Ok(HttpResponse {
                status: *status,
                body: body.clone(),
            }),
            None => Ok(HttpResponse {
                status: 404,
                body: "Not Found".to_string(),
            }),
        }
    }
}
