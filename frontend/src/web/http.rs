//! HTTP 请求封装模块
//!
//! 使用 `web_sys::fetch` 实现核心库的 [`HttpClient`] 特性。

use rbac_console::{HttpClient, HttpRequest, HttpResponse, TransportError};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

/// 基于 fetch 的 HTTP 客户端
///
/// 非 2xx 响应照常返回，由 API 客户端决定如何处理。
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchHttpClient;

impl FetchHttpClient {
    fn build(req: &HttpRequest) -> Result<Request, TransportError> {
        let headers = Headers::new()
            .map_err(|e| TransportError::new(format!("创建 Headers 失败: {:?}", e)))?;

        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(|e| TransportError::new(format!("设置 Header 失败: {:?}", e)))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());

        if let Some(body) = &req.body {
            opts.set_body(&JsValue::from_str(body));
        }

        Request::new_with_str_and_init(&req.url, &opts)
            .map_err(|e| TransportError::new(format!("请求构建失败: {:?}", e)))
    }

    async fn text(resp: &Response) -> Result<String, TransportError> {
        let promise = resp
            .text()
            .map_err(|e| TransportError::new(format!("读取响应体失败: {:?}", e)))?;

        let text = JsFuture::from(promise)
            .await
            .map_err(|e| TransportError::new(format!("读取响应体失败: {:?}", e)))?;

        text.as_string()
            .ok_or_else(|| TransportError::new("响应体无法转换为字符串"))
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for FetchHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let request = Self::build(&req)?;

        let window =
            web_sys::window().ok_or_else(|| TransportError::new("无法获取 window 对象"))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| TransportError::new(format!("网络错误: {:?}", e)))?;

        let response: Response = resp_value
            .dyn_into()
            .map_err(|e| TransportError::new(format!("Response 类型转换失败: {:?}", e)))?;

        let body = Self::text(&response).await?;
        Ok(HttpResponse::new(response.status(), body))
    }
}
