//! DOM 工具函数
//!
//! 文件读取、下载触发、`<html>` 属性设置等零散的浏览器调用。

use sqlab_shared::protocol::Upload;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::error::{ClientError, ClientResult};

/// 将用户选择的文件读入内存
///
/// `web_sys::File` 不能跨越信号边界，因此在选择时立即转换为 `Upload`。
pub async fn read_upload(file: web_sys::File) -> ClientResult<Upload> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| ClientError::network(format!("lecture du fichier: {:?}", e)))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    Ok(Upload::new(file.name(), file.type_(), bytes))
}

/// `<input type="file">` 中选中的第一个文件
pub fn first_file(input: &web_sys::HtmlInputElement) -> Option<web_sys::File> {
    input.files()?.get(0)
}

/// 拖放事件中的第一个文件
pub fn dropped_file(ev: &web_sys::DragEvent) -> Option<web_sys::File> {
    ev.data_transfer()?.files()?.get(0)
}

/// 通过临时 `<a download>` 触发下载
pub fn trigger_download(url: &str, file_name: &str) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let Ok(element) = document.create_element("a") else {
        return;
    };
    let Ok(anchor) = element.dyn_into::<web_sys::HtmlAnchorElement>() else {
        return;
    };
    anchor.set_href(url);
    anchor.set_download(file_name);
    anchor.set_target("_blank");
    if let Some(body) = document.body() {
        let _ = body.append_child(&anchor);
        anchor.click();
        let _ = body.remove_child(&anchor);
    }
}

/// 设置 `<html data-theme=...>`
pub fn set_document_theme(theme: &str) {
    if let Some(el) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
    {
        let _ = el.set_attribute("data-theme", theme);
    }
}

/// 系统是否偏好深色
pub fn prefers_dark() -> bool {
    web_sys::window()
        .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
        .is_some_and(|mq| mq.matches())
}
