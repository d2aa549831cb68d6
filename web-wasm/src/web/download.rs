//! バイト列をファイルとして保存させる

use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

/// ファイル名の拡張子からMIMEタイプを推定
pub fn mime_for(file_name: &str) -> &'static str {
    match file_name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()) {
        Some(ext) if ext == "csv" => "text/csv",
        Some(ext) if ext == "xlsx" => {
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        }
        Some(ext) if ext == "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Blob URLを作って一時的な `<a download>` をクリックする
pub fn save_bytes(bytes: &[u8], file_name: &str) -> Result<(), String> {
    let array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::of1(&array.into());

    let options = BlobPropertyBag::new();
    options.set_type(mime_for(file_name));
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
        .map_err(|e| format!("Blob作成失敗: {:?}", e))?;
    let url = Url::create_object_url_with_blob(&blob).map_err(|e| format!("URL作成失敗: {:?}", e))?;

    let result = click_link(&url, file_name);
    let _ = Url::revoke_object_url(&url);
    result
}

fn click_link(url: &str, file_name: &str) -> Result<(), String> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| "documentを取得できません".to_string())?;
    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(|e| format!("要素作成失敗: {:?}", e))?
        .dyn_into()
        .map_err(|_| "a要素に変換できません".to_string())?;
    anchor.set_href(url);
    anchor.set_download(file_name);
    anchor.click();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_for() {
        assert_eq!(mime_for("bank-reconciliation.csv"), "text/csv");
        assert!(mime_for("10k.XLSX").contains("spreadsheetml"));
        assert_eq!(mime_for("export"), "application/octet-stream");
    }
}
