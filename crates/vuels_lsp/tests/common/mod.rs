use std::sync::Arc;

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use vuels_lsp::ServerOptions;
use vuels_typescript::test_utils::{FakeEngine, FakeLanguageService};

pub fn server_options() -> ServerOptions {
    ServerOptions::new(Arc::new(FakeEngine::new(FakeLanguageService::new())))
}

/// Writes one base-protocol frame. Content-Length counts bytes, not chars.
pub async fn write_frame<W: AsyncWrite + Unpin>(writer: &mut W, message: &Value) {
    let body = serde_json::to_vec(message).unwrap();
    let header = format!("Content-Length: {}\r\n\r\n", body.len());
    writer.write_all(header.as_bytes()).await.unwrap();
    writer.write_all(&body).await.unwrap();
    writer.flush().await.unwrap();
}

/// Reads the next frame, or `None` once the stream ends or a frame has no body.
pub async fn read_frame<R: AsyncBufRead + Unpin>(reader: &mut R) -> Option<Value> {
    let mut length = None;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).await.ok()? == 0 {
            return None;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':')
            && name.eq_ignore_ascii_case("content-length")
        {
            length = Some(
                value
                    .trim()
                    .parse::<usize>()
                    .unwrap_or_else(|e| panic!("bad Content-Length {value:?}: {e}")),
            );
        }
    }

    let mut body = vec![0u8; length.filter(|len| *len > 0)?];
    reader.read_exact(&mut body).await.ok()?;
    Some(serde_json::from_slice(&body).unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_frame_length_counts_utf8_bytes() {
        let open = json!({
            "jsonrpc": "2.0",
            "method": "textDocument/didOpen",
            "params": { "text": "<template><p>こんにちは</p></template>" },
        });
        let mut wire = Vec::new();
        write_frame(&mut wire, &open).await;
        write_frame(&mut wire, &json!({ "jsonrpc": "2.0", "method": "exit" })).await;

        let mut reader = tokio::io::BufReader::new(wire.as_slice());
        assert_eq!(read_frame(&mut reader).await, Some(open));
        let exit = read_frame(&mut reader).await.unwrap();
        assert_eq!(exit["method"], "exit");
        assert_eq!(read_frame(&mut reader).await, None);
    }

    #[tokio::test]
    async fn test_frame_without_length_is_skipped() {
        let data = b"Content-Type: application/vscode-jsonrpc\r\n\r\n";
        let mut reader = tokio::io::BufReader::new(&data[..]);
        assert_eq!(read_frame(&mut reader).await, None);
    }
}
