//! Outbound message framing: one JSON object per line.

use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use sensorhub_domain::wifi::WifiCredential;

use crate::error::SerialError;

#[derive(Serialize)]
struct WifiMessage<'a> {
    ssid: &'a str,
    password: &'a str,
}

/// Encode a credential as a newline-terminated JSON line.
pub(crate) fn encode_wifi(credential: &WifiCredential) -> Result<Vec<u8>, SerialError> {
    let mut line = serde_json::to_vec(&WifiMessage {
        ssid: &credential.ssid,
        password: &credential.password,
    })?;
    line.push(b'\n');
    Ok(line)
}

/// Write one encoded line and flush it.
pub(crate) async fn write_line<W>(writer: &mut W, line: &[u8]) -> Result<(), SerialError>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(line).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential() -> WifiCredential {
        WifiCredential::new("net", "p\"w").unwrap()
    }

    #[test]
    fn should_encode_single_json_line() {
        let line = encode_wifi(&credential()).unwrap();
        let text = String::from_utf8(line).unwrap();
        assert_eq!(text, "{\"ssid\":\"net\",\"password\":\"p\\\"w\"}\n");
        assert_eq!(text.matches('\n').count(), 1);
    }

    #[tokio::test]
    async fn should_write_line_to_writer() {
        let mut sink: Vec<u8> = Vec::new();
        let line = encode_wifi(&credential()).unwrap();

        write_line(&mut sink, &line).await.unwrap();

        let value: serde_json::Value = serde_json::from_slice(&sink).unwrap();
        assert_eq!(value["ssid"], "net");
        assert!(sink.ends_with(b"\n"));
    }
}
