//! Reply delivery through the Messaging API reply endpoint.

use super::LineChannel;
use async_trait::async_trait;
use sugarlady_core::error::SugarladyError;
use sugarlady_core::traits::Channel;
use tracing::debug;

#[async_trait]
impl Channel for LineChannel {
    fn name(&self) -> &str {
        "line"
    }

    /// Send one text message bound to `reply_token`. The token is minted per
    /// inbound event and expires quickly, so this is strictly one-shot.
    async fn reply(&self, reply_token: &str, text: &str) -> Result<(), SugarladyError> {
        let url = format!("{}/v2/bot/message/reply", self.api_base);
        let body = serde_json::json!({
            "replyToken": reply_token,
            "messages": [{ "type": "text", "text": text }],
        });
        debug!("line: POST /v2/bot/message/reply ({} chars)", text.chars().count());

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| SugarladyError::Channel(format!("line reply failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            return Err(SugarladyError::Channel(format!(
                "line reply failed ({status}): {error_text}"
            )));
        }

        Ok(())
    }
}
