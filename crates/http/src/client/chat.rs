//! AI chat and co-pilot client methods

use super::{ClientError, SessionClient};
use crate::types::{
    ChatReply, ChatRequest, Conversation, CopilotRequest, CopilotSuggestion, Listing,
};

impl SessionClient {
    /// Previous chat conversations
    pub async fn list_conversations(&self) -> Result<Listing<Conversation>, ClientError> {
        self.get("/ai/conversations/").await
    }

    /// Send a chat message; starts a new conversation when no id is given
    pub async fn send_chat_message(&self, request: &ChatRequest) -> Result<ChatReply, ClientError> {
        self.post("/ai/chat/", request).await
    }

    /// Ask the co-pilot for a suggestion
    pub async fn copilot_suggest(
        &self,
        request: &CopilotRequest,
    ) -> Result<CopilotSuggestion, ClientError> {
        self.post("/ai/copilot/", request).await
    }
}
