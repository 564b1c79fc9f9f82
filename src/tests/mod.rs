//! Tests for the Telegram client.


#[cfg(test)]
mod upload_tests;

#[cfg(test)]
mod methods_tests;

use crate::client::BotClient;
use crate::fixtures;
use crate::mocks::MockHttpTransport;
use std::sync::Arc;

/// Client wired to a mock transport, plus a handle to inspect it
pub(crate) fn mock_client(transport: MockHttpTransport) -> (BotClient, Arc<MockHttpTransport>) {
    let transport = Arc::new(transport);
    let client = BotClient::with_transport(
        fixtures::config("https://api.telegram.org"),
        transport.clone(),
    )
    .unwrap();
    (client, transport)
}
