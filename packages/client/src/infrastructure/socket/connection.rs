//! WebSocket connection setup.

use tokio::net::TcpStream;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{
        self,
        client::IntoClientRequest,
        http::{HeaderValue, StatusCode, header::AUTHORIZATION},
    },
};

use crate::{domain::AuthToken, error::ClientError};

/// An open socket connection
pub type SocketStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Open the socket channel, authenticating with the bearer token.
///
/// A handshake rejected with 401 means the token is no longer valid and maps to
/// `Unauthorized`; every other failure is a `Connection` error.
pub async fn connect(socket_url: &str, token: &AuthToken) -> Result<SocketStream, ClientError> {
    let mut request = socket_url.into_client_request().map_err(|e| {
        ClientError::Connection(format!("invalid socket URL '{}': {}", socket_url, e))
    })?;
    let bearer = HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
        .map_err(|e| ClientError::Connection(format!("invalid token: {}", e)))?;
    request.headers_mut().insert(AUTHORIZATION, bearer);

    match connect_async(request).await {
        Ok((stream, response)) => {
            tracing::debug!("Socket handshake completed with {}", response.status());
            Ok(stream)
        }
        Err(tungstenite::Error::Http(response))
            if response.status() == StatusCode::UNAUTHORIZED =>
        {
            Err(ClientError::Unauthorized)
        }
        Err(e) => Err(ClientError::Connection(e.to_string())),
    }
}
