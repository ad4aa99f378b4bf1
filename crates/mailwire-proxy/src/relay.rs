//! Connection handling: accept clients and relay decoded traffic upstream.

use futures::{SinkExt, StreamExt};
use mailwire_imap::{ClientCodec, DecoderConfig, ServerCodec};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::codec::Framed;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::config::ProxyConfig;
use crate::error::{ProxyError, Result};

/// Binds the listen address and serves clients until an accept error occurs.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or accepting fails.
pub async fn serve(config: ProxyConfig) -> Result<()> {
    let listener = TcpListener::bind(config.listen).await?;
    run(listener, config).await
}

/// Serves clients from an already bound listener.
///
/// Each client gets its own upstream connection and task.
///
/// # Errors
///
/// Returns an error if accepting a connection fails.
pub async fn run(listener: TcpListener, config: ProxyConfig) -> Result<()> {
    info!(
        listen = %listener.local_addr()?,
        upstream = %config.upstream_addr(),
        "proxy listening"
    );

    loop {
        let (socket, peer) = listener.accept().await?;
        let config = config.clone();
        tokio::spawn(
            async move {
                info!("client connected");
                match handle(socket, &config).await {
                    Ok(()) => info!("connection closed"),
                    Err(e) => warn!(error = %e, "connection failed"),
                }
            }
            .instrument(info_span!("connection", %peer)),
        );
    }
}

async fn handle(socket: TcpStream, config: &ProxyConfig) -> Result<()> {
    let addr = config.upstream_addr();
    let upstream = TcpStream::connect(&addr)
        .await
        .map_err(|source| ProxyError::Upstream { addr, source })?;
    relay(socket, upstream, config.decoder).await
}

/// Relays one client connection to one upstream connection.
///
/// Client bytes are decoded as commands and re-encoded upstream; upstream
/// bytes are decoded as responses and re-encoded to the client. Each
/// direction runs its own loop, so a slow reader on one side does not hold
/// up the other. Returns when either side closes or sends something that
/// cannot be decoded.
///
/// # Errors
///
/// Returns the codec or I/O error that ended the relay.
pub async fn relay<C, U>(client: C, upstream: U, decoder: DecoderConfig) -> Result<()>
where
    C: AsyncRead + AsyncWrite + Unpin,
    U: AsyncRead + AsyncWrite + Unpin,
{
    let client = Framed::new(client, ServerCodec::with_config(decoder));
    let upstream = Framed::new(upstream, ClientCodec::with_config(decoder));
    let (mut to_client, mut from_client) = client.split();
    let (mut to_upstream, mut from_upstream) = upstream.split();

    let commands = async {
        while let Some(command) = from_client.next().await {
            let command = command?;
            debug!(
                tag = command.tag(),
                verb = command.verb(),
                "client -> upstream"
            );
            to_upstream.send(command).await?;
        }
        debug!("client closed");
        Ok::<_, ProxyError>(())
    };

    let responses = async {
        while let Some(response) = from_upstream.next().await {
            let response = response?;
            debug!(
                tag = response.tag(),
                status = ?response.status(),
                "upstream -> client"
            );
            to_client.send(response).await?;
        }
        debug!("upstream closed");
        Ok::<_, ProxyError>(())
    };

    tokio::select! {
        result = commands => result,
        result = responses => result,
    }
}
