use std::io::ErrorKind;
use std::time::Duration;

use blendix::SerialCodec;
use eyre::{Result, WrapErr};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;

const TCP_RETRY_DURATION: Duration = Duration::from_secs(5);

async fn connect(addr: &str) -> Result<TcpStream> {
    loop {
        match TcpStream::connect(addr).await {
            Ok(c) => return Ok(c),
            Err(e) => match e.kind() {
                ErrorKind::Interrupted => continue, // immediately retry
                ErrorKind::ConnectionReset | ErrorKind::ConnectionRefused | ErrorKind::ConnectionAborted => {
                    log::warn!("Serial bridge refused connection, retrying in {:?}: {}", TCP_RETRY_DURATION, e);
                    tokio::time::sleep(TCP_RETRY_DURATION).await;
                }
                ErrorKind::NotFound | ErrorKind::TimedOut => {
                    log::info!("Connection timed out, retrying in {:?}", TCP_RETRY_DURATION);
                    tokio::time::sleep(TCP_RETRY_DURATION).await;
                }
                _ => {
                    return Err(eyre::Report::new(e).wrap_err("TCP connection to serial bridge failed"))
                }
            }
        }
    }
}

/// Decodes newline separated frames from the bridge at `addr` until it hangs up.
///
/// A rejected frame is logged and skipped; the last good set stays available.
pub async fn run(addr: String, mut codec: SerialCodec) -> Result<()> {
    let stream = connect(addr.as_str()).await?;
    log::info!("Connected to serial bridge at {}", addr);

    let mut frames = BufReader::new(stream).lines();
    while let Some(frame) = frames.next_line().await.wrap_err("Reading from serial bridge failed")? {
        let frame = frame.trim_end_matches('\r');
        if frame.is_empty() {
            continue
        }

        match codec.parse_received(frame) {
            Ok(count) => {
                log::debug!("Received {} sets from {:?}", count, frame);
                for (i, set) in codec.received_sets().iter().enumerate() {
                    println!("{}: {},{},{}", i, set.x, set.y, set.z);
                }
            }
            Err(e) => {
                log::warn!("Dropped frame {:?} ({}), keeping last {} sets", frame, e, codec.received_len());
            }
        }
    }

    log::info!("Serial bridge closed the connection");
    Ok(())
}
