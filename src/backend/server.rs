use crate::backend::handlers::Handler;
use crate::backend::message::{Query, Response};
use crate::error::Error;
use crate::host_store::DynHostStore;
use crate::zone::Zone;
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitingHandshake,
    Serving,
}

/// A pipe backend speaking to a DNS server over a pair of byte streams.
///
/// Requests are answered strictly one at a time, in order.
pub struct PipeBackend {
    handler: Handler,
    verbose: bool,
}

impl PipeBackend {
    pub fn new(zone: Zone, hosts: DynHostStore, verbose: bool) -> Self {
        PipeBackend {
            handler: Handler::new(zone, hosts),
            verbose,
        }
    }

    /// Serve requests read from `reader` until it reaches end of input.
    ///
    /// The first line is the server's handshake and is acknowledged without inspection. Every
    /// later line gets one response cycle ending in `END`, or a single `FAIL` if the line
    /// couldn't be read.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IO`] if writing to `writer` fails. Errors while reading or answering
    /// a request never end the loop.
    pub async fn run<R, W>(&self, mut reader: R, mut writer: W) -> Result<(), Error>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut state = State::AwaitingHandshake;
        let mut buf = Vec::new();

        loop {
            let Some(line) = read_line(&mut reader, &mut buf).await.transpose() else {
                info!("input closed, stopping backend");
                return Ok(());
            };

            match state {
                State::AwaitingHandshake => {
                    debug!("handshake: {line:?}");
                    write_response(&mut writer, &Response::Handshake).await?;
                    state = State::Serving;
                }
                State::Serving => match line {
                    Ok(line) => self.respond(line, &mut writer).await?,
                    Err(err) => {
                        warn!("unable to read request: {err}");
                        write_response(&mut writer, &Response::Fail).await?;
                    }
                },
            }
            writer.flush().await?;
        }
    }

    async fn respond<W>(&self, line: &str, writer: &mut W) -> Result<(), Error>
    where
        W: AsyncWrite + Unpin,
    {
        if self.verbose {
            write_response(writer, &Response::Log(line)).await?;
        }

        if let Err(err) = self.answer(line, writer).await {
            if err.is_not_found() {
                debug!("{err}");
            } else {
                match &err {
                    Error::InvalidLine(_) => warn!("{err}: {line:?}"),
                    _ => error!("error answering {line:?}: {err}"),
                }
                if self.verbose {
                    write_response(writer, &Response::Log(&err.to_string())).await?;
                }
            }
        }

        write_response(writer, &Response::End).await
    }

    async fn answer<W>(&self, line: &str, writer: &mut W) -> Result<(), Error>
    where
        W: AsyncWrite + Unpin,
    {
        let query = Query::parse(line)?;
        if let Some(answer) = self.handler.handle_query(&query).await? {
            write_response(writer, &Response::Data(&query, &answer)).await?;
        }
        Ok(())
    }
}

/// Read one line without its terminator. `Ok(None)` at end of input.
async fn read_line<'b, R>(reader: &mut R, buf: &'b mut Vec<u8>) -> io::Result<Option<&'b str>>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    if reader.read_until(b'\n', buf).await? == 0 {
        return Ok(None);
    }
    let line = std::str::from_utf8(buf)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    Ok(Some(line.trim_end_matches(|c| c == '\n' || c == '\r')))
}

async fn write_response<W>(writer: &mut W, response: &Response<'_>) -> Result<(), Error>
where
    W: AsyncWrite + Unpin,
{
    writer
        .write_all(format!("{response}\n").as_bytes())
        .await?;
    Ok(())
}
