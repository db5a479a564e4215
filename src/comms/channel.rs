//! Line-delimited JSON channel to the game server

use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use super::protocol::{Action, InboundMsg};

/// Channel over stdin/stdout, the way the game runner launches bots
pub type StdioChannel = TurnChannel<BufReader<io::Stdin>, io::Stdout>;

/// Reads one message per line and writes one action per line
pub struct TurnChannel<R, W> {
    reader: R,
    writer: W,
    line: Vec<u8>,
}

impl StdioChannel {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R, W> TurnChannel<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            line: Vec::new(),
        }
    }

    /// Read the next non-blank line as a message. Bytes that are not
    /// UTF-8 surface as a decode error, like any other malformed line.
    pub async fn read_message(&mut self) -> Result<InboundMsg, ChannelError> {
        loop {
            self.line.clear();
            let read = self.reader.read_until(b'\n', &mut self.line).await?;
            if read == 0 {
                return Err(ChannelError::Closed);
            }

            if self.line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            return serde_json::from_slice(&self.line).map_err(ChannelError::Decode);
        }
    }

    /// Write one action and flush it so the server sees it this turn
    pub async fn post_action(&mut self, action: &Action) -> Result<(), ChannelError> {
        let mut payload = serde_json::to_vec(action).map_err(ChannelError::Encode)?;
        payload.push(b'\n');
        self.writer.write_all(&payload).await?;
        self.writer.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
impl<R, W> TurnChannel<R, W> {
    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

/// Channel errors
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Game channel closed")]
    Closed,

    #[error("Channel I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed message: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Failed to encode action: {0}")]
    Encode(#[source] serde_json::Error),
}
