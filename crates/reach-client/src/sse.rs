use reach_core::LogEntry;

const DATA_PREFIX: &str = "data: ";

/// Incremental decoder for the agent's newline-delimited event stream.
///
/// Chunks arrive with no alignment to line boundaries, so the tail of the
/// buffer after the last newline is carried over until the next chunk (or
/// end of stream) completes it. The buffer holds raw bytes and only whole
/// lines are decoded as UTF-8: a chunk boundary may fall inside a multibyte
/// character, and decoding per chunk would mangle it.
#[derive(Debug, Default)]
pub struct StreamLineDecoder {
    buffer: Vec<u8>,
}

impl StreamLineDecoder {
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Feed one raw chunk, returning every entry whose line completed.
    pub fn push_chunk(&mut self, chunk: &[u8]) -> Vec<LogEntry> {
        self.buffer.extend_from_slice(chunk);

        let mut out = Vec::new();
        while let Some(split_at) = self.buffer.iter().position(|byte| *byte == b'\n') {
            let line_bytes: Vec<u8> = self.buffer.drain(..=split_at).collect();
            let line = String::from_utf8_lossy(&line_bytes[..split_at]);

            if let Some(entry) = parse_stream_line(&line) {
                out.push(entry);
            }
        }
        out
    }
}

/// Parse one complete line. Lines without the `data: ` prefix (SSE comments,
/// keep-alive pings) and lines whose payload is not valid JSON are dropped
/// without error.
pub fn parse_stream_line(line: &str) -> Option<LogEntry> {
    let payload = line.strip_prefix(DATA_PREFIX)?;
    serde_json::from_str(payload).ok()
}
