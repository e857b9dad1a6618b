use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Line oriented prompt/response over any reader and writer.
/// Every read returns `None` once the input is exhausted.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(input: R, output: W) -> Self {
        Console { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub async fn say(&mut self, msg: &str) -> Result<()> {
        self.output.write_all(msg.as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        self.output.flush().await?;
        Ok(())
    }

    pub async fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.output.write_all(prompt.as_bytes()).await?;
        self.output.flush().await?;

        // bytes that are not utf-8 turn into U+FFFD and fail validation like any bad answer
        let mut raw = Vec::new();
        if self.input.read_until(b'\n', &mut raw).await? == 0 {
            return Ok(None);
        }
        let mut line = String::from_utf8_lossy(&raw).into_owned();
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    /// Ask again until something other than blanks comes back
    pub async fn read_non_empty(
        &mut self,
        prompt: &str,
        complaint: &str,
    ) -> Result<Option<String>> {
        loop {
            match self.read_line(prompt).await? {
                None => return Ok(None),
                Some(line) if line.trim().is_empty() => self.say(complaint).await?,
                Some(line) => return Ok(Some(line)),
            }
        }
    }

    /// Ask again until a non negative number comes back
    pub async fn read_id(&mut self, prompt: &str, complaint: &str) -> Result<Option<i32>> {
        loop {
            match self.read_line(prompt).await? {
                None => return Ok(None),
                Some(line) => match line.trim().parse::<i32>() {
                    Ok(id) if id >= 0 => return Ok(Some(id)),
                    _ => self.say(complaint).await?,
                },
            }
        }
    }
}
