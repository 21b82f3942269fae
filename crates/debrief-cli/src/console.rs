//! Line-oriented terminal I/O.
//!
//! Generic over the reader and writer so the interview and FAQ loops can be
//! driven from a byte slice in tests.

use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

pub struct Console<R, W> {
    lines: Lines<R>,
    out: W,
}

impl Console<BufReader<Stdin>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), io::stdout())
    }
}

impl<R: AsyncBufRead + Unpin, W: Write> Console<R, W> {
    pub fn new(reader: R, out: W) -> Self {
        Self {
            lines: reader.lines(),
            out,
        }
    }

    pub fn say(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", text)
    }

    /// Print `prompt` and read one line. `None` at end of input.
    pub async fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.out, "{}", prompt)?;
        self.out.flush()?;
        let line = self.lines.next_line().await?;
        Ok(line.map(|l| l.trim().to_string()))
    }

    pub fn into_output(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ask_reads_trimmed_lines_until_eof() {
        let mut console = Console::new(&b"  first  \nsecond\n"[..], Vec::new());

        assert_eq!(console.ask("> ").await.unwrap().as_deref(), Some("first"));
        assert_eq!(console.ask("> ").await.unwrap().as_deref(), Some("second"));
        assert_eq!(console.ask("> ").await.unwrap(), None);

        console.say("bye").unwrap();
        let out = String::from_utf8(console.into_output()).unwrap();
        assert_eq!(out, "> > > bye\n");
    }
}
