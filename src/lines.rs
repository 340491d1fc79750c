// src/lines.rs
//! Line reading for the plain-text inputs (repository, stats and pair files).

use std::io::{self, BufRead};
use std::str::Utf8Error;

/// One decoded line, or the reason it could not be decoded.
pub type LineResult<'a> = Result<&'a str, Utf8Error>;

/// Feeds every line of `reader` to `on_line`, without its `\n` or `\r\n`.
///
/// A line that is not valid UTF-8 is handed over as `Err` so the caller can
/// skip it; reading continues with the next line. Returns the number of
/// lines read.
///
/// # Errors
/// Returns error if reading from `reader` fails.
pub fn for_each_line<R, F>(mut reader: R, mut on_line: F) -> io::Result<u64>
where
    R: BufRead,
    F: FnMut(LineResult<'_>),
{
    let mut buf = Vec::new();
    let mut read = 0;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(read);
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        read += 1;
        on_line(std::str::from_utf8(&buf));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_line_does_not_stop_reading() -> io::Result<()> {
        let input: &[u8] = b"a,1\r\n\xff\xfe\nb,2";
        let mut good = Vec::new();
        let mut bad = 0;
        let n = for_each_line(input, |line| match line {
            Ok(text) => good.push(text.to_string()),
            Err(_) => bad += 1,
        })?;
        assert_eq!(n, 3);
        assert_eq!(good, vec!["a,1", "b,2"]);
        assert_eq!(bad, 1);
        Ok(())
    }
}
