use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::StoreError;
use crate::family::PREFIX_LEN;

/// Returns the concatenation of every line in the sorted master file at
/// `master_path` whose hash begins with `prefix`, with the 5-character
/// prefix stripped from each line.
///
/// `master_path` must be sorted lexicographically by hash; a non-sorted
/// file yields an unspecified but bounded slice rather than a crash.
pub fn slice(master_path: &Path, prefix: &str) -> Result<String, StoreError> {
    debug_assert_eq!(prefix.len(), PREFIX_LEN);

    let mut file = File::open(master_path).map_err(|source| StoreError::Io {
        path: master_path.to_path_buf(),
        source,
    })?;
    let len = file
        .metadata()
        .map_err(|source| StoreError::Io {
            path: master_path.to_path_buf(),
            source,
        })?
        .len();

    let anchor = find_window_start(&mut file, len, prefix, master_path)?;

    file.seek(SeekFrom::Start(anchor))
        .map_err(|source| io_err(master_path, source))?;
    let mut reader = BufReader::new(file);

    // Anchor lands mid-line except at offset 0; discard the partial line.
    if anchor != 0 {
        let mut discard = Vec::new();
        reader
            .read_until(b'\n', &mut discard)
            .map_err(|source| io_err(master_path, source))?;
    }

    let mut out = String::new();
    loop {
        let mut line = Vec::new();
        let bytes_read = reader
            .read_until(b'\n', &mut line)
            .map_err(|source| io_err(master_path, source))?;
        if bytes_read == 0 {
            break;
        }
        let line = strip_newline(&line);
        if line.len() < PREFIX_LEN || &line[..PREFIX_LEN] != prefix.as_bytes() {
            break;
        }
        append_stripped_line(&mut out, &line[PREFIX_LEN..]);
    }

    Ok(out)
}

/// Binary-searches byte offsets in `[0, len)` for the first line whose
/// 5-character prefix is `>= prefix`.
fn find_window_start(
    file: &mut File,
    len: u64,
    prefix: &str,
    master_path: &Path,
) -> Result<u64, StoreError> {
    let (mut start, mut end) = (0u64, len);

    while start + 1 < end {
        let mid = start + (end - start) / 2;
        file.seek(SeekFrom::Start(mid))
            .map_err(|source| io_err(master_path, source))?;
        let mut reader = BufReader::new(&mut *file);

        // Skip the (possibly partial) line we landed inside of.
        let mut discard = Vec::new();
        reader
            .read_until(b'\n', &mut discard)
            .map_err(|source| io_err(master_path, source))?;

        let mut candidate = Vec::new();
        let bytes_read = reader
            .read_until(b'\n', &mut candidate)
            .map_err(|source| io_err(master_path, source))?;
        if bytes_read == 0 {
            // `mid` landed inside the last line; treat as end-of-window.
            end = mid;
            continue;
        }

        let candidate = strip_newline(&candidate);
        let candidate_prefix = if candidate.len() >= PREFIX_LEN {
            &candidate[..PREFIX_LEN]
        } else {
            candidate
        };

        if candidate_prefix < prefix.as_bytes() {
            start = mid;
        } else {
            end = mid;
        }
    }

    if start != 0 {
        Ok(end)
    } else {
        Ok(start)
    }
}

fn strip_newline(line: &[u8]) -> &[u8] {
    let mut line = line;
    if line.last() == Some(&b'\n') {
        line = &line[..line.len() - 1];
    }
    if line.last() == Some(&b'\r') {
        line = &line[..line.len() - 1];
    }
    line
}

/// Lines already carrying `:COUNT` pass through verbatim; bare-hash lines
/// (no `:`) are treated as count 1.
fn append_stripped_line(out: &mut String, suffix_and_maybe_count: &[u8]) {
    let text = String::from_utf8_lossy(suffix_and_maybe_count);
    out.push_str(&text);
    if !text.contains(':') {
        out.push_str(":1");
    }
    out.push('\n');
}

fn io_err(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_master(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn slices_matching_prefix_and_strips_it() {
        let master = write_master(&[
            "00001ABCDEF0000000000000000000000000000:1",
            "00001DEF0000000000000000000000000000000:3",
            "00002FFF0000000000000000000000000000000:1",
        ]);

        let result = slice(master.path(), "00001").unwrap();
        assert_eq!(
            result,
            "ABCDEF0000000000000000000000000000:1\n\
             DEF0000000000000000000000000000000:3\n"
        );
    }

    #[test]
    fn bare_hash_lines_get_implicit_count_one() {
        let master = write_master(&["AAAAA1111111111111111111111111111111111"]);
        let result = slice(master.path(), "AAAAA").unwrap();
        assert_eq!(result, "1111111111111111111111111111111111:1\n");
    }

    #[test]
    fn missing_prefix_yields_empty_slice() {
        let master = write_master(&[
            "00001AAA0000000000000000000000000000000:1",
            "00003BBB0000000000000000000000000000000:1",
        ]);
        assert_eq!(slice(master.path(), "00002").unwrap(), "");
    }

    #[test]
    fn first_and_last_prefix_are_handled() {
        let master = write_master(&[
            "00000AAA0000000000000000000000000000000:1",
            "FFFFFBBB0000000000000000000000000000000:2",
        ]);
        assert_eq!(
            slice(master.path(), "00000").unwrap(),
            "AAA0000000000000000000000000000000:1\n"
        );
        assert_eq!(
            slice(master.path(), "FFFFF").unwrap(),
            "BBB0000000000000000000000000000000:2\n"
        );
    }

    #[test]
    fn single_line_file() {
        let master = write_master(&["12345AAA0000000000000000000000000000000:9"]);
        assert_eq!(
            slice(master.path(), "12345").unwrap(),
            "AAA0000000000000000000000000000000:9\n"
        );
        assert_eq!(slice(master.path(), "00000").unwrap(), "");
    }
}
