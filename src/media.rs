// ABOUTME: Scans a byte-stream H.264 file and emits successive access units, stripping start codes
// ABOUTME: Grounded on `original_source/videoRTSPServer/mediafile.cpp`'s `Nalu::readNextNalu`

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

/// One coded access unit, excluding its start-code prefix.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccessUnit {
    pub data: Vec<u8>,
    pub valid: bool,
}

/// A synchronous cursor over a byte-stream elementary file.
///
/// Wraps `std::fs::File` rather than `tokio::fs::File`: the reader is a
/// per-byte scan with backward seeks, which doesn't map onto `tokio::fs`'s
/// seek-relative-to-current primitives any more cheaply than the blocking
/// API does. Callers drive it from an async context via
/// `tokio::task::spawn_blocking`.
pub struct MediaFile {
    file: File,
}

impl MediaFile {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(MediaFile {
            file: File::open(path)?,
        })
    }

    /// Returns the next access unit, or an invalid one at end of file.
    ///
    /// Direct translation of `Nalu::readNextNalu`: detect and consume a
    /// leading start code (tolerating a malformed one by seeking back over
    /// it), then scan byte by byte until the next start code or EOF,
    /// trimming the next unit's prefix back off the output and rewinding
    /// the cursor so the following call re-reads it.
    pub fn read_next_access_unit(&mut self) -> io::Result<AccessUnit> {
        let mut lead = [0u8; 4];
        let read_count = read_up_to(&mut self.file, &mut lead[..3])?;

        if read_count < 3 {
            return Ok(AccessUnit::default());
        }

        if lead[0] == 0 && lead[1] == 0 && lead[2] == 1 {
            // 3-byte start code consumed.
        } else if lead[0] == 0 && lead[1] == 0 && lead[2] == 0 {
            let fourth = read_up_to(&mut self.file, &mut lead[3..4])?;
            if fourth == 1 && lead[3] == 1 {
                // 4-byte start code consumed.
            } else {
                self.file.seek(SeekFrom::Current(-(fourth as i64)))?;
            }
        } else {
            self.file.seek(SeekFrom::Current(-3))?;
        }

        let mut data = Vec::new();
        let mut zero_count: u32 = 0;
        let mut byte = [0u8; 1];

        loop {
            let n = self.file.read(&mut byte)?;
            if n == 0 {
                break;
            }
            data.push(byte[0]);

            match byte[0] {
                0x00 => zero_count += 1,
                0x01 => {
                    if zero_count >= 2 {
                        let start_code_len = if zero_count >= 3 { 4 } else { 3 };
                        data.truncate(data.len() - start_code_len);
                        self.file
                            .seek(SeekFrom::Current(-(start_code_len as i64)))?;
                        return Ok(AccessUnit { data, valid: true });
                    }
                    zero_count = 0;
                }
                _ => zero_count = 0,
            }
        }

        let valid = !data.is_empty();
        Ok(AccessUnit { data, valid })
    }
}

/// Reads into `buf`, returning the number of bytes actually read (may be
/// fewer than `buf.len()` on a short file, mirroring `ifstream::gcount`).
fn read_up_to(file: &mut File, buf: &mut [u8]) -> io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match file.read(&mut buf[total..])? {
            0 => break,
            n => total += n,
        }
    }
    Ok(total)
}
