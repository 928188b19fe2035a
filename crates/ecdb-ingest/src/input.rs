//! Buffered input files with transparent gzip support

use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

const BUFFER_CAPACITY: usize = 256 * 1024;

/// Open a file for buffered reading, decompressing `.gz` files on the fly
pub fn open_buffered(path: &Path) -> std::io::Result<Box<dyn BufRead>> {
    let file = File::open(path)?;

    if path.extension().and_then(|s| s.to_str()) == Some("gz") {
        Ok(Box::new(BufReader::with_capacity(
            BUFFER_CAPACITY,
            GzDecoder::new(file),
        )))
    } else {
        Ok(Box::new(BufReader::with_capacity(BUFFER_CAPACITY, file)))
    }
}
