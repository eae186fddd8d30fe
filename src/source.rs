//! Reading script files.

use std::fs::File;
use std::path::Path;

use log::info;
use memmap2::Mmap;

use crate::error::Result;

/// Read a whole script through a read‑only memory map and validate it as
/// UTF‑8.
pub fn read_source(path: &Path) -> Result<String> {
    let file = File::open(path)?;

    // Mapping a zero-length file fails on some platforms.
    if file.metadata()?.len() == 0 {
        info!("Read 0 bytes from {:?}", path);
        return Ok(String::new());
    }

    // SAFETY: the map is only read while `file` is open and is dropped before
    // returning; a concurrent writer could change the bytes under us, which
    // at worst yields a UTF-8 error or odd source text.
    let map = unsafe { Mmap::map(&file)? };

    let text: &str = std::str::from_utf8(&map)?;

    info!("Read {} bytes from {:?}", text.len(), path);

    Ok(text.to_owned())
}
