//! Opening files so no other handle can touch them while they are patched

use std::{
    fs::{File, OpenOptions},
    io,
    path::Path,
};

/// Open `path` with `options` and hold an exclusive lock until the handle is dropped.
///
/// On Windows the file is also opened without any sharing, so a file that is already open
/// elsewhere fails to open at all. Elsewhere the lock is advisory and only conflicts with other
/// lockers. A lock that is already held fails with [`io::ErrorKind::WouldBlock`] rather than
/// waiting.
pub(crate) fn open_exclusive(options: &mut OpenOptions, path: &Path) -> io::Result<File> {
    #[cfg(windows)]
    {
        use std::os::windows::fs::OpenOptionsExt;
        options.share_mode(0);
    }

    let file = options.open(path)?;
    file.try_lock().map_err(io::Error::from)?;
    Ok(file)
}
