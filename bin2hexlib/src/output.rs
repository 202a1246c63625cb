use crate::error::{ConvertError, ConvertErrorKind};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Opens (creates or truncates) the output file and wraps it in a `BufWriter`.
/// The parent directory is not created, a missing directory is an open failure.
pub(crate) fn open(filepath: &Path) -> Result<BufWriter<File>, ConvertError> {
    let file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(filepath)
        .map_err(|err| {
            ConvertError::OutputError(ConvertErrorKind::FailedToOpen(
                filepath.to_path_buf(),
                err.kind(),
            ))
        })?;

    Ok(BufWriter::new(file))
}

/// Writes the records produced by `emit` into the file at `filepath`.
///
/// The file is closed when the writer goes out of scope, on success and on error alike.
/// A failure after the file was opened leaves whatever was written so far on disk.
pub(crate) fn write_file<F>(filepath: &Path, emit: F) -> Result<(), ConvertError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), ConvertError>,
{
    let mut writer = open(filepath)?;
    emit(&mut writer)?;
    writer.flush().map_err(|err| ConvertError::write(&err))
}

/// Writes a single record line terminated by a newline.
pub(crate) fn write_line<W: Write>(writer: &mut W, line: &str) -> Result<(), ConvertError> {
    writeln!(writer, "{line}").map_err(|err| ConvertError::write(&err))
}
