use std::path::{Path, PathBuf};

use gmaps2vcard_core::{to_vcard, vcard_file_name, BusinessRecord};

/// Write `record` as a `.vcf` into `dir`, overwriting any file of the same
/// name, and return the path written.
pub(crate) fn write_vcard(dir: &Path, record: &BusinessRecord) -> std::io::Result<PathBuf> {
    let path = dir.join(vcard_file_name(record));
    std::fs::write(&path, to_vcard(record))?;
    Ok(path)
}
