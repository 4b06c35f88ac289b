use std::{fs, io::Write, path::Path};

/// Write-then-rename so a crash mid-write never leaves a torn record for
/// the next startup to choke on.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let tmp = path.with_extension("new");
    {
        let mut f = fs::File::create(&tmp)?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }
    fs::rename(tmp, path)
}
