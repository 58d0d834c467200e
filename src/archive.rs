use crate::batch::ConversionResult;
use chrono::{Local, NaiveDateTime};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

//===========================================================================//

/// Returns the name for an archive of `count` icons created at `when`, e.g.
/// `icons_3_2026-10-16_14-05-09.zip`.
pub fn archive_name(count: usize, when: &NaiveDateTime) -> String {
    format!(
        "icons_{}_{}_{}.zip",
        count,
        when.format("%Y-%m-%d"),
        when.format("%H-%M-%S")
    )
}

/// Like `archive_name`, using the current local wall-clock time.
pub fn archive_name_now(count: usize) -> String {
    archive_name(count, &Local::now().naive_local())
}

//===========================================================================//

/// Receives named ICO files, e.g. to bundle them into one archive.
pub trait ArchiveSink {
    /// Stores `bytes` under `name`.
    fn add(&mut self, name: &str, bytes: &[u8]) -> io::Result<()>;
}

/// Collects entries in memory, in the order they were added.
impl ArchiveSink for Vec<(String, Vec<u8>)> {
    fn add(&mut self, name: &str, bytes: &[u8]) -> io::Result<()> {
        self.push((name.to_string(), bytes.to_vec()));
        Ok(())
    }
}

/// Writes each entry as a file in one directory.
#[derive(Clone, Debug)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    /// Creates `root` (and any missing parents) and returns a sink that
    /// writes into it.
    pub fn create<P: AsRef<Path>>(root: P) -> io::Result<DirectorySink> {
        fs::create_dir_all(root.as_ref())?;
        Ok(DirectorySink { root: root.as_ref().to_path_buf() })
    }

    /// Returns the directory entries are written into.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ArchiveSink for DirectorySink {
    fn add(&mut self, name: &str, bytes: &[u8]) -> io::Result<()> {
        if name.is_empty() || name.contains(['/', '\\']) || name == ".." {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid archive entry name {:?}", name),
            ));
        }
        fs::write(self.root.join(name), bytes)
    }
}

//===========================================================================//

/// Feeds `results` to `sink` in order and returns the entry names used.
/// When two results share an output name, later ones get a numeric suffix
/// (`logo.ico`, `logo-2.ico`, ...).
pub fn bundle<'a, I, S>(results: I, sink: &mut S) -> io::Result<Vec<String>>
where
    I: IntoIterator<Item = &'a ConversionResult>,
    S: ArchiveSink + ?Sized,
{
    let mut used = HashSet::<String>::new();
    let mut names = Vec::new();
    for result in results {
        let name = unique_name(result.output_name(), &used);
        sink.add(&name, result.bytes())?;
        used.insert(name.clone());
        names.push(name);
    }
    log::debug!("Bundled {} icon(s)", names.len());
    Ok(names)
}

fn unique_name(name: &str, used: &HashSet<String>) -> String {
    if !used.contains(name) {
        return name.to_string();
    }
    let stem = name.strip_suffix(".ico").unwrap_or(name);
    let mut index = 2;
    loop {
        let candidate = format!("{}-{}.ico", stem, index);
        if !used.contains(&candidate) {
            return candidate;
        }
        index += 1;
    }
}

//===========================================================================//


//===========================================================================//
