//! Alias table built from one or more `oto.ini` files.

use crate::character::CharacterInfo;
use crate::error::{Result, VoicebankError};
use crate::oto::{decode_text, parse_oto, OtoEntry};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uta_core::{TimingEntry, TimingLookup};
use walkdir::WalkDir;

const OTO_FILE_NAME: &str = "oto.ini";

/// Read-only alias → timing table.
///
/// Later entries for the same alias replace earlier ones, so nested
/// `oto.ini` files override the root one.
#[derive(Debug, Clone, Default)]
pub struct Voicebank {
    entries: HashMap<String, OtoEntry>,
    character: CharacterInfo,
    root: Option<PathBuf>,
    oto_files: usize,
}

impl Voicebank {
    /// Empty voicebank; every lookup falls back to default timing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `oto.ini` text.
    pub fn from_oto_str(text: &str) -> Self {
        let mut bank = Self::new();
        bank.extend(parse_oto(text));
        bank.oto_files = 1;
        bank
    }

    /// Load a single `oto.ini` file.
    pub fn load_oto(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(VoicebankError::NotFound(path.to_path_buf()));
        }

        let mut bank = Self::new();
        bank.read_oto(path)?;
        bank.root = path.parent().map(Path::to_path_buf);
        if let Some(root) = &bank.root {
            bank.character = CharacterInfo::load(root);
        }

        if bank.is_empty() {
            return Err(VoicebankError::Empty(path.to_path_buf()));
        }
        Ok(bank)
    }

    /// Load a voicebank directory: the root `oto.ini` plus every nested one.
    ///
    /// File names match case-insensitively. Files are read in a fixed order
    /// (root first, then by path) so duplicate aliases resolve the same way
    /// on every platform.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(VoicebankError::NotFound(dir.to_path_buf()));
        }

        let mut oto_paths: Vec<(usize, PathBuf)> = WalkDir::new(dir)
            .follow_links(false)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("skipping unreadable entry: {e}");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry
                    .file_name()
                    .to_string_lossy()
                    .eq_ignore_ascii_case(OTO_FILE_NAME)
            })
            .map(|entry| (entry.depth(), entry.into_path()))
            .collect();
        oto_paths.sort();

        let mut bank = Self::new();
        for (_, path) in &oto_paths {
            bank.read_oto(path)?;
        }
        bank.character = CharacterInfo::load(dir);
        bank.root = Some(dir.to_path_buf());

        debug!(
            root = %dir.display(),
            oto_files = bank.oto_files,
            aliases = bank.len(),
            "voicebank loaded"
        );

        if bank.is_empty() {
            return Err(VoicebankError::Empty(dir.to_path_buf()));
        }
        Ok(bank)
    }

    /// Load from either a directory or a single `oto.ini`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.is_dir() {
            Self::load_dir(path)
        } else {
            Self::load_oto(path)
        }
    }

    fn read_oto(&mut self, path: &Path) -> Result<()> {
        let bytes = std::fs::read(path).map_err(|e| VoicebankError::io(path, e))?;
        let entries = parse_oto(&decode_text(&bytes));
        debug!(path = %path.display(), entries = entries.len(), "parsed oto.ini");
        self.extend(entries);
        self.oto_files += 1;
        Ok(())
    }

    /// Add or replace a single alias.
    pub fn insert(&mut self, entry: OtoEntry) {
        self.entries.insert(entry.alias.clone(), entry);
    }

    pub fn get(&self, alias: &str) -> Option<&OtoEntry> {
        self.entries.get(alias)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All aliases, sorted.
    pub fn aliases(&self) -> Vec<&str> {
        let mut aliases: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        aliases.sort_unstable();
        aliases
    }

    /// Singer name from `character.txt`, if any.
    pub fn name(&self) -> Option<&str> {
        self.character.name.as_deref()
    }

    pub fn author(&self) -> Option<&str> {
        self.character.author.as_deref()
    }

    /// Directory the voicebank was loaded from.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Number of `oto.ini` files read.
    pub fn oto_file_count(&self) -> usize {
        self.oto_files
    }
}

impl Extend<OtoEntry> for Voicebank {
    fn extend<I: IntoIterator<Item = OtoEntry>>(&mut self, iter: I) {
        for entry in iter {
            self.insert(entry);
        }
    }
}

impl TimingLookup for Voicebank {
    fn lookup(&self, lyric: &str) -> Option<TimingEntry> {
        self.entries.get(lyric).map(|entry| entry.timing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const ROOT_OTO: &str = "_a.wav=a,0,60,0,30,10\n_ka.wav=ka,5,80,0,45,12\n";

    #[test]
    fn test_from_str_and_lookup() {
        let bank = Voicebank::from_oto_str(ROOT_OTO);
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.aliases(), ["a", "ka"]);
        let ka = bank.lookup("ka").unwrap();
        assert_eq!(ka.preutter_ms, 45.0);
        assert!(bank.lookup("missing").is_none());
    }

    #[test]
    fn test_duplicate_alias_last_wins() {
        let bank = Voicebank::from_oto_str("x.wav=a,0,0,0,10,0\ny.wav=a,0,0,0,20,0\n");
        assert_eq!(bank.len(), 1);
        assert_eq!(bank.get("a").unwrap().wav_file, "y.wav");
    }

    #[test]
    fn test_load_dir_with_nested_oto() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("oto.ini"), ROOT_OTO).unwrap();
        let nested = dir.path().join("C4");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("OTO.INI"), "_ka.wav=ka,0,0,0,99,0\n_sa.wav=sa,0,0,0,20,0\n").unwrap();
        fs::write(dir.path().join("character.txt"), "name=Test Singer\n").unwrap();

        let bank = Voicebank::load_dir(dir.path()).unwrap();
        assert_eq!(bank.oto_file_count(), 2);
        assert_eq!(bank.aliases(), ["a", "ka", "sa"]);
        // nested file overrides the root entry
        assert_eq!(bank.lookup("ka").unwrap().preutter_ms, 99.0);
        assert_eq!(bank.name(), Some("Test Singer"));
        assert_eq!(bank.root(), Some(dir.path()));
    }

    #[test]
    fn test_load_missing_paths() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            Voicebank::load_dir(&missing),
            Err(VoicebankError::NotFound(_))
        ));
        assert!(matches!(
            Voicebank::load_oto(missing.join("oto.ini")),
            Err(VoicebankError::NotFound(_))
        ));
    }

    #[test]
    fn test_load_empty_dir_is_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("oto.ini"), "# nothing here\n").unwrap();
        assert!(matches!(
            Voicebank::load_dir(dir.path()),
            Err(VoicebankError::Empty(_))
        ));
    }

    #[test]
    fn test_load_dispatches_on_path_kind() {
        let dir = tempfile::tempdir().unwrap();
        let oto = dir.path().join("oto.ini");
        fs::write(&oto, ROOT_OTO).unwrap();
        assert_eq!(Voicebank::load(dir.path()).unwrap().len(), 2);
        assert_eq!(Voicebank::load(&oto).unwrap().len(), 2);
    }
}
