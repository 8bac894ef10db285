//! Singer metadata from `character.txt` / `character.yaml`.

use crate::oto::decode_text;
use std::path::Path;

/// Display metadata shipped with a voicebank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterInfo {
    pub name: Option<String>,
    pub author: Option<String>,
}

impl CharacterInfo {
    /// Read `character.txt`, falling back to `character.yaml`.
    ///
    /// Missing or unreadable files yield empty metadata.
    pub fn load(dir: &Path) -> Self {
        let txt = read(&dir.join("character.txt")).map(|text| Self::parse(&text, '='));
        let yaml = read(&dir.join("character.yaml")).map(|text| Self::parse(&text, ':'));
        match (txt, yaml) {
            (Some(txt), Some(yaml)) => Self {
                name: txt.name.or(yaml.name),
                author: txt.author.or(yaml.author),
            },
            (txt, yaml) => txt.or(yaml).unwrap_or_default(),
        }
    }

    /// Parse `key<sep>value` lines, keeping the first `name` and `author`.
    pub fn parse(text: &str, separator: char) -> Self {
        let mut info = Self::default();
        for line in text.lines() {
            let Some((key, value)) = line.trim().split_once(separator) else {
                continue;
            };
            let value = unquote(value.trim());
            if value.is_empty() {
                continue;
            }
            let slot = match key.trim().to_ascii_lowercase().as_str() {
                "name" => &mut info.name,
                "author" => &mut info.author,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.to_string());
            }
        }
        info
    }
}

fn read(path: &Path) -> Option<String> {
    std::fs::read(path).ok().map(|bytes| decode_text(&bytes))
}

fn unquote(value: &str) -> &str {
    let value = value.strip_prefix(['"', '\'']).unwrap_or(value);
    value.strip_suffix(['"', '\'']).unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_character_txt() {
        let info = CharacterInfo::parse("name=Teto\nimage=icon.bmp\nauthor=Someone\n", '=');
        assert_eq!(info.name.as_deref(), Some("Teto"));
        assert_eq!(info.author.as_deref(), Some("Someone"));
    }

    #[test]
    fn test_parse_character_yaml_quotes() {
        let info = CharacterInfo::parse("name: \"Defoko\"\nauthor: 'AmaZ'\n", ':');
        assert_eq!(info.name.as_deref(), Some("Defoko"));
        assert_eq!(info.author.as_deref(), Some("AmaZ"));
    }

    #[test]
    fn test_missing_files_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(CharacterInfo::load(dir.path()), CharacterInfo::default());
    }

    #[test]
    fn test_txt_wins_over_yaml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("character.txt"), "name=Txt\n").unwrap();
        std::fs::write(dir.path().join("character.yaml"), "name: Yaml\nauthor: Y\n").unwrap();
        let info = CharacterInfo::load(dir.path());
        assert_eq!(info.name.as_deref(), Some("Txt"));
        assert_eq!(info.author.as_deref(), Some("Y"));
    }
}
