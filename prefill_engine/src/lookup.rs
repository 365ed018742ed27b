use crate::directory::{canonicalize, Directory};

/// A read-only snapshot of the links of a directory, for code to URL redirection.
///
/// Records without a link are not part of the snapshot. A snapshot never changes:
/// build a new one from the reloaded directory to pick up new links.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct LinkIndex {
    // (code, name, url), in directory order
    entries: Vec<(String, String, String)>,
}

impl LinkIndex {
    pub fn from_directory(dir: &Directory) -> LinkIndex {
        let entries = dir
            .iter()
            .filter_map(|r| match &r.url {
                Some(url) if !url.trim().is_empty() => {
                    Some((r.code.clone(), r.name.clone(), url.clone()))
                }
                _ => None,
            })
            .collect();
        LinkIndex { entries }
    }

    /// The link of a participant, with the same case and whitespace rules as the
    /// directory. `None` if the code is unknown or has no link yet.
    pub fn resolve(&self, code: &str) -> Option<&str> {
        let code = canonicalize(code);
        if code.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|e| e.0 == code)
            .map(|e| e.2.as_str())
    }

    /// (code, name) of every participant with a link.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|e| (e.0.as_str(), e.1.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::ParticipantRecord;

    #[test]
    fn resolves_case_insensitively() {
        let mut dir = Directory::new();
        let mut r = ParticipantRecord::new("STU001", "Alice");
        r.url = Some("https://f?id=1&a=STU001".to_string());
        dir.insert(r);
        dir.insert(ParticipantRecord::new("STU002", "Bob"));

        let index = LinkIndex::from_directory(&dir);
        assert_eq!(index.len(), 1);
        assert_eq!(index.resolve(" stu001 "), Some("https://f?id=1&a=STU001"));
        // Known but without a link.
        assert_eq!(index.resolve("STU002"), None);
        assert_eq!(index.resolve("STU003"), None);
        assert_eq!(index.resolve(""), None);
        assert_eq!(index.entries().collect::<Vec<_>>(), vec![("STU001", "Alice")]);
    }
}
