use prefill_engine::LinkIndex;

use crate::links::*;

/// Serves code to URL lookups from the persisted directory.
///
/// The snapshot only changes on an explicit `reload`, for example after a
/// reconciliation run updated the directory file.
pub struct LinkService {
    directory_path: String,
    index: LinkIndex,
}

impl LinkService {
    pub fn open(directory_path: &str) -> LinksResult<LinkService> {
        let mut service = LinkService {
            directory_path: directory_path.to_string(),
            index: LinkIndex::default(),
        };
        service.reload()?;
        Ok(service)
    }

    /// Rebuilds the snapshot from disk. On error, the previous snapshot is kept.
    pub fn reload(&mut self) -> LinksResult<usize> {
        let dir = load_directory(&self.directory_path)?;
        self.index = LinkIndex::from_directory(&dir);
        info!("Loaded {} student mappings", self.index.len());
        Ok(self.index.len())
    }

    pub fn resolve(&self, code: &str) -> Option<&str> {
        self.index.resolve(code)
    }

    pub fn index(&self) -> &LinkIndex {
        &self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::tests::test_dir;

    #[test]
    fn reload_picks_up_new_links() {
        let dir = test_dir("link_service_reload");
        let path = dir.join("students.csv");
        fs::write(&path, "code,name,url\nSTU001,Alice,https://f?id=1&a=1\nSTU002,Bob,\n").unwrap();
        let path_s = path.display().to_string();

        let mut service = LinkService::open(&path_s).unwrap();
        assert_eq!(service.index().len(), 1);
        assert_eq!(service.resolve("stu001"), Some("https://f?id=1&a=1"));
        assert_eq!(service.resolve("STU002"), None);

        fs::write(&path, "code,name,url\nSTU001,Alice,https://f?id=1&a=2\nSTU002,Bob,https://f?id=1&b=2\n").unwrap();
        // Unchanged until reloaded.
        assert_eq!(service.resolve("STU002"), None);
        assert_eq!(service.reload().unwrap(), 2);
        assert_eq!(service.resolve(" stu002 "), Some("https://f?id=1&b=2"));

        fs::remove_file(&path).unwrap();
        assert!(service.reload().is_err());
        assert_eq!(service.resolve("STU001"), Some("https://f?id=1&a=2"));
    }
}
