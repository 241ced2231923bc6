//! Locating and reading definition files.
//!
//! A data file name that does not exist as given is looked up in a few
//! conventional places under the home directory.
use crate::error::{Error, Result};
use crate::tabular::{self, Row};
use std::fs;
use std::path::{Path, PathBuf};

const SEARCH_DIRS: &[&str] = &[".countersheetsextension", "", "Documents", "Documents/countersheets"];

/// Candidate locations for `name`, in lookup order. Absolute names have no
/// alternatives.
pub fn search_paths(name: &str, home: Option<&Path>) -> Vec<PathBuf> {
    let given = PathBuf::from(name);
    let mut paths = vec![given.clone()];
    if given.is_absolute() {
        return paths;
    }
    if let Some(home) = home {
        paths.extend(SEARCH_DIRS.iter().map(|dir| home.join(dir).join(name)));
    }
    paths
}

pub fn locate(name: &str, home: Option<&Path>) -> Result<PathBuf> {
    let searched = search_paths(name, home);
    match searched.iter().find(|p| p.is_file()) {
        Some(found) => {
            log::debug!("data file {} found at {}", name, found.display());
            Ok(found.clone())
        }
        None => Err(Error::DataFileNotFound {
            name: name.to_string(),
            searched,
        }),
    }
}

pub fn read_rows(path: &Path) -> Result<Vec<Row>> {
    let source = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(tabular::read_rows(&source))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_order() {
        let paths = search_paths("units.csv", Some(Path::new("/home/u")));
        let expected: Vec<PathBuf> = [
            "units.csv",
            "/home/u/.countersheetsextension/units.csv",
            "/home/u/units.csv",
            "/home/u/Documents/units.csv",
            "/home/u/Documents/countersheets/units.csv",
        ]
        .iter()
        .map(PathBuf::from)
        .collect();
        assert_eq!(paths, expected);
    }

    #[test]
    fn test_absolute_name() {
        assert_eq!(
            search_paths("/data/units.csv", Some(Path::new("/home/u"))),
            vec![PathBuf::from("/data/units.csv")]
        );
    }

    #[test]
    fn test_found_in_home_documents() {
        let home = tempfile::tempdir().unwrap();
        let docs = home.path().join("Documents");
        fs::create_dir_all(&docs).unwrap();
        fs::write(docs.join("only-here.csv"), ",a\n1,x\n").unwrap();
        let found = locate("only-here.csv", Some(home.path())).unwrap();
        assert_eq!(found, docs.join("only-here.csv"));
        assert_eq!(read_rows(&found).unwrap().len(), 2);
    }

    #[test]
    fn test_not_found() {
        let home = tempfile::tempdir().unwrap();
        let err = locate("missing-file.csv", Some(home.path())).unwrap_err();
        match err {
            Error::DataFileNotFound { searched, .. } => assert_eq!(searched.len(), 5),
            other => panic!("unexpected {:?}", other),
        }
    }
}
