use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::DepthVizError;

/// Resolve a source path into the ordered list of files to process.
///
/// * a regular file with a `txt` extension is read as a list of paths, one
///   per line, in file order;
/// * any other regular file is the single entry of the list;
/// * anything else is walked recursively and every regular file found is
///   collected, in whatever order the walk yields (not sorted, and not
///   guaranteed stable across platforms).
///
/// An empty result (including a nonexistent root) is not an error; the
/// caller is expected to do nothing and terminate normally.
///
/// # Errors
///
/// Returns [`DepthVizError::FileError`] when a list file cannot be read.
pub fn collect_image_paths(path: &Path) -> Result<Vec<PathBuf>, DepthVizError> {
    if path.is_file() {
        if path.extension().map(|ext| ext == "txt").unwrap_or(false) {
            let content = fs::read_to_string(path)?;
            return Ok(content
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(PathBuf::from)
                .collect());
        }
        return Ok(vec![path.to_path_buf()]);
    }

    Ok(walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::collect_image_paths;
    use crate::error::DepthVizError;
    use std::fs;

    #[test]
    fn single_file_is_its_own_list() -> Result<(), DepthVizError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("dog.jpeg");
        fs::write(&file_path, b"not really a jpeg")?;

        let paths = collect_image_paths(&file_path)?;
        assert_eq!(paths, vec![file_path]);
        Ok(())
    }

    #[test]
    fn txt_file_lists_paths_in_order() -> Result<(), DepthVizError> {
        let tmp_dir = tempfile::tempdir()?;
        let list_path = tmp_dir.path().join("batch.txt");
        fs::write(&list_path, "b/second.png\na/first.jpg\n\nthird.webp\n")?;

        let paths = collect_image_paths(&list_path)?;
        let names: Vec<_> = paths.iter().map(|p| p.to_str().unwrap()).collect();
        assert_eq!(names, vec!["b/second.png", "a/first.jpg", "third.webp"]);
        Ok(())
    }

    #[test]
    fn directory_walk_is_recursive_and_files_only() -> Result<(), DepthVizError> {
        let tmp_dir = tempfile::tempdir()?;
        fs::create_dir_all(tmp_dir.path().join("nested/deeper"))?;
        fs::write(tmp_dir.path().join("top.png"), b"")?;
        fs::write(tmp_dir.path().join("nested/mid.jpg"), b"")?;
        fs::write(tmp_dir.path().join("nested/deeper/leaf.jpeg"), b"")?;

        let mut paths = collect_image_paths(tmp_dir.path())?;
        paths.sort();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["leaf.jpeg", "mid.jpg", "top.png"]);
        Ok(())
    }

    #[test]
    fn missing_root_yields_empty_list() -> Result<(), DepthVizError> {
        let tmp_dir = tempfile::tempdir()?;
        let paths = collect_image_paths(&tmp_dir.path().join("does-not-exist"))?;
        assert!(paths.is_empty());
        Ok(())
    }

    #[test]
    fn empty_directory_yields_empty_list() -> Result<(), DepthVizError> {
        let tmp_dir = tempfile::tempdir()?;
        let paths = collect_image_paths(tmp_dir.path())?;
        assert!(paths.is_empty());
        Ok(())
    }
}
