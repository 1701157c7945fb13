/*
 * Copyright (c):
 * 2025 zephyrj
 * zephyrj@protonmail.com
 *
 * This file is part of gear-guesser.
 *
 * gear-guesser is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * gear-guesser is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with gear-guesser. If not, see <https://www.gnu.org/licenses/>.
 */

use std::{fs, io};
use std::path::{Path, PathBuf};

/// Lists the files directly inside `path` that have the extension `file_type`, sorted by
/// filename so the result is stable across platforms
pub fn get_sorted_filetypes_in_path(path: &Path, file_type: &str) -> io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(path)?.filter_map(|e| {
        let dir_entry = e.ok()?;
        let entry_path = dir_entry.path();
        if !entry_path.is_file() {
            return None;
        }
        match entry_path.extension() {
            Some(ext) if ext == file_type => Some(entry_path),
            _ => None
        }
    }).collect();
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Takes a name and turns it into a safe filename in the provided path. The filename
/// will be "safe" in the sense that the returned filename will be free of any characters that
/// would be illegal to use in a filesystem path and also unique so as not to
/// override anything else in the provided path. Additionally, any spaces in the filename will
/// be replaced with underscores.
///
/// To provide uniqueness a number will be appended to the returned filename if the name would
/// clash with anything else in the provided path. i.e. if you have a file called test.csv present
/// in the path then the next filename returned would be test2.csv
///
pub fn create_safe_filename_in_path(path: &Path, name: &str, extension: &str) -> PathBuf {
    let sanitized_name = sanitize_filename::sanitize(name).replace(" ", "_");
    let mut file_path = path.join(format!("{}.{}", sanitized_name, extension));
    let mut extra_num = 2;
    while file_path.exists() {
        file_path = path.join(format!("{}{}.{}", sanitized_name, extra_num, extension));
        extra_num += 1;
    }
    file_path
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use crate::filesystem::{create_safe_filename_in_path, get_sorted_filetypes_in_path};

    fn make_test_dir(test_name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gear_guesser_utils_{}", test_name));
        if dir.exists() {
            fs::remove_dir_all(&dir).unwrap();
        }
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn lists_only_matching_files_in_name_order() {
        let dir = make_test_dir("list");
        for name in ["2016-04.csv", "notes.txt", "2016-02.csv", "2015-12.csv"] {
            fs::write(dir.join(name), "").unwrap();
        }
        fs::create_dir(dir.join("nested.csv")).unwrap();

        let files = get_sorted_filetypes_in_path(&dir, "csv").unwrap();
        let names: Vec<String> = files.iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["2015-12.csv", "2016-02.csv", "2016-04.csv"]);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn safe_filename_does_not_clobber() {
        let dir = make_test_dir("safe_name");
        let first = create_safe_filename_in_path(&dir, "201603 merged", "csv");
        assert_eq!(first, dir.join("201603_merged.csv"));
        fs::write(&first, "").unwrap();
        let second = create_safe_filename_in_path(&dir, "201603 merged", "csv");
        assert_eq!(second, dir.join("201603_merged2.csv"));
        fs::remove_dir_all(&dir).unwrap();
    }
}
