// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::*;

#[test_log::test]
fn restore_defaults_if_missing() {
    let parent_dir = tempfile::tempdir().unwrap();
    let settings = Settings::restore_from_parent_dir(parent_dir.path());
    assert_eq!(
        Some(parent_dir.path().join("trackman.sqlite")),
        settings.database_file_path
    );
}

#[test_log::test]
fn save_and_load() {
    let parent_dir = tempfile::tempdir().unwrap();
    let settings = Settings {
        database_file_path: Some(PathBuf::from("/var/lib/trackman/library.sqlite")),
    };
    settings.save(parent_dir.path()).unwrap();
    assert!(parent_dir.path().join("trackman_settings.ron").is_file());

    assert_eq!(settings, Settings::load(parent_dir.path()).unwrap());
    assert_eq!(
        settings,
        Settings::restore_from_parent_dir(parent_dir.path())
    );
}

#[test_log::test]
fn restore_ignores_corrupt_file() {
    let parent_dir = tempfile::tempdir().unwrap();
    fs::write(parent_dir.path().join("trackman_settings.ron"), "(((").unwrap();
    assert!(Settings::load(parent_dir.path()).is_err());
    let settings = Settings::restore_from_parent_dir(parent_dir.path());
    assert!(settings.database_file_path.is_some());
}

#[test]
fn database_config() {
    let settings = Settings {
        database_file_path: Some(PathBuf::from("/tmp/trackman.sqlite")),
    };
    let config = settings.create_database_config().unwrap();
    assert_eq!(
        Storage::File {
            path: PathBuf::from("/tmp/trackman.sqlite")
        },
        config.connection.storage
    );
    assert!(config.migrate_schema);

    assert!(Settings::default().create_database_config().is_err());
}
