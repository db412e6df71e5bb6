use std::path::PathBuf;

use assert_fs::prelude::*;
use plugin_core::{DeployerConfig, Error, InstallFailure, PluginInstaller, PluginMetadata};
use plugin_test_utils::archive::PluginArchive;
use plugin_test_utils::tree::relative_files;
use predicates::prelude::*;
use pretty_assertions::assert_eq;

fn installer() -> PluginInstaller {
    PluginInstaller::new(&DeployerConfig::default())
}

fn archive_with_libs(dir: &std::path::Path) -> PathBuf {
    PluginArchive::complete("web.jar", "web")
        .entry("META-INF/lib/a.jar", b"a")
        .entry("META-INF/lib/b.jar", b"b")
        .entry("META-INF/library/c.jar", b"c")
        .entry("org/example/web/Entry.class", b"class")
        .write_to(dir)
}

#[test]
fn test_install_in_place_records_original_without_copy() {
    let temp = assert_fs::TempDir::new().unwrap();
    let archive = PluginArchive::complete("web.jar", "web").write_to(temp.path());
    let before = relative_files(temp.path());

    let metadata = installer()
        .install(PluginMetadata::new(&archive).with_key("web"), None)
        .unwrap();

    assert_eq!(metadata.deployed_files(), [archive.clone()]);
    assert!(metadata.is_installed());
    assert_eq!(relative_files(temp.path()), before);
}

#[test]
fn test_install_to_new_directory_copies_archive() {
    let temp = assert_fs::TempDir::new().unwrap();
    let archive = PluginArchive::complete("web.jar", "web").write_to(temp.path());
    let original = std::fs::read(&archive).unwrap();
    let dest = temp.child("deploy/plugins/web");

    let metadata = installer()
        .install(PluginMetadata::new(&archive).with_key("web"), Some(dest.path()))
        .unwrap();

    dest.assert(predicate::path::is_dir());
    assert_eq!(metadata.deployed_files(), [dest.path().join("web.jar")]);
    dest.child("web.jar").assert(predicate::path::is_file());
    assert_eq!(std::fs::read(&archive).unwrap(), original);
    assert_eq!(std::fs::read(dest.path().join("web.jar")).unwrap(), original);
}

#[test]
fn test_dependencies_follow_archive_in_declared_order() {
    let temp = assert_fs::TempDir::new().unwrap();
    let archive = archive_with_libs(temp.path());
    let dest = temp.child("dest");
    let metadata = PluginMetadata::new(&archive)
        .with_key("web")
        .with_dependency_paths(["META-INF/lib/b.jar", "META-INF/lib/a.jar"]);

    let metadata = installer().install(metadata, Some(dest.path())).unwrap();

    assert_eq!(
        metadata.deployed_files(),
        [
            dest.path().join("web.jar"),
            dest.path().join("META-INF/lib/b.jar"),
            dest.path().join("META-INF/lib/a.jar"),
        ]
    );
    assert_eq!(
        relative_files(dest.path()),
        vec!["META-INF/lib/a.jar", "META-INF/lib/b.jar", "web.jar"]
    );
    dest.child("META-INF/lib/a.jar").assert("a");
}

#[test]
fn test_dependencies_unpack_next_to_archive_in_place() {
    let temp = assert_fs::TempDir::new().unwrap();
    let archive = archive_with_libs(temp.path());
    let metadata = PluginMetadata::new(&archive)
        .with_key("web")
        .with_dependency_paths(["META-INF/lib/a.jar"]);

    let metadata = installer().install(metadata, None).unwrap();

    assert_eq!(
        metadata.deployed_files(),
        [archive.clone(), temp.path().join("META-INF/lib/a.jar")]
    );
    temp.child("META-INF/lib/b.jar").assert("b");
    temp.child("META-INF/library").assert(predicate::path::missing());
}

#[test]
fn test_no_dependencies_means_no_unpacking() {
    let temp = assert_fs::TempDir::new().unwrap();
    let archive = archive_with_libs(temp.path());
    let dest = temp.child("dest");

    installer()
        .install(PluginMetadata::new(&archive).with_key("web"), Some(dest.path()))
        .unwrap();

    assert_eq!(relative_files(dest.path()), vec!["web.jar"]);
}

#[test]
fn test_missing_dependency_names_dependency_and_archive() {
    let temp = assert_fs::TempDir::new().unwrap();
    let archive = archive_with_libs(temp.path());
    let dest = temp.child("dest");
    let metadata = PluginMetadata::new(&archive)
        .with_key("web")
        .with_dependency_paths(["META-INF/lib/a.jar", "META-INF/lib/missing.jar"]);

    let err = installer()
        .install(metadata, Some(dest.path()))
        .unwrap_err();

    let message = err
        .to_string()
        .replace(&temp.path().display().to_string(), "[ROOT]");
    insta::assert_snapshot!(message, @"failed to install plugin web (web.jar): dependency META-INF/lib/missing.jar can not be found in [ROOT]/web.jar");

    match err {
        Error::Install {
            source: InstallFailure::MissingDependency { dependency, archive: named },
            ..
        } => {
            assert_eq!(dependency, "META-INF/lib/missing.jar");
            assert_eq!(named, archive);
        }
        other => panic!("expected MissingDependency, got: {other:?}"),
    }

    // No rollback: what was copied before the failure stays.
    dest.child("web.jar").assert(predicate::path::is_file());
    dest.child("META-INF/lib/a.jar").assert("a");
}

#[test]
fn test_legacy_extensions_follow_dependencies() {
    let temp = assert_fs::TempDir::new().unwrap();
    let archive = archive_with_libs(temp.path());
    let ext_one = temp.child("extras/one.jar");
    ext_one.write_str("one").unwrap();
    let ext_two = temp.child("extras/two.jar");
    ext_two.write_str("two").unwrap();
    let dest = temp.child("dest");

    let mut metadata = PluginMetadata::new(&archive)
        .with_key("web")
        .with_dependency_paths(["META-INF/lib/a.jar"]);
    metadata.add_deprecated_extension(ext_two.path());
    metadata.add_deprecated_extension(ext_one.path());

    let metadata = installer().install(metadata, Some(dest.path())).unwrap();

    assert_eq!(
        metadata.deployed_files(),
        [
            dest.path().join("web.jar"),
            dest.path().join("META-INF/lib/a.jar"),
            dest.path().join("two.jar"),
            dest.path().join("one.jar"),
        ]
    );
    dest.child("one.jar").assert("one");
    dest.child("two.jar").assert("two");
    ext_one.assert(predicate::path::is_file());
}

#[test]
fn test_missing_legacy_extension_aborts_install() {
    let temp = assert_fs::TempDir::new().unwrap();
    let archive = PluginArchive::complete("web.jar", "web").write_to(temp.path());
    let dest = temp.child("dest");
    let mut metadata = PluginMetadata::new(&archive).with_key("web");
    metadata.add_deprecated_extension(temp.path().join("gone.jar"));

    let err = installer()
        .install(metadata, Some(dest.path()))
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Install {
            source: InstallFailure::Fs(_),
            ..
        }
    ));
}

#[test]
fn test_reinstalling_fresh_metadata_overwrites() {
    let temp = assert_fs::TempDir::new().unwrap();
    let archive = archive_with_libs(temp.path());
    let dest = temp.child("dest");
    dest.child("META-INF/lib/a.jar").write_str("stale").unwrap();
    let metadata = PluginMetadata::new(&archive)
        .with_key("web")
        .with_dependency_paths(["META-INF/lib/a.jar"]);

    let first = installer()
        .install(metadata.clone(), Some(dest.path()))
        .unwrap();
    let second = installer().install(metadata, Some(dest.path())).unwrap();

    assert_eq!(first.deployed_files(), second.deployed_files());
    dest.child("META-INF/lib/a.jar").assert("a");
}

#[test]
fn test_installing_installed_metadata_is_rejected() {
    let temp = assert_fs::TempDir::new().unwrap();
    let archive = PluginArchive::complete("web.jar", "web").write_to(temp.path());
    let installed = installer()
        .install(PluginMetadata::new(&archive).with_key("web"), None)
        .unwrap();

    let err = installer().install(installed, None).unwrap_err();

    assert!(matches!(
        err,
        Error::Install {
            source: InstallFailure::AlreadyInstalled { deployed: 1 },
            ..
        }
    ));
}

#[test]
fn test_invalid_key_is_rejected_before_any_write() {
    let temp = assert_fs::TempDir::new().unwrap();
    let archive = PluginArchive::complete("web.jar", "web").write_to(temp.path());
    let dest = temp.child("dest");

    for key in ["", "web-analytics"] {
        let err = installer()
            .install(PluginMetadata::new(&archive).with_key(key), Some(dest.path()))
            .unwrap_err();

        assert!(
            matches!(
                err,
                Error::Install {
                    source: InstallFailure::InvalidKey { .. },
                    ..
                }
            ),
            "key {key:?} gave: {err:?}"
        );
    }
    dest.assert(predicate::path::missing());
}

#[test]
fn test_custom_library_prefix() {
    let temp = assert_fs::TempDir::new().unwrap();
    let archive = PluginArchive::complete("web.jar", "web")
        .entry("lib/a.jar", b"a")
        .entry("META-INF/lib/b.jar", b"b")
        .write_to(temp.path());
    let dest = temp.child("dest");
    let config = DeployerConfig {
        library_prefix: "lib".to_string(),
        ..DeployerConfig::default()
    };
    let metadata = PluginMetadata::new(&archive)
        .with_key("web")
        .with_dependency_paths(["lib/a.jar"]);

    let metadata = PluginInstaller::new(&config)
        .install(metadata, Some(dest.path()))
        .unwrap();

    assert_eq!(metadata.deployed_files().len(), 2);
    assert_eq!(
        relative_files(dest.path()),
        vec!["lib/a.jar", "web.jar"]
    );
}

#[test]
fn test_empty_library_prefix_refuses_to_unpack() {
    let temp = assert_fs::TempDir::new().unwrap();
    let archive = archive_with_libs(temp.path());
    let dest = temp.child("dest");
    let config = DeployerConfig {
        library_prefix: String::new(),
        ..DeployerConfig::default()
    };
    let metadata = PluginMetadata::new(&archive)
        .with_key("web")
        .with_dependency_paths(["META-INF/lib/a.jar"]);

    let err = PluginInstaller::new(&config)
        .install(metadata, Some(dest.path()))
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Install {
            source: InstallFailure::EmptyLibraryPrefix,
            ..
        }
    ));
    assert_eq!(relative_files(dest.path()), vec!["web.jar"]);
}

#[cfg(unix)]
#[test]
fn test_reinstall_over_read_only_dependency() {
    let temp = assert_fs::TempDir::new().unwrap();
    let archive = PluginArchive::complete("web.jar", "web")
        .entry_with_mode("META-INF/lib/a.jar", b"a", 0o444)
        .write_to(temp.path());
    let dest = temp.child("dest");
    let metadata = PluginMetadata::new(&archive)
        .with_key("web")
        .with_dependency_paths(["META-INF/lib/a.jar"]);

    installer()
        .install(metadata.clone(), Some(dest.path()))
        .unwrap();
    let second = installer().install(metadata, Some(dest.path())).unwrap();

    assert_eq!(second.deployed_files().len(), 2);
    dest.child("META-INF/lib/a.jar").assert("a");
}
