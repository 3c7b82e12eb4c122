use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use bundlr::{ArtifactFormat, FileEntry, PackageBundle, TypeTable};
use tempfile::TempDir;
use walkdir::WalkDir;

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    fs::write(path, contents).expect("Failed to write file");
}

/// Every file below `root` as (slash separated relative path, contents).
fn snapshot(root: &Path) -> BTreeMap<String, String> {
    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|entry| entry.expect("Failed to walk directory"))
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            let relative = entry
                .path()
                .strip_prefix(root)
                .expect("Entry outside root")
                .components()
                .map(|c| c.as_os_str().to_string_lossy().to_string())
                .collect::<Vec<_>>()
                .join("/");
            let contents = fs::read_to_string(entry.path()).expect("Failed to read file");
            (relative, contents)
        })
        .collect()
}

fn fixture() -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let root = temp_dir.path();
    write(root, "package.json", "{\n  \"name\": \"plugin\"\n}\n");
    write(root, "index.js", "module.exports = require('./src/main')\n");
    write(root, "README.md", "# plugin\n");
    write(root, "src/main.ts", "export function main() {}\n");
    write(root, "src/lib/strings.ts", "export const greeting = 'hi'\n");
    write(root, "src/lib/deep/leaf.js", "// deepest\n");
    write(root, "config/settings.json", "{}");
    fs::create_dir_all(root.join("assets")).expect("Failed to create directory");
    temp_dir
}

#[test]
fn directory_survives_a_trip_through_every_artifact_form() {
    let source = fixture();
    let output = TempDir::new().expect("Failed to create temp directory");
    let types = TypeTable::default();
    let artifact = output.path().join("plugin.bundle");

    let bundle = PackageBundle::from_path(source.path(), &types).unwrap();
    bundle.bundle(&artifact, ArtifactFormat::Binary, true).unwrap();
    let restored = PackageBundle::open(&artifact, ArtifactFormat::Binary).unwrap();
    assert_eq!(restored, bundle);

    let extracted = output.path().join("extracted");
    let report = restored.extract(&extracted, &types).unwrap();

    let mut expected = snapshot(source.path());
    expected.remove("README.md");
    assert_eq!(snapshot(&extracted), expected);
    assert!(extracted.join("assets").is_dir());

    let skipped = report
        .skipped
        .iter()
        .map(|s| (s.path.as_str(), s.kind.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(skipped, vec![("README", "md")]);
}

#[test]
fn registered_kinds_make_extraction_complete() {
    let source = fixture();
    let output = TempDir::new().expect("Failed to create temp directory");
    let types: TypeTable = "types:\n  md: md\n".try_into().unwrap();

    let bundle = PackageBundle::from_path(source.path(), &types).unwrap();
    let text = bundle.to_text().unwrap();
    let report = PackageBundle::from_text(&text)
        .unwrap()
        .extract(output.path(), &types)
        .unwrap();

    assert!(report.is_complete());
    assert_eq!(snapshot(output.path()), snapshot(source.path()));
}

#[test]
fn three_level_nesting_resolves_through_name_lookups() {
    let mut bundle = PackageBundle::new();
    bundle.add_folder("a", Vec::new(), None);
    bundle.add_folder("b", Vec::new(), Some("a/b".into()));
    bundle.add_folder(
        "c",
        vec![FileEntry::new("leaf", "ts", "export {}")],
        Some("a/b/c".into()),
    );

    let text = bundle.to_text().unwrap();

    assert_eq!(
        text,
        "<<name=a type=folder>>\n\
         <<name=b type=folder folder=a>>\n\
         <<name=c type=folder folder=b>>\n\
         <<name=leaf type=ts folder=c>>\n<<export {}>>\n"
    );
    let parsed = PackageBundle::from_text(&text).unwrap();
    assert_eq!(
        parsed.folder("c").and_then(|f| f.path.as_deref()),
        Some("a/b/c")
    );
    assert_eq!(parsed, bundle);
}

#[test]
fn compressed_and_plain_text_decode_to_the_same_bundle() {
    let source = fixture();
    let bundle = PackageBundle::from_path(source.path(), &TypeTable::default()).unwrap();

    let from_bytes = PackageBundle::from_bytes(&bundle.to_bytes(true).unwrap()).unwrap();
    let from_text = PackageBundle::from_text(&bundle.to_text().unwrap()).unwrap();

    assert_eq!(from_bytes, from_text);
    assert!(PackageBundle::from_bytes(&bundle.to_bytes(false).unwrap()).is_err());
}
