use std::path::{Component, Path, PathBuf};

/// Path helpers shared by the filesystem projection and error messages.
pub trait PathExt {
    /// Canonical form of the path if it exists, otherwise an absolute,
    /// lexically normalized one. Only meant for messages.
    fn best_effort_display(&self) -> String;

    /// Path relative to `root` with `/` separators, or `None` when the path
    /// is not below `root` or is not valid UTF-8.
    fn to_slash_relative(&self, root: &Path) -> Option<String>;

    /// Whether joining this relative path onto a directory stays inside it.
    fn is_contained(&self) -> bool;
}

impl PathExt for Path {
    fn best_effort_display(&self) -> String {
        if let Ok(canonical) = self.canonicalize() {
            return canonical.display().to_string();
        }

        let absolute = if self.is_absolute() {
            self.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|dir| dir.join(self))
                .unwrap_or_else(|_| self.to_path_buf())
        };
        normalize(&absolute).display().to_string()
    }

    fn to_slash_relative(&self, root: &Path) -> Option<String> {
        let relative = self.strip_prefix(root).ok()?;
        let segments = relative
            .components()
            .map(|component| component.as_os_str().to_str())
            .collect::<Option<Vec<_>>>()?;
        Some(segments.join("/"))
    }

    fn is_contained(&self) -> bool {
        self.components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
    }
}

impl PathExt for PathBuf {
    fn best_effort_display(&self) -> String {
        self.as_path().best_effort_display()
    }

    fn to_slash_relative(&self, root: &Path) -> Option<String> {
        self.as_path().to_slash_relative(root)
    }

    fn is_contained(&self) -> bool {
        self.as_path().is_contained()
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(components.last(), Some(Component::Normal(_))) {
                    components.pop();
                }
            }
            _ => components.push(component),
        }
    }

    components.iter().collect()
}
