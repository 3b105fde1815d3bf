//! Build resource catalog.
//!
//! Every file the build needs besides the project itself: the desktop entry,
//! the launch wrapper, the driver script, the icon and the linuxdeploy input
//! plugins. Entries are rendered in declaration order.

mod render;

pub use render::{ResourceRenderer, placeholder_icon};

/// Directory (relative to the project root) holding generated resources.
pub const BUILD_RESOURCES_DIR: &str = "build_resources";

/// Frozen requirements exported for the bundled interpreter.
pub const FROZEN_REQUIREMENTS_FILE: &str = "requirements_for_appimage.txt";

/// Driver script invoked to assemble the AppImage.
pub const BUILD_SCRIPT: &str = "build_appimage.sh";

/// Suffix marking template sources; stripped from destination names.
pub const TEMPLATE_SUFFIX: &str = ".hbs";

/// Where the content of a resource comes from.
#[derive(Clone, Copy, Debug)]
pub enum ResourceSource {
    /// Handlebars template rendered against the plugin metadata
    Template(&'static str),
    /// Bytes written verbatim
    Static(&'static [u8]),
    /// Project icon if configured, placeholder PNG otherwise
    Icon,
}

/// One file the renderer must produce.
#[derive(Clone, Copy, Debug)]
pub struct BuildResource {
    /// Source file name
    pub filename: &'static str,
    /// Permission bits applied after writing
    pub file_mode: u32,
    /// Destination directory relative to the project root
    pub destination_dir: &'static str,
    /// Template for the destination name; `None` keeps the source name
    pub destination_filename_pattern: Option<&'static str>,
    pub source: ResourceSource,
}

impl BuildResource {
    /// Whether the content is rendered rather than copied.
    pub fn is_template(&self) -> bool {
        matches!(self.source, ResourceSource::Template(_))
    }

    /// Source file name with the template suffix stripped.
    pub fn default_destination_filename(&self) -> &'static str {
        self.filename
            .strip_suffix(TEMPLATE_SUFFIX)
            .unwrap_or(self.filename)
    }
}

/// Ordered catalog of build resources.
pub static BUILD_RESOURCES: [BuildResource; 7] = [
    BuildResource {
        filename: "application.desktop.hbs",
        file_mode: 0o644,
        destination_dir: BUILD_RESOURCES_DIR,
        destination_filename_pattern: Some("{{app_name}}.desktop"),
        source: ResourceSource::Template(include_str!("templates/application.desktop.hbs")),
    },
    BuildResource {
        filename: "CustomAppRun.sh.hbs",
        file_mode: 0o755,
        destination_dir: BUILD_RESOURCES_DIR,
        destination_filename_pattern: None,
        source: ResourceSource::Template(include_str!("templates/CustomAppRun.sh.hbs")),
    },
    BuildResource {
        filename: "build_appimage.sh.hbs",
        file_mode: 0o755,
        destination_dir: ".",
        destination_filename_pattern: None,
        source: ResourceSource::Template(include_str!("templates/build_appimage.sh.hbs")),
    },
    BuildResource {
        filename: "icon.png",
        file_mode: 0o644,
        destination_dir: BUILD_RESOURCES_DIR,
        destination_filename_pattern: Some("{{app_name}}.png"),
        source: ResourceSource::Icon,
    },
    BuildResource {
        filename: "linuxdeploy-plugin-conda.sh",
        file_mode: 0o755,
        destination_dir: BUILD_RESOURCES_DIR,
        destination_filename_pattern: None,
        source: ResourceSource::Static(include_bytes!("templates/linuxdeploy-plugin-conda.sh")),
    },
    BuildResource {
        filename: "linuxdeploy-plugin-compile.sh",
        file_mode: 0o755,
        destination_dir: BUILD_RESOURCES_DIR,
        destination_filename_pattern: None,
        source: ResourceSource::Static(include_bytes!(
            "templates/linuxdeploy-plugin-compile.sh"
        )),
    },
    BuildResource {
        filename: "linuxdeploy-plugin-copyapp.sh",
        file_mode: 0o755,
        destination_dir: BUILD_RESOURCES_DIR,
        destination_filename_pattern: None,
        source: ResourceSource::Static(include_bytes!(
            "templates/linuxdeploy-plugin-copyapp.sh"
        )),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_suffix_is_stripped() {
        let names: Vec<_> = BUILD_RESOURCES
            .iter()
            .map(BuildResource::default_destination_filename)
            .collect();
        assert_eq!(names[1], "CustomAppRun.sh");
        assert_eq!(names[2], BUILD_SCRIPT);
        assert_eq!(names[4], "linuxdeploy-plugin-conda.sh");
    }

    #[test]
    fn only_hbs_sources_are_templates() {
        for resource in &BUILD_RESOURCES {
            assert_eq!(
                resource.is_template(),
                resource.filename.ends_with(TEMPLATE_SUFFIX),
                "{}",
                resource.filename
            );
        }
    }

    #[test]
    fn scripts_are_executable() {
        for resource in BUILD_RESOURCES.iter().filter(|r| r.filename.contains(".sh")) {
            assert_eq!(resource.file_mode, 0o755, "{}", resource.filename);
        }
    }
}
