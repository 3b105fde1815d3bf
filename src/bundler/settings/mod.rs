//! Configuration structures for one `build-appimage` invocation.
//!
//! Options are merged from the command line and `pyproject.toml`, then
//! combined with project metadata and the detected architecture into an
//! immutable [`PluginMetadata`] record.

mod arch;
mod options;
mod plugin;

pub use arch::{Arch, check_host_os};
pub use options::{
    BuildOptions, CliOverrides, EntrypointList, TOOL_SECTION, ToolSection, parse_entrypoint_list,
};
pub use plugin::{
    DEFAULT_MINICONDA, EntryPoint, EntrySelection, PluginMetadata, compose_version, launch_command,
    miniconda_dist_name, select_entry_points,
};
