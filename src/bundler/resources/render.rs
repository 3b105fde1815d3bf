//! Materializes catalog entries on disk.
//!
//! Templates are rendered with Handlebars against the serialized
//! [`PluginMetadata`]; everything else is written byte-for-byte.

use super::{BuildResource, ResourceSource};
use crate::bundler::{
    error::{ErrorExt, Result},
    settings::PluginMetadata,
};
use handlebars::Handlebars;
use std::path::{Path, PathBuf};

/// Side length of the generated placeholder icon.
const PLACEHOLDER_ICON_SIZE: u32 = 256;

/// Renders build resources for one project.
pub struct ResourceRenderer<'a> {
    project_root: &'a Path,
    metadata: &'a PluginMetadata,
    icon: Option<PathBuf>,
    registry: Handlebars<'static>,
}

impl<'a> ResourceRenderer<'a> {
    /// Create a renderer writing below `project_root`.
    ///
    /// `icon` is resolved against the project root when relative.
    pub fn new(project_root: &'a Path, metadata: &'a PluginMetadata, icon: Option<&Path>) -> Self {
        let mut registry = Handlebars::new();
        // Shell scripts and desktop entries, not HTML
        registry.register_escape_fn(handlebars::no_escape);

        Self {
            project_root,
            metadata,
            icon: icon.map(|p| project_root.join(p)),
            registry,
        }
    }

    /// Render a template string against the metadata, with `\n` line endings.
    pub fn render_template(&self, template: &str) -> Result<String> {
        let rendered = self.registry.render_template(template, self.metadata)?;
        Ok(rendered.replace("\r\n", "\n"))
    }

    /// Absolute destination of `resource`.
    pub fn destination_path(&self, resource: &BuildResource) -> Result<PathBuf> {
        let filename = match resource.destination_filename_pattern {
            Some(pattern) => self.render_template(pattern)?,
            None => resource.default_destination_filename().to_string(),
        };
        Ok(self
            .project_root
            .join(resource.destination_dir)
            .join(filename))
    }

    /// Render every resource in catalog order, returning the written paths.
    pub async fn render_all(&self, catalog: &[BuildResource]) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(catalog.len());
        for resource in catalog {
            written.push(self.render_resource(resource).await?);
        }
        Ok(written)
    }

    /// Write one resource and apply its permission bits.
    pub async fn render_resource(&self, resource: &BuildResource) -> Result<PathBuf> {
        let destination = self.destination_path(resource)?;
        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .fs_context("creating resource directory", parent)?;
        }

        match resource.source {
            ResourceSource::Template(template) => {
                let content = self.render_template(template)?;
                tokio::fs::write(&destination, content)
                    .await
                    .fs_context("writing rendered resource", &destination)?;
            }
            ResourceSource::Static(bytes) => {
                tokio::fs::write(&destination, bytes)
                    .await
                    .fs_context("writing build resource", &destination)?;
            }
            ResourceSource::Icon => match &self.icon {
                Some(icon) => {
                    tokio::fs::copy(icon, &destination)
                        .await
                        .fs_context("copying icon", icon)?;
                }
                None => {
                    tokio::fs::write(&destination, placeholder_icon()?)
                        .await
                        .fs_context("writing placeholder icon", &destination)?;
                }
            },
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(
                &destination,
                std::fs::Permissions::from_mode(resource.file_mode),
            )
            .await
            .fs_context("setting permissions on", &destination)?;
        }

        log::debug!("Rendered {} -> {}", resource.filename, destination.display());
        Ok(destination)
    }
}

/// Deterministic PNG used when the project configures no icon.
pub fn placeholder_icon() -> Result<Vec<u8>> {
    let size = PLACEHOLDER_ICON_SIZE;
    let image = image::RgbaImage::from_fn(size, size, |x, y| {
        let shade = (((x + y) * 255) / (2 * (size - 1))) as u8;
        image::Rgba([0x30, 0x69, 0x98u8.saturating_add(shade / 4), 0xff])
    });

    let mut bytes = Vec::new();
    image.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)?;
    Ok(bytes)
}
