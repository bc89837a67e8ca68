use super::{parse_config_line, ParseDefaults, SurfaceConfig, CONFIG_TAG};

/// Where a surface's active configuration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigSource {
    /// Not resolved yet, or no longer found
    #[default]
    Unknown,
    /// The owning text panel's public title (surface 0 only)
    Title,
    /// A tagged line in the block's metadata
    Metadata,
}

/// Scan policy for metadata lines. `line` must already be lower-cased.
pub fn line_has_tag(line: &str, scan_all_text: bool) -> bool {
    if line.trim().is_empty() {
        return false;
    }
    if scan_all_text {
        line.contains(CONFIG_TAG)
    } else {
        line.starts_with(CONFIG_TAG)
    }
}

/// Find the directive line for `surface_index` in a block's metadata.
///
/// Tagged lines are assigned to surfaces in order of appearance: the first
/// tagged line configures surface 0, the next surface 1, and so on. Empty
/// lines are ignored. The returned line is lower-cased. `scan_all_text`
/// applies the same tag policy as discovery (see [`line_has_tag`]).
pub fn find_surface_line(
    metadata: &str,
    surface_index: usize,
    scan_all_text: bool,
) -> Option<String> {
    let mut index = 0;
    for line in metadata.split('\n') {
        if index > surface_index {
            break;
        }

        let line = line.to_lowercase();
        if !line_has_tag(&line, scan_all_text) {
            continue;
        }

        if index == surface_index {
            return Some(line);
        }
        index += 1;
    }
    None
}

/// Resolve the configuration for a surface.
///
/// Priority: a tagged title on surface 0, then the surface's metadata line.
/// Returns `None` when neither source carries a directive.
pub fn select_config(
    title: Option<&str>,
    metadata: &str,
    surface_index: usize,
    defaults: ParseDefaults,
    scan_all_text: bool,
) -> Option<(SurfaceConfig, ConfigSource)> {
    if surface_index == 0 {
        if let Some(title) = title.map(str::to_lowercase) {
            if title.starts_with(CONFIG_TAG) {
                return Some((parse_config_line(&title, defaults), ConfigSource::Title));
            }
        }
    }

    find_surface_line(metadata, surface_index, scan_all_text)
        .map(|line| (parse_config_line(&line, defaults), ConfigSource::Metadata))
}
