use std::fmt;

use folio_core::core::path as bookpath;

/// Type tag of a package member, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Document,
    Stylesheet,
    Image,
    VectorImage,
    Font,
    Audio,
    Video,
    Generic,
    /// The singleton declaring all package members and their properties.
    ManifestDescriptor,
    /// The singleton declaring the table-of-contents structure.
    NavigationDescriptor,
}

impl ResourceKind {
    /// Classify a book path by its extension.
    pub fn from_bookpath(path: &str) -> Self {
        let name = bookpath::filename(path);
        let ext = bookpath::extension(name)
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "opf" => ResourceKind::ManifestDescriptor,
            "ncx" => ResourceKind::NavigationDescriptor,
            "xhtml" | "html" | "htm" => ResourceKind::Document,
            "css" => ResourceKind::Stylesheet,
            "svg" => ResourceKind::VectorImage,
            "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp" => ResourceKind::Image,
            "ttf" | "otf" | "woff" | "woff2" => ResourceKind::Font,
            "mp3" | "m4a" | "ogg" | "oga" | "wav" => ResourceKind::Audio,
            "mp4" | "m4v" | "webm" | "ogv" => ResourceKind::Video,
            _ => ResourceKind::Generic,
        }
    }

    /// The fixed top-level group this kind belongs to. The two descriptors
    /// live at the tree root, outside any group.
    pub fn category(&self) -> Option<Category> {
        match self {
            ResourceKind::Document => Some(Category::Text),
            ResourceKind::Stylesheet => Some(Category::Styles),
            ResourceKind::Image | ResourceKind::VectorImage => Some(Category::Images),
            ResourceKind::Font => Some(Category::Fonts),
            ResourceKind::Audio => Some(Category::Audio),
            ResourceKind::Video => Some(Category::Video),
            ResourceKind::Generic => Some(Category::Misc),
            ResourceKind::ManifestDescriptor | ResourceKind::NavigationDescriptor => None,
        }
    }

    pub fn is_descriptor(&self) -> bool {
        matches!(
            self,
            ResourceKind::ManifestDescriptor | ResourceKind::NavigationDescriptor
        )
    }

    /// Whether files of this kind can embed cross-references that the
    /// rewriter must keep consistent.
    pub fn carries_references(&self) -> bool {
        matches!(
            self,
            ResourceKind::Document
                | ResourceKind::Stylesheet
                | ResourceKind::VectorImage
                | ResourceKind::ManifestDescriptor
                | ResourceKind::NavigationDescriptor
        )
    }
}

/// MIME type for a filename, by extension.
pub fn media_type(name: &str) -> &'static str {
    let ext = bookpath::extension(name)
        .unwrap_or_default()
        .to_ascii_lowercase();
    match ext.as_str() {
        "xhtml" | "html" | "htm" => "application/xhtml+xml",
        "css" => "text/css",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "mp3" => "audio/mpeg",
        "m4a" => "audio/mp4",
        "ogg" | "oga" => "audio/ogg",
        "wav" => "audio/wav",
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "ogv" => "video/ogg",
        "ncx" => "application/x-dtbncx+xml",
        "opf" => "application/oebps-package+xml",
        _ => "application/octet-stream",
    }
}

/// The seven permanent top-level tree groups. Groups persist even when
/// emptied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Text,
    Styles,
    Images,
    Fonts,
    Audio,
    Video,
    Misc,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Text,
        Category::Styles,
        Category::Images,
        Category::Fonts,
        Category::Audio,
        Category::Video,
        Category::Misc,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Text => "Text",
            Category::Styles => "Styles",
            Category::Images => "Images",
            Category::Fonts => "Fonts",
            Category::Audio => "Audio",
            Category::Video => "Video",
            Category::Misc => "Misc",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Category::Text => 0,
            Category::Styles => 1,
            Category::Images => 2,
            Category::Fonts => 3,
            Category::Audio => 4,
            Category::Video => 5,
            Category::Misc => 6,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_by_extension() {
        assert_eq!(
            ResourceKind::from_bookpath("Text/ch1.xhtml"),
            ResourceKind::Document
        );
        assert_eq!(
            ResourceKind::from_bookpath("Styles/main.CSS"),
            ResourceKind::Stylesheet
        );
        assert_eq!(
            ResourceKind::from_bookpath("Images/cover.svg"),
            ResourceKind::VectorImage
        );
        assert_eq!(
            ResourceKind::from_bookpath("content.opf"),
            ResourceKind::ManifestDescriptor
        );
        assert_eq!(
            ResourceKind::from_bookpath("toc.ncx"),
            ResourceKind::NavigationDescriptor
        );
        assert_eq!(
            ResourceKind::from_bookpath("unknown.bin"),
            ResourceKind::Generic
        );
    }

    #[test]
    fn test_descriptors_have_no_category() {
        assert_eq!(ResourceKind::ManifestDescriptor.category(), None);
        assert_eq!(ResourceKind::NavigationDescriptor.category(), None);
        assert_eq!(ResourceKind::Image.category(), Some(Category::Images));
        assert_eq!(ResourceKind::VectorImage.category(), Some(Category::Images));
        assert_eq!(ResourceKind::Generic.category(), Some(Category::Misc));
    }

    #[test]
    fn test_media_types() {
        assert_eq!(media_type("ch1.xhtml"), "application/xhtml+xml");
        assert_eq!(media_type("toc.ncx"), "application/x-dtbncx+xml");
        assert_eq!(media_type("data.bin"), "application/octet-stream");
    }
}
